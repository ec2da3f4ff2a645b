//! Double-buffered character grid with diffed output

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Color::Black,
    };

    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }
}

pub struct Frame {
    w: u16,
    h: u16,
    cur: Vec<Cell>,
    prev: Vec<Cell>,
    /// Force a full redraw on the next flush
    dirty: bool,
}

impl Frame {
    pub fn new(w: u16, h: u16) -> Self {
        let len = w as usize * h as usize;
        Self {
            w,
            h,
            cur: vec![Cell::BLANK; len],
            prev: vec![Cell::BLANK; len],
            dirty: true,
        }
    }

    pub fn width(&self) -> u16 {
        self.w
    }

    pub fn height(&self) -> u16 {
        self.h
    }

    pub fn resize(&mut self, w: u16, h: u16) {
        *self = Self::new(w, h);
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cur[y as usize * self.w as usize + x as usize])
    }

    pub fn put(&mut self, x: u16, y: u16, cell: Cell) {
        if x >= self.w || y >= self.h {
            return;
        }
        self.cur[y as usize * self.w as usize + x as usize] = cell;
    }

    /// Overwrite the glyph and foreground, keep the background
    pub fn put_glyph(&mut self, x: u16, y: u16, ch: char, fg: Color) {
        if let Some(cell) = self.get(x, y) {
            self.put(x, y, Cell { ch, fg, ..cell });
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            let Ok(i) = u16::try_from(i) else { break };
            let xx = x.saturating_add(i);
            if xx >= self.w {
                break;
            }
            self.put(xx, y, Cell::new(ch, fg, bg));
        }
    }

    /// Replace the whole buffer with `cells` (same dimensions)
    pub fn copy_from(&mut self, cells: &[Cell]) {
        if cells.len() == self.cur.len() {
            self.cur.copy_from_slice(cells);
        }
    }

    /// Write cells that differ from the last flush
    pub fn flush_diff<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut cur_fg = None::<Color>;
        let mut cur_bg = None::<Color>;

        for y in 0..self.h {
            let row_off = y as usize * self.w as usize;
            for x in 0..self.w {
                let i = row_off + x as usize;
                let a = self.cur[i];
                if !self.dirty && a == self.prev[i] {
                    continue;
                }
                queue!(out, cursor::MoveTo(x, y))?;
                if cur_fg != Some(a.fg) {
                    queue!(out, SetForegroundColor(a.fg))?;
                    cur_fg = Some(a.fg);
                }
                if cur_bg != Some(a.bg) {
                    queue!(out, SetBackgroundColor(a.bg))?;
                    cur_bg = Some(a.bg);
                }
                queue!(out, Print(a.ch))?;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()?;
        self.prev.copy_from_slice(&self.cur);
        self.dirty = false;
        Ok(())
    }
}
