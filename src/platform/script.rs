//! Scripted input for headless races
//!
//! A script is a list of steps, each holding a set of keys for a number of
//! ticks:
//!
//! ```json
//! { "steps": [ { "forward": true, "ticks": 90 }, { "forward": true, "left": true, "ticks": 20 } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::TickInput;

/// One run of identical tick inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(flatten)]
    pub input: TickInput,
    pub ticks: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let script = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded input script {} ({} steps, {} ticks)",
            path.display(),
            script.steps.len(),
            script.total_ticks()
        );
        Ok(script)
    }

    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }

    /// Per-tick inputs in order. One-shot fields (pause, waypoint) fire on
    /// the first tick of their step only.
    pub fn inputs(&self) -> impl Iterator<Item = TickInput> + '_ {
        self.steps.iter().flat_map(|step| {
            (0..step.ticks).map(move |i| {
                if i == 0 {
                    step.input.clone()
                } else {
                    TickInput {
                        pause: false,
                        waypoint: None,
                        ..step.input.clone()
                    }
                }
            })
        })
    }
}
