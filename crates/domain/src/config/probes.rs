use serde::{Deserialize, Serialize};

use crate::ProbeSpec;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbesConfig {
    /// Stagger each probe's first query by a random delay inside its interval.
    #[serde(default = "default_start_jitter")]
    pub start_jitter: bool,

    #[serde(default)]
    pub specs: Vec<ProbeSpec>,
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            start_jitter: default_start_jitter(),
            specs: Vec::new(),
        }
    }
}

fn default_start_jitter() -> bool {
    true
}
