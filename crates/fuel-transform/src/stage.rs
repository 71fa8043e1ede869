use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered transformation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Clean,
    Normalize,
    Enrich,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Clean, Stage::Normalize, Stage::Enrich];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Normalize => "normalize",
            Stage::Enrich => "enrich",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
