use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ContactField, ParseError};

/// A comparable field holding different non-empty values in both records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConflict {
    pub field: ContactField,
    pub old_value: String,
    pub new_value: String,
}

impl MergeConflict {
    pub fn value_for(&self, resolution: Resolution) -> &str {
        match resolution {
            Resolution::Old => &self.old_value,
            Resolution::New => &self.new_value,
        }
    }
}

/// Which side of a conflict wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Old,
    New,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Old => f.write_str("old"),
            Resolution::New => f.write_str("new"),
        }
    }
}

impl FromStr for Resolution {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "old" => Ok(Resolution::Old),
            "new" => Ok(Resolution::New),
            _ => Err(ParseError::UnknownResolution(s.to_string())),
        }
    }
}
