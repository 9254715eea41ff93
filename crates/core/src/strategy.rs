//! Summarization strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Persisted name of [`Strategy::Total`].
pub const TOTAL_COUNT: &str = "Total count";

/// Persisted name of [`Strategy::Itemized`].
pub const ITEMIZED_COUNT: &str = "Itemized count";

/// How a summary aggregates the records of its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Count every record in the report.
    #[serde(rename = "Total count")]
    Total,
    /// Count records per distinct value of the `bucketBy` field.
    #[serde(rename = "Itemized count")]
    Itemized,
}

impl Strategy {
    /// All strategies, in the order a form presents them.
    pub const ALL: [Strategy; 2] = [Strategy::Total, Strategy::Itemized];

    /// String representation used in persisted configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Total => TOTAL_COUNT,
            Strategy::Itemized => ITEMIZED_COUNT,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown strategy '{0}'. Must be one of: Total count, Itemized count")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TOTAL_COUNT => Ok(Strategy::Total),
            ITEMIZED_COUNT => Ok(Strategy::Itemized),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
