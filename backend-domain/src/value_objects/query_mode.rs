// Query mode value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::UnknownQueryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    All,
    Latest,
    Upcoming,
    Old,
}

impl QueryMode {
    pub const VALUES: [QueryMode; 4] = [
        QueryMode::All,
        QueryMode::Latest,
        QueryMode::Upcoming,
        QueryMode::Old,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::All => "all",
            QueryMode::Latest => "latest",
            QueryMode::Upcoming => "upcoming",
            QueryMode::Old => "old",
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Names are matched exactly; "ALL" or " all" are not modes.
impl FromStr for QueryMode {
    type Err = UnknownQueryMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryMode::VALUES
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownQueryMode(s.to_string()))
    }
}
