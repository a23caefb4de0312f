use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Category label picked by the user. It is recorded with each request but
/// does not change the search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[default]
    Science,
    Growth,
    Agriculture,
    Technology,
    History,
    Fiction,
    Philosophy,
    Other,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Science,
        Topic::Growth,
        Topic::Agriculture,
        Topic::Technology,
        Topic::History,
        Topic::Fiction,
        Topic::Philosophy,
        Topic::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Science => "science",
            Topic::Growth => "growth",
            Topic::Agriculture => "agriculture",
            Topic::Technology => "technology",
            Topic::History => "history",
            Topic::Fiction => "fiction",
            Topic::Philosophy => "philosophy",
            Topic::Other => "other",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
