//! Mood tracker entries.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Mood choices offered by the tracker buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Good,
    Neutral,
    Bad,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Good, Mood::Neutral, Mood::Bad];

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "😊 良い",
            Self::Neutral => "😐 普通",
            Self::Bad => "😔 悪い",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
