use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregation bucket identity. Equality is exact on every part; ordering is
/// lexicographic over the parts and serves as the final ranking tie-break.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    parts: Vec<String>,
}

impl GroupKey {
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    pub fn single(part: impl Into<String>) -> Self {
        Self {
            parts: vec![part.into()],
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn part(&self, idx: usize) -> Option<&str> {
        self.parts.get(idx).map(String::as_str)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("|"))
    }
}
