/// Identifier types
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a one-shot playback source inside an audio graph
///
/// Sources are created on demand for every transition into playing and are
/// never reused, so a graph hands out strictly increasing ids. A stale id
/// (one whose source was stopped by pause, seek or stop) can then be told
/// apart from the active one when its end notification arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl SourceId {
    /// Create a new source id
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The id following this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let id = SourceId::new(7);
        assert!(id.next() > id);
        assert_eq!(id.next().to_string(), "source#8");
    }
}
