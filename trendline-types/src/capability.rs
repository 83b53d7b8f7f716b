use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for connectors, errors, and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Search interest over time for a keyword batch.
    InterestOverTime,
    /// Top and rising related queries per keyword.
    RelatedQueries,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InterestOverTime => "interest-over-time",
            Self::RelatedQueries => "related-queries",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
