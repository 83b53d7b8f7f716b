use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the trendline workspace.
///
/// Covers argument validation, response-shape problems, connector-tagged
/// failures, timeouts, sink I/O and the fatal reference-axis condition.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrendError {
    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "interest-over-time").
        capability: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A connector returned a response whose shape or values could not be normalized.
    #[error("unexpected response shape: {0}")]
    Parse(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual connector call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "interest-over-time").
        capability: String,
    },

    /// The anchor query used to build the reference date axis failed.
    ///
    /// This is fatal for a pipeline run.
    #[error("reference axis unavailable: {0}")]
    ReferenceAxis(Box<TrendError>),

    /// Filesystem failure while reading or writing a sink.
    #[error("io error: {0}")]
    Io(String),

    /// CSV encoding or decoding failure.
    #[error("csv error: {0}")]
    Csv(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl TrendError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Parse` error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: wrap an anchor-query failure as a fatal reference-axis error.
    #[must_use]
    pub fn reference_axis(inner: Self) -> Self {
        Self::ReferenceAxis(Box::new(inner))
    }

    /// Returns true if the error must abort a whole pipeline run rather than a
    /// single batch.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ReferenceAxis(_) | Self::Io(_) | Self::Csv(_) | Self::InvalidArg(_)
        )
    }
}

impl From<std::io::Error> for TrendError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
