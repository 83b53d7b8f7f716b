//! Time-series utilities shared by connectors and the orchestrator.
//!
//! Modules include:
//! - `fill`: zero-filled series aligned to the reference axis
//! - `aggregate`: mean search interest per keyword per calendar period
/// Period bucketing and averaging.
pub mod aggregate;
/// Zero-filled series for degenerate query results.
pub mod fill;
