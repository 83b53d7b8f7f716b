//! trendline-core
//!
//! Core types, traits, and utilities shared across the trendline workspace.
//!
//! - `types`: keywords, batches, records, requests, configuration and errors.
//! - `connector`: the `TrendConnector` trait and its capability provider traits.
//! - `frame`: connector response shapes and their normalization to long format.
//! - `batch`: keyword batching and de-duplication.
//! - `timeseries`: zero-filling against the reference axis and period aggregation.
#![warn(missing_docs)]

/// Keyword batching helpers.
pub mod batch;
/// Connector capability traits and the primary `TrendConnector` interface.
pub mod connector;
/// Response shapes and normalization.
pub mod frame;
/// Related-queries responses and flattening.
pub mod related;
/// Time-series utilities for zero-filling and aggregation.
pub mod timeseries;
pub mod types;

pub use batch::{dedup_keywords, split_batches};
pub use connector::{InterestOverTimeProvider, RelatedQueriesProvider, TrendConnector};
pub use frame::{RawFrame, WideFrame, normalize_frame};
pub use related::{FlattenedRelated, RankedQueries, RelatedQueriesResponse, flatten_related};
pub use timeseries::aggregate::{TimeUnit, aggregate_interest};
pub use timeseries::fill::zero_fill;
pub use types::*;
