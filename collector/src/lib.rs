//! Rate-limit aware collection of GitHub accounts and repositories
//!
//! # Overview
//!
//! Remote collections (accounts followed by a user, repositories owned or starred by a user) are only
//! available one page at a time, and every page costs a request from a quota that the service resets
//! periodically.
//! [`PaginatedCollector`] walks such collections page by page, checking the remaining quota before the
//! first request and at every page boundary. Once fewer than [`QUOTA_THRESHOLD`] calls remain it sleeps
//! until the quota window resets (plus a few seconds of margin), then carries on.
//!
//! Every item is flattened into a [`Record`]: an ordered list of named fields where anything the
//! service could not provide is [`Field::Missing`] instead of an error.
//! The records of one seed account make up one [`ExportBatch`].

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "api")]
pub mod record;

#[cfg(feature = "collector")]
mod collector;

#[cfg(feature = "collector")]
pub use self::collector::{time_to_wait, Collection, PaginatedCollector, QUOTA_THRESHOLD, RESET_MARGIN_SECS};
#[cfg(feature = "api")]
pub use record::{drop_duplicates, ExportBatch, ExportKind, Field, Record};
