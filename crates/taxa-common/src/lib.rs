//! Taxa Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, the species query translator, and logging for the Taxa project.
//!
//! # Overview
//!
//! - **Types**: taxonomic ranks and the conservation-status ordinal table
//! - **Query**: translation of request parameters into storage-agnostic
//!   [`QueryDescriptor`]s
//! - **Error Handling**: [`QueryError`] for rejected request parameters
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use taxa_common::query::translator;
//!
//! let descriptor = translator::status_range_filter(Some("Vulnerable"), Some("en peligro"))?;
//! assert!(!descriptor.needs_join());
//! # Ok::<(), taxa_common::QueryError>(())
//! ```

pub mod error;
pub mod logging;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use error::{QueryError, QueryResult};
pub use query::QueryDescriptor;
pub use types::{ConservationStatus, TaxonomicRank};
