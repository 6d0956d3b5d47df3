//! Taxa Server Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! REST API over a species catalogue: kingdoms, taxonomies, habitats,
//! species and the risks they pose to humans.
//!
//! # Overview
//!
//! - **API Endpoints**: CRUD for every collection under `/api/v1`
//! - **Species Views**: name and rank search, exclusion, country and status
//!   filters, severity ordering, per-rank counts and projections
//! - **Database**: PostgreSQL through SQLx, schema in `migrations/`
//! - **Configuration**: environment variables with `.env` support
//!
//! # Architecture
//!
//! Features are vertical slices. Commands write, queries read; both are
//! plain data handled by an async `handle` function and executed through
//! [`cqrs`], which logs and times each call.
//!
//! Species views never build SQL themselves. Request parameters go through
//! the translator in `taxa_common::query`, and the resulting descriptor is
//! compiled and run by [`db::pipeline`].
//!
//! # Example
//!
//! ```no_run
//! use taxa_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&db::DbConfig::from(&config.database)).await?;
//!     db::run_migrations(&pool).await?;
//!     api::serve(pool, &config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{ApiResult, AppError};
