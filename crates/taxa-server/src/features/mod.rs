//! Feature modules implementing the Taxa API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes, mounted under `/api/v1`.
//!
//! # Features
//!
//! - **kingdoms**: top-level classification records
//! - **taxonomies**: phylum through genus
//! - **habitats**: where species live
//! - **species**: species records plus the filtered and grouped views
//! - **human_risks**: hazards a species poses to people
//!
//! # Architecture
//!
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list, species views)
//! - `routes.rs` - HTTP route definitions and error mapping
//! - `types.rs` - Row types and column lists
//!
//! Commands and queries are plain data implementing `mediator::Request`;
//! routes run their `handle` functions through [`crate::cqrs`].

pub mod habitats;
pub mod human_risks;
pub mod kingdoms;
pub mod shared;
pub mod species;
pub mod taxonomies;

use axum::Router;
use sqlx::PgPool;

/// Creates the API router with every feature mounted under its path prefix
pub fn router(pool: PgPool) -> Router<()> {
    Router::new()
        .nest("/kingdoms", kingdoms::kingdoms_routes().with_state(pool.clone()))
        .nest("/taxonomies", taxonomies::taxonomies_routes().with_state(pool.clone()))
        .nest("/habitats", habitats::habitats_routes().with_state(pool.clone()))
        .nest("/species", species::species_routes().with_state(pool.clone()))
        .nest("/human-risks", human_risks::human_risks_routes().with_state(pool))
}
