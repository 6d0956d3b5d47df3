//! Taxonomy records: phylum through genus for a group of species

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateTaxonomyCommand, CreateTaxonomyError, DeleteTaxonomyCommand, DeleteTaxonomyError,
    DeleteTaxonomyResponse, UpdateTaxonomyCommand, UpdateTaxonomyError,
};
pub use queries::{GetTaxonomyError, GetTaxonomyQuery, ListTaxonomiesError, ListTaxonomiesQuery};
pub use routes::taxonomies_routes;
pub use types::{RankFields, Taxonomy};
