//! Species: CRUD plus the filtered, sorted, grouped and projected views

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateSpeciesCommand, CreateSpeciesError, DeleteSpeciesCommand, DeleteSpeciesError,
    DeleteSpeciesResponse, UpdateSpeciesCommand, UpdateSpeciesError,
};
pub use queries::{
    CountByTaxonomyError, CountByTaxonomyQuery, FindSpeciesError, FindSpeciesQuery,
    GetSpeciesError, GetSpeciesQuery, ListSpeciesError, ListSpeciesQuery, SpeciesQueryKind,
    TaxonomyCounts,
};
pub use routes::species_routes;
pub use types::{GeographicDistribution, Species, SpeciesDetails};
