pub mod count_by_taxonomy;
pub mod find;
pub mod get;
pub mod list;

pub use count_by_taxonomy::{CountByTaxonomyError, CountByTaxonomyQuery, TaxonomyCounts};
pub use find::{FindSpeciesError, FindSpeciesQuery, SpeciesQueryKind};
pub use get::{GetSpeciesError, GetSpeciesQuery};
pub use list::{ListSpeciesError, ListSpeciesQuery};
