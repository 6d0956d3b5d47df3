pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateTaxonomyCommand, CreateTaxonomyError};
pub use delete::{DeleteTaxonomyCommand, DeleteTaxonomyError, DeleteTaxonomyResponse};
pub use update::{UpdateTaxonomyCommand, UpdateTaxonomyError};
