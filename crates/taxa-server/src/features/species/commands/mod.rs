pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateSpeciesCommand, CreateSpeciesError};
pub use delete::{DeleteSpeciesCommand, DeleteSpeciesError, DeleteSpeciesResponse};
pub use update::{UpdateSpeciesCommand, UpdateSpeciesError};
