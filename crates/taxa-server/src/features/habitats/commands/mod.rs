pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateHabitatCommand, CreateHabitatError};
pub use delete::{DeleteHabitatCommand, DeleteHabitatError, DeleteHabitatResponse};
pub use update::{UpdateHabitatCommand, UpdateHabitatError};
