pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateHumanRiskCommand, CreateHumanRiskError};
pub use delete::{DeleteHumanRiskCommand, DeleteHumanRiskError, DeleteHumanRiskResponse};
pub use update::{UpdateHumanRiskCommand, UpdateHumanRiskError};
