pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateKingdomCommand, CreateKingdomError};
pub use delete::{DeleteKingdomCommand, DeleteKingdomError, DeleteKingdomResponse};
pub use update::{UpdateKingdomCommand, UpdateKingdomError};
