//! Kingdoms: the top-level classification a species or taxonomy can point to

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateKingdomCommand, CreateKingdomError, DeleteKingdomCommand, DeleteKingdomError,
    DeleteKingdomResponse, UpdateKingdomCommand, UpdateKingdomError,
};
pub use queries::{GetKingdomError, GetKingdomQuery, ListKingdomsError, ListKingdomsQuery};
pub use routes::kingdoms_routes;
pub use types::Kingdom;
