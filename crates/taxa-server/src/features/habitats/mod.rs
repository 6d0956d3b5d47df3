//! Habitats a species can be linked to

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateHabitatCommand, CreateHabitatError, DeleteHabitatCommand, DeleteHabitatError,
    DeleteHabitatResponse, UpdateHabitatCommand, UpdateHabitatError,
};
pub use queries::{GetHabitatError, GetHabitatQuery, ListHabitatsError, ListHabitatsQuery};
pub use routes::habitats_routes;
pub use types::Habitat;
