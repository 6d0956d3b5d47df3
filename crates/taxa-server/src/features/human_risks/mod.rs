//! Human risks: hazards a species poses to people

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateHumanRiskCommand, CreateHumanRiskError, DeleteHumanRiskCommand, DeleteHumanRiskError,
    DeleteHumanRiskResponse, UpdateHumanRiskCommand, UpdateHumanRiskError,
};
pub use queries::{
    GetHumanRiskError, GetHumanRiskQuery, ListHumanRisksError, ListHumanRisksQuery,
};
pub use routes::human_risks_routes;
pub use types::HumanRisk;
