pub mod get;
pub mod list;

pub use get::{GetHumanRiskError, GetHumanRiskQuery};
pub use list::{ListHumanRisksError, ListHumanRisksQuery};
