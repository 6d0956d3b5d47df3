pub mod get;
pub mod list;

pub use get::{GetKingdomError, GetKingdomQuery};
pub use list::{ListKingdomsError, ListKingdomsQuery};
