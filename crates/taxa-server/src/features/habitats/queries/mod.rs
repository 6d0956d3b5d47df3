pub mod get;
pub mod list;

pub use get::{GetHabitatError, GetHabitatQuery};
pub use list::{ListHabitatsError, ListHabitatsQuery};
