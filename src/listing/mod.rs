pub mod executor;
pub mod query;
pub mod response;

pub use executor::{fan_out, Fetched, ListOutcome};
pub use query::{Column, ColumnSet, ListQuery, SortDirection};
pub use response::{pages_current, pages_total, shape, LevelLimited, ListResult};
