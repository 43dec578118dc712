pub mod catalogue;
pub mod manager;
pub mod models;
pub mod query;

pub use catalogue::Catalogue;
pub use manager::StoreError;
