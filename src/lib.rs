pub mod backend;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod metering;
pub mod middleware;
pub mod queue;
pub mod session;
pub mod state;
