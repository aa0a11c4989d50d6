// Library root: entity route table, blood pressure resource and the server shell around them

pub mod api;
pub mod config;
pub mod core;
pub mod database;
pub mod routing;
pub mod utils;

pub use crate::config::environment::EnvironmentVariables;
pub use crate::config::state::AppState;
pub use crate::database::DatabaseService;
pub use crate::routing::{RouteEntry, RouteTable};
