pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::XecaClient;
pub use api::{build_app_router, AppState};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::finder::TicketFinder;
pub use utils::error::{FinderError, Result};
