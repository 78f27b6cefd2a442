/// Store and product catalogue seeding from config.toml
pub mod catalog;

/// Database connection and table creation
pub mod database;

/// Application settings from config.toml and the environment
pub mod settings;

pub use settings::{AppConfig, load_app_configuration};
