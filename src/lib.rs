pub mod cli;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;

pub use config::AppConfig;
pub use db::ConnectionProvider;
