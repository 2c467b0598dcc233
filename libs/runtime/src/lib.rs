pub mod config;
pub mod logging;

pub use config::{
    AppConfig, AuthConfig, CliArgs, DatabaseConfig, LoggingConfig, MailConfig, ServerConfig,
};
