//! Application-wide error types using thiserror.

use herald_commands::RegistryError;
use herald_common::HeraldError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Configuration, logging or localization error.
    #[error("Configuration error: {0}")]
    Config(#[from] HeraldError),

    /// Discord/Serenity error.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// Declarations could not be discovered.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Remote command registration failed.
    #[error("Registration error: {0}")]
    Registration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the bot application.
pub type BotResult<T> = Result<T, BotError>;
