use std::path::PathBuf;

use thiserror::Error;

/// Failures outside the game itself: settings, log file, terminal
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown action key '{0}' (use space, enter, tab or a single character)")]
    InvalidKey(String),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, Error>;
