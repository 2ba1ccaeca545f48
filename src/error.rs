//! Crate error type.
//!
//! The game core itself cannot fail; everything here comes from the terminal,
//! the config file or the log file.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    /// Terminal or log file I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
