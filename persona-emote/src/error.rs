//! Error types for persona-emote
//!
//! Only construction and config loading can fail. Per-frame calls absorb bad
//! input locally and never return an error.

use thiserror::Error;

/// Emote controller errors
#[derive(Error, Debug)]
pub enum EmoteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
