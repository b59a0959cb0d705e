use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{stage} shader compile error: {log}")]
    Compile { stage: &'static str, log: String },
    #[error("shader link error: {0}")]
    Link(String),
    #[error("shader source contains an interior nul byte")]
    NulInSource(#[from] std::ffi::NulError),
    #[error("texture {width}x{height} is too large to upload")]
    TextureTooLarge { width: u32, height: u32 },
}

/// SDL reports failures as plain strings.
#[derive(Debug, Error)]
#[error("{context}: {message}")]
pub struct WindowError {
    pub context: &'static str,
    pub message: String,
}

impl WindowError {
    pub fn new(context: &'static str, message: impl ToString) -> Self {
        Self {
            context,
            message: message.to_string(),
        }
    }
}
