// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the tone mapping pipeline

use std::fmt;

/// Result type alias using PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Main pipeline error type
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Program or parameter configuration errors (fatal for the session)
    Configuration(ConfigurationError),
    /// Source and destination textures disagree in size or layer count
    TextureMismatch(String),
    /// Image decoding/encoding errors (CLI only)
    Image(String),
    /// Filesystem errors (config and CLI output)
    Io(String),
}

/// Configuration errors surfaced at setup or when parsing options
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// No shading program registered under the requested name
    ProgramNotFound(String),
    /// The program does not implement a pass the pipeline needs
    MissingPass { program: String, pass: String },
    /// Operator name or index that does not map to a known operator
    UnknownOperator(String),
    /// Parameter outside its accepted domain
    InvalidParameter { name: &'static str, reason: String },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Configuration(e) => write!(f, "Configuration error: {}", e),
            PipelineError::TextureMismatch(msg) => write!(f, "Texture mismatch: {}", msg),
            PipelineError::Image(msg) => write!(f, "Image error: {}", msg),
            PipelineError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ProgramNotFound(name) => {
                write!(f, "Shading program not found: {}", name)
            }
            ConfigurationError::MissingPass { program, pass } => {
                write!(f, "{} does not exist in program {}", pass, program)
            }
            ConfigurationError::UnknownOperator(value) => {
                write!(f, "Unknown tone mapping operator: {}", value)
            }
            ConfigurationError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for PipelineError {}
impl std::error::Error for ConfigurationError {}

impl From<ConfigurationError> for PipelineError {
    fn from(err: ConfigurationError) -> Self {
        PipelineError::Configuration(err)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::Image(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Io(format!("Invalid config JSON: {}", err))
    }
}
