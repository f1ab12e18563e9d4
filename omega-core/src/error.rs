//! Error types for omega-core

use miette::Diagnostic;
use thiserror::Error;

use crate::targets::TargetParseError;

/// Result type alias using omega Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for omega
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(omega::config))]
    Config(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(omega::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(omega::serde))]
    Serde(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    #[diagnostic(code(omega::toml))]
    Toml(#[from] toml::de::Error),

    #[error("Invalid target: {0}")]
    #[diagnostic(
        code(omega::target),
        help("include the scheme, e.g. http://scanme.nmap.org")
    )]
    Target(#[from] TargetParseError),

    #[error("Provider error: {0}")]
    #[diagnostic(code(omega::provider))]
    Provider(String),

    #[error("Council halted at {role} turn: {reason}")]
    #[diagnostic(code(omega::council))]
    Council { role: String, reason: String },

    #[error("Report generation error: {0}")]
    #[diagnostic(code(omega::report))]
    Report(String),
}
