//! Error types and handling for modscout
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Layer misconfiguration (a layer whose root module was never discovered, or
//! a boot layer without a configured loader) is deliberately *not* represented
//! here: those conditions are logged on the registry and discovery continues.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modscout operations
#[derive(Error, Diagnostic, Debug)]
pub enum ScoutError {
    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(modscout::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to parse build profile: {reason}")]
    #[diagnostic(code(modscout::config::parse_failed))]
    ConfigParseFailed { reason: String },

    #[error("Directive needs at least a source and a destination, got {len} element(s)")]
    #[diagnostic(
        code(modscout::config::directive_arity),
        help("Directives are positional arrays: [source, destination, exclude-pattern...]")
    )]
    DirectiveArity { len: usize },

    // Filter errors
    #[error("Invalid filter pattern '{pattern}': {reason}")]
    #[diagnostic(
        code(modscout::filter::parse_failed),
        help("Filter patterns are unanchored regular expressions")
    )]
    FilterParseFailed { pattern: String, reason: String },

    #[error("Unknown predicate '{name}'")]
    #[diagnostic(
        code(modscout::filter::unknown_predicate),
        help("Register the predicate on the PredicateRegistry before running discovery")
    )]
    UnknownPredicate { name: String },

    // Traversal errors
    #[error("Failed to walk '{path}': {reason}")]
    #[diagnostic(code(modscout::walk::failed))]
    WalkFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modscout::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for ScoutError {
    fn from(err: std::io::Error) -> Self {
        ScoutError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        ScoutError::ConfigParseFailed {
            reason: err.to_string(),
        }
    }
}

impl From<walkdir::Error> for ScoutError {
    fn from(err: walkdir::Error) -> Self {
        ScoutError::WalkFailed {
            path: err
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<unknown>".to_string()),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ScoutError>;
