//! # Error Handling
//!
//! This module defines the centralized error type for `packsmith`. It uses
//! `thiserror` to derive a single `Error` enum covering every failure that can
//! propagate out of the library, together with a crate-wide `Result<T>` alias.
//!
//! ## Propagation policy
//!
//! - **Validation errors** (too many shapeless ingredients, malformed resource
//!   identifiers, documents missing a required field) are raised before anything
//!   is staged and propagate to the caller of the builder method.
//! - **Filesystem errors** during flush abort the remaining flush steps and
//!   propagate to the caller of `save`. Nothing is rolled back, so a failure
//!   partway through leaves a partially written tree.
//! - **Resolution failures** are not errors at all: the version resolver
//!   returns [`crate::version::Resolution::Unresolved`] and callers choose a
//!   fallback.
//! - **Coercions** of invalid category labels never fail; they are logged as
//!   warnings and replaced with a documented default.

use thiserror::Error;

/// Main error type for packsmith operations
#[derive(Error, Debug)]
pub enum Error {
    /// A builder input failed validation.
    ///
    /// `field` names the offending input (e.g. `ingredients`, `output`).
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// The build manifest could not be interpreted.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// A static table (pack formats, blacklist seed) was malformed.
    #[error("Static data error in {table}: {message}")]
    StaticData { table: String, message: String },

    /// A directory or file could not be created or written during flush.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A virtual path could not be built or interpreted.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// Packaging the staged tree into an archive failed.
    #[error("Archive error: {message}")]
    Archive { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A zip archive error, wrapped from `zip::result::ZipError`.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
