//! # Error Handling
//!
//! This module defines the centralized error type for the `bmad-provisioner`
//! library. It uses the `thiserror` library to build a single `Error` enum
//! covering every failure the reconciliation core can surface.
//!
//! ## Taxonomy
//!
//! - **Absence** (missing file, table or installation root) is *not* an error.
//!   It flows into normal results as a `Missing` classification or an empty
//!   existing table.
//! - **Structural mismatch** in reference tables (short rows, rows without a
//!   key) is tolerated and skipped during indexing.
//! - **Validation errors** in the manifest are collected as a batch by
//!   `Manifest::validate`; callers that abort wrap them in
//!   [`Error::Validation`].
//! - **I/O failures** while reading or writing a table are hard failures of
//!   that single artifact ([`Error::TableRead`], [`Error::TableWrite`]).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for bmad-provisioner operations
#[derive(Error, Debug)]
pub enum Error {
    /// The skills manifest could not be parsed.
    ///
    /// Includes an optional hint about how to fix the manifest.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// The manifest failed validation. Every collected problem is kept.
    #[error("Manifest validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    /// An existing reference table could not be read.
    #[error("Failed to read table {}: {message}", path.display())]
    TableRead { path: PathBuf, message: String },

    /// A merged reference table could not be written. The previous content
    /// of the table is left untouched.
    #[error("Failed to write table {}: {message}", path.display())]
    TableWrite { path: PathBuf, message: String },

    /// An artifact generator failed for a leader.
    #[error("Generator error for {leader}: {message}")]
    Generator { leader: String, message: String },

    /// The installed-state layout could not be resolved.
    #[error("Layout error: {message}")]
    Layout { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV encoding error, wrapped from `csv::Error`.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
