//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with reading or parsing a manifest file
//! - EcosystemError: A manifest failure attributed to one ecosystem
//! - ConfigError: Issues with CLI options or the project settings file
//! - IoError: File system operation failures
//!
//! Version conflicts are not errors: they are data carried by the
//! resolution result.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::domain::Ecosystem;

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest exceeds the configured size cap
    #[error("manifest file {path} is {size} bytes, over the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Reading the manifest did not finish in time
    #[error("timed out after {}s reading manifest file {path}", .timeout.as_secs_f64())]
    Timeout { path: PathBuf, timeout: Duration },

    /// JSON parsing error (for package.json)
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// TOML parsing error (for pyproject.toml, Cargo.toml)
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// XML parsing error (for pom.xml)
    #[error("failed to parse XML in {path}: {message}")]
    XmlParseError { path: PathBuf, message: String },

    /// Unsupported manifest format
    #[error("unsupported manifest format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The analysis task stopped before returning (e.g. it panicked)
    #[error("analysis of {path} did not complete: {message}")]
    Aborted { path: PathBuf, message: String },
}

/// A manifest failure scoped to the ecosystem it occurred in
#[derive(Error, Debug)]
#[error("{ecosystem} analysis failed: {error}")]
pub struct EcosystemError {
    pub ecosystem: Ecosystem,
    #[source]
    pub error: ManifestError,
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read or parsed
    #[error("invalid config file {path}: {message}")]
    InvalidConfigFile { path: PathBuf, message: String },

    /// Invalid ecosystem identifier
    #[error("invalid ecosystem '{value}': expected 'python', 'javascript', 'java', or 'rust'")]
    InvalidEcosystem { value: String },

    /// Malformed alias entry
    #[error("invalid alias '{value}' for '{name}': expected '<ecosystem>:<package>'")]
    InvalidAlias { name: String, value: String },

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TooLarge error
    pub fn too_large(path: impl Into<PathBuf>, size: u64, limit: u64) -> Self {
        ManifestError::TooLarge {
            path: path.into(),
            size,
            limit,
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        ManifestError::Timeout {
            path: path.into(),
            timeout,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new XmlParseError
    pub fn xml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::XmlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the manifest the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            ManifestError::ReadError { path, .. }
            | ManifestError::TooLarge { path, .. }
            | ManifestError::Timeout { path, .. }
            | ManifestError::JsonParseError { path, .. }
            | ManifestError::TomlParseError { path, .. }
            | ManifestError::XmlParseError { path, .. }
            | ManifestError::UnsupportedFormat { path }
            | ManifestError::Aborted { path, .. } => path,
        }
    }
}

impl EcosystemError {
    pub fn new(ecosystem: Ecosystem, error: ManifestError) -> Self {
        Self { ecosystem, error }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }
}
