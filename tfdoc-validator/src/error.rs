//! Error types for module documentation validation.
//!
//! Every failure is a value: validators collect them into a `Vec` and never
//! stop at the first one.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Whether a checked file belongs to the fixed required set or was supplied
/// by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClass {
    Required,
    Additional,
}

impl fmt::Display for FileClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Additional => write!(f, "additional"),
        }
    }
}

/// Why a single file failed its existence/non-emptiness check.
///
/// Messages carry only the base filename, not the full path.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FileError {
    /// Nothing exists at the path.
    #[error("file does not exist: {name}")]
    NotFound { name: String },
    /// The filesystem refused the stat for another reason (permissions, I/O).
    #[error("error accessing file: {name}: {source}")]
    AccessError {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// The file exists but has zero length.
    #[error("file is empty: {name}")]
    Empty { name: String },
}

impl FileError {
    /// Stable machine-readable tag for the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::AccessError { .. } => "access_error",
            Self::Empty { .. } => "empty",
        }
    }

    /// Base filename the error refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name } | Self::AccessError { name, .. } | Self::Empty { name } => name,
        }
    }
}

/// A file check failure tagged with its [`FileClass`].
///
/// Renders as `"{class} {error}"`, e.g. `required file is empty: outputs.tf`.
#[derive(Debug, Error)]
#[error("{class} {error}")]
#[non_exhaustive]
pub struct FileValidationError {
    /// Required or additional.
    pub class: FileClass,
    /// Full path that was checked.
    pub path: PathBuf,
    /// The underlying failure.
    #[source]
    pub error: FileError,
}

impl FileValidationError {
    pub(crate) fn new(class: FileClass, path: &Path, error: FileError) -> Self {
        Self {
            class,
            path: path.to_path_buf(),
            error,
        }
    }
}

impl Serialize for FileValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileValidationError", 4)?;
        state.serialize_field("class", &self.class)?;
        state.serialize_field("kind", self.error.kind())?;
        state.serialize_field("file", &self.path.display().to_string())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// A failed reachability probe for one URL.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UrlError {
    /// The request could not be completed (DNS, refused connection, TLS,
    /// client timeout, unsupported scheme).
    #[error("error accessing URL: {url}: {source}")]
    TransportError {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// A response arrived but its status was not 200.
    #[error("URL returned non-OK status: {url}: Status: {status}")]
    BadStatus { url: String, status: u16 },
    /// The check task panicked or was cancelled before producing a result.
    #[error("URL probe did not complete: {url}: {source}")]
    ProbeAborted {
        url: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl UrlError {
    /// Stable machine-readable tag for the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TransportError { .. } => "transport_error",
            Self::BadStatus { .. } => "bad_status",
            Self::ProbeAborted { .. } => "probe_aborted",
        }
    }

    /// The probed URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::TransportError { url, .. }
            | Self::BadStatus { url, .. }
            | Self::ProbeAborted { url, .. } => url,
        }
    }

    /// The status code for [`UrlError::BadStatus`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadStatus { status, .. } => Some(*status),
            Self::TransportError { .. } | Self::ProbeAborted { .. } => None,
        }
    }
}

impl Serialize for UrlError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("UrlError", 4)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("url", self.url())?;
        state.serialize_field("status", &self.status())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// A validator could not be constructed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Documentation text could not be loaded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} exceeds maximum size of {max_size} bytes", .path.display())]
    TooLarge { path: PathBuf, max_size: u64 },
    #[error("{} is not valid UTF-8", .path.display())]
    InvalidEncoding { path: PathBuf },
}
