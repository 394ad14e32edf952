//! Error handling for SecPlan
//!
//! Provides error types for all layers of the application:
//! - Project errors (model/dispatch related)
//! - Storage errors (blob store and archive I/O)
//! - Export errors (deliverable generation)
//! - Assist errors (AI completion service)
//! - Settings errors (configuration files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Project error type
///
/// Represents errors related to the project data model and action
/// dispatch, including referential failures and archive manifests.
#[derive(Error, Debug, Clone)]
pub enum ProjectError {
    /// Referenced project does not exist
    #[error("Unknown project: {id}")]
    UnknownProject {
        /// The project id that could not be resolved.
        id: String,
    },

    /// Referenced floorplan does not exist
    #[error("Unknown floorplan: {id}")]
    UnknownFloorplan {
        /// The floorplan id that could not be resolved.
        id: String,
    },

    /// Referenced item does not exist
    #[error("Unknown item: {id}")]
    UnknownItem {
        /// The item id that could not be resolved.
        id: String,
    },

    /// Snapshot arrays passed to an update command disagree
    #[error("Snapshot mismatch: {reason}")]
    SnapshotMismatch {
        /// Why the previous/current snapshots cannot be paired.
        reason: String,
    },

    /// Archive manifest missing or unrecognized
    #[error("Invalid archive: {reason}")]
    InvalidArchive {
        /// The reason the archive could not be interpreted.
        reason: String,
    },

    /// Archive format version is not supported
    #[error("Unsupported archive version: {version}")]
    UnsupportedVersion {
        /// The version string found in the manifest.
        version: String,
    },

    /// Generic project error
    #[error("Project error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Storage error type
///
/// Represents errors from the blob store and on-disk persistence.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// No blob stored under the given key
    #[error("Blob not found: {key}")]
    BlobNotFound {
        /// The key that was requested.
        key: String,
    },

    /// Read/write failure against the backing store
    #[error("Storage I/O failure for {key}: {reason}")]
    Io {
        /// The key being accessed when the failure occurred.
        key: String,
        /// The underlying failure description.
        reason: String,
    },

    /// Sidecar metadata was missing or unreadable
    #[error("Corrupt blob metadata for {key}: {reason}")]
    CorruptMetadata {
        /// The key whose metadata failed to parse.
        key: String,
        /// The parse failure description.
        reason: String,
    },

    /// The store root directory could not be prepared
    #[error("Failed to prepare store root {root}: {reason}")]
    RootUnavailable {
        /// The configured root directory.
        root: String,
        /// The underlying failure description.
        reason: String,
    },
}

/// Export error type
///
/// Represents failures while producing deliverables (PDF overlays,
/// spreadsheet workbooks, zip packages).
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    /// A floorplan references a source blob that could not be fetched
    #[error("Missing floorplan source for {floorplan}: {reason}")]
    MissingSource {
        /// The floorplan whose source blob failed to load.
        floorplan: String,
        /// The underlying failure description.
        reason: String,
    },

    /// Writing an archive entry failed
    #[error("Failed to write archive entry {entry}: {reason}")]
    ArchiveWrite {
        /// The entry path inside the archive.
        entry: String,
        /// The underlying failure description.
        reason: String,
    },

    /// Document generation failed
    #[error("Document generation failed: {reason}")]
    Document {
        /// The reason the document could not be generated.
        reason: String,
    },
}

/// Assist error type
///
/// Represents failures calling the external AI completion service.
/// The service is treated as unreliable; these errors surface once to
/// the caller with no retry.
#[derive(Error, Debug, Clone)]
pub enum AssistError {
    /// Transport-level failure reaching the service
    #[error("Completion request failed: {reason}")]
    Transport {
        /// The underlying transport failure.
        reason: String,
    },

    /// The service answered with a non-success status
    #[error("Completion service returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body did not match the requested schema
    #[error("Completion response did not match schema: {reason}")]
    SchemaMismatch {
        /// The validation failure description.
        reason: String,
    },

    /// The response body could not be parsed at all
    #[error("Unparseable completion response: {reason}")]
    BadResponse {
        /// The parse failure description.
        reason: String,
    },
}

/// Settings error type
#[derive(Error, Debug, Clone)]
pub enum SettingsError {
    /// Configuration file could not be read or written
    #[error("Config I/O failure at {path}: {reason}")]
    Io {
        /// The configuration file path.
        path: String,
        /// The underlying failure description.
        reason: String,
    },

    /// Configuration file contents failed to parse
    #[error("Config parse failure: {reason}")]
    Parse {
        /// The parse failure description.
        reason: String,
    },

    /// A configuration value failed validation
    #[error("Invalid setting {setting}: {reason}")]
    Invalid {
        /// The offending setting name.
        setting: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Main error type for SecPlan
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Project error
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Assist error
    #[error(transparent)]
    Assist(#[from] AssistError),

    /// Settings error
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a storage error
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this is a project error
    pub fn is_project_error(&self) -> bool {
        matches!(self, Error::Project(_))
    }

    /// Check if this is an assist error
    pub fn is_assist_error(&self) -> bool {
        matches!(self, Error::Assist(_))
    }

    /// Check if this error means a referenced record is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Storage(StorageError::BlobNotFound { .. })
                | Error::Project(ProjectError::UnknownProject { .. })
                | Error::Project(ProjectError::UnknownFloorplan { .. })
                | Error::Project(ProjectError::UnknownItem { .. })
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
