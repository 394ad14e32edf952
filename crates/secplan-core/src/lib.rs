//! # SecPlan Core
//!
//! Core types and utilities for SecPlan.
//! Provides the error taxonomy, the static equipment catalog, and the
//! blob store used for floorplan documents and equipment images.

pub mod blobs;
pub mod catalog;
pub mod error;

pub use blobs::{Blob, BlobStore, FsBlobStore, MemBlobStore};
pub use catalog::{CatalogEntry, DeviceKind, EquipmentCategory, FovDefaults, MarkerKind};
pub use error::{AssistError, Error, ExportError, ProjectError, Result, SettingsError, StorageError};
