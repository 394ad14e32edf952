//! # SecPlan
//!
//! The data, model, and export core of a floor-plan annotation and
//! project-management tool for security-system design:
//! - Projects with floorplans and a master equipment inventory
//! - Undoable editing through a single action dispatcher
//! - Equipment catalog, factories, and utility calculators
//! - Blob storage for floorplan documents and equipment photos
//! - Project/backup archives and deliverables packages
//!
//! ## Architecture
//!
//! SecPlan is organized as a workspace with multiple crates:
//!
//! 1. **secplan-core** - Error taxonomy, equipment catalog, blob store
//! 2. **secplan-project** - Data model, command stack, dispatcher, archives
//! 3. **secplan-editor** - Viewport, selection, drag/tool session
//! 4. **secplan-export** - Annotated PDFs, spreadsheets, deliverables zips
//! 5. **secplan-assist** - AI completion client
//! 6. **secplan-settings** - TOML preferences
//! 7. **secplan** - Main binary that integrates all crates

pub use secplan_core::blobs::{Blob, BlobStore, FsBlobStore, MemBlobStore};
pub use secplan_core::catalog::{CatalogEntry, DeviceKind, EquipmentCategory, MarkerKind};
pub use secplan_core::error::{Error, Result};

pub use secplan_project::{
    export_backup, export_project, import_archive, ingest_floorplan_source, Action, AppState,
    AuditAction, AuditLogEntry, BackupScheduler, EditCommand, Floorplan, FloorplanId,
    FloorplanSource, History, ImportedArchive, Item, ItemData, ItemId, LayerKind, Placement,
    Project, ProjectId, HISTORY_LIMIT,
};

pub use secplan_assist::{CompletionClient, CompletionRequest, CompletionResponse};
pub use secplan_editor::{EditorSession, PagePoint, Selection, Tool, Viewport};
pub use secplan_export::{annotated_floorplan, equipment_workbook, write_deliverables};
pub use secplan_settings::Config;

/// Build timestamp, exported by build.rs.
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging for the application.
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer().with_target(true).with_level(true).pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
