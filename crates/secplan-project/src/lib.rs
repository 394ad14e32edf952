//! Normalized project store.
//!
//! The data model, entity factories, undoable command stack, action
//! dispatcher, audit log, calculators, archive import/export, and the
//! auto-backup scheduler. One master inventory per project holds the
//! canonical item records; floorplans carry membership views over it.

pub mod archive;
pub mod audit;
pub mod backup;
pub mod calc;
pub mod command;
pub mod factory;
pub mod model;
pub mod store;

pub use archive::{
    export_backup, export_project, import_archive, ingest_floorplan_source, ImportedArchive,
};
pub use audit::{AuditAction, AuditLogEntry};
pub use backup::BackupScheduler;
pub use command::{EditCommand, History, HISTORY_LIMIT};
pub use model::{
    Floorplan, FloorplanId, FloorplanSource, Item, ItemData, ItemId, Placement, Project, ProjectId,
};
pub use store::{Action, AppState, LayerKind};
