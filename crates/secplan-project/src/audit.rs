//! Project audit log.
//!
//! Every dispatched mutation appends a typed entry describing who did
//! what and when. The log is part of the project document and travels
//! with it through save, backup, and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Broad classification of an audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Items added to the inventory
    ItemsAdded,
    /// Items edited in place
    ItemsUpdated,
    /// Items removed from the inventory
    ItemsRemoved,
    /// An edit was undone
    Undo,
    /// An undone edit was reapplied
    Redo,
    /// Project created or renamed
    ProjectChanged,
    /// Floorplan added, renamed, or removed
    FloorplanChanged,
    /// Checklist, calculator, or AI analysis state written
    StateWritten,
    /// Project exported or backed up
    Exported,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ItemsAdded => "items added",
            Self::ItemsUpdated => "items updated",
            Self::ItemsRemoved => "items removed",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::ProjectChanged => "project changed",
            Self::FloorplanChanged => "floorplan changed",
            Self::StateWritten => "state written",
            Self::Exported => "exported",
        };
        write!(f, "{s}")
    }
}

/// One entry in the project audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// When the action happened
    pub timestamp: DateTime<Utc>,
    /// What class of action it was
    pub action: AuditAction,
    /// Human-readable description of the change
    pub description: String,
    /// Who performed the action
    pub user: String,
    /// Optional structured detail, e.g. affected item ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AuditLogEntry {
    /// Create an entry stamped with the current time.
    pub fn now(action: AuditAction, description: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            description: description.into(),
            user: user.into(),
            details: None,
        }
    }

    /// Attach structured detail to the entry.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trips_through_json() {
        let entry = AuditLogEntry::now(AuditAction::ItemsAdded, "added 3 cameras", "alice")
            .with_details(serde_json::json!({ "count": 3 }));
        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let entry = AuditLogEntry::now(AuditAction::Undo, "undid last edit", "bob");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("details"));
    }
}
