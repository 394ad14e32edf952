//! Application state and action dispatcher.
//!
//! All mutation flows through [`AppState::apply`]: each [`Action`] is
//! handled synchronously and atomically, appends an audit entry, stamps
//! the project's modified time, and marks the state dirty for the
//! backup scheduler. Actions referencing missing ids degrade to logged
//! no-ops rather than errors.

use crate::audit::{AuditAction, AuditLogEntry};
use crate::command::{EditCommand, History};
use crate::model::{
    CalculatorResult, Floorplan, FloorplanId, FloorplanSource, Item, ItemId, Placement, Project,
    ProjectId,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Renderable layers that can be hidden per view preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Device items
    Devices,
    /// Marker items
    Markers,
    /// Text annotations
    Text,
    /// Freehand drawings
    Drawings,
    /// Rectangle annotations
    Rectangles,
    /// Conduit runs
    Conduits,
    /// Camera field-of-view cones
    FieldOfView,
}

/// View-only preferences. Never undoable and never part of the project
/// document.
#[derive(Debug, Clone, Default)]
pub struct ViewPrefs {
    /// Layers currently hidden
    pub hidden_layers: HashSet<LayerKind>,
    /// Whether the alignment grid is shown
    pub grid_visible: bool,
}

/// One dispatched mutation.
#[derive(Debug, Clone)]
pub enum Action {
    /// Register a new project
    CreateProject { project: Project },
    /// Rename a project
    RenameProject { project: ProjectId, name: String },
    /// Remove a project and everything it owns
    DeleteProject { project: ProjectId },
    /// Append a floorplan to a project
    AddFloorplan {
        project: ProjectId,
        name: String,
        source: Option<FloorplanSource>,
        page_count: u32,
    },
    /// Rename a floorplan
    RenameFloorplan {
        project: ProjectId,
        floorplan: FloorplanId,
        name: String,
    },
    /// Remove a floorplan; its placed items fall back to the unplaced
    /// pool rather than being destroyed
    DeleteFloorplan {
        project: ProjectId,
        floorplan: FloorplanId,
    },
    /// Insert items into the master inventory (undoable)
    AddItems { project: ProjectId, items: Vec<Item> },
    /// Move an unplaced item onto a floorplan page (undoable)
    PlaceExistingItem {
        project: ProjectId,
        item: ItemId,
        floorplan: FloorplanId,
        page: u32,
        x: f64,
        y: f64,
    },
    /// Rewrite items in place; the sole field-level edit path (undoable)
    UpdateItems {
        project: ProjectId,
        previous: Vec<Item>,
        current: Vec<Item>,
    },
    /// Remove items and their placement references (undoable)
    DeleteItems {
        project: ProjectId,
        items: Vec<ItemId>,
    },
    /// Re-place items onto another floorplan, keeping coordinates
    /// (undoable)
    MoveItemsToFloorplan {
        project: ProjectId,
        items: Vec<ItemId>,
        floorplan: FloorplanId,
        page: u32,
    },
    /// Duplicate placed items onto additional pages of the same
    /// floorplan; copies get fresh ids (undoable)
    CopyItemsToPages {
        project: ProjectId,
        items: Vec<ItemId>,
        pages: Vec<u32>,
    },
    /// Revert the most recent edit
    Undo { project: ProjectId },
    /// Reapply the most recently undone edit
    Redo { project: ProjectId },
    /// Toggle a render layer (view pref, never undoable)
    SetLayerVisible { layer: LayerKind, visible: bool },
    /// Toggle the alignment grid (view pref, never undoable)
    SetGridVisible { visible: bool },
    /// Record a checklist answer (plain state write, not undoable)
    SetChecklistAnswer {
        project: ProjectId,
        question: String,
        answer: String,
    },
    /// Record a calculator run (plain state write, not undoable)
    RecordCalculatorResult {
        project: ProjectId,
        result: CalculatorResult,
    },
    /// Set or clear the AI-analysis text (plain state write, not
    /// undoable)
    SetAiAnalysis {
        project: ProjectId,
        text: Option<String>,
    },
    /// Note a completed export or backup in the audit log
    MarkExported {
        project: ProjectId,
        destination: String,
    },
}

/// Whole-application state: every open project, per-project history,
/// and view preferences.
#[derive(Debug)]
pub struct AppState {
    /// All projects, keyed by id
    pub projects: HashMap<ProjectId, Project>,
    /// View preferences
    pub view: ViewPrefs,
    histories: HashMap<ProjectId, History>,
    actor: String,
    dirty: bool,
}

impl AppState {
    /// Create empty state acting as the given user.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            projects: HashMap::new(),
            view: ViewPrefs::default(),
            histories: HashMap::new(),
            actor: actor.into(),
            dirty: false,
        }
    }

    /// Build and register a new project, returning its id.
    pub fn create_project(&mut self, name: impl Into<String>) -> ProjectId {
        let project = Project::new(name);
        let id = project.id;
        self.apply(Action::CreateProject { project });
        id
    }

    /// Whether an undoable edit exists for the project.
    pub fn can_undo(&self, project: ProjectId) -> bool {
        self.histories.get(&project).is_some_and(History::can_undo)
    }

    /// Whether a redoable edit exists for the project.
    pub fn can_redo(&self, project: ProjectId) -> bool {
        self.histories.get(&project).is_some_and(History::can_redo)
    }

    /// Consume the dirty flag. The backup scheduler polls this.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Dispatch one action. The single mutation entry point.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::CreateProject { project } => {
                let id = project.id;
                debug!(project = %id, name = %project.name, "creating project");
                self.projects.insert(id, project);
                self.histories.insert(id, History::new());
                self.record(
                    id,
                    AuditAction::ProjectChanged,
                    "created project".to_string(),
                );
            }
            Action::RenameProject { project, name } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                p.name = name.clone();
                self.record(
                    project,
                    AuditAction::ProjectChanged,
                    format!("renamed project to {name:?}"),
                );
            }
            Action::DeleteProject { project } => {
                if self.projects.remove(&project).is_none() {
                    return missing("project", project.to_string());
                }
                self.histories.remove(&project);
                self.dirty = true;
            }
            Action::AddFloorplan {
                project,
                name,
                source,
                page_count,
            } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                let mut plan = Floorplan::new(name.clone());
                plan.source = source;
                plan.page_count = page_count.max(1);
                p.floorplans.push(plan);
                self.record(
                    project,
                    AuditAction::FloorplanChanged,
                    format!("added floorplan {name:?}"),
                );
            }
            Action::RenameFloorplan {
                project,
                floorplan,
                name,
            } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                let Some(plan) = p.floorplan_mut(floorplan) else {
                    return missing("floorplan", floorplan.to_string());
                };
                plan.name = name.clone();
                self.record(
                    project,
                    AuditAction::FloorplanChanged,
                    format!("renamed floorplan to {name:?}"),
                );
            }
            Action::DeleteFloorplan { project, floorplan } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                let Some(index) = p.floorplans.iter().position(|f| f.id == floorplan) else {
                    return missing("floorplan", floorplan.to_string());
                };
                let removed = p.floorplans.remove(index);
                for id in &removed.placed {
                    if let Some(item) = p.inventory.get_mut(id) {
                        item.placement = None;
                    }
                }
                // Snapshots referencing the removed floorplan are stale
                self.histories.entry(project).or_default().clear();
                self.record(
                    project,
                    AuditAction::FloorplanChanged,
                    format!("removed floorplan {:?}", removed.name),
                );
            }
            Action::AddItems { project, items } => {
                if items.is_empty() {
                    return;
                }
                self.push_edit(project, EditCommand::AddItems { items }, AuditAction::ItemsAdded);
            }
            Action::PlaceExistingItem {
                project,
                item,
                floorplan,
                page,
                x,
                y,
            } => {
                let Some(p) = self.projects.get(&project) else {
                    return missing("project", project.to_string());
                };
                if p.floorplan(floorplan).is_none() {
                    return missing("floorplan", floorplan.to_string());
                }
                let Some(record) = p.inventory.get(&item) else {
                    return missing("item", item.to_string());
                };
                let previous = record.clone();
                let mut current = previous.clone();
                current.placement = Some(Placement {
                    floorplan,
                    page,
                    x,
                    y,
                });
                self.push_edit(
                    project,
                    EditCommand::UpdateItems {
                        previous: vec![previous],
                        current: vec![current],
                    },
                    AuditAction::ItemsUpdated,
                );
            }
            Action::UpdateItems {
                project,
                previous,
                current,
            } => {
                if previous.len() != current.len()
                    || previous
                        .iter()
                        .zip(&current)
                        .any(|(a, b)| a.id != b.id)
                {
                    warn!("update snapshots disagree on ids, ignoring action");
                    return;
                }
                let Some(p) = self.projects.get(&project) else {
                    return missing("project", project.to_string());
                };
                // Only act on items that still exist
                let pairs: (Vec<Item>, Vec<Item>) = previous
                    .into_iter()
                    .zip(current)
                    .filter(|(prev, _)| p.inventory.contains_key(&prev.id))
                    .unzip();
                let (previous, current) = pairs;
                if current.is_empty() {
                    return;
                }
                self.push_edit(
                    project,
                    EditCommand::UpdateItems { previous, current },
                    AuditAction::ItemsUpdated,
                );
            }
            Action::DeleteItems { project, items } => {
                let Some(p) = self.projects.get(&project) else {
                    return missing("project", project.to_string());
                };
                let snapshots: Vec<Item> = items
                    .iter()
                    .filter_map(|id| p.inventory.get(id).cloned())
                    .collect();
                if snapshots.is_empty() {
                    return;
                }
                self.push_edit(
                    project,
                    EditCommand::RemoveItems { items: snapshots },
                    AuditAction::ItemsRemoved,
                );
            }
            Action::MoveItemsToFloorplan {
                project,
                items,
                floorplan,
                page,
            } => {
                let Some(p) = self.projects.get(&project) else {
                    return missing("project", project.to_string());
                };
                if p.floorplan(floorplan).is_none() {
                    return missing("floorplan", floorplan.to_string());
                }
                let mut previous = Vec::new();
                let mut current = Vec::new();
                for id in &items {
                    let Some(record) = p.inventory.get(id) else {
                        warn!(item = %id, "skipping missing item in move");
                        continue;
                    };
                    let mut moved = record.clone();
                    let (x, y) = record
                        .placement
                        .map(|pl| (pl.x, pl.y))
                        .unwrap_or((0.0, 0.0));
                    moved.placement = Some(Placement {
                        floorplan,
                        page,
                        x,
                        y,
                    });
                    previous.push(record.clone());
                    current.push(moved);
                }
                if current.is_empty() {
                    return;
                }
                self.push_edit(
                    project,
                    EditCommand::UpdateItems { previous, current },
                    AuditAction::ItemsUpdated,
                );
            }
            Action::CopyItemsToPages {
                project,
                items,
                pages,
            } => {
                let Some(p) = self.projects.get(&project) else {
                    return missing("project", project.to_string());
                };
                let mut copies = Vec::new();
                for id in &items {
                    let Some(record) = p.inventory.get(id) else {
                        warn!(item = %id, "skipping missing item in copy");
                        continue;
                    };
                    let Some(placement) = record.placement else {
                        warn!(item = %id, "skipping unplaced item in copy");
                        continue;
                    };
                    for &page in &pages {
                        if page == placement.page {
                            continue;
                        }
                        let mut copy = record.clone();
                        copy.id = ItemId::new();
                        copy.placement = Some(Placement { page, ..placement });
                        copies.push(copy);
                    }
                }
                if copies.is_empty() {
                    return;
                }
                self.push_edit(
                    project,
                    EditCommand::AddItems { items: copies },
                    AuditAction::ItemsAdded,
                );
            }
            Action::Undo { project } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                let description = self
                    .histories
                    .entry(project)
                    .or_default()
                    .undo(p)
                    .map(EditCommand::description);
                match description {
                    Some(description) => {
                        self.record(project, AuditAction::Undo, format!("undid {description}"));
                    }
                    None => debug!(project = %project, "nothing to undo"),
                }
            }
            Action::Redo { project } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                let description = self
                    .histories
                    .entry(project)
                    .or_default()
                    .redo(p)
                    .map(EditCommand::description);
                match description {
                    Some(description) => {
                        self.record(project, AuditAction::Redo, format!("redid {description}"));
                    }
                    None => debug!(project = %project, "nothing to redo"),
                }
            }
            Action::SetLayerVisible { layer, visible } => {
                if visible {
                    self.view.hidden_layers.remove(&layer);
                } else {
                    self.view.hidden_layers.insert(layer);
                }
            }
            Action::SetGridVisible { visible } => {
                self.view.grid_visible = visible;
            }
            Action::SetChecklistAnswer {
                project,
                question,
                answer,
            } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                p.checklist.insert(question.clone(), answer);
                self.record(
                    project,
                    AuditAction::StateWritten,
                    format!("answered checklist item {question:?}"),
                );
            }
            Action::RecordCalculatorResult { project, result } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                let summary = result.summary.clone();
                p.calculator_results.push(result);
                self.record(project, AuditAction::StateWritten, summary);
            }
            Action::SetAiAnalysis { project, text } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                p.ai_analysis = text;
                self.record(
                    project,
                    AuditAction::StateWritten,
                    "updated AI analysis".to_string(),
                );
            }
            Action::MarkExported {
                project,
                destination,
            } => {
                let Some(p) = self.projects.get_mut(&project) else {
                    return missing("project", project.to_string());
                };
                // Appended directly: a completed backup must not re-arm
                // the backup scheduler through the dirty flag
                p.audit_log.push(AuditLogEntry::now(
                    AuditAction::Exported,
                    format!("exported to {destination}"),
                    self.actor.clone(),
                ));
            }
        }
    }

    /// Apply an edit command, push it onto the project history, and
    /// audit it.
    fn push_edit(&mut self, project: ProjectId, command: EditCommand, action: AuditAction) {
        let Some(p) = self.projects.get_mut(&project) else {
            return missing("project", project.to_string());
        };
        command.apply(p);
        let description = command.description();
        self.histories.entry(project).or_default().push(command);
        self.record(project, action, description);
    }

    /// Append an audit entry, stamp the modified time, and mark dirty.
    fn record(&mut self, project: ProjectId, action: AuditAction, description: String) {
        if let Some(p) = self.projects.get_mut(&project) {
            p.modified = Utc::now();
            p.audit_log
                .push(AuditLogEntry::now(action, description, self.actor.clone()));
        }
        self.dirty = true;
    }
}

fn missing(kind: &str, id: String) {
    warn!(%kind, %id, "action references a missing id, ignoring");
}
