//! Editor session: active tool and the drag lifecycle.
//!
//! The session owns no project state. Pointer gestures capture
//! before-snapshots of the affected items when a drag begins and emit a
//! single [`Action`] when it ends, so one drag is one undo step no
//! matter how many intermediate motion events occurred.

use crate::selection::Selection;
use crate::viewport::PagePoint;
use secplan_core::catalog::{DeviceKind, MarkerKind};
use secplan_project::{factory, Action, FloorplanId, Item, Placement, Project, ProjectId};
use tracing::debug;

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Tool {
    /// Select and move items
    #[default]
    Select,
    /// Place a device of the given kind on click
    PlaceDevice(DeviceKind),
    /// Place a marker of the given kind on click
    PlaceMarker(MarkerKind),
    /// Place a text annotation on click
    Text,
    /// Draw a rectangle by drag
    Rectangle,
    /// Draw a conduit run by drag
    Conduit,
}

/// An in-progress move drag.
#[derive(Debug, Clone)]
struct Drag {
    start: PagePoint,
    /// Snapshots taken when the drag began
    before: Vec<Item>,
}

/// Per-editor mutable state: tool, selection, current drag.
#[derive(Debug, Default)]
pub struct EditorSession {
    /// Active tool
    pub tool: Tool,
    /// Current selection
    pub selection: Selection,
    drag: Option<Drag>,
}

impl EditorSession {
    /// Fresh session with the select tool active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools. Cancels any in-progress drag.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.drag = None;
    }

    /// Whether a drag is in progress.
    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handle a click with a placement tool active: build the item for
    /// the clicked location. Returns the add action to dispatch, or
    /// `None` when the select tool is active or the tool needs a drag.
    pub fn click(
        &self,
        project: ProjectId,
        floorplan: FloorplanId,
        page: u32,
        point: PagePoint,
    ) -> Option<Action> {
        let mut item = match self.tool {
            Tool::PlaceDevice(kind) => factory::new_device(kind),
            Tool::PlaceMarker(kind) => factory::new_marker(kind),
            Tool::Text => factory::new_text(""),
            Tool::Select | Tool::Rectangle | Tool::Conduit => return None,
        };
        // Center the item on the click
        item.placement = Some(Placement {
            floorplan,
            page,
            x: point.x - item.width / 2.0,
            y: point.y - item.height / 2.0,
        });
        Some(Action::AddItems {
            project,
            items: vec![item],
        })
    }

    /// Begin a move drag of the current selection. Captures the
    /// before-snapshots the eventual update command will need.
    pub fn begin_drag(&mut self, project: &Project, start: PagePoint) {
        let before: Vec<Item> = {
            let mut ids: Vec<_> = self.selection.ids().iter().copied().collect();
            ids.sort();
            ids.iter()
                .filter_map(|id| project.inventory.get(id))
                .filter(|item| item.placement.is_some())
                .cloned()
                .collect()
        };
        if before.is_empty() {
            return;
        }
        debug!(items = before.len(), "drag started");
        self.drag = Some(Drag { start, before });
    }

    /// The moved positions for live preview at the given cursor point.
    /// Returns (id-ordered) items with their placements offset by the
    /// drag delta.
    pub fn drag_preview(&self, current: PagePoint) -> Vec<Item> {
        let Some(drag) = &self.drag else {
            return Vec::new();
        };
        moved_items(&drag.before, drag.start, current)
    }

    /// Finish the drag at the given cursor point, emitting the single
    /// update action for the whole gesture. A zero-delta drag emits
    /// nothing.
    pub fn end_drag(&mut self, project: ProjectId, current: PagePoint) -> Option<Action> {
        let drag = self.drag.take()?;
        if current == drag.start {
            return None;
        }
        let moved = moved_items(&drag.before, drag.start, current);
        Some(Action::UpdateItems {
            project,
            previous: drag.before,
            current: moved,
        })
    }

    /// Abandon the drag without emitting anything.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Finish a rectangle/conduit drag gesture: build the drawn item
    /// spanning the gesture. Returns `None` for degenerate gestures or
    /// when another tool is active.
    pub fn end_draw(
        &self,
        project: ProjectId,
        floorplan: FloorplanId,
        page: u32,
        start: PagePoint,
        end: PagePoint,
    ) -> Option<Action> {
        let mut item = match self.tool {
            Tool::Rectangle => {
                let width = (end.x - start.x).abs();
                let height = (end.y - start.y).abs();
                if width < 1.0 || height < 1.0 {
                    return None;
                }
                let mut item = factory::new_rectangle(width, height);
                item.placement = Some(Placement {
                    floorplan,
                    page,
                    x: start.x.min(end.x),
                    y: start.y.min(end.y),
                });
                item
            }
            Tool::Conduit => {
                let dx = end.x - start.x;
                let dy = end.y - start.y;
                if dx.abs() < 1.0 && dy.abs() < 1.0 {
                    return None;
                }
                let mut item = factory::new_conduit(dx, dy);
                item.placement = Some(Placement {
                    floorplan,
                    page,
                    x: start.x,
                    y: start.y,
                });
                item
            }
            _ => return None,
        };
        item.rotation = 0.0;
        Some(Action::AddItems {
            project,
            items: vec![item],
        })
    }
}

fn moved_items(before: &[Item], start: PagePoint, current: PagePoint) -> Vec<Item> {
    let dx = current.x - start.x;
    let dy = current.y - start.y;
    before
        .iter()
        .map(|item| {
            let mut moved = item.clone();
            if let Some(p) = &mut moved.placement {
                p.x += dx;
                p.y += dy;
            }
            moved
        })
        .collect()
}
