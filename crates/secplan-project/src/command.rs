//! Undoable edit commands.
//!
//! Every inventory mutation is expressed as a snapshot command: the
//! full before/after records of the affected items. Applying or
//! reverting a command writes the snapshots into the master inventory
//! and re-syncs the floorplan membership sets, so undo and redo never
//! have to reconstruct partial state.

use crate::model::{Item, ItemId, Placement, Project};
use tracing::warn;

/// Maximum number of commands retained on the undo stack.
pub const HISTORY_LIMIT: usize = 50;

/// One reversible inventory edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Items added to the inventory
    AddItems {
        /// The added records
        items: Vec<Item>,
    },
    /// Items rewritten in place; `previous` and `current` hold the same
    /// ids in the same order
    UpdateItems {
        /// Records as they were before the edit
        previous: Vec<Item>,
        /// Records as they are after the edit
        current: Vec<Item>,
    },
    /// Items removed from the inventory; the snapshots allow undo to
    /// restore them with their placements intact
    RemoveItems {
        /// The removed records
        items: Vec<Item>,
    },
}

impl EditCommand {
    /// Apply the command to the project.
    pub fn apply(&self, project: &mut Project) {
        match self {
            EditCommand::AddItems { items } => {
                for item in items {
                    write_item(project, item.clone());
                }
            }
            EditCommand::UpdateItems { current, .. } => {
                for item in current {
                    write_item(project, item.clone());
                }
            }
            EditCommand::RemoveItems { items } => {
                for item in items {
                    erase_item(project, item.id);
                }
            }
        }
    }

    /// Reverse the command on the project.
    pub fn revert(&self, project: &mut Project) {
        match self {
            EditCommand::AddItems { items } => {
                for item in items {
                    erase_item(project, item.id);
                }
            }
            EditCommand::UpdateItems { previous, .. } => {
                for item in previous {
                    write_item(project, item.clone());
                }
            }
            EditCommand::RemoveItems { items } => {
                for item in items {
                    write_item(project, item.clone());
                }
            }
        }
    }

    /// Short description for audit entries and UI history menus.
    pub fn description(&self) -> String {
        match self {
            EditCommand::AddItems { items } => format!("add {}", summarize(items)),
            EditCommand::UpdateItems { current, .. } => format!("edit {}", summarize(current)),
            EditCommand::RemoveItems { items } => format!("remove {}", summarize(items)),
        }
    }

    /// Ids touched by this command.
    pub fn item_ids(&self) -> Vec<ItemId> {
        match self {
            EditCommand::AddItems { items } | EditCommand::RemoveItems { items } => {
                items.iter().map(|i| i.id).collect()
            }
            EditCommand::UpdateItems { current, .. } => current.iter().map(|i| i.id).collect(),
        }
    }
}

fn summarize(items: &[Item]) -> String {
    match items {
        [] => "no items".to_string(),
        [one] => one.data.kind_label().to_lowercase(),
        many => format!("{} items", many.len()),
    }
}

/// Write one item record into the master inventory and re-sync the
/// floorplan membership sets to its placement.
fn write_item(project: &mut Project, item: Item) {
    let old_placement = project
        .inventory
        .get(&item.id)
        .and_then(|existing| existing.placement);
    let id = item.id;
    let new_placement = item.placement;
    project.inventory.insert(id, item);
    sync_membership(project, id, old_placement, new_placement);
}

/// Remove one item record and unregister it everywhere.
fn erase_item(project: &mut Project, id: ItemId) {
    project.inventory.remove(&id);
    for plan in &mut project.floorplans {
        plan.placed.remove(&id);
    }
}

/// Move an item's membership entry from its old floorplan to its new
/// one. A placement naming a floorplan that no longer exists is
/// cleared: the item falls back to the unplaced pool rather than
/// dangling.
fn sync_membership(
    project: &mut Project,
    id: ItemId,
    old: Option<Placement>,
    new: Option<Placement>,
) {
    if let Some(old) = old {
        if let Some(plan) = project.floorplan_mut(old.floorplan) {
            plan.placed.remove(&id);
        }
    }
    if let Some(new) = new {
        match project.floorplan_mut(new.floorplan) {
            Some(plan) => {
                plan.placed.insert(id);
            }
            None => {
                warn!(item = %id, floorplan = %new.floorplan, "placement names a missing floorplan, unplacing item");
                if let Some(item) = project.inventory.get_mut(&id) {
                    item.placement = None;
                }
            }
        }
    }
}

/// Bounded undo/redo stacks.
///
/// Pushing a new command clears the redo stack; the undo stack drops
/// its oldest entry once it exceeds [`HISTORY_LIMIT`].
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl History {
    /// Create empty stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied command as the newest undoable edit.
    pub fn push(&mut self, command: EditCommand) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
        if self.undo_stack.len() > HISTORY_LIMIT {
            self.undo_stack.remove(0);
        }
    }

    /// Revert the most recent edit, if any.
    pub fn undo(&mut self, project: &mut Project) -> Option<&EditCommand> {
        let command = self.undo_stack.pop()?;
        command.revert(project);
        self.redo_stack.push(command);
        self.redo_stack.last()
    }

    /// Reapply the most recently undone edit, if any.
    pub fn redo(&mut self, project: &mut Project) -> Option<&EditCommand> {
        let command = self.redo_stack.pop()?;
        command.apply(project);
        self.undo_stack.push(command);
        self.undo_stack.last()
    }

    /// Whether an undoable edit is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether a redoable edit is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop both stacks. Used after structural changes (floorplan
    /// removal, project switch) that would invalidate snapshots.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use crate::model::{Floorplan, Placement};
    use secplan_core::catalog::DeviceKind;

    fn project_with_plan() -> (Project, crate::model::FloorplanId) {
        let mut project = Project::new("Test");
        let plan = Floorplan::new("Level 1");
        let id = plan.id;
        project.floorplans.push(plan);
        (project, id)
    }

    #[test]
    fn add_then_undo_removes_the_item() {
        let (mut project, plan_id) = project_with_plan();
        let mut item = factory::new_device(DeviceKind::DomeCamera);
        item.placement = Some(Placement {
            floorplan: plan_id,
            page: 0,
            x: 5.0,
            y: 5.0,
        });
        let item_id = item.id;

        let command = EditCommand::AddItems { items: vec![item] };
        command.apply(&mut project);
        assert!(project.inventory.contains_key(&item_id));
        assert!(project.placement_consistent());

        command.revert(&mut project);
        assert!(!project.inventory.contains_key(&item_id));
        assert!(project.placement_consistent());
    }

    #[test]
    fn update_moves_membership_between_floorplans() {
        let (mut project, plan_a) = project_with_plan();
        let plan_b = Floorplan::new("Level 2");
        let plan_b_id = plan_b.id;
        project.floorplans.push(plan_b);

        let mut item = factory::new_device(DeviceKind::BulletCamera);
        item.placement = Some(Placement {
            floorplan: plan_a,
            page: 0,
            x: 1.0,
            y: 1.0,
        });
        let before = item.clone();
        EditCommand::AddItems {
            items: vec![item.clone()],
        }
        .apply(&mut project);

        item.placement = Some(Placement {
            floorplan: plan_b_id,
            page: 2,
            x: 9.0,
            y: 9.0,
        });
        let command = EditCommand::UpdateItems {
            previous: vec![before],
            current: vec![item.clone()],
        };
        command.apply(&mut project);
        assert_eq!(project.placement_owner(item.id), Some(plan_b_id));
        assert!(project.placement_consistent());

        command.revert(&mut project);
        assert_eq!(project.placement_owner(item.id), Some(plan_a));
        assert!(project.placement_consistent());
    }

    #[test]
    fn remove_is_reversible_with_placement_intact() {
        let (mut project, plan_id) = project_with_plan();
        let mut item = factory::new_device(DeviceKind::CardReader);
        item.placement = Some(Placement {
            floorplan: plan_id,
            page: 1,
            x: 3.0,
            y: 4.0,
        });
        EditCommand::AddItems {
            items: vec![item.clone()],
        }
        .apply(&mut project);

        let command = EditCommand::RemoveItems {
            items: vec![item.clone()],
        };
        command.apply(&mut project);
        assert!(project.inventory.is_empty());
        assert!(project.placement_consistent());

        command.revert(&mut project);
        let restored = &project.inventory[&item.id];
        assert_eq!(restored.placement, item.placement);
        assert_eq!(project.placement_owner(item.id), Some(plan_id));
    }

    #[test]
    fn stale_floorplan_reference_is_unplaced_not_dangling() {
        let (mut project, _) = project_with_plan();
        let mut item = factory::new_device(DeviceKind::Keypad);
        item.placement = Some(Placement {
            floorplan: crate::model::FloorplanId::new(),
            page: 0,
            x: 0.0,
            y: 0.0,
        });
        let id = item.id;
        EditCommand::AddItems { items: vec![item] }.apply(&mut project);
        assert!(project.inventory[&id].placement.is_none());
        assert!(project.placement_consistent());
    }

    #[test]
    fn history_caps_undo_depth_and_clears_redo_on_push() {
        let (mut project, _) = project_with_plan();
        let mut history = History::new();

        for _ in 0..HISTORY_LIMIT + 10 {
            let item = factory::new_device(DeviceKind::MotionSensor);
            let command = EditCommand::AddItems { items: vec![item] };
            command.apply(&mut project);
            history.push(command);
        }
        assert_eq!(history.undo_stack.len(), HISTORY_LIMIT);

        assert!(history.undo(&mut project).is_some());
        assert!(history.can_redo());

        let item = factory::new_device(DeviceKind::Intercom);
        let command = EditCommand::AddItems { items: vec![item] };
        command.apply(&mut project);
        history.push(command);
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_redo_round_trip_restores_state() {
        let (mut project, plan_id) = project_with_plan();
        let mut history = History::new();

        let mut item = factory::new_device(DeviceKind::PtzCamera);
        item.placement = Some(Placement {
            floorplan: plan_id,
            page: 0,
            x: 7.0,
            y: 8.0,
        });
        let command = EditCommand::AddItems {
            items: vec![item.clone()],
        };
        command.apply(&mut project);
        history.push(command);
        let snapshot = project.inventory.clone();

        history.undo(&mut project);
        assert!(project.inventory.is_empty());
        history.redo(&mut project);
        assert_eq!(project.inventory, snapshot);
        assert!(project.placement_consistent());
    }
}
