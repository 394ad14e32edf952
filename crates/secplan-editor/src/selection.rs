//! Item selection.
//!
//! Tracks the selected item set with a primary item (the last one
//! picked, the target of property panels). Hit testing runs against
//! the placed items of one floorplan page in page coordinates.

use crate::viewport::PagePoint;
use secplan_project::{FloorplanId, Item, ItemId, Project};
use std::collections::HashSet;

/// Axis-aligned bounds of a placed item in page coordinates.
fn item_bounds(item: &Item) -> Option<(f64, f64, f64, f64)> {
    let placement = item.placement?;
    Some((
        placement.x,
        placement.y,
        placement.x + item.width,
        placement.y + item.height,
    ))
}

/// The current selection.
#[derive(Debug, Default)]
pub struct Selection {
    selected: HashSet<ItemId>,
    primary: Option<ItemId>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all selected items.
    pub fn ids(&self) -> &HashSet<ItemId> {
        &self.selected
    }

    /// The primary selected item, if any.
    pub fn primary(&self) -> Option<ItemId> {
        self.primary
    }

    /// Whether the given item is selected.
    pub fn contains(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.primary = None;
    }

    /// Select exactly one item.
    pub fn set(&mut self, id: ItemId) {
        self.selected.clear();
        self.selected.insert(id);
        self.primary = Some(id);
    }

    /// Add an item, making it primary. With `toggle`, an already
    /// selected item is removed instead.
    pub fn add(&mut self, id: ItemId, toggle: bool) {
        if toggle && self.selected.contains(&id) {
            self.selected.remove(&id);
            if self.primary == Some(id) {
                self.primary = self.selected.iter().next().copied();
            }
            return;
        }
        self.selected.insert(id);
        self.primary = Some(id);
    }

    /// Drop ids that no longer exist in the project. Called after
    /// deletes and undo/redo.
    pub fn retain_existing(&mut self, project: &Project) {
        self.selected.retain(|id| project.inventory.contains_key(id));
        if self
            .primary
            .is_some_and(|id| !self.selected.contains(&id))
        {
            self.primary = self.selected.iter().next().copied();
        }
    }

    /// Pick the topmost item under a page point. `additive` keeps the
    /// existing selection and toggles the hit item; otherwise the hit
    /// item becomes the sole selection, and a miss clears it.
    pub fn select_at(
        &mut self,
        project: &Project,
        floorplan: FloorplanId,
        page: u32,
        point: PagePoint,
        additive: bool,
    ) -> Option<ItemId> {
        let hit = hit_test(project, floorplan, page, point);
        match (hit, additive) {
            (Some(id), true) => self.add(id, true),
            (Some(id), false) => self.set(id),
            (None, true) => {}
            (None, false) => self.clear(),
        }
        hit
    }

    /// Select every item whose bounds intersect the marquee rectangle.
    pub fn select_in_rect(
        &mut self,
        project: &Project,
        floorplan: FloorplanId,
        page: u32,
        a: PagePoint,
        b: PagePoint,
        additive: bool,
    ) {
        if !additive {
            self.clear();
        }
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        for item in project.items_on(floorplan) {
            let Some(placement) = item.placement else {
                continue;
            };
            if placement.page != page {
                continue;
            }
            let Some((x0, y0, x1, y1)) = item_bounds(item) else {
                continue;
            };
            if x0 <= max_x && x1 >= min_x && y0 <= max_y && y1 >= min_y {
                self.selected.insert(item.id);
                self.primary = Some(item.id);
            }
        }
    }
}

/// The topmost item of the page containing the point. Items are
/// z-ordered by id, newest on top.
pub fn hit_test(
    project: &Project,
    floorplan: FloorplanId,
    page: u32,
    point: PagePoint,
) -> Option<ItemId> {
    project
        .items_on(floorplan)
        .into_iter()
        .rev()
        .find(|item| {
            let Some(placement) = item.placement else {
                return false;
            };
            if placement.page != page {
                return false;
            }
            let Some((x0, y0, x1, y1)) = item_bounds(item) else {
                return false;
            };
            point.x >= x0 && point.x <= x1 && point.y >= y0 && point.y <= y1
        })
        .map(|item| item.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secplan_core::catalog::DeviceKind;
    use secplan_project::{factory, Floorplan, Placement};

    fn project_with_items() -> (Project, FloorplanId, Vec<ItemId>) {
        let mut project = Project::new("Select");
        let plan = Floorplan::new("Plan");
        let plan_id = plan.id;
        project.floorplans.push(plan);

        let mut ids = Vec::new();
        for i in 0..3 {
            let mut item = factory::new_device(DeviceKind::DomeCamera);
            item.placement = Some(Placement {
                floorplan: plan_id,
                page: 0,
                x: 100.0 * i as f64,
                y: 50.0,
            });
            ids.push(item.id);
            project
                .floorplan_mut(plan_id)
                .unwrap()
                .placed
                .insert(item.id);
            project.inventory.insert(item.id, item);
        }
        (project, plan_id, ids)
    }

    #[test]
    fn point_hit_picks_the_item_under_the_cursor() {
        let (project, plan, ids) = project_with_items();
        let mut sel = Selection::new();
        let hit = sel.select_at(&project, plan, 0, PagePoint::new(105.0, 55.0), false);
        assert_eq!(hit, Some(ids[1]));
        assert_eq!(sel.primary(), Some(ids[1]));
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn miss_clears_a_non_additive_selection() {
        let (project, plan, ids) = project_with_items();
        let mut sel = Selection::new();
        sel.set(ids[0]);
        sel.select_at(&project, plan, 0, PagePoint::new(500.0, 500.0), false);
        assert!(sel.is_empty());
    }

    #[test]
    fn additive_click_toggles() {
        let (project, plan, ids) = project_with_items();
        let mut sel = Selection::new();
        sel.select_at(&project, plan, 0, PagePoint::new(5.0, 55.0), false);
        sel.select_at(&project, plan, 0, PagePoint::new(105.0, 55.0), true);
        assert_eq!(sel.len(), 2);
        sel.select_at(&project, plan, 0, PagePoint::new(5.0, 55.0), true);
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(ids[1]));
    }

    #[test]
    fn marquee_selects_intersecting_items() {
        let (project, plan, ids) = project_with_items();
        let mut sel = Selection::new();
        sel.select_in_rect(
            &project,
            plan,
            0,
            PagePoint::new(-10.0, 40.0),
            PagePoint::new(150.0, 90.0),
            false,
        );
        assert_eq!(sel.len(), 2);
        assert!(sel.contains(ids[0]));
        assert!(sel.contains(ids[1]));
    }

    #[test]
    fn wrong_page_is_never_hit() {
        let (project, plan, _) = project_with_items();
        assert!(hit_test(&project, plan, 1, PagePoint::new(5.0, 55.0)).is_none());
    }

    #[test]
    fn retain_existing_drops_deleted_ids() {
        let (mut project, _, ids) = project_with_items();
        let mut sel = Selection::new();
        for id in &ids {
            sel.add(*id, false);
        }
        project.inventory.remove(&ids[0]);
        sel.retain_existing(&project);
        assert_eq!(sel.len(), 2);
        assert!(!sel.contains(ids[0]));
    }
}
