//! Project data model.
//!
//! A `Project` owns an ordered list of `Floorplan`s and one master
//! inventory of `Item`s keyed by id. A floorplan's inventory is a
//! membership view (its `placed` set) over the master list, never a
//! copy. The placement invariant is: an item's `placement` is `Some`
//! exactly when its id appears in the `placed` set of the floorplan the
//! placement names, and in no other floorplan's set.

use chrono::{DateTime, Utc};
use secplan_core::catalog::{DeviceKind, EquipmentCategory, MarkerKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a project.
    ProjectId
);
id_type!(
    /// Identifier of a floorplan.
    FloorplanId
);
id_type!(
    /// Identifier of an inventory item.
    ItemId
);
id_type!(
    /// Identifier of an equipment image blob.
    ImageId
);

/// Where an item sits: the owning floorplan, the page within its
/// document, and page-space coordinates. Unplaced items carry no
/// placement at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// The floorplan the item is placed on
    pub floorplan: FloorplanId,
    /// Zero-based page index within the floorplan document
    pub page: u32,
    /// X coordinate in page units
    pub x: f64,
    /// Y coordinate in page units
    pub y: f64,
}

/// Stroke styling shared by drawing-type items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color as #rrggbb
    pub color: String,
    /// Stroke width in page units
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#d32f2f".to_string(),
            width: 2.0,
        }
    }
}

/// Install progress of a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStatus {
    /// Planned but not yet installed
    #[default]
    Planned,
    /// Physically installed
    Installed,
    /// Installed and commissioned/tested
    Commissioned,
}

impl std::fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planned => write!(f, "Planned"),
            Self::Installed => write!(f, "Installed"),
            Self::Commissioned => write!(f, "Commissioned"),
        }
    }
}

/// Field-of-view settings for a camera-class device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FovSettings {
    /// Cone opening angle in degrees
    pub angle_deg: f64,
    /// Cone reach in page units
    pub distance: f64,
    /// Cone direction in degrees, 0 = +X, counter-clockwise
    pub rotation_deg: f64,
}

/// Reference to a captured equipment photo. The bytes live in the blob
/// store under the image id; the model holds only the key, the original
/// filename, and the capture timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentImage {
    /// Blob-store key
    pub id: ImageId,
    /// Original filename of the captured image
    pub filename: String,
    /// Capture time
    pub captured_at: DateTime<Utc>,
}

/// Attributes specific to device items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceData {
    /// Catalog kind
    pub kind: DeviceKind,
    /// Display label, e.g. "CAM-01"
    pub label: String,
    /// Install location description
    pub location: String,
    /// Free-form install notes
    pub install_notes: String,
    /// Install progress
    pub status: InstallStatus,
    /// Field of view, present for camera-class kinds
    pub fov: Option<FovSettings>,
    /// Attached photos, in capture order
    pub images: Vec<EquipmentImage>,
}

/// Attributes specific to marker items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerData {
    /// Catalog kind
    pub kind: MarkerKind,
    /// Display label
    pub label: String,
    /// Free-form notes
    pub notes: String,
    /// Attached photos, in capture order
    pub images: Vec<EquipmentImage>,
}

/// Attributes specific to text annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    /// Text content
    pub content: String,
    /// Font size in page units
    pub font_size: f64,
    /// Draw a border box around the text
    pub border: bool,
    /// Background fill color as #rrggbb, if any
    pub fill: Option<String>,
}

/// Attributes specific to freehand drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawData {
    /// Path vertices relative to the item position
    pub points: Vec<(f64, f64)>,
    /// Stroke styling
    pub stroke: StrokeStyle,
}

/// Attributes specific to rectangle annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleData {
    /// Stroke styling
    pub stroke: StrokeStyle,
    /// Fill color as #rrggbb, if any
    pub fill: Option<String>,
}

/// Attributes specific to conduit line segments. The segment runs from
/// the item position to the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConduitData {
    /// Endpoint X in page units
    pub end_x: f64,
    /// Endpoint Y in page units
    pub end_y: f64,
    /// Stroke styling
    pub stroke: StrokeStyle,
}

/// Type-specific payload of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemData {
    /// Physical security device
    Device(DeviceData),
    /// Non-device marker
    Marker(MarkerData),
    /// Text annotation
    Text(TextData),
    /// Freehand drawing
    Draw(DrawData),
    /// Rectangle annotation
    Rectangle(RectangleData),
    /// Conduit run
    Conduit(ConduitData),
}

impl ItemData {
    /// Short label for audit entries and schedules.
    pub fn kind_label(&self) -> String {
        match self {
            ItemData::Device(d) => d.kind.entry().label.to_string(),
            ItemData::Marker(m) => m.kind.entry().label.to_string(),
            ItemData::Text(_) => "Text".to_string(),
            ItemData::Draw(_) => "Drawing".to_string(),
            ItemData::Rectangle(_) => "Rectangle".to_string(),
            ItemData::Conduit(_) => "Conduit".to_string(),
        }
    }

    /// Deliverable/grouping category.
    pub fn category(&self) -> EquipmentCategory {
        match self {
            ItemData::Device(d) => d.kind.entry().category,
            ItemData::Marker(m) => m.kind.entry().category,
            ItemData::Text(_) | ItemData::Draw(_) | ItemData::Rectangle(_)
            | ItemData::Conduit(_) => EquipmentCategory::Annotation,
        }
    }

    /// Images attached to this payload, if the variant carries any.
    pub fn images(&self) -> &[EquipmentImage] {
        match self {
            ItemData::Device(d) => &d.images,
            ItemData::Marker(m) => &m.images,
            _ => &[],
        }
    }
}

/// One placed-or-unplaced annotation/equipment entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier, unique within the project
    pub id: ItemId,
    /// Current placement; `None` while in the unplaced pool
    pub placement: Option<Placement>,
    /// Width in page units
    pub width: f64,
    /// Height in page units
    pub height: f64,
    /// Rotation in degrees
    pub rotation: f64,
    /// Type-specific payload
    pub data: ItemData,
}

/// Reference to a floorplan's source document in the blob store. The
/// blob key is the floorplan's own id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorplanSource {
    /// Original filename of the uploaded document
    pub filename: String,
    /// Pixel dimensions, present for image-derived documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<(u32, u32)>,
}

/// One document page-set belonging to a project. A floorplan without a
/// source document is a bare container for unplaced-equipment
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floorplan {
    /// Identifier; also the blob-store key for the source document
    pub id: FloorplanId,
    /// Display name
    pub name: String,
    /// Source document reference, if one was uploaded
    pub source: Option<FloorplanSource>,
    /// Page count of the source document (1 for bare containers)
    pub page_count: u32,
    /// Ids of items placed on this floorplan (membership view over the
    /// project's master inventory)
    pub placed: HashSet<ItemId>,
}

impl Floorplan {
    /// Create a bare floorplan with no source document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FloorplanId::new(),
            name: name.into(),
            source: None,
            page_count: 1,
            placed: HashSet::new(),
        }
    }
}

/// Result of a utility calculator run, recorded on the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    /// Which calculator produced this result
    pub calculator: String,
    /// When it ran
    pub computed_at: DateTime<Utc>,
    /// One-line human summary
    pub summary: String,
    /// Structured breakdown
    pub details: serde_json::Value,
}

/// Top-level unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Identifier
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Free-text client metadata
    #[serde(default)]
    pub client: String,
    /// Ordered floorplans
    pub floorplans: Vec<Floorplan>,
    /// Master inventory: the single canonical record per item
    pub inventory: HashMap<ItemId, Item>,
    /// Checklist answers keyed by question id
    #[serde(default)]
    pub checklist: HashMap<String, String>,
    /// Append-only audit log
    #[serde(default)]
    pub audit_log: Vec<crate::audit::AuditLogEntry>,
    /// Recorded calculator results
    #[serde(default)]
    pub calculator_results: Vec<CalculatorResult>,
    /// Optional AI-analysis text
    #[serde(default)]
    pub ai_analysis: Option<String>,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl Project {
    /// Create an empty project.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            name: name.into(),
            client: String::new(),
            floorplans: Vec::new(),
            inventory: HashMap::new(),
            checklist: HashMap::new(),
            audit_log: Vec::new(),
            calculator_results: Vec::new(),
            ai_analysis: None,
            created: now,
            modified: now,
        }
    }

    /// Look up a floorplan by id.
    pub fn floorplan(&self, id: FloorplanId) -> Option<&Floorplan> {
        self.floorplans.iter().find(|f| f.id == id)
    }

    /// Look up a floorplan by id, mutably.
    pub fn floorplan_mut(&mut self, id: FloorplanId) -> Option<&mut Floorplan> {
        self.floorplans.iter_mut().find(|f| f.id == id)
    }

    /// Items in the project-level unplaced pool.
    pub fn unplaced_items(&self) -> impl Iterator<Item = &Item> {
        self.inventory.values().filter(|i| i.placement.is_none())
    }

    /// Items placed on the given floorplan (the floorplan's inventory
    /// view over the master list).
    pub fn items_on(&self, floorplan: FloorplanId) -> Vec<&Item> {
        let Some(plan) = self.floorplan(floorplan) else {
            return Vec::new();
        };
        let mut items: Vec<&Item> = plan
            .placed
            .iter()
            .filter_map(|id| self.inventory.get(id))
            .collect();
        items.sort_by_key(|i| i.id);
        items
    }

    /// The floorplan whose `placed` set contains the item, if any.
    pub fn placement_owner(&self, item: ItemId) -> Option<FloorplanId> {
        self.floorplans
            .iter()
            .find(|f| f.placed.contains(&item))
            .map(|f| f.id)
    }

    /// Verify the placement invariant for every item: a placement is
    /// present exactly when the item is registered with exactly one
    /// floorplan, and that floorplan is the one the placement names.
    pub fn placement_consistent(&self) -> bool {
        for item in self.inventory.values() {
            let owners: Vec<FloorplanId> = self
                .floorplans
                .iter()
                .filter(|f| f.placed.contains(&item.id))
                .map(|f| f.id)
                .collect();
            match &item.placement {
                Some(p) => {
                    if owners.len() != 1 || owners[0] != p.floorplan {
                        return false;
                    }
                }
                None => {
                    if !owners.is_empty() {
                        return false;
                    }
                }
            }
        }
        // No floorplan may reference an id missing from the master list
        self.floorplans
            .iter()
            .flat_map(|f| f.placed.iter())
            .all(|id| self.inventory.contains_key(id))
    }

    /// Count of items, placed and unplaced.
    pub fn item_count(&self) -> usize {
        self.inventory.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;

    #[test]
    fn floorplan_inventory_is_a_view_not_a_copy() {
        let mut project = Project::new("HQ");
        let plan = Floorplan::new("Level 1");
        let plan_id = plan.id;
        project.floorplans.push(plan);

        let mut item = factory::new_device(DeviceKind::DomeCamera);
        item.placement = Some(Placement {
            floorplan: plan_id,
            page: 0,
            x: 10.0,
            y: 20.0,
        });
        let item_id = item.id;
        project.inventory.insert(item_id, item);
        project
            .floorplan_mut(plan_id)
            .unwrap()
            .placed
            .insert(item_id);

        assert!(project.placement_consistent());
        assert_eq!(project.items_on(plan_id).len(), 1);
        assert_eq!(project.unplaced_items().count(), 0);

        // Mutating the master record is visible through the view
        project.inventory.get_mut(&item_id).unwrap().width = 99.0;
        assert_eq!(project.items_on(plan_id)[0].width, 99.0);
    }

    #[test]
    fn inconsistent_registration_is_detected() {
        let mut project = Project::new("HQ");
        let plan = Floorplan::new("Level 1");
        let plan_id = plan.id;
        project.floorplans.push(plan);

        let item = factory::new_device(DeviceKind::CardReader);
        let item_id = item.id;
        project.inventory.insert(item_id, item);
        // Registered on the floorplan but carrying no placement
        project
            .floorplan_mut(plan_id)
            .unwrap()
            .placed
            .insert(item_id);

        assert!(!project.placement_consistent());
    }
}
