//! Entity factories.
//!
//! Construct fully-populated items with type-specific defaults drawn
//! from the equipment catalog. Every constructor is total: each kind
//! always yields an item with a fresh id, no placement, and no required
//! field left unset.

use crate::model::{
    ConduitData, DeviceData, DrawData, Item, ItemData, ItemId, MarkerData, RectangleData,
    StrokeStyle, TextData,
};
use secplan_core::catalog::{DeviceKind, FovDefaults, MarkerKind};

/// Default text annotation font size in page units.
const DEFAULT_FONT_SIZE: f64 = 14.0;

fn base_item(width: f64, height: f64, data: ItemData) -> Item {
    Item {
        id: ItemId::new(),
        placement: None,
        width,
        height,
        rotation: 0.0,
        data,
    }
}

/// Create a device item with catalog defaults for the given kind.
pub fn new_device(kind: DeviceKind) -> Item {
    let entry = kind.entry();
    let fov = entry.fov.map(
        |FovDefaults { angle_deg, distance }| crate::model::FovSettings {
            angle_deg,
            distance,
            rotation_deg: 0.0,
        },
    );
    base_item(
        entry.default_width,
        entry.default_height,
        ItemData::Device(DeviceData {
            kind,
            label: entry.label.to_string(),
            location: String::new(),
            install_notes: String::new(),
            status: Default::default(),
            fov,
            images: Vec::new(),
        }),
    )
}

/// Create a marker item with catalog defaults for the given kind.
pub fn new_marker(kind: MarkerKind) -> Item {
    let entry = kind.entry();
    base_item(
        entry.default_width,
        entry.default_height,
        ItemData::Marker(MarkerData {
            kind,
            label: entry.label.to_string(),
            notes: String::new(),
            images: Vec::new(),
        }),
    )
}

/// Create a text annotation.
pub fn new_text(content: impl Into<String>) -> Item {
    base_item(
        120.0,
        DEFAULT_FONT_SIZE * 1.4,
        ItemData::Text(TextData {
            content: content.into(),
            font_size: DEFAULT_FONT_SIZE,
            border: false,
            fill: None,
        }),
    )
}

/// Create an empty freehand drawing.
pub fn new_draw() -> Item {
    base_item(
        0.0,
        0.0,
        ItemData::Draw(DrawData {
            points: Vec::new(),
            stroke: StrokeStyle::default(),
        }),
    )
}

/// Create a rectangle annotation.
pub fn new_rectangle(width: f64, height: f64) -> Item {
    base_item(
        width,
        height,
        ItemData::Rectangle(RectangleData {
            stroke: StrokeStyle::default(),
            fill: None,
        }),
    )
}

/// Create a conduit run ending at the given offset from its position.
pub fn new_conduit(end_x: f64, end_y: f64) -> Item {
    base_item(
        end_x.abs(),
        end_y.abs(),
        ItemData::Conduit(ConduitData {
            end_x,
            end_y,
            stroke: StrokeStyle {
                color: "#1565c0".to_string(),
                width: 2.0,
            },
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemData;

    #[test]
    fn device_defaults_are_total_over_the_catalog() {
        for kind in DeviceKind::all() {
            let item = new_device(*kind);
            assert!(item.placement.is_none());
            assert!(item.width > 0.0 && item.height > 0.0);
            let ItemData::Device(data) = &item.data else {
                panic!("expected device payload");
            };
            assert_eq!(data.kind, *kind);
            assert!(!data.label.is_empty());
            assert_eq!(data.fov.is_some(), kind.has_fov(), "{kind:?}");
        }
    }

    #[test]
    fn marker_defaults_are_total_over_the_catalog() {
        for kind in MarkerKind::all() {
            let item = new_marker(*kind);
            let ItemData::Marker(data) = &item.data else {
                panic!("expected marker payload");
            };
            assert_eq!(data.kind, *kind);
            assert!(!data.label.is_empty());
        }
    }

    #[test]
    fn fresh_ids_per_construction() {
        let a = new_device(DeviceKind::DomeCamera);
        let b = new_device(DeviceKind::DomeCamera);
        assert_ne!(a.id, b.id);
    }
}
