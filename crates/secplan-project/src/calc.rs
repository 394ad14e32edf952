//! Utility calculators.
//!
//! Pure functions over a project snapshot, each producing a
//! [`CalculatorResult`] the caller records on the project through the
//! dispatcher.

use crate::model::{CalculatorResult, ItemData, Project};
use chrono::Utc;
use secplan_core::catalog::EquipmentCategory;
use std::collections::BTreeMap;

/// Estimate total equipment cost from catalog unit-price hints.
///
/// Items without a price hint (annotations, unpriced markers) are
/// counted but contribute nothing to the total.
pub fn cost_estimate(project: &Project) -> CalculatorResult {
    let mut counts: BTreeMap<String, (usize, Option<f64>)> = BTreeMap::new();
    for item in project.inventory.values() {
        let (label, price) = match &item.data {
            ItemData::Device(d) => (d.kind.entry().label, d.kind.entry().unit_price),
            ItemData::Marker(m) => (m.kind.entry().label, m.kind.entry().unit_price),
            _ => continue,
        };
        let entry = counts.entry(label.to_string()).or_insert((0, price));
        entry.0 += 1;
    }

    let mut total = 0.0;
    let mut unpriced = 0usize;
    let lines: Vec<serde_json::Value> = counts
        .iter()
        .map(|(label, (count, price))| {
            let line_total = price.map(|p| p * *count as f64);
            match line_total {
                Some(t) => total += t,
                None => unpriced += count,
            }
            serde_json::json!({
                "equipment": label,
                "count": count,
                "unit_price": price,
                "line_total": line_total,
            })
        })
        .collect();

    CalculatorResult {
        calculator: "cost_estimate".to_string(),
        computed_at: Utc::now(),
        summary: format!(
            "estimated equipment cost ${total:.2} ({unpriced} unpriced items excluded)"
        ),
        details: serde_json::json!({
            "total": total,
            "unpriced_items": unpriced,
            "lines": lines,
        }),
    }
}

/// Per-camera recording assumptions for the storage estimate.
#[derive(Debug, Clone, Copy)]
pub struct StorageAssumptions {
    /// Average stream bitrate per camera in megabits per second
    pub bitrate_mbps: f64,
    /// Retention window in days
    pub retention_days: u32,
    /// Fraction of the day each camera records (1.0 = continuous)
    pub duty_cycle: f64,
}

impl Default for StorageAssumptions {
    fn default() -> Self {
        Self {
            bitrate_mbps: 4.0,
            retention_days: 30,
            duty_cycle: 1.0,
        }
    }
}

/// Estimate recorder storage and aggregate bandwidth for the project's
/// cameras.
pub fn video_storage(project: &Project, assumptions: StorageAssumptions) -> CalculatorResult {
    let cameras = project
        .inventory
        .values()
        .filter(|item| {
            matches!(&item.data, ItemData::Device(d)
                if d.kind.entry().category == EquipmentCategory::Video)
        })
        .count();

    let total_mbps = cameras as f64 * assumptions.bitrate_mbps * assumptions.duty_cycle;
    // Mbps -> GB/day: megabits/s * 86400 s / 8 bits-per-byte / 1000 MB-per-GB
    let gb_per_day = total_mbps * 86_400.0 / 8.0 / 1000.0;
    let total_gb = gb_per_day * assumptions.retention_days as f64;

    CalculatorResult {
        calculator: "video_storage".to_string(),
        computed_at: Utc::now(),
        summary: format!(
            "{cameras} cameras need {:.0} GB for {} days at {:.1} Mbps each",
            total_gb, assumptions.retention_days, assumptions.bitrate_mbps
        ),
        details: serde_json::json!({
            "cameras": cameras,
            "bitrate_mbps": assumptions.bitrate_mbps,
            "duty_cycle": assumptions.duty_cycle,
            "retention_days": assumptions.retention_days,
            "aggregate_mbps": total_mbps,
            "gb_per_day": gb_per_day,
            "total_gb": total_gb,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use secplan_core::catalog::{DeviceKind, MarkerKind};

    fn insert(project: &mut Project, item: crate::model::Item) {
        project.inventory.insert(item.id, item);
    }

    #[test]
    fn cost_estimate_sums_catalog_prices() {
        let mut project = Project::new("Costing");
        insert(&mut project, factory::new_device(DeviceKind::DomeCamera));
        insert(&mut project, factory::new_device(DeviceKind::DomeCamera));
        insert(&mut project, factory::new_device(DeviceKind::CardReader));
        insert(&mut project, factory::new_marker(MarkerKind::PointOfInterest));
        insert(&mut project, factory::new_text("note"));

        let result = cost_estimate(&project);
        let dome = DeviceKind::DomeCamera.entry().unit_price.unwrap();
        let reader = DeviceKind::CardReader.entry().unit_price.unwrap();
        assert_eq!(
            result.details["total"].as_f64().unwrap(),
            2.0 * dome + reader
        );
        // The unpriced marker is counted, the text annotation is not
        assert_eq!(result.details["unpriced_items"].as_u64().unwrap(), 1);
    }

    #[test]
    fn video_storage_counts_only_cameras() {
        let mut project = Project::new("Storage");
        insert(&mut project, factory::new_device(DeviceKind::BulletCamera));
        insert(&mut project, factory::new_device(DeviceKind::PtzCamera));
        insert(&mut project, factory::new_device(DeviceKind::MotionSensor));

        let result = video_storage(&project, StorageAssumptions::default());
        assert_eq!(result.details["cameras"].as_u64().unwrap(), 2);
        let per_day = result.details["gb_per_day"].as_f64().unwrap();
        // 2 cameras * 4 Mbps = 8 Mbps = 86.4 GB/day
        assert!((per_day - 86.4).abs() < 1e-9);
    }

    #[test]
    fn empty_project_estimates_to_zero() {
        let project = Project::new("Empty");
        let cost = cost_estimate(&project);
        assert_eq!(cost.details["total"].as_f64().unwrap(), 0.0);
        let storage = video_storage(&project, StorageAssumptions::default());
        assert_eq!(storage.details["total_gb"].as_f64().unwrap(), 0.0);
    }
}
