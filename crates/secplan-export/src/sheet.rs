//! Spreadsheet workbook generation.
//!
//! The workbook is a set of named CSV sheets: a device schedule, a
//! marker schedule, and a project summary. The audit log exports as its
//! own CSV. Rows come out in a stable order (floorplan, then id) so
//! repeated exports of the same project diff cleanly.

use secplan_project::model::{ItemData, Project};
use std::fmt::Write as _;

/// One named sheet of CSV content.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Sheet name, used as the filename stem in deliverables
    pub name: String,
    /// CSV content with a header row
    pub csv: String,
}

/// The spreadsheet deliverable.
#[derive(Debug, Clone)]
pub struct Workbook {
    /// All sheets in presentation order
    pub sheets: Vec<Sheet>,
}

fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

fn floorplan_name(project: &Project, item: &secplan_project::Item) -> String {
    item.placement
        .and_then(|p| project.floorplan(p.floorplan))
        .map(|f| f.name.clone())
        .unwrap_or_else(|| "(unplaced)".to_string())
}

/// Stable ordering: placed items grouped by floorplan order, unplaced
/// last, ids as the tiebreak.
fn ordered_items(project: &Project) -> Vec<&secplan_project::Item> {
    let plan_rank = |item: &secplan_project::Item| {
        item.placement
            .and_then(|p| {
                project
                    .floorplans
                    .iter()
                    .position(|f| f.id == p.floorplan)
            })
            .unwrap_or(usize::MAX)
    };
    let mut items: Vec<_> = project.inventory.values().collect();
    items.sort_by_key(|item| (plan_rank(item), item.id));
    items
}

/// Build the device schedule sheet.
fn device_schedule(project: &Project) -> Sheet {
    let mut csv = csv_row(&[
        "Label",
        "Type",
        "Category",
        "Floorplan",
        "Page",
        "Location",
        "Status",
        "Install Notes",
        "Photos",
    ]);
    for item in ordered_items(project) {
        let ItemData::Device(device) = &item.data else {
            continue;
        };
        let page = item
            .placement
            .map(|p| (p.page + 1).to_string())
            .unwrap_or_default();
        csv.push_str(&csv_row(&[
            &device.label,
            device.kind.entry().label,
            &device.kind.entry().category.to_string(),
            &floorplan_name(project, item),
            &page,
            &device.location,
            &device.status.to_string(),
            &device.install_notes,
            &device.images.len().to_string(),
        ]));
    }
    Sheet {
        name: "device_schedule".to_string(),
        csv,
    }
}

/// Build the marker schedule sheet.
fn marker_schedule(project: &Project) -> Sheet {
    let mut csv = csv_row(&["Label", "Type", "Floorplan", "Page", "Notes", "Photos"]);
    for item in ordered_items(project) {
        let ItemData::Marker(marker) = &item.data else {
            continue;
        };
        let page = item
            .placement
            .map(|p| (p.page + 1).to_string())
            .unwrap_or_default();
        csv.push_str(&csv_row(&[
            &marker.label,
            marker.kind.entry().label,
            &floorplan_name(project, item),
            &page,
            &marker.notes,
            &marker.images.len().to_string(),
        ]));
    }
    Sheet {
        name: "marker_schedule".to_string(),
        csv,
    }
}

/// Build the project summary sheet: counts per equipment type plus
/// totals and recorded calculator results.
fn summary(project: &Project) -> Sheet {
    let mut counts: std::collections::BTreeMap<String, usize> = Default::default();
    for item in project.inventory.values() {
        *counts.entry(item.data.kind_label()).or_default() += 1;
    }

    let mut csv = csv_row(&["Field", "Value"]);
    csv.push_str(&csv_row(&["Project", &project.name]));
    csv.push_str(&csv_row(&["Client", &project.client]));
    csv.push_str(&csv_row(&[
        "Floorplans",
        &project.floorplans.len().to_string(),
    ]));
    csv.push_str(&csv_row(&["Items", &project.item_count().to_string()]));
    for (label, count) in &counts {
        csv.push_str(&csv_row(&[label, &count.to_string()]));
    }
    for result in &project.calculator_results {
        csv.push_str(&csv_row(&[&result.calculator, &result.summary]));
    }
    Sheet {
        name: "summary".to_string(),
        csv,
    }
}

/// Build the full workbook for a project.
pub fn equipment_workbook(project: &Project) -> Workbook {
    Workbook {
        sheets: vec![
            device_schedule(project),
            marker_schedule(project),
            summary(project),
        ],
    }
}

/// Export the audit log as CSV.
pub fn audit_csv(project: &Project) -> String {
    let mut csv = csv_row(&["Timestamp", "User", "Action", "Description"]);
    for entry in &project.audit_log {
        let _ = write!(
            csv,
            "{}",
            csv_row(&[
                &entry.timestamp.to_rfc3339(),
                &entry.user,
                &entry.action.to_string(),
                &entry.description,
            ])
        );
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use secplan_core::catalog::{DeviceKind, MarkerKind};
    use secplan_project::model::{Floorplan, InstallStatus, ItemData, Placement};
    use secplan_project::{factory, AuditAction, AuditLogEntry};

    fn sample_project() -> Project {
        let mut project = Project::new("Sheets");
        project.client = "Acme, Inc.".to_string();
        let plan = Floorplan::new("Level 1");
        let plan_id = plan.id;
        project.floorplans.push(plan);

        let mut camera = factory::new_device(DeviceKind::DomeCamera);
        if let ItemData::Device(d) = &mut camera.data {
            d.label = "CAM-01".to_string();
            d.location = "Lobby, north wall".to_string();
            d.status = InstallStatus::Installed;
        }
        camera.placement = Some(Placement {
            floorplan: plan_id,
            page: 0,
            x: 1.0,
            y: 1.0,
        });
        let id = camera.id;
        project.inventory.insert(id, camera);
        project.floorplan_mut(plan_id).unwrap().placed.insert(id);

        let riser = factory::new_marker(MarkerKind::RiserLocation);
        project.inventory.insert(riser.id, riser);

        project
            .audit_log
            .push(AuditLogEntry::now(AuditAction::ItemsAdded, "add camera", "alice"));
        project
    }

    #[test]
    fn device_schedule_lists_devices_only() {
        let project = sample_project();
        let sheet = device_schedule(&project);
        let lines: Vec<&str> = sheet.csv.lines().collect();
        assert_eq!(lines.len(), 2); // header + one device
        assert!(lines[1].starts_with("CAM-01,Dome Camera,Video,Level 1,1"));
    }

    #[test]
    fn commas_in_fields_are_quoted() {
        let project = sample_project();
        let sheet = device_schedule(&project);
        assert!(sheet.csv.contains("\"Lobby, north wall\""));
        let summary = summary(&project);
        assert!(summary.csv.contains("\"Acme, Inc.\""));
    }

    #[test]
    fn unplaced_items_show_without_a_page() {
        let project = sample_project();
        let sheet = marker_schedule(&project);
        let lines: Vec<&str> = sheet.csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("(unplaced)"));
    }

    #[test]
    fn workbook_has_the_three_sheets() {
        let workbook = equipment_workbook(&sample_project());
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["device_schedule", "marker_schedule", "summary"]);
    }

    #[test]
    fn audit_csv_has_one_row_per_entry() {
        let csv = audit_csv(&sample_project());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("alice"));
        assert!(lines[1].contains("items added"));
    }
}
