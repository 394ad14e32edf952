//! Deliverables package assembly.
//!
//! A single zip collecting everything a project hands off: annotated
//! floorplan PDFs, the spreadsheet workbook, the audit-log CSV, the
//! AI analysis when present, and equipment photos grouped by category.

use crate::overlay::annotated_floorplan;
use crate::sheet::{audit_csv, equipment_workbook};
use secplan_core::blobs::BlobStore;
use secplan_core::error::{ExportError, Result};
use secplan_project::model::Project;
use std::io::{Seek, Write};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn start_entry<W: Write + Seek>(zip: &mut ZipWriter<W>, name: &str) -> Result<()> {
    zip.start_file(name, entry_options()).map_err(|e| {
        secplan_core::error::Error::from(ExportError::ArchiveWrite {
            entry: name.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Zip-entry-safe rendition of a display name.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// Write the full deliverables package for a project.
pub fn write_deliverables<W: Write + Seek>(
    project: &Project,
    blobs: &dyn BlobStore,
    writer: W,
) -> Result<()> {
    let mut zip = ZipWriter::new(writer);

    // Annotated floorplans
    for plan in &project.floorplans {
        let pdf = annotated_floorplan(project, plan);
        start_entry(
            &mut zip,
            &format!("floorplans/{}_annotated.pdf", sanitize(&plan.name)),
        )?;
        zip.write_all(&pdf.render())?;
    }

    // Spreadsheet workbook, one CSV per sheet
    for sheet in equipment_workbook(project).sheets {
        start_entry(&mut zip, &format!("schedules/{}.csv", sheet.name))?;
        zip.write_all(sheet.csv.as_bytes())?;
    }

    // Audit log
    start_entry(&mut zip, "audit_log.csv")?;
    zip.write_all(audit_csv(project).as_bytes())?;

    // AI analysis, when one was recorded
    if let Some(analysis) = &project.ai_analysis {
        start_entry(&mut zip, "analysis.md")?;
        zip.write_all(analysis.as_bytes())?;
    }

    // Equipment photos grouped by category
    for item in project.inventory.values() {
        let category = sanitize(&item.data.category().to_string());
        for img in item.data.images() {
            match blobs.get(&img.id.to_string()) {
                Ok(blob) => {
                    start_entry(
                        &mut zip,
                        &format!("images/{category}/{}", sanitize(&img.filename)),
                    )?;
                    zip.write_all(&blob.bytes)?;
                }
                Err(e) if e.is_not_found() => {
                    warn!(image = %img.id, "photo missing from blob store, skipping");
                }
                Err(e) => return Err(e),
            }
        }
    }

    zip.finish().map_err(|e| {
        secplan_core::error::Error::from(ExportError::ArchiveWrite {
            entry: "central directory".to_string(),
            reason: e.to_string(),
        })
    })?;
    info!(project = %project.id, "deliverables package written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use secplan_core::blobs::MemBlobStore;
    use secplan_core::catalog::DeviceKind;
    use secplan_project::model::{EquipmentImage, Floorplan, ImageId, ItemData, Placement};
    use secplan_project::factory;
    use std::collections::HashSet;
    use std::io::Cursor;
    use zip::ZipArchive;

    fn package(project: &Project, blobs: &MemBlobStore) -> Vec<String> {
        let mut buf = Cursor::new(Vec::new());
        write_deliverables(project, blobs, &mut buf).unwrap();
        buf.set_position(0);
        let archive = ZipArchive::new(buf).unwrap();
        archive.file_names().map(String::from).collect()
    }

    #[test]
    fn package_contains_every_deliverable() {
        let blobs = MemBlobStore::new();
        let mut project = Project::new("Deliver");
        project.ai_analysis = Some("Coverage is adequate.".to_string());
        let plan = Floorplan::new("First Floor");
        let plan_id = plan.id;
        project.floorplans.push(plan);

        let mut camera = factory::new_device(DeviceKind::DomeCamera);
        camera.placement = Some(Placement {
            floorplan: plan_id,
            page: 0,
            x: 10.0,
            y: 10.0,
        });
        let image_id = ImageId::new();
        if let ItemData::Device(d) = &mut camera.data {
            d.images.push(EquipmentImage {
                id: image_id,
                filename: "mount point.jpg".to_string(),
                captured_at: Utc::now(),
            });
        }
        blobs
            .put(&image_id.to_string(), "mount point.jpg", b"jpeg")
            .unwrap();
        let id = camera.id;
        project.inventory.insert(id, camera);
        project.floorplan_mut(plan_id).unwrap().placed.insert(id);

        let names: HashSet<String> = package(&project, &blobs).into_iter().collect();
        assert!(names.contains("floorplans/First_Floor_annotated.pdf"));
        assert!(names.contains("schedules/device_schedule.csv"));
        assert!(names.contains("schedules/marker_schedule.csv"));
        assert!(names.contains("schedules/summary.csv"));
        assert!(names.contains("audit_log.csv"));
        assert!(names.contains("analysis.md"));
        assert!(names.contains("images/Video/mount_point.jpg"));
    }

    #[test]
    fn missing_photos_are_skipped_not_fatal() {
        let blobs = MemBlobStore::new();
        let mut project = Project::new("Sparse");
        let mut camera = factory::new_device(DeviceKind::BulletCamera);
        if let ItemData::Device(d) = &mut camera.data {
            d.images.push(EquipmentImage {
                id: ImageId::new(),
                filename: "lost.jpg".to_string(),
                captured_at: Utc::now(),
            });
        }
        project.inventory.insert(camera.id, camera);

        let names = package(&project, &blobs);
        assert!(names.iter().all(|n| !n.starts_with("images/")));
        assert!(names.iter().any(|n| n == "audit_log.csv"));
    }

    #[test]
    fn analysis_entry_is_omitted_when_absent() {
        let blobs = MemBlobStore::new();
        let project = Project::new("NoAi");
        let names = package(&project, &blobs);
        assert!(!names.contains(&"analysis.md".to_string()));
    }
}
