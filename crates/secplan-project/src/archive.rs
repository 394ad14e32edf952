//! Project and backup archives.
//!
//! Both archive flavors are zip packages holding a JSON manifest plus
//! the binary blobs the model references:
//!
//! - single-project archives carry a `project.json` manifest,
//! - full backups carry a `backup.json` manifest with every project.
//!
//! Either way, floorplan source documents live under
//! `floorplans/<floorplan-id>.pdf` and equipment photos under
//! `images/<image-id>`. Import inspects which manifest entry exists to
//! pick single-project vs. full-backup semantics.

use crate::model::{FloorplanId, FloorplanSource, Project, ProjectId};
use chrono::{DateTime, Utc};
use secplan_core::blobs::BlobStore;
use secplan_core::error::{ProjectError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Current archive format version.
pub const ARCHIVE_VERSION: u32 = 1;

const PROJECT_MANIFEST: &str = "project.json";
const BACKUP_MANIFEST: &str = "backup.json";

/// Manifest of a single-project archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Archive format version
    pub version: u32,
    /// When the archive was written
    pub exported_at: DateTime<Utc>,
    /// The project document
    pub project: Project,
}

/// Manifest of a full-backup archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    /// Archive format version
    pub version: u32,
    /// When the backup was written
    pub exported_at: DateTime<Utc>,
    /// Every project at backup time
    pub projects: Vec<Project>,
}

/// What an imported archive contained.
#[derive(Debug)]
pub enum ImportedArchive {
    /// A single-project archive
    Project(Project),
    /// A full-backup archive
    Backup(Vec<Project>),
}

impl ImportedArchive {
    /// All projects in the archive, regardless of flavor.
    pub fn projects(self) -> Vec<Project> {
        match self {
            ImportedArchive::Project(p) => vec![p],
            ImportedArchive::Backup(ps) => ps,
        }
    }
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn zip_err(e: zip::result::ZipError) -> secplan_core::error::Error {
    ProjectError::InvalidArchive {
        reason: e.to_string(),
    }
    .into()
}

/// Write a single-project archive to the given writer.
pub fn export_project<W: Write + Seek>(
    project: &Project,
    blobs: &dyn BlobStore,
    writer: W,
) -> Result<()> {
    let manifest = ProjectManifest {
        version: ARCHIVE_VERSION,
        exported_at: Utc::now(),
        project: project.clone(),
    };
    let mut zip = ZipWriter::new(writer);
    zip.start_file(PROJECT_MANIFEST, entry_options())
        .map_err(zip_err)?;
    zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;
    write_blobs(&mut zip, std::slice::from_ref(project), blobs)?;
    zip.finish().map_err(zip_err)?;
    Ok(())
}

/// Write a full-backup archive of every project to the given writer.
pub fn export_backup<W: Write + Seek>(
    projects: &HashMap<ProjectId, Project>,
    blobs: &dyn BlobStore,
    writer: W,
) -> Result<()> {
    let mut ordered: Vec<Project> = projects.values().cloned().collect();
    ordered.sort_by_key(|p| p.id);
    let manifest = BackupManifest {
        version: ARCHIVE_VERSION,
        exported_at: Utc::now(),
        projects: ordered.clone(),
    };
    let mut zip = ZipWriter::new(writer);
    zip.start_file(BACKUP_MANIFEST, entry_options())
        .map_err(zip_err)?;
    zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;
    write_blobs(&mut zip, &ordered, blobs)?;
    zip.finish().map_err(zip_err)?;
    Ok(())
}

/// Copy every blob the given projects reference into the archive. A
/// blob missing from the store is logged and skipped rather than
/// failing the whole export.
fn write_blobs<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    projects: &[Project],
    blobs: &dyn BlobStore,
) -> Result<()> {
    for project in projects {
        for plan in &project.floorplans {
            if plan.source.is_none() {
                continue;
            }
            let key = plan.id.to_string();
            match blobs.get(&key) {
                Ok(blob) => {
                    zip.start_file(format!("floorplans/{key}.pdf"), entry_options())
                        .map_err(zip_err)?;
                    zip.write_all(&blob.bytes)?;
                }
                Err(e) if e.is_not_found() => {
                    warn!(floorplan = %key, "source document missing from blob store, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        for item in project.inventory.values() {
            for img in item.data.images() {
                let key = img.id.to_string();
                match blobs.get(&key) {
                    Ok(blob) => {
                        zip.start_file(format!("images/{key}"), entry_options())
                            .map_err(zip_err)?;
                        zip.write_all(&blob.bytes)?;
                    }
                    Err(e) if e.is_not_found() => {
                        warn!(image = %key, "equipment photo missing from blob store, skipping");
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }
    Ok(())
}

/// Read an archive, restoring its blobs into the given store and
/// returning the contained project(s). The manifest entry present in
/// the zip decides the flavor.
pub fn import_archive<R: Read + Seek>(
    reader: R,
    blobs: &dyn BlobStore,
) -> Result<ImportedArchive> {
    let mut archive = ZipArchive::new(reader).map_err(zip_err)?;

    if let Some(contents) = read_entry_string(&mut archive, PROJECT_MANIFEST)? {
        let manifest: ProjectManifest = serde_json::from_str(&contents)?;
        check_version(manifest.version)?;
        restore_blobs(&mut archive, std::slice::from_ref(&manifest.project), blobs)?;
        debug!(project = %manifest.project.id, "imported single-project archive");
        return Ok(ImportedArchive::Project(manifest.project));
    }

    if let Some(contents) = read_entry_string(&mut archive, BACKUP_MANIFEST)? {
        let manifest: BackupManifest = serde_json::from_str(&contents)?;
        check_version(manifest.version)?;
        restore_blobs(&mut archive, &manifest.projects, blobs)?;
        debug!(projects = manifest.projects.len(), "imported backup archive");
        return Ok(ImportedArchive::Backup(manifest.projects));
    }

    Err(ProjectError::InvalidArchive {
        reason: "no project.json or backup.json manifest found".to_string(),
    }
    .into())
}

fn check_version(version: u32) -> Result<()> {
    if version > ARCHIVE_VERSION {
        return Err(ProjectError::UnsupportedVersion {
            version: version.to_string(),
        }
        .into());
    }
    Ok(())
}

fn read_entry_string<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut contents = String::new();
            entry.read_to_string(&mut contents)?;
            Ok(Some(contents))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(zip_err(e)),
    }
}

fn read_entry_bytes<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes)?;
            Ok(Some(bytes))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(zip_err(e)),
    }
}

/// Extract every referenced blob back into the store. Entries the
/// manifest references but the archive lacks are logged and skipped.
fn restore_blobs<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    projects: &[Project],
    blobs: &dyn BlobStore,
) -> Result<()> {
    for project in projects {
        for plan in &project.floorplans {
            let Some(source) = &plan.source else {
                continue;
            };
            let key = plan.id.to_string();
            match read_entry_bytes(archive, &format!("floorplans/{key}.pdf"))? {
                Some(bytes) => blobs.put(&key, &source.filename, &bytes)?,
                None => warn!(floorplan = %key, "archive lacks the referenced source document"),
            }
        }
        for item in project.inventory.values() {
            for img in item.data.images() {
                let key = img.id.to_string();
                match read_entry_bytes(archive, &format!("images/{key}"))? {
                    Some(bytes) => blobs.put(&key, &img.filename, &bytes)?,
                    None => warn!(image = %key, "archive lacks the referenced photo"),
                }
            }
        }
    }
    Ok(())
}

/// Register an uploaded floorplan source document.
///
/// Stores the bytes in the blob store under the floorplan's id and
/// returns the source reference plus the page count to dispatch with.
/// PDF documents keep the declared page count; anything else must be a
/// readable image, which becomes a single page with its pixel
/// dimensions recorded on the source.
pub fn ingest_floorplan_source(
    floorplan: FloorplanId,
    filename: &str,
    bytes: &[u8],
    declared_pages: u32,
    blobs: &dyn BlobStore,
) -> Result<(FloorplanSource, u32)> {
    let (pixel_size, page_count) = if bytes.starts_with(b"%PDF") {
        (None, declared_pages.max(1))
    } else {
        (Some(probe_image_size(bytes)?), 1)
    };
    blobs.put(&floorplan.to_string(), filename, bytes)?;
    debug!(
        floorplan = %floorplan,
        filename,
        page_count,
        "ingested floorplan source document"
    );
    Ok((
        FloorplanSource {
            filename: filename.to_string(),
            pixel_size,
        },
        page_count,
    ))
}

/// Probe the pixel dimensions of an image-derived floorplan document.
fn probe_image_size(bytes: &[u8]) -> Result<(u32, u32)> {
    use image::GenericImageView;
    let img = image::load_from_memory(bytes).map_err(|e| ProjectError::InvalidArchive {
        reason: format!("unreadable image: {e}"),
    })?;
    Ok(img.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use crate::model::{EquipmentImage, Floorplan, FloorplanSource, ImageId, ItemData, Placement};
    use secplan_core::blobs::MemBlobStore;
    use secplan_core::catalog::DeviceKind;
    use std::io::Cursor;

    fn sample_project(blobs: &MemBlobStore) -> Project {
        let mut project = Project::new("Warehouse");
        let mut plan = Floorplan::new("Ground");
        plan.source = Some(FloorplanSource {
            filename: "ground.pdf".to_string(),
            pixel_size: None,
        });
        plan.page_count = 2;
        let plan_id = plan.id;
        blobs
            .put(&plan_id.to_string(), "ground.pdf", b"%PDF-1.4 fake")
            .unwrap();
        project.floorplans.push(plan);

        let mut item = factory::new_device(DeviceKind::DomeCamera);
        item.placement = Some(Placement {
            floorplan: plan_id,
            page: 0,
            x: 12.0,
            y: 34.0,
        });
        let image_id = ImageId::new();
        if let ItemData::Device(data) = &mut item.data {
            data.images.push(EquipmentImage {
                id: image_id,
                filename: "install.jpg".to_string(),
                captured_at: Utc::now(),
            });
        }
        blobs
            .put(&image_id.to_string(), "install.jpg", b"jpeg bytes")
            .unwrap();
        let item_id = item.id;
        project.inventory.insert(item_id, item);
        project
            .floorplan_mut(plan_id)
            .unwrap()
            .placed
            .insert(item_id);
        project
    }

    #[test]
    fn project_archive_round_trips_model_and_blobs() {
        let blobs = MemBlobStore::new();
        let project = sample_project(&blobs);

        let mut buf = Cursor::new(Vec::new());
        export_project(&project, &blobs, &mut buf).unwrap();

        let restore = MemBlobStore::new();
        buf.set_position(0);
        let imported = import_archive(buf, &restore).unwrap();
        let ImportedArchive::Project(back) = imported else {
            panic!("expected single-project archive");
        };
        assert_eq!(back, project);
        assert!(back.placement_consistent());

        let plan_key = project.floorplans[0].id.to_string();
        assert_eq!(restore.get(&plan_key).unwrap().bytes, b"%PDF-1.4 fake");
    }

    #[test]
    fn backup_archive_carries_every_project() {
        let blobs = MemBlobStore::new();
        let a = sample_project(&blobs);
        let b = Project::new("Annex");
        let mut projects = HashMap::new();
        projects.insert(a.id, a.clone());
        projects.insert(b.id, b.clone());

        let mut buf = Cursor::new(Vec::new());
        export_backup(&projects, &blobs, &mut buf).unwrap();

        buf.set_position(0);
        let imported = import_archive(buf, &MemBlobStore::new()).unwrap();
        let ImportedArchive::Backup(back) = imported else {
            panic!("expected backup archive");
        };
        assert_eq!(back.len(), 2);
        assert!(back.iter().any(|p| p.id == a.id));
        assert!(back.iter().any(|p| p.id == b.id));
    }

    #[test]
    fn pdf_source_keeps_its_declared_page_count() {
        let blobs = MemBlobStore::new();
        let plan_id = crate::model::FloorplanId::new();
        let (source, pages) =
            ingest_floorplan_source(plan_id, "site.pdf", b"%PDF-1.4 fake", 4, &blobs).unwrap();
        assert_eq!(pages, 4);
        assert_eq!(source.filename, "site.pdf");
        assert!(source.pixel_size.is_none());
        assert_eq!(blobs.get(&plan_id.to_string()).unwrap().bytes, b"%PDF-1.4 fake");
    }

    #[test]
    fn image_source_becomes_one_page_with_probed_dimensions() {
        let mut png = Vec::new();
        image::DynamicImage::new_rgb8(4, 3)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let blobs = MemBlobStore::new();
        let plan_id = crate::model::FloorplanId::new();
        let (source, pages) =
            ingest_floorplan_source(plan_id, "lobby.png", &png, 7, &blobs).unwrap();
        assert_eq!(pages, 1);
        assert_eq!(source.pixel_size, Some((4, 3)));
        assert!(blobs.contains(&plan_id.to_string()));
    }

    #[test]
    fn unreadable_source_document_is_rejected() {
        let blobs = MemBlobStore::new();
        let plan_id = crate::model::FloorplanId::new();
        let err = ingest_floorplan_source(plan_id, "noise.bin", b"\x00\x01garbage", 1, &blobs)
            .unwrap_err();
        assert!(err.is_project_error());
        // Nothing half-registered on failure
        assert!(!blobs.contains(&plan_id.to_string()));
    }

    #[test]
    fn archive_without_manifest_is_rejected() {
        let mut buf = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buf);
        zip.start_file("readme.txt", entry_options()).unwrap();
        zip.write_all(b"not a project archive").unwrap();
        zip.finish().unwrap();

        buf.set_position(0);
        let err = import_archive(buf, &MemBlobStore::new()).unwrap_err();
        assert!(err.is_project_error());
    }

    #[test]
    fn future_version_is_rejected() {
        let blobs = MemBlobStore::new();
        let manifest = ProjectManifest {
            version: ARCHIVE_VERSION + 1,
            exported_at: Utc::now(),
            project: Project::new("Future"),
        };
        let mut buf = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buf);
        zip.start_file(PROJECT_MANIFEST, entry_options()).unwrap();
        zip.write_all(serde_json::to_string(&manifest).unwrap().as_bytes())
            .unwrap();
        zip.finish().unwrap();

        buf.set_position(0);
        let err = import_archive(buf, &blobs).unwrap_err();
        assert!(matches!(
            err,
            secplan_core::error::Error::Project(ProjectError::UnsupportedVersion { .. })
        ));
    }
}
