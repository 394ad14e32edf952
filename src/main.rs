use anyhow::{bail, Context};
use secplan::{init_logging, write_deliverables, FsBlobStore, ImportedArchive};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

/// Produce deliverables packages from a project or backup archive.
///
/// Usage: secplan <archive.zip> [output-dir]
fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let Some(archive_path) = args.next().map(PathBuf::from) else {
        bail!("usage: secplan <archive.zip> [output-dir]");
    };
    let output_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    // Imported blobs land in a scratch store next to the output
    let blobs = FsBlobStore::open(output_dir.join(".blobs"))?;

    let file = File::open(&archive_path)
        .with_context(|| format!("opening archive {}", archive_path.display()))?;
    let imported = secplan::import_archive(file, &blobs)?;
    let projects = match imported {
        ImportedArchive::Project(p) => vec![p],
        ImportedArchive::Backup(ps) => ps,
    };
    info!(count = projects.len(), "imported projects");

    for project in &projects {
        let name: String = project
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let out_path = output_dir.join(format!("{name}_deliverables.zip"));
        let out = File::create(&out_path)
            .with_context(|| format!("creating {}", out_path.display()))?;
        write_deliverables(project, &blobs, out)?;
        println!(
            "{}: {} items, {} floorplans -> {}",
            project.name,
            project.item_count(),
            project.floorplans.len(),
            out_path.display()
        );
    }

    Ok(())
}
