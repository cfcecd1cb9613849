//! Initial ramdisk packaging
//!
//! Two phases with no rollback between them: build the init program and move
//! it into a fresh staging directory, then write the staging directory as a
//! flat USTAR archive and remove it.

use crate::config::schema::InitrdConfig;
use crate::error::{AloeError, AloeResult};
use crate::process::{CommandRunner, StdoutMode, ToolCommand};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::{Builder, Header, HeaderMode};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Absolute locations for one packaging run
#[derive(Debug, Clone)]
pub struct InitrdLayout {
    pub init_dir: PathBuf,
    pub init_artifact: PathBuf,
    pub staging_dir: PathBuf,
    pub archive_path: PathBuf,
}

impl InitrdLayout {
    pub fn new(root: &Path, config: &InitrdConfig) -> Self {
        let init_dir = root.join(&config.init_dir);
        Self {
            init_artifact: init_dir.join(&config.init_artifact),
            init_dir,
            staging_dir: root.join(&config.staging_dir),
            archive_path: root.join(&config.archive_path),
        }
    }
}

/// Create the staging directory. It must not exist yet unless `force`
/// is set, in which case the stale one is removed first.
pub fn prepare_staging(layout: &InitrdLayout, force: bool) -> AloeResult<()> {
    let staging = &layout.staging_dir;

    if staging.exists() {
        if !force {
            return Err(AloeError::StagingExists(staging.clone()));
        }
        warn!("Removing stale staging directory {}", staging.display());
        fs::remove_dir_all(staging)
            .map_err(|e| AloeError::io(format!("removing {}", staging.display()), e))?;
    }

    if let Some(parent) = staging.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AloeError::io(format!("creating {}", parent.display()), e))?;
    }
    fs::create_dir(staging)
        .map_err(|e| AloeError::io(format!("creating {}", staging.display()), e))
}

/// `make` inside the init directory, stdout discarded
pub fn init_build_command(config: &InitrdConfig, layout: &InitrdLayout) -> ToolCommand {
    ToolCommand::new(&config.make_program)
        .current_dir(&layout.init_dir)
        .stdout(StdoutMode::Null)
}

/// Build the init program and move it into staging. A failed build is fatal.
pub async fn build_init_program(
    runner: &dyn CommandRunner,
    config: &InitrdConfig,
    layout: &InitrdLayout,
) -> AloeResult<()> {
    println!("Creating init program...");

    let cmd = init_build_command(config, layout);
    runner.run(&cmd).await?.check(&cmd)?;

    let file_name = layout
        .init_artifact
        .file_name()
        .ok_or_else(|| {
            AloeError::io(
                "locating init artifact",
                io::Error::new(io::ErrorKind::InvalidInput, "artifact path has no file name"),
            )
        })?;
    move_file(&layout.init_artifact, &layout.staging_dir.join(file_name))
}

fn move_file(from: &Path, to: &Path) -> AloeResult<()> {
    debug!("Moving {} to {}", from.display(), to.display());

    if let Err(rename_err) = fs::rename(from, to) {
        // Falls back to copy for moves across filesystems.
        fs::copy(from, to).map_err(|_| {
            AloeError::io(format!("moving {} to {}", from.display(), to.display()), rename_err)
        })?;
        fs::remove_file(from)
            .map_err(|e| AloeError::io(format!("removing {}", from.display()), e))?;
    }
    Ok(())
}

/// Write every staging entry into a USTAR archive under its base name,
/// then delete the staging directory. Returns the top-level names added.
///
/// On failure the partial archive is removed and staging is left in place.
pub fn archive_staging(layout: &InitrdLayout) -> AloeResult<Vec<String>> {
    println!("Archiving initrd...");

    let archive_err = |source| AloeError::Archive {
        path: layout.archive_path.clone(),
        source,
    };

    let names = match write_archive(&layout.staging_dir, &layout.archive_path) {
        Ok(names) => names,
        Err(e) => {
            let _ = fs::remove_file(&layout.archive_path);
            return Err(archive_err(e));
        }
    };

    fs::remove_dir_all(&layout.staging_dir).map_err(|e| {
        AloeError::io(format!("removing {}", layout.staging_dir.display()), e)
    })?;

    info!(
        "Wrote {} with {} entries",
        layout.archive_path.display(),
        names.len()
    );
    Ok(names)
}

fn write_archive(staging: &Path, archive: &Path) -> io::Result<Vec<String>> {
    let mut entries = fs::read_dir(staging)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();

    let mut builder = Builder::new(File::create(archive)?);
    let mut names = Vec::with_capacity(entries.len());

    for entry in entries {
        let name = entry.to_string_lossy().to_string();
        println!("Archiving {}", name);

        for item in WalkDir::new(staging.join(&entry)).sort_by_file_name() {
            let item = item.map_err(io::Error::from)?;
            let member = item
                .path()
                .strip_prefix(staging)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            append_ustar(&mut builder, item.path(), member)?;
        }
        names.push(name);
    }

    builder.into_inner()?.sync_all()?;
    Ok(names)
}

fn append_ustar(builder: &mut Builder<File>, path: &Path, member: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    let mut header = Header::new_ustar();
    header.set_metadata_in_mode(&meta, HeaderMode::Complete);

    if meta.file_type().is_symlink() {
        header.set_size(0);
        builder.append_link(&mut header, member, fs::read_link(path)?)
    } else if meta.is_dir() {
        header.set_size(0);
        builder.append_data(&mut header, member, io::empty())
    } else {
        builder.append_data(&mut header, member, File::open(path)?)
    }
}

/// Full packaging run rooted at `root`
pub async fn package(
    runner: &dyn CommandRunner,
    config: &InitrdConfig,
    root: &Path,
    force: bool,
) -> AloeResult<Vec<String>> {
    let layout = InitrdLayout::new(root, config);

    prepare_staging(&layout, force)?;
    build_init_program(runner, config, &layout).await?;
    let names = archive_staging(&layout)?;

    println!("Done");
    Ok(names)
}
