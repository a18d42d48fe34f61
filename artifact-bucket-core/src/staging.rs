//! Build-folder management: the local directory artifacts are generated into before upload.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ArtifactError, ArtifactResult};

/// Create the staging folder (and parents). Succeeds when it already exists.
pub fn create_build_folder(dir: &Path) -> ArtifactResult<()> {
    if dir.is_dir() {
        debug!(path = %dir.display(), "Build folder already exists");
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| ArtifactError::io("create_build_folder", dir, e))?;
    info!(path = %dir.display(), "Created build folder");
    Ok(())
}

/// Remove every top-level file in the staging folder.
///
/// Only flat folders are supported: if any entry is a directory the call fails before
/// anything is removed. A missing folder is treated as already empty.
pub fn ensure_build_folder_empty(dir: &Path) -> ArtifactResult<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %dir.display(), "Build folder missing, nothing to empty");
            return Ok(());
        }
        Err(e) => return Err(ArtifactError::io("ensure_build_folder_empty.read_dir", dir, e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| ArtifactError::io("ensure_build_folder_empty.entry", dir, e))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| ArtifactError::io("ensure_build_folder_empty.file_type", &path, e))?;
        if file_type.is_dir() {
            return Err(ArtifactError::NestedDirectory { path });
        }
        files.push(path);
    }

    for path in &files {
        fs::remove_file(path)
            .map_err(|e| ArtifactError::io("ensure_build_folder_empty.remove", path, e))?;
        debug!(path = %path.display(), "Removed stale artifact");
    }
    info!(path = %dir.display(), removed = files.len(), "Build folder emptied");
    Ok(())
}

/// Create the staging folder if needed and clear out anything left from a previous run.
pub fn prepare_build_folder(dir: &Path) -> ArtifactResult<()> {
    create_build_folder(dir)?;
    ensure_build_folder_empty(dir)
}
