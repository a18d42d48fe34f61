//! Zip a folder tree into a single archive, keeping paths relative to the folder root.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ArtifactError, ArtifactResult};

/// Write every regular file below `input_dir` into a deflate zip at `output`.
///
/// Entry names use `/` separators regardless of platform. Directories get no entries
/// of their own. The archive itself and, when it sits inside `input_dir`, the whole
/// `staging_dir` are left out. Returns the number of entries written.
pub fn zip_folder(input_dir: &Path, output: &Path, staging_dir: &Path) -> ArtifactResult<usize> {
    let file = File::create(output).map_err(|e| ArtifactError::io("zip_folder.create", output, e))?;
    let excluded = excluded_paths(input_dir, output, staging_dir);
    let mut writer = ZipWriter::new(file);
    let mut entries = 0usize;

    let walker = WalkDir::new(input_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e.path(), &excluded));
    for entry in walker {
        let entry = entry.map_err(|e| ArtifactError::walkdir("zip_folder.walk", input_dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path
            .strip_prefix(input_dir)
            .map_err(|_| ArtifactError::InvalidInput {
                field: "archive_entry",
                reason: "outside_input_dir",
                value: Some(path.display().to_string()),
            })?;
        let name = entry_name(relative);

        let size = entry
            .metadata()
            .map_err(|e| ArtifactError::walkdir("zip_folder.metadata", path, e))?
            .len();
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(size >= u64::from(u32::MAX));

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ArtifactError::zip("zip_folder.start_file", output, e))?;
        let mut input = File::open(path).map_err(|e| ArtifactError::io("zip_folder.open", path, e))?;
        io::copy(&mut input, &mut writer)
            .map_err(|e| ArtifactError::io("zip_folder.write_entry", path, e))?;

        debug!(entry = %name, size, "Added archive entry");
        entries += 1;
    }

    writer
        .finish()
        .map_err(|e| ArtifactError::zip("zip_folder.finish", output, e))?;

    let archive_size = fs::metadata(output).map(|m| m.len()).unwrap_or_default();
    info!(
        input = %input_dir.display(),
        output = %output.display(),
        entries,
        archive_size,
        "Wrote folder archive"
    );
    Ok(entries)
}

/// Canonical paths the walk must not descend into or archive.
fn excluded_paths(input_dir: &Path, output: &Path, staging_dir: &Path) -> Vec<PathBuf> {
    let mut excluded = Vec::new();
    if let Ok(output) = fs::canonicalize(output) {
        excluded.push(output);
    }
    if let (Ok(input), Ok(staging)) = (fs::canonicalize(input_dir), fs::canonicalize(staging_dir)) {
        if staging != input && staging.starts_with(&input) {
            debug!(staging_dir = %staging.display(), "Staging folder is inside archive input, skipping it");
            excluded.push(staging);
        }
    }
    excluded
}

fn is_excluded(path: &Path, excluded: &[PathBuf]) -> bool {
    match fs::canonicalize(path) {
        Ok(canonical) => excluded.iter().any(|x| *x == canonical),
        Err(_) => false,
    }
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
