use std::fs;
use std::path::{Path, PathBuf};

use mockall::automock;
use serde::Serialize;
use tracing::{error, info};

use crate::archive::zip_folder;
use crate::config::{ArtifactSource, ArtifactSpec, UploadOptions};
use crate::error::{ArtifactError, ArtifactResult};

/// An artifact that has been written to the staging folder and is ready for upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedArtifact {
    /// File name inside the staging folder; also the last segment of the object key.
    pub name: String,
    pub local_path: PathBuf,
    pub options: UploadOptions,
}

/// Anything that can produce one output file inside a staging folder.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Generate {
    /// Write the output into `staging_dir`, creating or overwriting it.
    fn generate(&self, staging_dir: &Path) -> ArtifactResult<GeneratedArtifact>;
}

impl Generate for ArtifactSpec {
    fn generate(&self, staging_dir: &Path) -> ArtifactResult<GeneratedArtifact> {
        let source = self.source();
        validate_output_name(&source.output_name)?;
        let output = self.output_full_path(staging_dir);

        let result = match self {
            ArtifactSpec::FolderArchive(s) => archive_folder(s, &output, staging_dir),
            ArtifactSpec::FileCopy(s) => copy_file(s, &output),
        };
        if let Err(e) = &result {
            error!(
                kind = self.kind(),
                input_path = %source.input_path.display(),
                error = ?e,
                "Artifact generation failed"
            );
        }
        result?;

        Ok(GeneratedArtifact {
            name: source.output_name.clone(),
            local_path: output,
            options: source.upload.clone(),
        })
    }
}

fn archive_folder(source: &ArtifactSource, output: &Path, staging_dir: &Path) -> ArtifactResult<()> {
    let input = &source.input_path;
    if !input.exists() {
        return Err(ArtifactError::MissingInput { path: input.clone() });
    }
    if !input.is_dir() {
        return Err(ArtifactError::InvalidInput {
            field: "input_path",
            reason: "not_a_directory",
            value: Some(input.display().to_string()),
        });
    }
    zip_folder(input, output, staging_dir)?;
    Ok(())
}

fn copy_file(source: &ArtifactSource, output: &Path) -> ArtifactResult<()> {
    let input = &source.input_path;
    if !input.exists() {
        return Err(ArtifactError::MissingInput { path: input.clone() });
    }
    if !input.is_file() {
        return Err(ArtifactError::InvalidInput {
            field: "input_path",
            reason: "not_a_file",
            value: Some(input.display().to_string()),
        });
    }
    let bytes = fs::copy(input, output).map_err(|e| ArtifactError::io("copy_file", output, e))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        bytes,
        "Copied file artifact"
    );
    Ok(())
}

/// Output names must stay a single file inside the staging folder.
fn validate_output_name(name: &str) -> ArtifactResult<()> {
    let reason = if name.is_empty() {
        Some("empty")
    } else if name == "." || name == ".." {
        Some("relative_component")
    } else if name.contains('/') || name.contains('\\') {
        Some("contains_separator")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ArtifactError::InvalidInput {
            field: "output_name",
            reason,
            value: Some(name.to_string()),
        }),
        None => Ok(()),
    }
}
