//! Produce every configured artifact into the staging folder.

use std::collections::HashSet;
use std::path::Path;

use tracing::{error, info};

use crate::artifact::{Generate, GeneratedArtifact};
use crate::config::{ArtifactSpec, BuildConfig};
use crate::error::{ArtifactError, ArtifactResult};
use crate::staging::prepare_build_folder;

/// Generate each artifact in declaration order. The first failure aborts the run.
pub fn generate_all<G: Generate>(
    artifacts: &[G],
    staging_dir: &Path,
) -> ArtifactResult<Vec<GeneratedArtifact>> {
    info!(
        count = artifacts.len(),
        staging_dir = %staging_dir.display(),
        "[BUILD] Generating artifacts"
    );
    let mut generated = Vec::with_capacity(artifacts.len());
    for (index, artifact) in artifacts.iter().enumerate() {
        match artifact.generate(staging_dir) {
            Ok(out) => {
                info!(index, name = %out.name, path = %out.local_path.display(), "[BUILD] Artifact generated");
                generated.push(out);
            }
            Err(e) => {
                error!(index, error = ?e, "[BUILD][ERROR] Aborting build");
                return Err(e);
            }
        }
    }
    Ok(generated)
}

/// Prepare a clean staging folder and generate everything in `config`.
pub fn build(config: &BuildConfig) -> ArtifactResult<Vec<GeneratedArtifact>> {
    check_unique_output_names(&config.artifacts)?;
    prepare_build_folder(&config.staging_dir)?;
    generate_all(&config.artifacts, &config.staging_dir)
}

/// Two artifacts writing the same output name would overwrite each other in staging.
fn check_unique_output_names(artifacts: &[ArtifactSpec]) -> ArtifactResult<()> {
    let mut seen = HashSet::new();
    for artifact in artifacts {
        let name = &artifact.source().output_name;
        if !seen.insert(name.as_str()) {
            error!(output_name = %name, "[BUILD][ERROR] Duplicate output name");
            return Err(ArtifactError::InvalidInput {
                field: "output_name",
                reason: "duplicate",
                value: Some(name.clone()),
            });
        }
    }
    Ok(())
}
