use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn default_staging_dir() -> PathBuf {
    PathBuf::from("build")
}

/// Everything needed to build a release locally: where to stage outputs and what to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

impl BuildConfig {
    pub fn trace_loaded(&self) {
        info!(
            staging_dir = %self.staging_dir.display(),
            artifacts_count = self.artifacts.len(),
            "Loaded BuildConfig"
        );
        for artifact in &self.artifacts {
            artifact.trace_loaded();
        }
        debug!(?self, "BuildConfig loaded (full debug)");
    }
}

/// A single build output and how to produce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactSpec {
    /// Zip every file below `input_path`.
    FolderArchive(ArtifactSource),
    /// Copy `input_path` as-is.
    FileCopy(ArtifactSource),
}

/// Fields shared by every artifact kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactSource {
    pub input_path: PathBuf,
    pub output_name: String,
    #[serde(default)]
    pub upload: UploadOptions,
}

impl ArtifactSpec {
    pub fn folder_archive(input_path: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        ArtifactSpec::FolderArchive(ArtifactSource {
            input_path: input_path.into(),
            output_name: output_name.into(),
            upload: UploadOptions::default(),
        })
    }

    pub fn file_copy(input_path: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        ArtifactSpec::FileCopy(ArtifactSource {
            input_path: input_path.into(),
            output_name: output_name.into(),
            upload: UploadOptions::default(),
        })
    }

    pub fn with_upload(mut self, upload: UploadOptions) -> Self {
        match &mut self {
            ArtifactSpec::FolderArchive(s) | ArtifactSpec::FileCopy(s) => s.upload = upload,
        }
        self
    }

    pub fn source(&self) -> &ArtifactSource {
        match self {
            ArtifactSpec::FolderArchive(s) | ArtifactSpec::FileCopy(s) => s,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ArtifactSpec::FolderArchive(_) => "folder_archive",
            ArtifactSpec::FileCopy(_) => "file_copy",
        }
    }

    /// Where this artifact lands inside the staging folder.
    pub fn output_full_path(&self, staging_dir: &Path) -> PathBuf {
        staging_dir.join(&self.source().output_name)
    }

    pub fn trace_loaded(&self) {
        let source = self.source();
        info!(
            kind = self.kind(),
            input_path = %source.input_path.display(),
            output_name = %source.output_name,
            "Loaded artifact"
        );
    }
}

/// Options applied to the uploaded object. Only the listed keys are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// S3 storage class name, e.g. `STANDARD_IA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,
}

/// Destination bucket plus the key prefix every object is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub bucket: String,
    pub prefix: String,
}

impl PublishTarget {
    pub fn new(bucket: impl Into<String>, prefix: impl AsRef<str>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.as_ref().trim_matches('/').to_string(),
        }
    }

    /// Object key for a file name: `<prefix>/<name>`, or just `<name>` without a prefix.
    pub fn key_for(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_for_joins_prefix_and_name() {
        let target = PublishTarget::new("artifacts-bucket", "my-repo");
        assert_eq!(target.key_for("release.zip"), "my-repo/release.zip");
    }

    #[test]
    fn key_for_trims_slashes_from_prefix() {
        let target = PublishTarget::new("b", "/newplace/");
        assert_eq!(target.key_for("a.zip"), "newplace/a.zip");
    }

    #[test]
    fn key_for_without_prefix_is_the_name() {
        let target = PublishTarget::new("b", "");
        assert_eq!(target.key_for("a.zip"), "a.zip");
    }

    #[test]
    fn output_full_path_is_staging_plus_name() {
        let spec = ArtifactSpec::file_copy("README.md", "README.md");
        assert_eq!(
            spec.output_full_path(Path::new("build")),
            PathBuf::from("build/README.md")
        );
    }

    #[test]
    fn artifact_spec_deserializes_from_tagged_json() {
        let raw = r#"{"type":"folder_archive","input_path":"artifacts/","output_name":"release.zip","upload":{"content_type":"application/zip"}}"#;
        let spec: ArtifactSpec = serde_json::from_str(raw).unwrap();
        assert_eq!(spec.kind(), "folder_archive");
        assert_eq!(
            spec.source().upload.content_type.as_deref(),
            Some("application/zip")
        );
    }

    #[test]
    fn unknown_upload_option_is_rejected() {
        let raw = r#"{"type":"file_copy","input_path":"a","output_name":"a","upload":{"acl":"public-read"}}"#;
        assert!(serde_json::from_str::<ArtifactSpec>(raw).is_err());
    }
}
