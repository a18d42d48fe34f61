//! This module implements the CLI for artifact-bucket: command parsing, the async `run`
//! entrypoint, and the glue that wires the core pipeline to the S3 client.
//!
//! All packaging and publishing logic lives in [`artifact-bucket-core`]; this module only
//! resolves arguments, builds an [`S3Client`], and turns outcomes into an exit status.
//!
//! ## Commands
//! - `build`: prepare the staging folder and generate every configured artifact.
//! - `upload`: push one local file to `s3://<bucket>/<repo_name>/<filename>`.
//! - `release`: `build`, then upload every generated artifact under `<repo_name>/`.
//!
//! Any failed upload makes the command return an error, so the process exits non-zero.
//!
//! [`artifact-bucket-core`]: ../../artifact-bucket-core/

use crate::load_config::load_config;
use crate::upload::{S3Client, S3Settings};
use anyhow::{Context, Result};
use artifact_bucket_core::artifact::GeneratedArtifact;
use artifact_bucket_core::config::{BuildConfig, PublishTarget, UploadOptions};
use artifact_bucket_core::contract::Uploader;
use artifact_bucket_core::generate::build;
use artifact_bucket_core::publish::{publish, PublishReport};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI for artifact-bucket: package build outputs and publish them to S3.
#[derive(Parser, Debug)]
#[clap(
    name = "artifact-bucket",
    version,
    about = "Package build artifacts and upload them to an S3 bucket"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate all configured artifacts into the staging folder
    Build {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Upload a single file to s3://<bucket>/<repo_name>/<filename>
    Upload {
        /// Target bucket
        bucket: String,
        /// Name of the file to upload, relative to --source-dir
        filename: String,
        /// Repository name, used as the key prefix
        repo_name: String,
        /// Directory holding the file
        #[clap(long, default_value = ".")]
        source_dir: PathBuf,
        #[clap(flatten)]
        aws: AwsArgs,
    },
    /// Build all artifacts, then upload them under <repo_name>/
    Release {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Target bucket
        bucket: String,
        /// Repository name, used as the key prefix
        repo_name: String,
        #[clap(flatten)]
        aws: AwsArgs,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsArgs {
    /// AWS region; falls back to the ambient configuration
    #[clap(long)]
    pub region: Option<String>,
    /// Named credentials profile; ambient credentials are used when omitted
    #[clap(long)]
    pub profile: Option<String>,
}

impl From<AwsArgs> for S3Settings {
    fn from(args: AwsArgs) -> Self {
        S3Settings {
            region: args.region,
            profile: args.profile,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Build { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "build", "Starting build");
            let generated = build(&config).context("Build failed")?;
            println!("Build complete: {} artifact(s)", generated.len());
            for artifact in &generated {
                println!("  {}", artifact.local_path.display());
            }
            Ok(())
        }
        Commands::Upload {
            bucket,
            filename,
            repo_name,
            source_dir,
            aws,
        } => {
            let artifact = local_artifact(source_dir, &filename)?;
            let settings: S3Settings = aws.into();
            let uploader = S3Client::connect(&settings).await;
            let target = PublishTarget::new(bucket, &repo_name);
            tracing::info!(command = "upload", key = %target.key_for(&filename), "Starting upload");
            let report = publish(&target, &uploader, &[artifact]).await;
            finish(&report)
        }
        Commands::Release {
            config,
            bucket,
            repo_name,
            aws,
        } => {
            let config = load_config(config)?;
            let settings: S3Settings = aws.into();
            tracing::info!(command = "release", credentials = ?settings.credential_source(), "Starting release");
            let target = PublishTarget::new(bucket, &repo_name);
            let report = release(&config, &target, || S3Client::connect(&settings)).await?;
            finish(&report)
        }
    }
}

/// Build everything, then publish it. The uploader is only created once the build succeeded.
pub async fn release<U, F, Fut>(
    config: &BuildConfig,
    target: &PublishTarget,
    make_uploader: F,
) -> Result<PublishReport>
where
    U: Uploader,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = U>,
{
    let generated = build(config).context("Build failed")?;
    let uploader = make_uploader().await;
    Ok(publish(target, &uploader, &generated).await)
}

/// Describe a file that already exists on disk as an artifact ready for upload.
pub fn local_artifact(source_dir: PathBuf, filename: &str) -> Result<GeneratedArtifact> {
    let local_path = source_dir.join(filename);
    if !local_path.is_file() {
        tracing::error!(path = %local_path.display(), "File to upload does not exist");
        anyhow::bail!("File to upload does not exist: {}", local_path.display());
    }
    Ok(GeneratedArtifact {
        name: filename.to_string(),
        local_path,
        options: UploadOptions::default(),
    })
}

fn finish(report: &PublishReport) -> Result<()> {
    println!("Publish complete.\nReport:");
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(_) => println!("{:#?}", report),
    }
    if report.has_failures() {
        tracing::error!(failed = report.failed(), "One or more uploads failed");
        anyhow::bail!(
            "{} of {} upload(s) failed",
            report.failed(),
            report.artifacts.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_bucket_core::contract::UploadedObject;
    use artifact_bucket_core::publish::{ArtifactReport, UploadOutcome};

    #[test]
    fn upload_parses_positional_contract() {
        let cli = Cli::try_parse_from([
            "artifact-bucket",
            "upload",
            "my-bucket",
            "release.zip",
            "my-repo",
        ])
        .unwrap();
        match cli.command {
            Commands::Upload {
                bucket,
                filename,
                repo_name,
                source_dir,
                aws,
            } => {
                assert_eq!(bucket, "my-bucket");
                assert_eq!(filename, "release.zip");
                assert_eq!(repo_name, "my-repo");
                assert_eq!(source_dir, PathBuf::from("."));
                assert_eq!(aws, AwsArgs::default());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn release_accepts_region_and_profile() {
        let cli = Cli::try_parse_from([
            "artifact-bucket",
            "release",
            "--config",
            "release.yaml",
            "bucket",
            "repo",
            "--region",
            "eu-central-1",
            "--profile",
            "ci",
        ])
        .unwrap();
        match cli.command {
            Commands::Release { aws, .. } => {
                assert_eq!(aws.region.as_deref(), Some("eu-central-1"));
                assert_eq!(aws.profile.as_deref(), Some("ci"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn upload_requires_three_positionals() {
        assert!(Cli::try_parse_from(["artifact-bucket", "upload", "bucket", "file"]).is_err());
    }

    #[test]
    fn local_artifact_rejects_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = local_artifact(tmp.path().to_path_buf(), "nope.zip").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    fn report(outcomes: Vec<UploadOutcome>) -> PublishReport {
        PublishReport {
            bucket: "bucket".to_string(),
            artifacts: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, outcome)| ArtifactReport {
                    name: format!("artifact-{i}.zip"),
                    outcome,
                })
                .collect(),
        }
    }

    fn uploaded(key: &str) -> UploadOutcome {
        UploadOutcome::Uploaded(UploadedObject {
            bucket: "bucket".to_string(),
            key: key.to_string(),
            e_tag: None,
            version_id: None,
        })
    }

    #[test]
    fn finish_fails_when_any_upload_failed() {
        let report = report(vec![
            uploaded("repo/artifact-0.zip"),
            UploadOutcome::Failed {
                key: "repo/artifact-1.zip".to_string(),
                error: "NoSuchBucket".to_string(),
            },
        ]);
        let err = finish(&report).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 upload(s) failed");
    }

    #[test]
    fn finish_succeeds_when_every_upload_succeeded() {
        let report = report(vec![uploaded("repo/a.zip"), uploaded("repo/b.zip")]);
        assert!(finish(&report).is_ok());
    }
}
