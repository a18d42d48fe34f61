//! Publish generated artifacts to an object store.
//!
//! Every artifact is attempted exactly once, in order. A failed upload does not stop the
//! loop; it is logged and recorded in the [`PublishReport`] so the caller can decide the
//! exit status. There is no retry.

use serde::Serialize;
use tracing::{debug, error, info};

use crate::artifact::GeneratedArtifact;
use crate::config::PublishTarget;
use crate::contract::{PutObjectRequest, UploadedObject, Uploader};

/// Result of publishing one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadOutcome {
    Uploaded(UploadedObject),
    Failed { key: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactReport {
    pub name: String,
    pub outcome: UploadOutcome,
}

/// Per-artifact outcomes of a publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub bucket: String,
    pub artifacts: Vec<ArtifactReport>,
}

impl PublishReport {
    pub fn succeeded(&self) -> usize {
        self.artifacts
            .iter()
            .filter(|a| matches!(a.outcome, UploadOutcome::Uploaded(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.artifacts.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

pub async fn publish<U>(
    target: &PublishTarget,
    uploader: &U,
    artifacts: &[GeneratedArtifact],
) -> PublishReport
where
    U: Uploader + ?Sized,
{
    info!(
        bucket = %target.bucket,
        prefix = %target.prefix,
        count = artifacts.len(),
        "[PUBLISH] Starting upload of artifacts"
    );

    let mut report = PublishReport {
        bucket: target.bucket.clone(),
        artifacts: Vec::with_capacity(artifacts.len()),
    };

    for artifact in artifacts {
        let key = target.key_for(&artifact.name);
        info!(
            file = %artifact.local_path.display(),
            key = %key,
            "[PUBLISH] Uploading artifact"
        );
        let req = PutObjectRequest {
            bucket: &target.bucket,
            key: &key,
            local_path: &artifact.local_path,
            options: &artifact.options,
        };
        let outcome = match uploader.put_object(req).await {
            Ok(uploaded) => {
                info!(key = %uploaded.key, e_tag = ?uploaded.e_tag, "[PUBLISH] Upload succeeded");
                match serde_json::to_string_pretty(&uploaded) {
                    Ok(json) => debug!(json = %json, "[PUBLISH][DEBUG] Uploaded object"),
                    Err(e) => debug!(error = ?e, "[PUBLISH][DEBUG] Failed to serialize uploaded object"),
                }
                UploadOutcome::Uploaded(uploaded)
            }
            Err(e) => {
                error!(key = %key, error = %e, "[PUBLISH][ERROR] Upload failed, continuing");
                UploadOutcome::Failed {
                    key,
                    error: e.to_string(),
                }
            }
        };
        report.artifacts.push(ArtifactReport {
            name: artifact.name.clone(),
            outcome,
        });
    }

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "[PUBLISH] Finished"
    );
    report
}
