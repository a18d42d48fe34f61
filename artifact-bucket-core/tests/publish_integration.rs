use artifact_bucket_core::artifact::GeneratedArtifact;
use artifact_bucket_core::config::{PublishTarget, UploadOptions};
use artifact_bucket_core::contract::{MockUploader, PutObjectRequest, UploadedObject};
use artifact_bucket_core::publish::{publish, UploadOutcome};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

fn artifact(name: &str) -> GeneratedArtifact {
    GeneratedArtifact {
        name: name.to_string(),
        local_path: PathBuf::from("build").join(name),
        options: UploadOptions::default(),
    }
}

fn uploaded(req: &PutObjectRequest<'_>) -> UploadedObject {
    UploadedObject {
        bucket: req.bucket.to_string(),
        key: req.key.to_string(),
        e_tag: Some("\"etag\"".to_string()),
        version_id: None,
    }
}

#[tokio::test]
async fn publish_uploads_each_artifact_under_prefix() {
    let keys = Arc::new(Mutex::new(Vec::new()));
    let seen = keys.clone();

    let mut uploader = MockUploader::new();
    uploader
        .expect_put_object()
        .times(2)
        .returning(move |req: PutObjectRequest<'_>| {
            seen.lock().unwrap().push((req.bucket.to_string(), req.key.to_string()));
            Ok(uploaded(&req))
        });

    let target = PublishTarget::new("release-bucket", "my-repo");
    let report = publish(
        &target,
        &uploader,
        &[artifact("release.zip"), artifact("README.md")],
    )
    .await;

    assert!(!report.has_failures());
    assert_eq!(report.succeeded(), 2);
    assert_eq!(
        *keys.lock().unwrap(),
        vec![
            ("release-bucket".to_string(), "my-repo/release.zip".to_string()),
            ("release-bucket".to_string(), "my-repo/README.md".to_string()),
        ]
    );
}

#[tokio::test]
async fn failed_upload_is_recorded_and_loop_continues() {
    let mut uploader = MockUploader::new();
    uploader
        .expect_put_object()
        .times(3)
        .returning(|req: PutObjectRequest<'_>| {
            if req.key.ends_with("broken.zip") {
                Err("NoSuchBucket: The specified bucket does not exist".into())
            } else {
                Ok(uploaded(&req))
            }
        });

    let target = PublishTarget::new("missing-bucket", "repo");
    let report = publish(
        &target,
        &uploader,
        &[artifact("a.zip"), artifact("broken.zip"), artifact("c.zip")],
    )
    .await;

    assert_eq!(report.artifacts.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(report.has_failures());
    match &report.artifacts[1].outcome {
        UploadOutcome::Failed { key, error } => {
            assert_eq!(key, "repo/broken.zip");
            assert!(error.contains("NoSuchBucket"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(matches!(
        report.artifacts[2].outcome,
        UploadOutcome::Uploaded(_)
    ));
}

#[tokio::test]
async fn upload_options_reach_the_uploader() {
    let mut uploader = MockUploader::new();
    uploader
        .expect_put_object()
        .withf(|req: &PutObjectRequest<'_>| {
            req.options.storage_class.as_deref() == Some("STANDARD_IA")
                && req.local_path == std::path::Path::new("build/archive.zip")
        })
        .times(1)
        .returning(|req: PutObjectRequest<'_>| Ok(uploaded(&req)));

    let mut item = artifact("archive.zip");
    item.options.storage_class = Some("STANDARD_IA".into());

    let report = publish(&PublishTarget::new("b", ""), &uploader, &[item]).await;
    assert_eq!(report.succeeded(), 1);
}

#[tokio::test]
async fn publishing_nothing_reports_nothing() {
    let uploader = MockUploader::new();
    let report = publish(&PublishTarget::new("b", "p"), &uploader, &[]).await;
    assert!(report.artifacts.is_empty());
    assert!(!report.has_failures());
}
