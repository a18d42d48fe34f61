#![doc = "S3 integration: implements the core `Uploader` trait on top of aws-sdk-s3."]
//
//! # Uploader Integration (CLI <-> Core)
//!
//! The core crate only knows the [`Uploader`] trait. This module builds the real client:
//!
//! - [`S3Settings`] carries the optional region and named profile from the command line.
//! - [`S3Client::connect`] loads AWS configuration. Without a profile the ambient default
//!   chain is used (environment variables, shared config/credentials files, instance roles).
//! - Each [`UploadOptions`] field maps to the matching `PutObject` parameter.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, ConfigLoader};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use aws_sdk_s3::Client;

pub use artifact_bucket_core::config::UploadOptions;
pub use artifact_bucket_core::contract::{PutObjectRequest, UploadError, UploadedObject, Uploader};

/// Where credentials for the session come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A named profile from the shared AWS config files.
    Profile(String),
    /// The default provider chain.
    Ambient,
}

/// Session parameters for the S3 client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Settings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl S3Settings {
    pub fn credential_source(&self) -> CredentialSource {
        match &self.profile {
            Some(name) => CredentialSource::Profile(name.clone()),
            None => CredentialSource::Ambient,
        }
    }
}

pub struct S3Client {
    client: Client,
}

impl S3Client {
    pub async fn connect(settings: &S3Settings) -> Self {
        let conf = config_loader(settings).load().await;

        tracing::info!(
            credentials = ?settings.credential_source(),
            region = conf.region().map(|r| r.as_ref()).unwrap_or("<unset>"),
            "Initialised S3 client"
        );
        Self {
            client: Client::new(&conf),
        }
    }
}

/// AWS config loader for `settings`: the named profile if given, else the default chain.
/// An explicit region overrides whatever the profile or environment would pick.
pub(crate) fn config_loader(settings: &S3Settings) -> ConfigLoader {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = &settings.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &settings.region {
        loader = loader.region(Region::new(region.clone()));
    }
    loader
}

#[async_trait]
impl Uploader for S3Client {
    async fn put_object<'a>(&self, req: PutObjectRequest<'a>) -> Result<UploadedObject, UploadError> {
        let body = ByteStream::from_path(req.local_path).await.map_err(|e| {
            tracing::error!(error = ?e, path = %req.local_path.display(), "Failed to open artifact for upload");
            e
        })?;

        let mut put = self
            .client
            .put_object()
            .bucket(req.bucket)
            .key(req.key)
            .body(body);
        let options = req.options;
        if let Some(content_type) = &options.content_type {
            put = put.content_type(content_type);
        }
        if let Some(storage_class) = &options.storage_class {
            put = put.storage_class(StorageClass::from(storage_class.as_str()));
        }
        if let Some(cache_control) = &options.cache_control {
            put = put.cache_control(cache_control);
        }
        if let Some(content_disposition) = &options.content_disposition {
            put = put.content_disposition(content_disposition);
        }

        match put.send().await {
            Ok(out) => {
                tracing::info!(bucket = req.bucket, key = req.key, "Stored object in S3");
                Ok(UploadedObject {
                    bucket: req.bucket.to_string(),
                    key: req.key.to_string(),
                    e_tag: out.e_tag().map(str::to_string),
                    version_id: out.version_id().map(str::to_string),
                })
            }
            Err(e) => {
                let message = DisplayErrorContext(&e).to_string();
                tracing::error!(bucket = req.bucket, key = req.key, error = %message, "S3 PutObject failed");
                Err(message.into())
            }
        }
    }
}
