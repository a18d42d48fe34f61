//! # contract: upload interface between the publish loop and object stores
//!
//! The core crate never talks to a cloud SDK. It hands each generated artifact to an
//! [`Uploader`], which the CLI crate implements for S3 and tests replace with
//! [`MockUploader`] (exported under the `test-export-mocks` feature).

use std::path::Path;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::config::UploadOptions;

/// Boxed error returned by uploader implementations.
pub type UploadError = Box<dyn std::error::Error + Send + Sync>;

/// One object to store.
#[derive(Debug, Clone, Copy)]
pub struct PutObjectRequest<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    /// Local file whose bytes become the object body.
    pub local_path: &'a Path,
    pub options: &'a UploadOptions,
}

/// What the store reports back after a successful put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedObject {
    pub bucket: String,
    pub key: String,
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

/// Trait for storing files in a bucket-addressed object store.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload a single local file under `req.key`.
    async fn put_object<'a>(&self, req: PutObjectRequest<'a>) -> Result<UploadedObject, UploadError>;
}
