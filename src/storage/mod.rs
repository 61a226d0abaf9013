// ABOUTME: Object storage abstraction for uploaded images
// ABOUTME: ImageStore trait, upload validation and object key generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Image storage
//!
//! Routes never talk to S3 directly. They validate an [`UploadedImage`],
//! derive a key with [`object_key`] and hand both to an [`ImageStore`].
//! Stored objects are addressed publicly as
//! `https://{bucket}.s3.{region}.amazonaws.com/{key}` by every backend, so
//! URLs saved in the database survive a backend switch.

/// In-process store for development and tests
pub mod memory;
/// Amazon S3 store
#[cfg(feature = "s3")]
pub mod s3;

pub use memory::MemoryImageStore;
#[cfg(feature = "s3")]
pub use s3::S3ImageStore;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};
use crate::errors::{AppError, AppResult};

/// A file received from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-side file name
    pub file_name: Option<String>,
    /// Declared MIME type
    pub content_type: String,
    /// File contents
    pub bytes: Bytes,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key inside the bucket
    pub key: String,
    /// Public URL
    pub url: String,
    /// Size in bytes
    pub size: usize,
    /// MIME type
    pub content_type: String,
}

/// Storage backend for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `key`
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<StoredObject>;

    /// Remove the object at `key`; removing a missing object succeeds
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Whether an object exists at `key`
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Public URL of `key`
    fn url_for(&self, key: &str) -> String;

    /// Key of an object from its public URL, if the URL belongs to this store
    fn key_from_url(&self, url: &str) -> Option<String>;
}

/// Public URL prefix shared by every backend
#[must_use]
pub fn public_base_url(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com")
}

/// Strip `base_url/` from `url`
#[must_use]
pub fn key_from_public_url(base_url: &str, url: &str) -> Option<String> {
    url.strip_prefix(base_url)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
}

/// Build the configured store
///
/// # Errors
///
/// Returns a config error when S3 is selected but support was not compiled in
pub async fn create_image_store(config: &StorageConfig) -> AppResult<Arc<dyn ImageStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryImageStore::new(&config.bucket, &config.region))),
        #[cfg(feature = "s3")]
        StorageBackend::S3 => Ok(Arc::new(S3ImageStore::new(config).await)),
        #[cfg(not(feature = "s3"))]
        StorageBackend::S3 => Err(AppError::config(
            "STORAGE_BACKEND=s3 requires the 's3' feature",
        )),
    }
}

/// Reject non-images and files over `max_bytes`
///
/// # Errors
///
/// - 415 when the content type is not `image/*`
/// - 413 when the file exceeds `max_bytes`
/// - 400 when the file is empty
pub fn validate_image(upload: &UploadedImage, max_bytes: usize) -> AppResult<()> {
    if !upload.content_type.to_ascii_lowercase().starts_with("image/") {
        return Err(AppError::unsupported_media_type("Only image files are allowed"));
    }
    if upload.bytes.is_empty() {
        return Err(AppError::invalid_input("Uploaded file is empty"));
    }
    if upload.bytes.len() > max_bytes {
        return Err(AppError::payload_too_large(format!(
            "File too large, maximum size is {} MB",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// `{folder}/{user_id}/{unix_millis}-{uuid8}.{ext}`
#[must_use]
pub fn object_key(folder: &str, user_id: i64, upload: &UploadedImage) -> String {
    let millis = Utc::now().timestamp_millis();
    let simple = Uuid::new_v4().simple().to_string();
    let short = simple.get(..8).unwrap_or(&simple);
    let ext = file_extension(upload.file_name.as_deref(), &upload.content_type);
    format!("{folder}/{user_id}/{millis}-{short}.{ext}")
}

fn file_extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    if let Some(ext) = from_name {
        return ext;
    }
    match content_type
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .unwrap_or_default()
    {
        "jpeg" | "pjpeg" => "jpg".to_owned(),
        "svg+xml" => "svg".to_owned(),
        "" => "bin".to_owned(),
        other => other.chars().filter(char::is_ascii_alphanumeric).collect(),
    }
}
