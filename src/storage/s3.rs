// ABOUTME: Amazon S3 ImageStore built on aws-sdk-s3
// ABOUTME: Thin adapter: put, delete and head requests against one bucket
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::{debug, info};

use super::{key_from_public_url, public_base_url, ImageStore, StoredObject};
use crate::config::StorageConfig;
use crate::errors::{AppError, AppResult};

/// Image store writing to an S3 bucket
#[derive(Clone)]
pub struct S3ImageStore {
    s3_client: Arc<S3Client>,
    bucket: String,
    base_url: String,
}

impl S3ImageStore {
    /// Load AWS credentials from the environment and create a client
    pub async fn new(config: &StorageConfig) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        info!(bucket = %config.bucket, region = %config.region, "S3 image store ready");
        Self {
            s3_client: Arc::new(S3Client::new(&aws_config)),
            bucket: config.bucket.clone(),
            base_url: public_base_url(&config.bucket, &config.region),
        }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<StoredObject> {
        let size = bytes.len();
        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Failed to upload {key}: {e}")))?;

        debug!(key, size, "Uploaded object to S3");
        Ok(StoredObject {
            key: key.to_owned(),
            url: self.url_for(key),
            size,
            content_type: content_type.to_owned(),
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.s3_client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("Failed to delete {key}: {e}")))?;
        debug!(key, "Deleted object from S3");
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self
            .s3_client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(AppError::storage(format!("Failed to inspect {key}: {e}"))),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        key_from_public_url(&self.base_url, url)
    }
}
