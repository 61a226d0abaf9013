// ABOUTME: In-memory ImageStore backed by a concurrent map
// ABOUTME: Used for local development and integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;

use super::{key_from_public_url, public_base_url, ImageStore, StoredObject};
use crate::errors::AppResult;

/// A stored blob
#[derive(Debug, Clone)]
pub struct MemoryObject {
    /// Contents
    pub bytes: Bytes,
    /// MIME type
    pub content_type: String,
}

/// Image store keeping objects in process memory
pub struct MemoryImageStore {
    objects: DashMap<String, MemoryObject>,
    base_url: String,
}

impl MemoryImageStore {
    /// Create an empty store addressed like `bucket` in `region`
    #[must_use]
    pub fn new(bucket: &str, region: &str) -> Self {
        Self {
            objects: DashMap::new(),
            base_url: public_base_url(bucket, region),
        }
    }

    /// Copy of the object at `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<MemoryObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    /// Number of stored objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> AppResult<StoredObject> {
        let size = bytes.len();
        self.objects.insert(
            key.to_owned(),
            MemoryObject {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        debug!(key, size, "Stored object in memory");
        Ok(StoredObject {
            key: key.to_owned(),
            url: self.url_for(key),
            size,
            content_type: content_type.to_owned(),
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(key))
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        key_from_public_url(&self.base_url, url)
    }
}
