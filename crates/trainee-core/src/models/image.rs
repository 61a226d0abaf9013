// ABOUTME: Trainer gallery image model
// ABOUTME: Image rows reference objects in the configured image store by public URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image attached to a trainer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerImage {
    /// Primary key
    pub id: Uuid,
    /// Owning trainer profile
    pub trainer_id: i64,
    /// Public URL of the stored object
    pub image_url: String,
    /// Accessibility text
    pub alt_text: Option<String>,
    /// Shown first in listings
    pub is_primary: bool,
    /// Sort key within the gallery
    pub display_order: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
