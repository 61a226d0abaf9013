// ABOUTME: Specialization tags and the trainer-specialization join model
// ABOUTME: Specialization, ExperienceLevel, TrainerSpecialization and their summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A training discipline such as "Yoga" or "CrossFit"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialization {
    /// Primary key
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Longer explanation
    pub description: Option<String>,
    /// Icon shown by clients
    pub icon_url: Option<String>,
    /// Inactive specializations cannot be linked
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// How experienced a trainer is in a specialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Getting started
    #[default]
    Beginner,
    /// Several years of practice
    Intermediate,
    /// Recognized expert
    Expert,
}

impl ExperienceLevel {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "intermediate" => Self::Intermediate,
            "expert" => Self::Expert,
            _ => Self::Beginner,
        }
    }
}

/// A link between a trainer profile and a specialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSpecialization {
    /// Primary key
    pub id: Uuid,
    /// Trainer profile id
    pub trainer_id: i64,
    /// Specialization id
    pub specialization_id: i64,
    /// Experience in this discipline
    pub experience_level: ExperienceLevel,
    /// Certification name, if any
    pub certification: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Specialization as embedded in trainer payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecializationLinkSummary {
    /// Specialization id
    pub id: i64,
    /// Specialization name
    pub name: String,
    /// Specialization description
    pub description: Option<String>,
    /// Specialization icon
    pub icon_url: Option<String>,
    /// Trainer's level in it
    pub experience_level: ExperienceLevel,
    /// Trainer's certification in it
    pub certification: Option<String>,
}

/// Input for linking a specialization to the caller's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrainerSpecialization {
    /// Specialization to link
    pub specialization_id: i64,
    /// Experience in this discipline
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Certification name
    pub certification: Option<String>,
}

/// Input for creating a specialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpecialization {
    /// Unique name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Icon URL
    pub icon_url: Option<String>,
    /// Defaults to active
    pub is_active: Option<bool>,
}
