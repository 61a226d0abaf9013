// ABOUTME: Trainer profile model, profile field validation and aggregate rating helpers
// ABOUTME: TrainerProfile row, TrainerDetails payload and TrainerProfileFields input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SpecializationLinkSummary, TrainerImage, UserSummary};
use crate::errors::FieldError;

/// Upper bound for `experience_years`
pub const MAX_EXPERIENCE_YEARS: i64 = 50;
/// Upper bound for hourly and session rates (DECIMAL(5,2))
pub const MAX_RATE: f64 = 999.99;

/// A trainer profile row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerProfile {
    /// Primary key
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Free-form biography
    pub bio: Option<String>,
    /// Years of experience
    pub experience_years: Option<i64>,
    /// Price per hour
    pub hourly_rate: Option<f64>,
    /// Price per session
    pub session_rate: Option<f64>,
    /// City
    pub location_city: Option<String>,
    /// State or county
    pub location_state: Option<String>,
    /// Country
    pub location_country: Option<String>,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Soft-delete flag; inactive profiles are hidden from search
    pub is_active: bool,
    /// Promoted in listings
    pub is_featured: bool,
    /// Currently accepting clients
    pub is_available: bool,
    /// Number of profile views by other users
    pub profile_views: i64,
    /// Average review rating, two decimals
    pub total_rating: f64,
    /// Number of reviews
    pub review_count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl TrainerProfile {
    /// Average rating, zero until the first review arrives
    #[must_use]
    pub fn average_rating(&self) -> f64 {
        if self.review_count > 0 {
            self.total_rating
        } else {
            0.0
        }
    }

    /// Whether the profile has enough information to be bookable
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let has_text = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        has_text(&self.bio)
            && self.experience_years.is_some()
            && (self.hourly_rate.is_some_and(|r| r > 0.0)
                || self.session_rate.is_some_and(|r| r > 0.0))
            && has_text(&self.location_city)
            && has_text(&self.location_state)
    }
}

/// Trainer profile with its owner, images and specializations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerDetails {
    /// Profile columns
    #[serde(flatten)]
    pub profile: TrainerProfile,
    /// See [`TrainerProfile::average_rating`]
    pub average_rating: f64,
    /// See [`TrainerProfile::is_complete`]
    pub is_complete: bool,
    /// Owning user
    pub user: UserSummary,
    /// Gallery and profile images ordered by `display_order`
    pub images: Vec<TrainerImage>,
    /// Linked specializations
    pub specializations: Vec<SpecializationLinkSummary>,
}

impl TrainerDetails {
    /// Assemble the payload from its parts
    #[must_use]
    pub fn new(
        profile: TrainerProfile,
        user: UserSummary,
        images: Vec<TrainerImage>,
        specializations: Vec<SpecializationLinkSummary>,
    ) -> Self {
        Self {
            average_rating: profile.average_rating(),
            is_complete: profile.is_complete(),
            profile,
            user,
            images,
            specializations,
        }
    }
}

/// Editable profile fields, shared by create and update requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerProfileFields {
    /// Free-form biography
    pub bio: Option<String>,
    /// Years of experience, 0..=50
    pub experience_years: Option<i64>,
    /// Price per hour, 0..=999.99
    pub hourly_rate: Option<f64>,
    /// Price per session, 0..=999.99
    pub session_rate: Option<f64>,
    /// City, 2..=100 characters
    pub location_city: Option<String>,
    /// State, 2..=50 characters
    pub location_state: Option<String>,
    /// Country, 2..=50 characters
    pub location_country: Option<String>,
    /// Latitude, -90..=90
    pub latitude: Option<f64>,
    /// Longitude, -180..=180
    pub longitude: Option<f64>,
}

impl TrainerProfileFields {
    /// Trim text fields, turning blank strings into `None`
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        Self {
            bio: clean(self.bio),
            location_city: clean(self.location_city),
            location_state: clean(self.location_state),
            location_country: clean(self.location_country),
            ..self
        }
    }

    /// Check every present field against its allowed range
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if let Some(years) = self.experience_years {
            if !(0..=MAX_EXPERIENCE_YEARS).contains(&years) {
                errors.push(FieldError::new(
                    "experienceYears",
                    format!("Experience must be between 0 and {MAX_EXPERIENCE_YEARS} years"),
                ));
            }
        }
        check_range(&mut errors, "hourlyRate", self.hourly_rate, 0.0, MAX_RATE);
        check_range(&mut errors, "sessionRate", self.session_rate, 0.0, MAX_RATE);
        check_range(&mut errors, "latitude", self.latitude, -90.0, 90.0);
        check_range(&mut errors, "longitude", self.longitude, -180.0, 180.0);
        check_length(&mut errors, "locationCity", self.location_city.as_deref(), 2, 100);
        check_length(&mut errors, "locationState", self.location_state.as_deref(), 2, 50);
        check_length(&mut errors, "locationCountry", self.location_country.as_deref(), 2, 50);

        errors
    }

    /// Overlay `self` on top of an existing profile
    #[must_use]
    pub fn merged_onto(self, existing: &TrainerProfile) -> Self {
        Self {
            bio: self.bio.or_else(|| existing.bio.clone()),
            experience_years: self.experience_years.or(existing.experience_years),
            hourly_rate: self.hourly_rate.or(existing.hourly_rate),
            session_rate: self.session_rate.or(existing.session_rate),
            location_city: self
                .location_city
                .or_else(|| existing.location_city.clone()),
            location_state: self
                .location_state
                .or_else(|| existing.location_state.clone()),
            location_country: self
                .location_country
                .or_else(|| existing.location_country.clone()),
            latitude: self.latitude.or(existing.latitude),
            longitude: self.longitude.or(existing.longitude),
        }
    }
}

fn check_range(errors: &mut Vec<FieldError>, field: &str, value: Option<f64>, min: f64, max: f64) {
    if let Some(v) = value {
        if !v.is_finite() || v < min || v > max {
            errors.push(FieldError::new(
                field,
                format!("{field} must be between {min} and {max}"),
            ));
        }
    }
}

fn check_length(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>, min: usize, max: usize) {
    if let Some(v) = value {
        let len = v.chars().count();
        if len < min || len > max {
            errors.push(FieldError::new(
                field,
                format!("{field} must be between {min} and {max} characters"),
            ));
        }
    }
}

/// Round an average rating to the two decimals stored in `total_rating`
#[must_use]
pub fn round_rating(average: f64) -> f64 {
    (average * 100.0).round() / 100.0
}
