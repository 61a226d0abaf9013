// ABOUTME: Trainer search: query-string parsing and SQL assembly with bound parameters
// ABOUTME: Filters on text, location, rates, experience, rating, specializations and flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Trainer search
//!
//! [`TrainerSearchParams`] is the raw query string. [`TrainerSearchQuery`]
//! is the validated form; every filter it carries becomes a bound parameter
//! in a [`QueryBuilder`], never interpolated text. Only column names chosen
//! from closed enums are spliced into the SQL.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;
use uuid::Uuid;

use super::trainers::{row_to_profile, TrainersManager};
use crate::errors::{AppError, AppResult, FieldError};
use crate::models::{TrainerProfile, UserSummary};
use crate::pagination::{PageRequest, Pagination};

/// Raw search parameters as sent by the client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSearchParams {
    /// Free text
    pub q: Option<String>,
    /// City substring
    pub city: Option<String>,
    /// State substring
    pub state: Option<String>,
    /// Country substring
    pub country: Option<String>,
    /// Lower rate bound
    pub min_rate: Option<String>,
    /// Upper rate bound
    pub max_rate: Option<String>,
    /// `hourly` or `session`
    pub rate_type: Option<String>,
    /// Lower experience bound in years
    pub min_experience: Option<String>,
    /// Upper experience bound in years
    pub max_experience: Option<String>,
    /// Lower rating bound
    pub min_rating: Option<String>,
    /// Comma-separated specialization ids
    pub specializations: Option<String>,
    /// `true` or `false`
    pub is_available: Option<String>,
    /// `true` or `false`
    pub is_featured: Option<String>,
    /// Sort key
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_order: Option<String>,
    /// 1-based page
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

/// Which rate column the bounds apply to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateType {
    /// `hourly_rate`
    #[default]
    Hourly,
    /// `session_rate`
    Session,
}

impl RateType {
    const fn column(self) -> &'static str {
        match self {
            Self::Hourly => "tp.hourly_rate",
            Self::Session => "tp.session_rate",
        }
    }
}

/// Sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Average rating
    #[default]
    TotalRating,
    /// Years of experience
    ExperienceYears,
    /// Hourly price
    HourlyRate,
    /// Session price
    SessionRate,
    /// Number of reviews
    ReviewCount,
    /// Profile age
    CreatedAt,
}

impl SortBy {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "totalRating" => Some(Self::TotalRating),
            "experienceYears" => Some(Self::ExperienceYears),
            "hourlyRate" => Some(Self::HourlyRate),
            "sessionRate" => Some(Self::SessionRate),
            "reviewCount" => Some(Self::ReviewCount),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    const fn column(self) -> &'static str {
        match self {
            Self::TotalRating => "tp.total_rating",
            Self::ExperienceYears => "tp.experience_years",
            Self::HourlyRate => "tp.hourly_rate",
            Self::SessionRate => "tp.session_rate",
            Self::ReviewCount => "tp.review_count",
            Self::CreatedAt => "tp.created_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first
    Asc,
    /// Largest first
    #[default]
    Desc,
}

impl SortOrder {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated search request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainerSearchQuery {
    /// Lowercased free text
    pub text: Option<String>,
    /// Lowercased city
    pub city: Option<String>,
    /// Lowercased state
    pub state: Option<String>,
    /// Lowercased country
    pub country: Option<String>,
    /// Lower rate bound
    pub min_rate: Option<f64>,
    /// Upper rate bound
    pub max_rate: Option<f64>,
    /// Rate column
    pub rate_type: RateType,
    /// Lower experience bound
    pub min_experience: Option<i64>,
    /// Upper experience bound
    pub max_experience: Option<i64>,
    /// Lower rating bound
    pub min_rating: Option<f64>,
    /// Trainer must have at least one of these
    pub specialization_ids: Vec<i64>,
    /// Availability flag
    pub is_available: Option<bool>,
    /// Featured flag
    pub is_featured: Option<bool>,
    /// Sort key
    pub sort_by: SortBy,
    /// Sort direction
    pub sort_order: SortOrder,
    /// Requested page
    pub page: PageRequest,
}

impl TrainerSearchQuery {
    /// Validate raw parameters
    ///
    /// # Errors
    ///
    /// Returns a validation error listing every malformed parameter
    pub fn from_params(params: &TrainerSearchParams) -> AppResult<Self> {
        let mut errors = Vec::new();

        let min_rate = parse_non_negative(&mut errors, "minRate", params.min_rate.as_deref());
        let max_rate = parse_non_negative(&mut errors, "maxRate", params.max_rate.as_deref());
        let min_experience =
            parse_years(&mut errors, "minExperience", params.min_experience.as_deref());
        let max_experience =
            parse_years(&mut errors, "maxExperience", params.max_experience.as_deref());
        let min_rating = parse_non_negative(&mut errors, "minRating", params.min_rating.as_deref());
        if min_rating.is_some_and(|r| r > 5.0) {
            errors.push(FieldError::new("minRating", "minRating must be between 0 and 5"));
        }

        let rate_type = match present(params.rate_type.as_deref()) {
            None | Some("hourly") => RateType::Hourly,
            Some("session") => RateType::Session,
            Some(_) => {
                errors.push(FieldError::new("rateType", "rateType must be hourly or session"));
                RateType::default()
            }
        };

        let sort_by = match present(params.sort_by.as_deref()) {
            None => SortBy::default(),
            Some(raw) => SortBy::parse(raw).unwrap_or_else(|| {
                errors.push(FieldError::new(
                    "sortBy",
                    "sortBy must be one of totalRating, experienceYears, hourlyRate, sessionRate, reviewCount, createdAt",
                ));
                SortBy::default()
            }),
        };

        let sort_order = match present(params.sort_order.as_deref()).map(str::to_lowercase) {
            None => SortOrder::default(),
            Some(raw) if raw == "asc" => SortOrder::Asc,
            Some(raw) if raw == "desc" => SortOrder::Desc,
            Some(_) => {
                errors.push(FieldError::new("sortOrder", "sortOrder must be asc or desc"));
                SortOrder::default()
            }
        };

        let specialization_ids = parse_id_list(&mut errors, params.specializations.as_deref());
        let is_available = parse_flag(&mut errors, "isAvailable", params.is_available.as_deref());
        let is_featured = parse_flag(&mut errors, "isFeatured", params.is_featured.as_deref());
        let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref(), &mut errors);

        if let (Some(min), Some(max)) = (min_rate, max_rate) {
            if min > max {
                errors.push(FieldError::new("minRate", "minRate cannot exceed maxRate"));
            }
        }
        if let (Some(min), Some(max)) = (min_experience, max_experience) {
            if min > max {
                errors.push(FieldError::new(
                    "minExperience",
                    "minExperience cannot exceed maxExperience",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        Ok(Self {
            text: lowered(params.q.as_deref()),
            city: lowered(params.city.as_deref()),
            state: lowered(params.state.as_deref()),
            country: lowered(params.country.as_deref()),
            min_rate,
            max_rate,
            rate_type,
            min_experience,
            max_experience,
            min_rating,
            specialization_ids,
            is_available,
            is_featured,
            sort_by,
            sort_order,
            page,
        })
    }

    /// Append the `FROM ... WHERE ...` part shared by the page and count queries
    fn push_from_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push(
            " FROM trainer_profiles tp JOIN users u ON u.id = tp.user_id \
             WHERE tp.is_active = 1 AND u.is_active = 1",
        );

        // *_search columns hold search_fold() output written on every insert/update
        if let Some(text) = &self.text {
            let pattern = like_pattern(text);
            builder.push(" AND (COALESCE(tp.bio_search, '') LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\' OR COALESCE(tp.location_city_search, '') LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\' OR u.first_name_search LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\' OR u.last_name_search LIKE ");
            builder.push_bind(pattern);
            builder.push(" ESCAPE '\\')");
        }

        for (column, value) in [
            ("tp.location_city_search", &self.city),
            ("tp.location_state_search", &self.state),
            ("tp.location_country_search", &self.country),
        ] {
            if let Some(value) = value {
                builder.push(format!(" AND {column} LIKE "));
                builder.push_bind(like_pattern(value));
                builder.push(" ESCAPE '\\'");
            }
        }

        let rate_column = self.rate_type.column();
        if let Some(min) = self.min_rate {
            builder.push(format!(" AND {rate_column} IS NOT NULL AND {rate_column} >= "));
            builder.push_bind(min);
        }
        if let Some(max) = self.max_rate {
            builder.push(format!(" AND {rate_column} IS NOT NULL AND {rate_column} <= "));
            builder.push_bind(max);
        }

        if let Some(min) = self.min_experience {
            builder.push(" AND tp.experience_years >= ");
            builder.push_bind(min);
        }
        if let Some(max) = self.max_experience {
            builder.push(" AND tp.experience_years <= ");
            builder.push_bind(max);
        }

        if let Some(min) = self.min_rating {
            builder.push(" AND tp.total_rating >= ");
            builder.push_bind(min);
        }

        if !self.specialization_ids.is_empty() {
            builder.push(
                " AND EXISTS (SELECT 1 FROM trainer_specializations ts \
                 WHERE ts.trainer_id = tp.id AND ts.specialization_id IN (",
            );
            let mut ids = builder.separated(", ");
            for id in &self.specialization_ids {
                ids.push_bind(*id);
            }
            ids.push_unseparated("))");
        }

        if let Some(flag) = self.is_available {
            builder.push(" AND tp.is_available = ");
            builder.push_bind(flag);
        }
        if let Some(flag) = self.is_featured {
            builder.push(" AND tp.is_featured = ");
            builder.push_bind(flag);
        }
    }

    /// SQL for the requested page
    #[must_use]
    pub fn page_sql(&self) -> QueryBuilder<'_, Sqlite> {
        let mut builder = QueryBuilder::new(
            "SELECT tp.*, u.first_name AS user_first_name, u.last_name AS user_last_name, \
             u.profile_image_url AS user_profile_image_url",
        );
        self.push_from_where(&mut builder);
        builder.push(format!(
            " ORDER BY {} {} NULLS LAST, tp.id ASC LIMIT ",
            self.sort_by.column(),
            self.sort_order.keyword()
        ));
        builder.push_bind(i64::from(self.page.limit));
        builder.push(" OFFSET ");
        builder.push_bind(self.page.offset());
        builder
    }

    /// SQL counting every match
    #[must_use]
    pub fn count_sql(&self) -> QueryBuilder<'_, Sqlite> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) AS total");
        self.push_from_where(&mut builder);
        builder
    }
}

/// Image as listed in search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchImage {
    /// Image id
    pub id: Uuid,
    /// Public URL
    pub image_url: String,
    /// Primary flag
    pub is_primary: bool,
}

/// Specialization as listed in search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSpecialization {
    /// Specialization id
    pub id: i64,
    /// Name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Icon
    pub icon_url: Option<String>,
}

/// One trainer in a search page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSearchItem {
    /// Profile columns
    #[serde(flatten)]
    pub profile: TrainerProfile,
    /// Average rating
    pub average_rating: f64,
    /// Owner
    pub user: UserSummary,
    /// Images, primary first
    pub images: Vec<SearchImage>,
    /// Linked specializations
    pub specializations: Vec<SearchSpecialization>,
}

/// A page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    /// Matching trainers
    pub trainers: Vec<TrainerSearchItem>,
    /// Page metadata
    pub pagination: Pagination,
}

impl TrainersManager {
    /// Run a trainer search
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails
    #[tracing::instrument(skip(self, query), fields(page = query.page.page, limit = query.page.limit))]
    pub async fn search(&self, query: &TrainerSearchQuery) -> AppResult<SearchPage> {
        let total: i64 = query
            .count_sql()
            .build()
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to count trainers: {e}")))?
            .get("total");

        let rows = query
            .page_sql()
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to search trainers: {e}")))?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in &rows {
            let profile = row_to_profile(row)?;
            let user = UserSummary {
                id: profile.user_id,
                first_name: row.get("user_first_name"),
                last_name: row.get("user_last_name"),
                profile_image_url: row.get("user_profile_image_url"),
            };
            profiles.push((profile, user));
        }

        let ids: Vec<i64> = profiles.iter().map(|(p, _)| p.id).collect();
        let mut images = self.search_images(&ids).await?;
        let mut specializations = self.search_specializations(&ids).await?;

        let trainers = profiles
            .into_iter()
            .map(|(profile, user)| TrainerSearchItem {
                average_rating: profile.average_rating(),
                images: images.remove(&profile.id).unwrap_or_default(),
                specializations: specializations.remove(&profile.id).unwrap_or_default(),
                profile,
                user,
            })
            .collect::<Vec<_>>();

        debug!(total, returned = trainers.len(), "Trainer search complete");
        Ok(SearchPage {
            trainers,
            pagination: Pagination::new(total, query.page),
        })
    }

    async fn search_images(&self, trainer_ids: &[i64]) -> AppResult<HashMap<i64, Vec<SearchImage>>> {
        let mut grouped: HashMap<i64, Vec<SearchImage>> = HashMap::new();
        if trainer_ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, trainer_id, image_url, is_primary FROM trainer_images WHERE trainer_id IN (",
        );
        let mut ids = builder.separated(", ");
        for id in trainer_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY is_primary DESC, display_order ASC, created_at ASC");

        let rows = builder
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to load trainer images: {e}")))?;

        for row in rows {
            let id: String = row.get("id");
            let id = Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Invalid image id: {e}")))?;
            grouped
                .entry(row.get("trainer_id"))
                .or_default()
                .push(SearchImage {
                    id,
                    image_url: row.get("image_url"),
                    is_primary: row.get("is_primary"),
                });
        }
        Ok(grouped)
    }

    async fn search_specializations(
        &self,
        trainer_ids: &[i64],
    ) -> AppResult<HashMap<i64, Vec<SearchSpecialization>>> {
        let mut grouped: HashMap<i64, Vec<SearchSpecialization>> = HashMap::new();
        if trainer_ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT ts.trainer_id, s.id, s.name, s.description, s.icon_url \
             FROM trainer_specializations ts JOIN specializations s ON s.id = ts.specialization_id \
             WHERE ts.trainer_id IN (",
        );
        let mut ids = builder.separated(", ");
        for id in trainer_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY s.name ASC");

        let rows = builder
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to load specializations: {e}")))?;

        for row in rows {
            grouped
                .entry(row.get("trainer_id"))
                .or_default()
                .push(SearchSpecialization {
                    id: row.get("id"),
                    name: row.get("name"),
                    description: row.get("description"),
                    icon_url: row.get("icon_url"),
                });
        }
        Ok(grouped)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Case folding applied to both stored search columns and query text
///
/// Unicode lowercase, so `Ș` and `ș` compare equal where SQLite's ASCII-only
/// `LOWER()` would not.
#[must_use]
pub fn search_fold(value: &str) -> String {
    value.to_lowercase()
}

fn lowered(value: Option<&str>) -> Option<String> {
    present(value).map(search_fold)
}

fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn parse_non_negative(errors: &mut Vec<FieldError>, field: &str, raw: Option<&str>) -> Option<f64> {
    let raw = present(raw)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            errors.push(FieldError::new(field, format!("{field} must be a non-negative number")));
            None
        }
    }
}

fn parse_years(errors: &mut Vec<FieldError>, field: &str, raw: Option<&str>) -> Option<i64> {
    let raw = present(raw)?;
    match raw.parse::<i64>() {
        Ok(v) if v >= 0 => Some(v),
        _ => {
            errors.push(FieldError::new(field, format!("{field} must be a non-negative integer")));
            None
        }
    }
}

fn parse_flag(errors: &mut Vec<FieldError>, field: &str, raw: Option<&str>) -> Option<bool> {
    let raw = present(raw)?;
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        errors.push(FieldError::new(field, format!("{field} must be true or false")));
        None
    }
}

fn parse_id_list(errors: &mut Vec<FieldError>, raw: Option<&str>) -> Vec<i64> {
    let Some(raw) = present(raw) else {
        return Vec::new();
    };
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match part.parse::<i64>() {
            Ok(id) if id > 0 => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            _ => {
                errors.push(FieldError::new(
                    "specializations",
                    "specializations must be a comma-separated list of ids",
                ));
                return Vec::new();
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TrainerSearchParams {
        TrainerSearchParams::default()
    }

    fn fields_of(err: &AppError) -> Vec<&str> {
        err.details.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn empty_params_use_defaults() {
        let query = TrainerSearchQuery::from_params(&params()).unwrap();
        assert_eq!(query.sort_by, SortBy::TotalRating);
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.rate_type, RateType::Hourly);
        assert_eq!(query.page, PageRequest::default());
        assert!(query.specialization_ids.is_empty());
    }

    #[test]
    fn text_filters_are_trimmed_and_lowercased() {
        let query = TrainerSearchQuery::from_params(&TrainerSearchParams {
            q: Some("  YoGa ".to_owned()),
            city: Some("Cluj".to_owned()),
            state: Some("   ".to_owned()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.text.as_deref(), Some("yoga"));
        assert_eq!(query.city.as_deref(), Some("cluj"));
        assert_eq!(query.state, None);
    }

    #[test]
    fn malformed_numbers_are_reported_together() {
        let err = TrainerSearchQuery::from_params(&TrainerSearchParams {
            min_rate: Some("cheap".to_owned()),
            max_experience: Some("-2".to_owned()),
            min_rating: Some("7".to_owned()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert_eq!(fields_of(&err), vec!["minRate", "maxExperience", "minRating"]);
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let err = TrainerSearchQuery::from_params(&TrainerSearchParams {
            min_rate: Some("80".to_owned()),
            max_rate: Some("20".to_owned()),
            min_experience: Some("10".to_owned()),
            max_experience: Some("2".to_owned()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(fields_of(&err), vec!["minRate", "minExperience"]);
    }

    #[test]
    fn enums_are_strict() {
        let err = TrainerSearchQuery::from_params(&TrainerSearchParams {
            rate_type: Some("daily".to_owned()),
            sort_by: Some("name".to_owned()),
            sort_order: Some("up".to_owned()),
            is_available: Some("yes".to_owned()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(
            fields_of(&err),
            vec!["rateType", "sortBy", "sortOrder", "isAvailable"]
        );
    }

    #[test]
    fn specialization_list_parses_and_dedups() {
        let query = TrainerSearchQuery::from_params(&TrainerSearchParams {
            specializations: Some("3, 1,3,,".to_owned()),
            sort_order: Some("ASC".to_owned()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.specialization_ids, vec![3, 1]);
        assert_eq!(query.sort_order, SortOrder::Asc);

        let err = TrainerSearchQuery::from_params(&TrainerSearchParams {
            specializations: Some("1,yoga".to_owned()),
            ..params()
        })
        .unwrap_err();
        assert_eq!(fields_of(&err), vec!["specializations"]);
    }

    #[test]
    fn sql_binds_filters_and_splices_only_known_columns() {
        let query = TrainerSearchQuery::from_params(&TrainerSearchParams {
            q: Some("50%_off".to_owned()),
            min_rate: Some("10".to_owned()),
            rate_type: Some("session".to_owned()),
            specializations: Some("1,2".to_owned()),
            sort_by: Some("experienceYears".to_owned()),
            sort_order: Some("asc".to_owned()),
            ..params()
        })
        .unwrap();
        let sql = query.page_sql().into_sql();
        assert!(sql.contains("tp.session_rate IS NOT NULL AND tp.session_rate >= ?"));
        assert!(sql.contains("ts.specialization_id IN (?, ?)"));
        assert!(sql.contains("ORDER BY tp.experience_years ASC NULLS LAST, tp.id ASC"));
        assert!(!sql.contains("50%"));
    }

    #[test]
    fn folding_handles_romanian_diacritics() {
        assert_eq!(search_fold("ȘIMLEU Silvaniei"), "șimleu silvaniei");
        assert_eq!(search_fold("Brașov"), search_fold("BRAȘOV"));
        let query = TrainerSearchQuery::from_params(&TrainerSearchParams {
            city: Some(" Țăndărei ".to_owned()),
            ..params()
        })
        .unwrap();
        assert_eq!(query.city.as_deref(), Some("țăndărei"));
        assert!(query
            .count_sql()
            .into_sql()
            .contains("tp.location_city_search LIKE ?"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
