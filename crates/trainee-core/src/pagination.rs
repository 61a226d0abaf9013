// ABOUTME: Page/limit request parsing and pagination metadata for list endpoints
// ABOUTME: Limits are clamped to 1..=100, pages start at 1
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::errors::FieldError;

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Parse raw `page` and `limit` query values
    ///
    /// Non-numeric values and a page below 1 are reported in `errors`; the
    /// limit is clamped rather than rejected.
    #[must_use]
    pub fn parse(page: Option<&str>, limit: Option<&str>, errors: &mut Vec<FieldError>) -> Self {
        let mut request = Self::default();

        if let Some(raw) = page.map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<u32>() {
                Ok(p) if p >= 1 => request.page = p,
                _ => errors.push(FieldError::new("page", "Page must be a positive integer")),
            }
        }
        if let Some(raw) = limit.map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<i64>() {
                Ok(l) => {
                    let clamped = l.clamp(1, i64::from(MAX_PAGE_SIZE));
                    request.limit = u32::try_from(clamped).unwrap_or(DEFAULT_PAGE_SIZE);
                }
                Err(_) => errors.push(FieldError::new("limit", "Limit must be an integer")),
            }
        }
        request
    }

    /// Rows to skip
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

/// Pagination metadata returned next to a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total matching rows
    pub total: i64,
    /// Current page
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Number of pages for `total` rows
    pub total_pages: i64,
    /// Whether a later page exists
    pub has_next_page: bool,
    /// Whether an earlier page exists
    pub has_previous_page: bool,
}

impl Pagination {
    /// Build metadata for `total` rows at `request`
    #[must_use]
    pub fn new(total: i64, request: PageRequest) -> Self {
        let limit = i64::from(request.limit.max(1));
        let total_pages = (total.max(0) + limit - 1) / limit;
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
            has_next_page: i64::from(request.page) < total_pages,
            has_previous_page: request.page > 1,
        }
    }
}
