use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

/// The inclusive ceiling for `per_page`. Requests above this are rejected rather
/// than clamped.
pub const MAX_PER_PAGE: i64 = 100;

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    12
}

/// Page
///
/// The page/page-size parameters accepted by every list endpoint, bound by Axum's
/// Query extractor. `validate` turns them into a usable window; out-of-range values
/// are a validation failure, never silently adjusted.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct Page {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Items per page, 1..=100.
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl Page {
    pub fn validate(self) -> Result<Self, ApiError> {
        if self.page < 1 {
            return Err(ApiError::Validation("page must be >= 1".to_string()));
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(ApiError::Validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        // The window arithmetic must stay inside i64 for the SQL OFFSET bind.
        if (self.page - 1).checked_mul(self.per_page).is_none() {
            return Err(ApiError::Validation("page is out of range".to_string()));
        }
        Ok(self)
    }

    /// Number of rows to skip. Past-the-end offsets simply produce an empty window.
    /// Saturates instead of wrapping so an unvalidated Page can never panic here.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Ceiling division via integer arithmetic: `(total + per_page - 1) / per_page`.
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.per_page - 1) / self.per_page
    }
}

/// Paginated
///
/// The response envelope shared by every list endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages(total),
        }
    }
}
