use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::UserRole;

// --- Closed enumerations (stored as TEXT, validated at the boundary) ---

/// PortfolioCategory
///
/// The category taxonomy for portfolio items. Stored as its UPPERCASE wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortfolioCategory {
    Logo,
    Branding,
    Packaging,
    Illustration,
    Other,
}

impl PortfolioCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioCategory::Logo => "LOGO",
            PortfolioCategory::Branding => "BRANDING",
            PortfolioCategory::Packaging => "PACKAGING",
            PortfolioCategory::Illustration => "ILLUSTRATION",
            PortfolioCategory::Other => "OTHER",
        }
    }
}

impl TryFrom<String> for PortfolioCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "LOGO" => Ok(PortfolioCategory::Logo),
            "BRANDING" => Ok(PortfolioCategory::Branding),
            "PACKAGING" => Ok(PortfolioCategory::Packaging),
            "ILLUSTRATION" => Ok(PortfolioCategory::Illustration),
            "OTHER" => Ok(PortfolioCategory::Other),
            other => Err(format!("unknown portfolio category: {other}")),
        }
    }
}

/// PortfolioVisibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PortfolioVisibility {
    Public,
    Private,
}

impl PortfolioVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioVisibility::Public => "PUBLIC",
            PortfolioVisibility::Private => "PRIVATE",
        }
    }
}

impl TryFrom<String> for PortfolioVisibility {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PUBLIC" => Ok(PortfolioVisibility::Public),
            "PRIVATE" => Ok(PortfolioVisibility::Private),
            other => Err(format!("unknown visibility: {other}")),
        }
    }
}

/// ColumnStatus
///
/// Editorial workflow state for columns. Prev/next navigation only considers
/// PUBLISHED columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnStatus {
    Draft,
    Published,
    Archived,
}

impl ColumnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnStatus::Draft => "DRAFT",
            ColumnStatus::Published => "PUBLISHED",
            ColumnStatus::Archived => "ARCHIVED",
        }
    }
}

impl TryFrom<String> for ColumnStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "DRAFT" => Ok(ColumnStatus::Draft),
            "PUBLISHED" => Ok(ColumnStatus::Published),
            "ARCHIVED" => Ok(ColumnStatus::Archived),
            other => Err(format!("unknown column status: {other}")),
        }
    }
}

/// ReviewSortBy
///
/// Allow-listed sort keys for the review list. Request input never reaches SQL
/// verbatim: each variant maps to a fixed column name through `column()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSortBy {
    #[default]
    CreatedAt,
    Rating,
    WorkingDays,
    OrderAmount,
}

impl ReviewSortBy {
    pub fn column(&self) -> &'static str {
        match self {
            ReviewSortBy::CreatedAt => "created_at",
            ReviewSortBy::Rating => "rating",
            ReviewSortBy::WorkingDays => "working_days",
            ReviewSortBy::OrderAmount => "order_amount",
        }
    }
}

/// SortOrder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// --- Core Application Schemas (mapped to database rows) ---

/// User
///
/// The persisted credential record: created once by seeding/provisioning, read on
/// login, never mutated by normal request flow.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
}

/// Portfolio
///
/// A portfolio item with exactly one attached image.
#[derive(Debug, Clone, FromRow)]
pub struct Portfolio {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: PortfolioCategory,
    pub image_url: String,
    pub display_order: i32,
    #[sqlx(try_from = "String")]
    pub visibility: PortfolioVisibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review
///
/// A customer review. Media references are stored comma-joined in `image_urls`
/// (0..N attachments) and split apart in the response mapping.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    pub rating: i32,
    pub content: String,
    pub order_type: String,
    pub order_amount: String,
    pub working_days: i32,
    pub image_urls: String,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn images(&self) -> Vec<String> {
        if self.image_urls.is_empty() {
            Vec::new()
        } else {
            self.image_urls.split(',').map(str::to_string).collect()
        }
    }
}

/// Column
///
/// An editorial column with an optional thumbnail and a view counter.
#[derive(Debug, Clone, FromRow)]
pub struct Column {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub status: ColumnStatus,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Repository input records ---

/// NewPortfolio / PortfolioPatch
///
/// Inputs to the persistence layer. Patch fields follow the partial-update
/// convention: `None` means "leave untouched" (COALESCE at the SQL level), which
/// is distinct from clearing a field.
#[derive(Debug, Clone)]
pub struct NewPortfolio {
    pub title: String,
    pub description: String,
    pub category: PortfolioCategory,
    pub image_url: String,
    pub display_order: i32,
    pub visibility: PortfolioVisibility,
}

#[derive(Debug, Clone, Default)]
pub struct PortfolioPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<PortfolioCategory>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub visibility: Option<PortfolioVisibility>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub name: String,
    pub rating: i32,
    pub content: String,
    pub order_type: String,
    pub order_amount: String,
    pub working_days: i32,
    pub image_urls: String,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    pub name: Option<String>,
    pub rating: Option<i32>,
    pub content: Option<String>,
    pub order_type: Option<String>,
    pub order_amount: Option<String>,
    pub working_days: Option<i32>,
    pub image_urls: Option<String>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewColumn {
    pub title: String,
    pub content: String,
    pub status: ColumnStatus,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<ColumnStatus>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
}

// --- Query parameter records ---

/// ReviewFilter
///
/// Review-specific list filters, bound alongside the shared Page parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct ReviewFilter {
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub sort_by: ReviewSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// ColumnFilter
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct ColumnFilter {
    pub status: Option<ColumnStatus>,
}

// --- Request payloads ---

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// --- Response schemas ---

/// TokenResponse
///
/// Output of a successful login: both tokens issued together, with independent
/// expiry windows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// TokenRefreshResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenRefreshResponse {
    pub access_token: String,
}

/// PortfolioResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortfolioResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: PortfolioCategory,
    pub image_url: String,
    pub display_order: i32,
    pub visibility: PortfolioVisibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Portfolio> for PortfolioResponse {
    fn from(p: Portfolio) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            category: p.category,
            image_url: p.image_url,
            display_order: p.display_order,
            visibility: p.visibility,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// ReviewResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub name: String,
    pub rating: i32,
    pub content: String,
    pub order_type: String,
    pub order_amount: String,
    pub working_days: i32,
    pub is_visible: bool,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        let images = r.images();
        Self {
            id: r.id,
            name: r.name,
            rating: r.rating,
            content: r.content,
            order_type: r.order_type,
            order_amount: r.order_amount,
            working_days: r.working_days,
            is_visible: r.is_visible,
            images,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// ReviewStatsResponse
///
/// Aggregate counters for the review dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewStatsResponse {
    pub total_reviews: i64,
    pub average_rating: f64,
    /// rating -> count, keys "1".."5".
    #[schema(value_type = Object)]
    pub rating_distribution: BTreeMap<i32, i64>,
}

/// ColumnNavigation
///
/// A lightweight sibling reference for prev/next navigation on the column detail
/// page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColumnNavigation {
    pub id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
}

impl From<Column> for ColumnNavigation {
    fn from(c: Column) -> Self {
        Self {
            id: c.id,
            title: c.title,
            thumbnail_url: c.thumbnail_url,
        }
    }
}

/// ColumnResponse
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ColumnResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub status: ColumnStatus,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_column: Option<ColumnNavigation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_column: Option<ColumnNavigation>,
}

impl ColumnResponse {
    pub fn from_column(
        c: Column,
        prev_column: Option<ColumnNavigation>,
        next_column: Option<ColumnNavigation>,
    ) -> Self {
        Self {
            id: c.id,
            title: c.title,
            content: c.content,
            status: c.status,
            thumbnail_url: c.thumbnail_url,
            category: c.category,
            view_count: c.view_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
            prev_column,
            next_column,
        }
    }
}

impl From<Column> for ColumnResponse {
    fn from(c: Column) -> Self {
        Self::from_column(c, None, None)
    }
}
