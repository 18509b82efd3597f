#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use uuid::Uuid;

use studio_cms::{
    AppState, JwtCodec, MockMediaStore, Repository, RepositoryState, StorageState,
    auth::{TokenKind, UserRole, hash_password},
    config::AppConfig,
    create_router,
    models::{
        Column, ColumnPatch, ColumnStatus, NewColumn, NewPortfolio, NewReview, Portfolio,
        PortfolioPatch, PortfolioVisibility, Review, ReviewFilter, ReviewPatch, ReviewSortBy,
        SortOrder, User,
    },
};

/// MemoryRepository
///
/// An in-memory Repository double that honors the same contracts as the
/// Postgres implementation: Ok(None) for absent rows, COALESCE-style partial
/// updates, rows-affected booleans for deletes. Lets handler behavior be
/// exercised through the real router without a live database.
#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    portfolios: Vec<Portfolio>,
    reviews: Vec<Review>,
    columns: Vec<Column>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user directly, bypassing the HTTP surface.
    pub fn seed_user(&self, email: &str, password: &str, role: UserRole) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: hash_password(password, 4).unwrap(),
            name: "Seeded".to_string(),
            role,
        };
        self.inner.lock().unwrap().users.push(user.clone());
        user
    }

    /// Inserts a portfolio row directly with a controlled created_at.
    pub fn seed_portfolio(&self, display_order: i32, created_at: DateTime<Utc>) -> Portfolio {
        let portfolio = Portfolio {
            id: Uuid::new_v4(),
            title: format!("item {display_order}"),
            description: "seeded".to_string(),
            category: studio_cms::models::PortfolioCategory::Logo,
            image_url: "/uploads/portfolios/seed.png".to_string(),
            display_order,
            visibility: PortfolioVisibility::Public,
            created_at,
            updated_at: created_at,
        };
        self.inner.lock().unwrap().portfolios.push(portfolio.clone());
        portfolio
    }

    /// Inserts a column row directly with a controlled status and created_at.
    pub fn seed_column(&self, status: ColumnStatus, created_at: DateTime<Utc>) -> Column {
        let column = Column {
            id: Uuid::new_v4(),
            title: format!("column {created_at}"),
            content: "seeded".to_string(),
            status,
            thumbnail_url: None,
            category: None,
            view_count: 0,
            created_at,
            updated_at: created_at,
        };
        self.inner.lock().unwrap().columns.push(column.clone());
        column
    }
}

fn window<T: Clone>(rows: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            role,
        };
        self.inner.lock().unwrap().users.push(user.clone());
        Ok(user)
    }

    async fn count_portfolios(
        &self,
        visibility: Option<PortfolioVisibility>,
    ) -> Result<i64, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .portfolios
            .iter()
            .filter(|p| visibility.is_none_or(|v| p.visibility == v))
            .count() as i64)
    }

    async fn list_portfolios(
        &self,
        visibility: Option<PortfolioVisibility>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Portfolio>, sqlx::Error> {
        let mut rows: Vec<Portfolio> = self
            .inner
            .lock()
            .unwrap()
            .portfolios
            .iter()
            .filter(|p| visibility.is_none_or(|v| p.visibility == v))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(window(rows, offset, limit))
    }

    async fn get_portfolio(&self, id: Uuid) -> Result<Option<Portfolio>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .portfolios
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio, sqlx::Error> {
        let now = Utc::now();
        let portfolio = Portfolio {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            category: new.category,
            image_url: new.image_url,
            display_order: new.display_order,
            visibility: new.visibility,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().portfolios.push(portfolio.clone());
        Ok(portfolio)
    }

    async fn update_portfolio(
        &self,
        id: Uuid,
        patch: PortfolioPatch,
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let Some(p) = inner.portfolios.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.title {
            p.title = v;
        }
        if let Some(v) = patch.description {
            p.description = v;
        }
        if let Some(v) = patch.category {
            p.category = v;
        }
        if let Some(v) = patch.image_url {
            p.image_url = v;
        }
        if let Some(v) = patch.display_order {
            p.display_order = v;
        }
        if let Some(v) = patch.visibility {
            p.visibility = v;
        }
        p.updated_at = Utc::now();
        Ok(Some(p.clone()))
    }

    async fn delete_portfolio(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.portfolios.len();
        inner.portfolios.retain(|p| p.id != id);
        Ok(inner.portfolios.len() < before)
    }

    async fn count_reviews(&self, is_visible: Option<bool>) -> Result<i64, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .reviews
            .iter()
            .filter(|r| is_visible.is_none_or(|v| r.is_visible == v))
            .count() as i64)
    }

    async fn list_reviews(
        &self,
        filter: ReviewFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let mut rows: Vec<Review> = self
            .inner
            .lock()
            .unwrap()
            .reviews
            .iter()
            .filter(|r| filter.is_visible.is_none_or(|v| r.is_visible == v))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            let ord = match filter.sort_by {
                ReviewSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                ReviewSortBy::Rating => a.rating.cmp(&b.rating),
                ReviewSortBy::WorkingDays => a.working_days.cmp(&b.working_days),
                ReviewSortBy::OrderAmount => a.order_amount.cmp(&b.order_amount),
            };
            match filter.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        Ok(window(rows, offset, limit))
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .reviews
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn create_review(&self, new: NewReview) -> Result<Review, sqlx::Error> {
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            name: new.name,
            rating: new.rating,
            content: new.content,
            order_type: new.order_type,
            order_amount: new.order_amount,
            working_days: new.working_days,
            image_urls: new.image_urls,
            is_visible: new.is_visible,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().reviews.push(review.clone());
        Ok(review)
    }

    async fn update_review(
        &self,
        id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Option<Review>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let Some(r) = inner.reviews.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.name {
            r.name = v;
        }
        if let Some(v) = patch.rating {
            r.rating = v;
        }
        if let Some(v) = patch.content {
            r.content = v;
        }
        if let Some(v) = patch.order_type {
            r.order_type = v;
        }
        if let Some(v) = patch.order_amount {
            r.order_amount = v;
        }
        if let Some(v) = patch.working_days {
            r.working_days = v;
        }
        if let Some(v) = patch.image_urls {
            r.image_urls = v;
        }
        if let Some(v) = patch.is_visible {
            r.is_visible = v;
        }
        r.updated_at = Utc::now();
        Ok(Some(r.clone()))
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.reviews.len();
        inner.reviews.retain(|r| r.id != id);
        Ok(inner.reviews.len() < before)
    }

    async fn review_rating_counts(&self) -> Result<Vec<(i32, i64)>, sqlx::Error> {
        let inner = self.inner.lock().unwrap();
        let mut counts: Vec<(i32, i64)> = Vec::new();
        for rating in 1..=5 {
            let count = inner.reviews.iter().filter(|r| r.rating == rating).count() as i64;
            if count > 0 {
                counts.push((rating, count));
            }
        }
        Ok(counts)
    }

    async fn count_columns(&self, status: Option<ColumnStatus>) -> Result<i64, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .columns
            .iter()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .count() as i64)
    }

    async fn list_columns(
        &self,
        status: Option<ColumnStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Column>, sqlx::Error> {
        let mut rows: Vec<Column> = self
            .inner
            .lock()
            .unwrap()
            .columns
            .iter()
            .filter(|c| status.is_none_or(|s| c.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(window(rows, offset, limit))
    }

    async fn get_column(&self, id: Uuid) -> Result<Option<Column>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .columns
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create_column(&self, new: NewColumn) -> Result<Column, sqlx::Error> {
        let now = Utc::now();
        let column = Column {
            id: Uuid::new_v4(),
            title: new.title,
            content: new.content,
            status: new.status,
            thumbnail_url: new.thumbnail_url,
            category: new.category,
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().columns.push(column.clone());
        Ok(column)
    }

    async fn update_column(
        &self,
        id: Uuid,
        patch: ColumnPatch,
    ) -> Result<Option<Column>, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let Some(c) = inner.columns.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.title {
            c.title = v;
        }
        if let Some(v) = patch.content {
            c.content = v;
        }
        if let Some(v) = patch.status {
            c.status = v;
        }
        if let Some(v) = patch.thumbnail_url {
            c.thumbnail_url = Some(v);
        }
        if let Some(v) = patch.category {
            c.category = Some(v);
        }
        c.updated_at = Utc::now();
        Ok(Some(c.clone()))
    }

    async fn delete_column(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.columns.len();
        inner.columns.retain(|c| c.id != id);
        Ok(inner.columns.len() < before)
    }

    async fn prev_published_column(
        &self,
        created_at: DateTime<Utc>,
    ) -> Result<Option<Column>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .columns
            .iter()
            .filter(|c| c.status == ColumnStatus::Published && c.created_at < created_at)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn next_published_column(
        &self,
        created_at: DateTime<Utc>,
    ) -> Result<Option<Column>, sqlx::Error> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .columns
            .iter()
            .filter(|c| c.status == ColumnStatus::Published && c.created_at > created_at)
            .min_by_key(|c| c.created_at)
            .cloned())
    }

    async fn increment_column_views(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut inner = self.inner.lock().unwrap();
        match inner.columns.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.view_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// TestApp
///
/// A fully wired router over the in-memory repository and mock media store,
/// dispatched in-process with `oneshot`.
pub struct TestApp {
    pub repo: Arc<MemoryRepository>,
    pub codec: JwtCodec,
    router: Router,
}

pub fn spawn_app() -> TestApp {
    let config = AppConfig::default();
    let repo = Arc::new(MemoryRepository::new());
    let codec = JwtCodec::new(&config);
    let state = AppState {
        repo: repo.clone() as RepositoryState,
        storage: Arc::new(MockMediaStore::new()) as StorageState,
        codec: codec.clone(),
        config,
    };
    TestApp {
        repo,
        codec,
        router: create_router(state),
    }
}

impl TestApp {
    pub fn admin_token(&self) -> String {
        let admin = self.repo.seed_user("admin@studio.test", "pw", UserRole::Admin);
        self.codec
            .issue(admin.id, &admin.email, admin.role, TokenKind::Access)
            .unwrap()
    }

    pub fn user_token(&self) -> String {
        let user = self.repo.seed_user("user@studio.test", "pw", UserRole::User);
        self.codec
            .issue(user.id, &user.email, user.role, TokenKind::Access)
            .unwrap()
    }

    pub async fn dispatch(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.dispatch(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.dispatch(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_bearer(&self, uri: &str, token: &str) -> Response<Body> {
        self.dispatch(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Sends a multipart form with the given bearer token.
    pub async fn send_form(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        texts: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> Response<Body> {
        let boundary = "test-boundary-7f3a";
        self.dispatch(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(boundary, texts, files)))
                .unwrap(),
        )
        .await
    }

    pub async fn delete_bearer(&self, uri: &str, token: &str) -> Response<Body> {
        self.dispatch(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

/// Builds a raw multipart/form-data body with the given text and file parts.
pub fn multipart_body(
    boundary: &str,
    texts: &[(&str, &str)],
    files: &[(&str, &str, &[u8])],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (name, filename, content) in files {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Reads a response body to completion and parses it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_status(response: &Response<Body>, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
