use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::UserRole;
use crate::models::{
    Column, ColumnPatch, ColumnStatus, NewColumn, NewPortfolio, NewReview, Portfolio,
    PortfolioPatch, PortfolioVisibility, Review, ReviewFilter, ReviewPatch, User,
};

const PORTFOLIO_COLUMNS: &str =
    "id, title, description, category, image_url, display_order, visibility, created_at, updated_at";
const REVIEW_COLUMNS: &str =
    "id, name, rating, content, order_type, order_amount, working_days, image_urls, is_visible, created_at, updated_at";
const COLUMN_COLUMNS: &str =
    "id, title, content, status, thumbnail_url, category, view_count, created_at, updated_at";

/// Repository
///
/// Defines the abstract contract for all persistence operations. This trait allows
/// us to swap the concrete implementation, PostgresRepository in production and an
/// in-memory double in tests, without affecting the calling handlers.
///
/// Conventions shared by every content type:
/// - lookups return `Ok(None)` for an absent row, never an error;
/// - updates apply the partial-update convention (None = leave untouched) and
///   return the post-update row, or `None` when the id matched nothing;
/// - deletes report whether a row was actually removed.
#[async_trait]
pub trait Repository: Send + Sync {
    // Users
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, sqlx::Error>;

    // Portfolios
    async fn count_portfolios(
        &self,
        visibility: Option<PortfolioVisibility>,
    ) -> Result<i64, sqlx::Error>;
    async fn list_portfolios(
        &self,
        visibility: Option<PortfolioVisibility>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Portfolio>, sqlx::Error>;
    async fn get_portfolio(&self, id: Uuid) -> Result<Option<Portfolio>, sqlx::Error>;
    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio, sqlx::Error>;
    async fn update_portfolio(
        &self,
        id: Uuid,
        patch: PortfolioPatch,
    ) -> Result<Option<Portfolio>, sqlx::Error>;
    async fn delete_portfolio(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // Reviews
    async fn count_reviews(&self, is_visible: Option<bool>) -> Result<i64, sqlx::Error>;
    async fn list_reviews(
        &self,
        filter: ReviewFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Review>, sqlx::Error>;
    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, sqlx::Error>;
    async fn create_review(&self, new: NewReview) -> Result<Review, sqlx::Error>;
    async fn update_review(
        &self,
        id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Option<Review>, sqlx::Error>;
    async fn delete_review(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    /// Per-rating row counts across all reviews, `(rating, count)` pairs.
    async fn review_rating_counts(&self) -> Result<Vec<(i32, i64)>, sqlx::Error>;

    // Columns
    async fn count_columns(&self, status: Option<ColumnStatus>) -> Result<i64, sqlx::Error>;
    async fn list_columns(
        &self,
        status: Option<ColumnStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Column>, sqlx::Error>;
    async fn get_column(&self, id: Uuid) -> Result<Option<Column>, sqlx::Error>;
    async fn create_column(&self, new: NewColumn) -> Result<Column, sqlx::Error>;
    async fn update_column(
        &self,
        id: Uuid,
        patch: ColumnPatch,
    ) -> Result<Option<Column>, sqlx::Error>;
    async fn delete_column(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    /// The nearest PUBLISHED column strictly older than `created_at`.
    async fn prev_published_column(
        &self,
        created_at: DateTime<Utc>,
    ) -> Result<Option<Column>, sqlx::Error>;
    /// The nearest PUBLISHED column strictly newer than `created_at`.
    async fn next_published_column(
        &self,
        created_at: DateTime<Utc>,
    ) -> Result<Option<Column>, sqlx::Error>;
    /// Bumps the view counter. Returns false when the id matched nothing.
    async fn increment_column_views(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the repository across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The production implementation backed by a PostgreSQL connection pool. Enum
/// columns are stored as their TEXT wire form and validated on the way out through
/// the row mapping.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, password_hash, name, role",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn count_portfolios(
        &self,
        visibility: Option<PortfolioVisibility>,
    ) -> Result<i64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM portfolios");
        if let Some(v) = visibility {
            builder.push(" WHERE visibility = ").push_bind(v.as_str());
        }
        let (count,) = builder
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_portfolios(
        &self,
        visibility: Option<PortfolioVisibility>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Portfolio>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {PORTFOLIO_COLUMNS} FROM portfolios"));
        if let Some(v) = visibility {
            builder.push(" WHERE visibility = ").push_bind(v.as_str());
        }
        builder
            .push(" ORDER BY display_order ASC, created_at DESC")
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<Portfolio>()
            .fetch_all(&self.pool)
            .await
    }

    async fn get_portfolio(&self, id: Uuid) -> Result<Option<Portfolio>, sqlx::Error> {
        sqlx::query_as::<_, Portfolio>(&format!(
            "SELECT {PORTFOLIO_COLUMNS} FROM portfolios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_portfolio(&self, new: NewPortfolio) -> Result<Portfolio, sqlx::Error> {
        sqlx::query_as::<_, Portfolio>(&format!(
            "INSERT INTO portfolios (id, title, description, category, image_url, display_order, visibility, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
             RETURNING {PORTFOLIO_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.title)
        .bind(new.description)
        .bind(new.category.as_str())
        .bind(new.image_url)
        .bind(new.display_order)
        .bind(new.visibility.as_str())
        .fetch_one(&self.pool)
        .await
    }

    async fn update_portfolio(
        &self,
        id: Uuid,
        patch: PortfolioPatch,
    ) -> Result<Option<Portfolio>, sqlx::Error> {
        sqlx::query_as::<_, Portfolio>(&format!(
            "UPDATE portfolios SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                image_url = COALESCE($5, image_url),
                display_order = COALESCE($6, display_order),
                visibility = COALESCE($7, visibility),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PORTFOLIO_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.image_url)
        .bind(patch.display_order)
        .bind(patch.visibility.map(|v| v.as_str()))
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_portfolio(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_reviews(&self, is_visible: Option<bool>) -> Result<i64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM reviews");
        if let Some(v) = is_visible {
            builder.push(" WHERE is_visible = ").push_bind(v);
        }
        let (count,) = builder
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_reviews(
        &self,
        filter: ReviewFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {REVIEW_COLUMNS} FROM reviews"));
        if let Some(v) = filter.is_visible {
            builder.push(" WHERE is_visible = ").push_bind(v);
        }
        // Sort key and direction come from closed enums, never from raw input.
        builder
            .push(" ORDER BY ")
            .push(filter.sort_by.column())
            .push(" ")
            .push(filter.sort_order.sql())
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<Review>()
            .fetch_all(&self.pool)
            .await
    }

    async fn get_review(&self, id: Uuid) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_review(&self, new: NewReview) -> Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO reviews (id, name, rating, content, order_type, order_amount, working_days, image_urls, is_visible, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.rating)
        .bind(new.content)
        .bind(new.order_type)
        .bind(new.order_amount)
        .bind(new.working_days)
        .bind(new.image_urls)
        .bind(new.is_visible)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_review(
        &self,
        id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            "UPDATE reviews SET
                name = COALESCE($2, name),
                rating = COALESCE($3, rating),
                content = COALESCE($4, content),
                order_type = COALESCE($5, order_type),
                order_amount = COALESCE($6, order_amount),
                working_days = COALESCE($7, working_days),
                image_urls = COALESCE($8, image_urls),
                is_visible = COALESCE($9, is_visible),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.rating)
        .bind(patch.content)
        .bind(patch.order_type)
        .bind(patch.order_amount)
        .bind(patch.working_days)
        .bind(patch.image_urls)
        .bind(patch.is_visible)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_review(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn review_rating_counts(&self) -> Result<Vec<(i32, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (i32, i64)>(
            "SELECT rating, COUNT(*) FROM reviews GROUP BY rating ORDER BY rating",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn count_columns(&self, status: Option<ColumnStatus>) -> Result<i64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM columns");
        if let Some(s) = status {
            builder.push(" WHERE status = ").push_bind(s.as_str());
        }
        let (count,) = builder
            .build_query_as::<(i64,)>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_columns(
        &self,
        status: Option<ColumnStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Column>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMN_COLUMNS} FROM columns"));
        if let Some(s) = status {
            builder.push(" WHERE status = ").push_bind(s.as_str());
        }
        builder
            .push(" ORDER BY created_at DESC")
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<Column>()
            .fetch_all(&self.pool)
            .await
    }

    async fn get_column(&self, id: Uuid) -> Result<Option<Column>, sqlx::Error> {
        sqlx::query_as::<_, Column>(&format!(
            "SELECT {COLUMN_COLUMNS} FROM columns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_column(&self, new: NewColumn) -> Result<Column, sqlx::Error> {
        sqlx::query_as::<_, Column>(&format!(
            "INSERT INTO columns (id, title, content, status, thumbnail_url, category, view_count, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, 0, NOW(), NOW())
             RETURNING {COLUMN_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.title)
        .bind(new.content)
        .bind(new.status.as_str())
        .bind(new.thumbnail_url)
        .bind(new.category)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_column(
        &self,
        id: Uuid,
        patch: ColumnPatch,
    ) -> Result<Option<Column>, sqlx::Error> {
        sqlx::query_as::<_, Column>(&format!(
            "UPDATE columns SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                status = COALESCE($4, status),
                thumbnail_url = COALESCE($5, thumbnail_url),
                category = COALESCE($6, category),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMN_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.thumbnail_url)
        .bind(patch.category)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_column(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn prev_published_column(
        &self,
        created_at: DateTime<Utc>,
    ) -> Result<Option<Column>, sqlx::Error> {
        sqlx::query_as::<_, Column>(&format!(
            "SELECT {COLUMN_COLUMNS} FROM columns
             WHERE status = 'PUBLISHED' AND created_at < $1
             ORDER BY created_at DESC
             LIMIT 1"
        ))
        .bind(created_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn next_published_column(
        &self,
        created_at: DateTime<Utc>,
    ) -> Result<Option<Column>, sqlx::Error> {
        sqlx::query_as::<_, Column>(&format!(
            "SELECT {COLUMN_COLUMNS} FROM columns
             WHERE status = 'PUBLISHED' AND created_at > $1
             ORDER BY created_at ASC
             LIMIT 1"
        ))
        .bind(created_at)
        .fetch_optional(&self.pool)
        .await
    }

    async fn increment_column_views(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE columns SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
