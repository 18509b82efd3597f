use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AdminUser, TokenKind, verify_password},
    error::{ApiError, ErrorBody},
    models::{
        Column, ColumnFilter, ColumnPatch, ColumnResponse, ColumnStatus, LoginRequest, NewColumn,
        NewPortfolio, NewReview, PortfolioCategory, PortfolioPatch, PortfolioResponse,
        PortfolioVisibility, ReviewFilter, ReviewPatch, ReviewResponse, ReviewStatsResponse,
        TokenRefreshResponse, TokenResponse,
    },
    pagination::{Page, Paginated},
};

// --- Filter Structs ---

/// PortfolioFilter
///
/// Defines the accepted query parameters for the portfolio listing endpoint.
/// Used by Axum's Query extractor to safely bind HTTP query parameters.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PortfolioFilter {
    /// Optional visibility filter ("PUBLIC" or "PRIVATE").
    pub visibility: Option<PortfolioVisibility>,
}

// --- Request parsing helpers ---

/// parse_id
///
/// Path identifiers arrive as raw strings so a malformed id becomes a 400
/// validation failure, never a framework-level rejection or a futile lookup.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation("Invalid UUID format".to_string()))
}

/// UploadedFile
///
/// One file part lifted out of a multipart body, fully buffered. Only the
/// extension of `filename` survives into storage.
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
}

/// FormFields
///
/// The decoded multipart body: text parts keyed by field name, file parts
/// grouped by field name (reviews accept several files under one name).
struct FormFields {
    texts: HashMap<String, String>,
    files: HashMap<String, Vec<UploadedFile>>,
}

async fn collect_form(mut multipart: Multipart) -> Result<FormFields, ApiError> {
    let mut texts = HashMap::new();
    let mut files: HashMap<String, Vec<UploadedFile>> = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(filename) = field.file_name().map(str::to_string) {
            let content = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("Unreadable file part '{name}': {e}")))?
                .to_vec();
            files
                .entry(name)
                .or_default()
                .push(UploadedFile { filename, content });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::Validation(format!("Unreadable field '{name}': {e}")))?;
            texts.insert(name, value);
        }
    }

    Ok(FormFields { texts, files })
}

impl FormFields {
    fn required(&self, name: &str) -> Result<String, ApiError> {
        self.texts
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::Validation(format!("Missing required field: {name}")))
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.texts.get(name).cloned()
    }

    fn optional_parsed<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, ApiError> {
        match self.texts.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ApiError::Validation(format!("Invalid value for field: {name}"))),
        }
    }

    fn optional_enum<T>(&self, name: &str) -> Result<Option<T>, ApiError>
    where
        T: TryFrom<String, Error = String>,
    {
        match self.texts.get(name) {
            None => Ok(None),
            Some(raw) => T::try_from(raw.clone())
                .map(Some)
                .map_err(ApiError::Validation),
        }
    }

    fn required_enum<T>(&self, name: &str) -> Result<T, ApiError>
    where
        T: TryFrom<String, Error = String>,
    {
        self.optional_enum(name)?
            .ok_or_else(|| ApiError::Validation(format!("Missing required field: {name}")))
    }

    fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.get_mut(name).and_then(|v| {
            if v.is_empty() {
                None
            } else {
                Some(v.remove(0))
            }
        })
    }

    fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        self.files.remove(name).unwrap_or_default()
    }
}

fn validate_rating(rating: i32) -> Result<i32, ApiError> {
    if (1..=5).contains(&rating) {
        Ok(rating)
    } else {
        Err(ApiError::Validation(
            "rating must be between 1 and 5".to_string(),
        ))
    }
}

/// Stores every uploaded review image and joins the returned references into
/// the comma-separated storage form.
async fn store_review_images(
    state: &AppState,
    images: Vec<UploadedFile>,
) -> Result<String, ApiError> {
    let mut refs = Vec::with_capacity(images.len());
    for image in images {
        refs.push(
            state
                .storage
                .store(&image.content, &image.filename, "reviews")
                .await?,
        );
    }
    Ok(refs.join(","))
}

// --- Health ---

/// health
///
/// [Public Route] Liveness probe; involves no database or storage access.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// --- Auth Handlers ---

/// login
///
/// [Public Route] Exchanges credentials for a token pair. The failure detail is
/// identical for an unknown email and a wrong password, so the endpoint does not
/// leak which accounts exist. Hash verification runs on the blocking pool since
/// bcrypt is CPU-bound.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 401, description = "Incorrect credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let rejection = || ApiError::Authentication("Incorrect email or password".to_string());

    let user = state
        .repo
        .get_user_by_email(&payload.email)
        .await?
        .ok_or_else(rejection)?;

    let stored_hash = user.password_hash.clone();
    let password = payload.password;
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .unwrap_or(false);
    if !verified {
        return Err(rejection());
    }

    let access = state
        .codec
        .issue(user.id, &user.email, user.role, TokenKind::Access)?;
    let refresh = state
        .codec
        .issue(user.id, &user.email, user.role, TokenKind::Refresh)?;

    Ok(Json(TokenResponse::new(access, refresh)))
}

/// refresh
///
/// [Public Route] Exchanges a valid REFRESH token for a fresh ACCESS token. The
/// kind check is strict: presenting an access token here is rejected exactly as
/// presenting a refresh token at the access gate is.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "New access token", body = TokenRefreshResponse),
        (status = 401, description = "Missing, invalid, or non-refresh token", body = ErrorBody)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenRefreshResponse>, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Authentication("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Authentication("Invalid authorization scheme".to_string()))?;

    let claims = state.codec.decode(token, true)?;
    if claims.kind != TokenKind::Refresh {
        return Err(ApiError::Authentication("Not a refresh token".to_string()));
    }

    let access = state
        .codec
        .issue(claims.sub, &claims.email, claims.role, TokenKind::Access)?;

    Ok(Json(TokenRefreshResponse {
        access_token: access,
    }))
}

// --- Portfolio Handlers ---

/// list_portfolios
///
/// [Public Route] Paginated portfolio listing, ordered by display_order then
/// recency.
#[utoipa::path(
    get,
    path = "/portfolios",
    params(Page, PortfolioFilter),
    responses(
        (status = 200, description = "Portfolio page", body = Paginated<PortfolioResponse>),
        (status = 400, description = "Out-of-range pagination", body = ErrorBody)
    )
)]
pub async fn list_portfolios(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<PortfolioFilter>,
) -> Result<Json<Paginated<PortfolioResponse>>, ApiError> {
    let page = page.validate()?;
    let total = state.repo.count_portfolios(filter.visibility).await?;
    let items = state
        .repo
        .list_portfolios(filter.visibility, page.offset(), page.limit())
        .await?
        .into_iter()
        .map(PortfolioResponse::from)
        .collect();
    Ok(Json(Paginated::new(items, total, page)))
}

/// get_portfolio
#[utoipa::path(
    get,
    path = "/portfolios/{id}",
    responses(
        (status = 200, description = "Portfolio", body = PortfolioResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let id = parse_id(&id)?;
    let portfolio = state
        .repo
        .get_portfolio(id)
        .await?
        .ok_or(ApiError::NotFound("Portfolio"))?;
    Ok(Json(portfolio.into()))
}

/// create_portfolio
///
/// [Admin Route] Creates a portfolio item from a multipart form: title,
/// description, category, optional display_order and visibility, plus the
/// required `image` file part. The image is written to the media store before
/// the row is inserted; a store failure aborts the whole operation.
#[utoipa::path(
    post,
    path = "/portfolios",
    responses(
        (status = 201, description = "Created", body = PortfolioResponse),
        (status = 400, description = "Missing or invalid form field", body = ErrorBody),
        (status = 401, description = "Unauthenticated", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn create_portfolio(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PortfolioResponse>), ApiError> {
    let mut form = collect_form(multipart).await?;

    let title = form.required("title")?;
    let description = form.required("description")?;
    let category: PortfolioCategory = form.required_enum("category")?;
    let display_order = form.optional_parsed::<i32>("display_order")?.unwrap_or(0);
    let visibility = form
        .optional_enum::<PortfolioVisibility>("visibility")?
        .unwrap_or(PortfolioVisibility::Public);
    let image = form
        .take_file("image")
        .ok_or_else(|| ApiError::Validation("Missing required file field: image".to_string()))?;

    let image_url = state
        .storage
        .store(&image.content, &image.filename, "portfolios")
        .await?;

    let portfolio = state
        .repo
        .create_portfolio(NewPortfolio {
            title,
            description,
            category,
            image_url,
            display_order,
            visibility,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(portfolio.into())))
}

/// update_portfolio
///
/// [Admin Route] Partial update: absent form fields are left untouched. A new
/// `image` part replaces the stored reference; the superseded file stays on disk.
#[utoipa::path(
    put,
    path = "/portfolios/{id}",
    responses(
        (status = 200, description = "Updated", body = PortfolioResponse),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_portfolio(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let id = parse_id(&id)?;
    let mut form = collect_form(multipart).await?;

    let image_url = match form.take_file("image") {
        Some(image) => Some(
            state
                .storage
                .store(&image.content, &image.filename, "portfolios")
                .await?,
        ),
        None => None,
    };

    let patch = PortfolioPatch {
        title: form.optional("title"),
        description: form.optional("description"),
        category: form.optional_enum("category")?,
        image_url,
        display_order: form.optional_parsed("display_order")?,
        visibility: form.optional_enum("visibility")?,
    };

    let portfolio = state
        .repo
        .update_portfolio(id, patch)
        .await?
        .ok_or(ApiError::NotFound("Portfolio"))?;
    Ok(Json(portfolio.into()))
}

/// delete_portfolio
///
/// [Admin Route] Physical removal of the row. The attached media file is not
/// reclaimed.
#[utoipa::path(
    delete,
    path = "/portfolios/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_portfolio(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.repo.delete_portfolio(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Portfolio"))
    }
}

// --- Review Handlers ---

/// list_reviews
///
/// [Public Route] Paginated review listing with an optional visibility filter
/// and allow-listed sorting.
#[utoipa::path(
    get,
    path = "/reviews",
    params(Page, ReviewFilter),
    responses((status = 200, description = "Review page", body = Paginated<ReviewResponse>))
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Paginated<ReviewResponse>>, ApiError> {
    let page = page.validate()?;
    let total = state.repo.count_reviews(filter.is_visible).await?;
    let items = state
        .repo
        .list_reviews(filter, page.offset(), page.limit())
        .await?
        .into_iter()
        .map(ReviewResponse::from)
        .collect();
    Ok(Json(Paginated::new(items, total, page)))
}

/// review_stats
///
/// [Public Route] Aggregate counters across all reviews. The distribution always
/// carries the full 1..=5 key range so the client never special-cases absent
/// ratings.
#[utoipa::path(
    get,
    path = "/reviews/stats",
    responses((status = 200, description = "Aggregates", body = ReviewStatsResponse))
)]
pub async fn review_stats(
    State(state): State<AppState>,
) -> Result<Json<ReviewStatsResponse>, ApiError> {
    let counts = state.repo.review_rating_counts().await?;

    let mut distribution: BTreeMap<i32, i64> = (1..=5).map(|r| (r, 0)).collect();
    let mut total = 0i64;
    let mut weighted = 0i64;
    for (rating, count) in counts {
        distribution.insert(rating, count);
        total += count;
        weighted += i64::from(rating) * count;
    }
    let average = if total == 0 {
        0.0
    } else {
        weighted as f64 / total as f64
    };

    Ok(Json(ReviewStatsResponse {
        total_reviews: total,
        average_rating: average,
        rating_distribution: distribution,
    }))
}

/// get_review
#[utoipa::path(
    get,
    path = "/reviews/{id}",
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let id = parse_id(&id)?;
    let review = state
        .repo
        .get_review(id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;
    Ok(Json(review.into()))
}

/// create_review
///
/// [Admin Route] Creates a review from a multipart form; the `images` field may
/// repeat (0..N attachments). All files are stored before the row is inserted.
#[utoipa::path(
    post,
    path = "/reviews",
    responses(
        (status = 201, description = "Created", body = ReviewResponse),
        (status = 400, description = "Missing or invalid form field", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn create_review(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let mut form = collect_form(multipart).await?;

    let name = form.required("name")?;
    let rating = validate_rating(
        form.optional_parsed::<i32>("rating")?
            .ok_or_else(|| ApiError::Validation("Missing required field: rating".to_string()))?,
    )?;
    let content = form.required("content")?;
    let order_type = form.required("order_type")?;
    let order_amount = form.required("order_amount")?;
    let working_days = form
        .optional_parsed::<i32>("working_days")?
        .ok_or_else(|| ApiError::Validation("Missing required field: working_days".to_string()))?;
    let is_visible = form.optional_parsed::<bool>("is_visible")?.unwrap_or(true);

    let image_urls = store_review_images(&state, form.take_files("images")).await?;

    let review = state
        .repo
        .create_review(NewReview {
            name,
            rating,
            content,
            order_type,
            order_amount,
            working_days,
            image_urls,
            is_visible,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// update_review
///
/// [Admin Route] Partial update. Supplying any `images` files replaces the whole
/// attachment set; omitting them keeps the stored set.
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    responses(
        (status = 200, description = "Updated", body = ReviewResponse),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_review(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ReviewResponse>, ApiError> {
    let id = parse_id(&id)?;
    let mut form = collect_form(multipart).await?;

    let rating = match form.optional_parsed::<i32>("rating")? {
        Some(r) => Some(validate_rating(r)?),
        None => None,
    };
    let images = form.take_files("images");
    let image_urls = if images.is_empty() {
        None
    } else {
        Some(store_review_images(&state, images).await?)
    };

    let patch = ReviewPatch {
        name: form.optional("name"),
        rating,
        content: form.optional("content"),
        order_type: form.optional("order_type"),
        order_amount: form.optional("order_amount"),
        working_days: form.optional_parsed("working_days")?,
        image_urls,
        is_visible: form.optional_parsed("is_visible")?,
    };

    let review = state
        .repo
        .update_review(id, patch)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;
    Ok(Json(review.into()))
}

/// delete_review
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_review(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.repo.delete_review(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Review"))
    }
}

// --- Column Handlers ---

/// list_columns
///
/// [Public Route] Paginated column listing, newest first, optionally filtered by
/// workflow status.
#[utoipa::path(
    get,
    path = "/columns",
    params(Page, ColumnFilter),
    responses((status = 200, description = "Column page", body = Paginated<ColumnResponse>))
)]
pub async fn list_columns(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<ColumnFilter>,
) -> Result<Json<Paginated<ColumnResponse>>, ApiError> {
    let page = page.validate()?;
    let total = state.repo.count_columns(filter.status).await?;
    let items = state
        .repo
        .list_columns(filter.status, page.offset(), page.limit())
        .await?
        .into_iter()
        .map(ColumnResponse::from)
        .collect();
    Ok(Json(Paginated::new(items, total, page)))
}

/// get_column
///
/// [Public Route] Column detail with prev/next navigation: the nearest PUBLISHED
/// siblings by creation time, each independently nullable.
#[utoipa::path(
    get,
    path = "/columns/{id}",
    responses(
        (status = 200, description = "Column with siblings", body = ColumnResponse),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_column(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ColumnResponse>, ApiError> {
    let id = parse_id(&id)?;
    let column: Column = state
        .repo
        .get_column(id)
        .await?
        .ok_or(ApiError::NotFound("Column"))?;

    let prev = state.repo.prev_published_column(column.created_at).await?;
    let next = state.repo.next_published_column(column.created_at).await?;

    Ok(Json(ColumnResponse::from_column(
        column,
        prev.map(Into::into),
        next.map(Into::into),
    )))
}

/// create_column
///
/// [Admin Route] Creates a column from a multipart form: title, content,
/// optional status (defaults to DRAFT), optional category, and the required
/// `thumbnail` file part. The stored column keeps the thumbnail nullable only
/// because updates never clear it.
#[utoipa::path(
    post,
    path = "/columns",
    responses(
        (status = 201, description = "Created", body = ColumnResponse),
        (status = 400, description = "Missing or invalid form field", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody)
    )
)]
pub async fn create_column(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ColumnResponse>), ApiError> {
    let mut form = collect_form(multipart).await?;

    let title = form.required("title")?;
    let content = form.required("content")?;
    let status = form
        .optional_enum::<ColumnStatus>("status")?
        .unwrap_or(ColumnStatus::Draft);
    let category = form.optional("category");
    let thumbnail = form.take_file("thumbnail").ok_or_else(|| {
        ApiError::Validation("Missing required file field: thumbnail".to_string())
    })?;

    let thumbnail_url = state
        .storage
        .store(&thumbnail.content, &thumbnail.filename, "columns")
        .await?;

    let column = state
        .repo
        .create_column(NewColumn {
            title,
            content,
            status,
            thumbnail_url: Some(thumbnail_url),
            category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(column.into())))
}

/// update_column
#[utoipa::path(
    put,
    path = "/columns/{id}",
    responses(
        (status = 200, description = "Updated", body = ColumnResponse),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_column(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ColumnResponse>, ApiError> {
    let id = parse_id(&id)?;
    let mut form = collect_form(multipart).await?;

    let thumbnail_url = match form.take_file("thumbnail") {
        Some(file) => Some(
            state
                .storage
                .store(&file.content, &file.filename, "columns")
                .await?,
        ),
        None => None,
    };

    let patch = ColumnPatch {
        title: form.optional("title"),
        content: form.optional("content"),
        status: form.optional_enum("status")?,
        thumbnail_url,
        category: form.optional("category"),
    };

    let column = state
        .repo
        .update_column(id, patch)
        .await?
        .ok_or(ApiError::NotFound("Column"))?;
    Ok(Json(column.into()))
}

/// delete_column
#[utoipa::path(
    delete,
    path = "/columns/{id}",
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_column(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.repo.delete_column(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Column"))
    }
}

/// record_column_view
///
/// [Public Route] Increments the column's view counter by exactly one. Unauthenticated
/// by design; concurrent increments race benignly at the row level.
#[utoipa::path(
    post,
    path = "/columns/{id}/view",
    responses(
        (status = 204, description = "Counted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn record_column_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if state.repo.increment_column_views(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Column"))
    }
}
