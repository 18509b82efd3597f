use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{config::AppConfig, error::ApiError};

/// UserRole
///
/// The closed role set for RBAC. A role is fixed into a token at issuance and is
/// never re-derived from the database per request, so a role change only takes
/// effect once the holder re-authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    User,
}

impl TryFrom<String> for UserRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "USER" => Ok(UserRole::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::User => "USER",
        }
    }
}

/// TokenKind
///
/// Discriminates the short-lived access credential from the long-lived refresh
/// credential. Every endpoint that accepts a bearer token checks the kind: the
/// refresh endpoint rejects ACCESS tokens and the access gate rejects REFRESH tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims
///
/// The signed claim set embedded in every issued token. Immutable once issued;
/// validity is purely a function of signature and expiry; there is no server-side
/// token record and no revocation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID.
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Token kind discriminator, serialized as `type` on the wire.
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Expiration instant (unix seconds). Tokens past this are rejected.
    pub exp: i64,
    /// Issued-at instant (unix seconds).
    pub iat: i64,
}

/// TokenError
///
/// Decode failures, kept distinguishable so the boundary can report whether the
/// credential was stale or simply malformed. Both translate to 401.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

impl TokenError {
    pub fn detail(&self) -> &'static str {
        match self {
            TokenError::Expired => "Token has expired",
            TokenError::Invalid => "Invalid token",
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        ApiError::Authentication(e.detail().to_string())
    }
}

/// JwtCodec
///
/// Issues and decodes signed, expiring tokens (HS256 over the server-held secret).
/// Cloned freely; the state is just the secret plus the per-kind expiry windows
/// resolved once from AppConfig.
#[derive(Clone)]
pub struct JwtCodec {
    secret: String,
    access_expire_minutes: i64,
    refresh_expire_days: i64,
}

impl JwtCodec {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_expire_minutes: config.access_token_expire_minutes,
            refresh_expire_days: config.refresh_token_expire_days,
        }
    }

    /// issue
    ///
    /// Signs a new token of the given kind, with `exp = now + window(kind)`.
    /// The window is minutes for ACCESS and days for REFRESH.
    pub fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
        kind: TokenKind,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let window = match kind {
            TokenKind::Access => Duration::minutes(self.access_expire_minutes),
            TokenKind::Refresh => Duration::days(self.refresh_expire_days),
        };

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            kind,
            exp: (now + window).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|_| TokenError::Invalid)
    }

    /// decode
    ///
    /// Verifies signature and (optionally) expiry. An expired token fails with
    /// `TokenError::Expired`; any other structural or signature fault fails with
    /// `TokenError::Invalid`.
    pub fn decode(&self, token: &str, verify_expiry: bool) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = verify_expiry;
        if !verify_expiry {
            validation.required_spec_claims.remove("exp");
        }

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(token_data.claims)
    }
}

/// hash_password
///
/// One-way adaptive hash of a plain secret. The cost factor is tunable through
/// AppConfig so tests stay fast.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, cost)
}

/// verify_password
///
/// Checks a submitted secret against a stored hash. A mismatch (or a malformed
/// stored hash) is a normal `false`, never an error.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    bcrypt::verify(plain, stored_hash).unwrap_or(false)
}

/// AuthUser
///
/// The resolved identity of an authenticated request: a pure derivation from the
/// presented ACCESS token. No database lookup happens here: the principal lives
/// only for the duration of one request and is reconstructed from claims each time.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtCodec: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let codec = JwtCodec::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Authentication("Invalid authorization scheme".to_string()))?;

        let claims = codec.decode(token, true)?;

        // A refresh token must never pass the access gate.
        if claims.kind != TokenKind::Access {
            return Err(ApiError::Authentication("Not an access token".to_string()));
        }

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// AdminUser
///
/// The single reusable authorization predicate: passes through only when the
/// authenticated principal carries the Admin role. Every mutating content handler
/// takes this extractor; read handlers take neither this nor AuthUser.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtCodec: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(ApiError::Authorization);
        }
        Ok(AdminUser(user))
    }
}
