//! Handlers for the `/auth` resource (registration, verification, login,
//! refresh, logout, current user).

use std::sync::Arc;

use antrean_core::error::CoreError;
use antrean_core::registration::{
    validate_registration, RegistrationFields, VERIFICATION_TOKEN_EXPIRY_MINS,
};
use antrean_core::roles::ROLE_COMPANY;
use antrean_db::models::auth_session::CreateSession;
use antrean_db::models::user::{AccountProfile, Company, CreateAccount, UserProfile, UserResponse};
use antrean_db::repositories::{
    CompanyRepo, EmailVerificationRepo, UserProfileRepo, UserRepo, UserSessionRepo,
};
use antrean_mail::EmailDelivery;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::cookies::{clear_auth_cookies, set_auth_cookies, REFRESH_COOKIE};
use crate::auth::jwt::{hash_refresh_token, issue_token_pair};
use crate::auth::password::{check_credentials, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

/// Query string for `GET /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailParams {
    pub token: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
///
/// Optional: browser clients send the refresh token as a cookie instead.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct VerifyEmailResponse {
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// The current user with whichever role-specific record they have.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub profile: Option<UserProfile>,
    pub company: Option<Company>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an unverified account with its profile or company, then send the
/// verification link. Email delivery happens after commit and never fails the
/// request.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim().to_lowercase();

    validate_registration(&RegistrationFields {
        email: &email,
        password: &input.password,
        role: &input.role,
        full_name: input.full_name.as_deref(),
        company_name: input.company_name.as_deref(),
    })?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email is already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .await
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let profile = if input.role == ROLE_COMPANY {
        AccountProfile::Company {
            company_name: input.company_name.unwrap_or_default().trim().to_string(),
            industry: input.industry,
            website: input.website,
            address: input.address,
        }
    } else {
        AccountProfile::User {
            full_name: input.full_name.unwrap_or_default().trim().to_string(),
            phone: input.phone,
        }
    };

    let verification_token = Uuid::new_v4().simple().to_string();
    let account = CreateAccount {
        email,
        password_hash,
        profile,
        verification_token: verification_token.clone(),
        verification_expires_at: Utc::now() + Duration::minutes(VERIFICATION_TOKEN_EXPIRY_MINS),
    };
    let user = UserRepo::register(&state.pool, &account).await?;

    tracing::info!(user_id = user.id, role = %user.role, "Account registered");

    let verify_url = format!(
        "{}/api/v1/auth/verify-email?token={verification_token}",
        state.config.app_url
    );
    send_verification(state.mailer.clone(), user.email.clone(), verify_url);

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/auth/verify-email?token=...
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> AppResult<Json<DataResponse<VerifyEmailResponse>>> {
    if !EmailVerificationRepo::confirm(&state.pool, params.token.trim()).await? {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid or expired verification token".into(),
        )));
    }
    Ok(Json(DataResponse {
        data: VerifyEmailResponse { verified: true },
    }))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens in
/// the body and as http-only cookies.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim().to_lowercase();

    let user = UserRepo::find_by_email(&state.pool, &email).await?;

    let password_valid =
        check_credentials(&input.password, user.as_ref().map(|u| u.password_hash.as_str()))
            .await
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    let user = match user {
        Some(user) if password_valid && user.is_verified => user,
        other => {
            tracing::debug!(
                user_id = other.as_ref().map(|u| u.id),
                verified = other.as_ref().map(|u| u.is_verified),
                "Login rejected"
            );
            return Err(AppError::Core(CoreError::Unauthorized(
                INVALID_CREDENTIALS.into(),
            )));
        }
    };

    let response = create_auth_response(&state, UserResponse::from(&user)).await?;
    let jar = set_auth_cookies(
        jar,
        &response.access_token,
        &response.refresh_token,
        state.config.cookie_secure,
    );

    Ok((jar, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token (body or cookie) for new tokens. The old
/// session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<impl IntoResponse> {
    let presented = presented_refresh_token(&jar, body).ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Missing refresh token".into()))
    })?;
    let token_hash = hash_refresh_token(&presented);

    let session = UserSessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    UserSessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, UserResponse::from(&user)).await?;
    let jar = set_auth_cookies(
        jar,
        &response.access_token,
        &response.refresh_token,
        state.config.cookie_secure,
    );

    Ok((jar, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented refresh token, if any, and clear the auth cookies.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = presented_refresh_token(&jar, body) {
        UserSessionRepo::revoke_by_hash(&state.pool, &hash_refresh_token(&token)).await?;
    }

    Ok((
        clear_auth_cookies(jar, state.config.cookie_secure),
        Json(DataResponse {
            data: LogoutResponse { logged_out: true },
        }),
    ))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;

    let (profile, company) = if user.role == ROLE_COMPANY {
        (None, CompanyRepo::find_by_user_id(&state.pool, user.id).await?)
    } else {
        (UserProfileRepo::find_by_user_id(&state.pool, user.id).await?, None)
    };

    Ok(Json(DataResponse {
        data: MeResponse {
            user: UserResponse::from(&user),
            profile,
            company,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The refresh token from the JSON body, falling back to the cookie.
fn presented_refresh_token(jar: &CookieJar, body: Option<Json<RefreshRequest>>) -> Option<String> {
    body.and_then(|Json(b)| b.refresh_token)
        .filter(|t| !t.is_empty())
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()))
}

/// Issue a token pair, persist its refresh session, and build the response.
async fn create_auth_response(state: &AppState, user: UserResponse) -> AppResult<AuthResponse> {
    let tokens = issue_token_pair(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    UserSessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: tokens.refresh_token_hash,
            expires_at: tokens.refresh_expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.access_expires_in,
        user,
    })
}

/// Deliver the verification link on a detached task, or log it when SMTP is
/// not configured.
fn send_verification(mailer: Option<Arc<EmailDelivery>>, email: String, verify_url: String) {
    let Some(mailer) = mailer else {
        tracing::info!(to = %email, %verify_url, "SMTP not configured; verification link not sent");
        return;
    };

    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification(&email, &verify_url).await {
            tracing::warn!(to = %email, error = %e, "Failed to send verification email");
        }
    });
}
