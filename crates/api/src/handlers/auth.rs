//! Handlers for the `/auth` resource (register, login, current user).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use corkboard_core::error::CoreError;
use corkboard_db::models::user::{CreateUser, UserResponse};
use corkboard_db::repositories::{RegisterOutcome, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Minimum password length enforced at registration and password change.
pub(crate) const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum display name length in characters.
const MAX_DISPLAY_NAME_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub invite_code: String,
}

/// Request body for `POST /auth/login`.
///
/// `identifier` is the email address or the display name.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Successful authentication payload returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserResponse,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account, consuming a single-use invite code. The code check,
/// user insert, and code consumption run in one transaction.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    validate_email(&input.email)?;
    validate_display_name(&input.display_name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // Friendly availability checks up front; the unique constraints still
    // catch the race window and map to the same messages.
    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(
            "This email is already registered".into(),
        )));
    }
    if UserRepo::find_by_display_name(&state.pool, &input.display_name)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(
            "This display name is already taken".into(),
        )));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        email: input.email,
        display_name: input.display_name,
        password_hash: hashed,
    };

    let user = match UserRepo::register_with_invite(&state.pool, &create_dto, &input.invite_code)
        .await?
    {
        RegisterOutcome::Registered(user) => user,
        RegisterOutcome::InviteNotFound => {
            return Err(AppError::Core(CoreError::Validation(
                "Invalid invite code".into(),
            )));
        }
        RegisterOutcome::InviteUsed => {
            return Err(AppError::Core(CoreError::Validation(
                "This invite code has already been used".into(),
            )));
        }
        RegisterOutcome::InviteExpired => {
            return Err(AppError::Core(CoreError::Validation(
                "This invite code has expired".into(),
            )));
        }
    };

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(AuthPayload {
            user: user.into(),
            token,
        })),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email-or-display-name + password. Returns the user
/// and a bearer token. Unknown identifier and wrong password produce the
/// same message.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthPayload>>> {
    let user = UserRepo::find_by_identifier(&state.pool, &input.identifier)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid email or password".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(ApiResponse::new(AuthPayload {
        user: user.into(),
        token,
    })))
}

/// GET /api/v1/auth/me
///
/// Return the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = super::fetch_actor(&state, &auth).await?;
    Ok(Json(ApiResponse::new(user.into())))
}

// ── Private helpers ──────────────────────────────────────────────────────

/// Minimal shape check; real deliverability is the mail server's problem.
fn validate_email(email: &str) -> AppResult<()> {
    let valid = email.contains('@') && !email.starts_with('@') && !email.ends_with('@');
    if valid {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(
            "Invalid email address".into(),
        )))
    }
}

pub(crate) fn validate_display_name(display_name: &str) -> AppResult<()> {
    if display_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Display name cannot be empty".into(),
        )));
    }
    if display_name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Display name exceeds maximum length of {MAX_DISPLAY_NAME_LENGTH} characters"
        ))));
    }
    Ok(())
}
