//! Handlers for `/users/me`: profile, password, and hidden-layer PIN.

use axum::extract::State;
use axum::Json;
use corkboard_core::error::CoreError;
use corkboard_db::models::user::{UpdateProfile, UserResponse};
use corkboard_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::MIN_PASSWORD_LENGTH;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /users/me/password`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request body for `PUT /users/me/pin`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPinRequest {
    pub pin: String,
    /// Required when a PIN is already set.
    pub current_pin: Option<String>,
}

/// Request body for `POST /users/me/pin/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyPinRequest {
    pub pin: String,
}

/// Response payload for the PIN verification endpoint.
#[derive(Debug, Serialize)]
pub struct VerifyPinResponse {
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// PUT /api/v1/users/me
///
/// Update display name and/or avatar.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    if let Some(ref display_name) = input.display_name {
        super::auth::validate_display_name(display_name)?;
        // Friendly pre-check; uq_users_display_name still guards the race.
        if let Some(existing) = UserRepo::find_by_display_name(&state.pool, display_name).await? {
            if existing.id != auth.user_id {
                return Err(AppError::Core(CoreError::Validation(
                    "This display name is already taken".into(),
                )));
            }
        }
    }

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
        })?;

    Ok(Json(ApiResponse::new(user.into())))
}

/// PUT /api/v1/users/me/password
///
/// Change the password after verifying the current one.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<Option<()>>>> {
    let user = super::fetch_actor(&state, &auth).await?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Forbidden(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hashed).await?;

    Ok(Json(ApiResponse::new(None)))
}

/// PUT /api/v1/users/me/pin
///
/// Set or change the hidden-layer PIN. Changing requires the current PIN.
pub async fn set_pin(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<SetPinRequest>,
) -> AppResult<Json<ApiResponse<Option<()>>>> {
    validate_pin(&input.pin)?;

    let user = super::fetch_actor(&state, &auth).await?;

    if let Some(ref existing_hash) = user.pin_hash {
        let current = input.current_pin.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "Current PIN is required to change it".into(),
            ))
        })?;
        let current_valid = verify_password(current, existing_hash)
            .map_err(|e| AppError::InternalError(format!("PIN verification error: {e}")))?;
        if !current_valid {
            return Err(AppError::Core(CoreError::Forbidden(
                "Current PIN is incorrect".into(),
            )));
        }
    }

    let hashed = hash_password(&input.pin)
        .map_err(|e| AppError::InternalError(format!("PIN hashing error: {e}")))?;
    UserRepo::update_pin(&state.pool, user.id, &hashed).await?;

    Ok(Json(ApiResponse::new(None)))
}

/// POST /api/v1/users/me/pin/verify
///
/// Check a PIN against the stored hash. The client uses this to unlock
/// the hidden layer for the session.
pub async fn verify_pin(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<VerifyPinRequest>,
) -> AppResult<Json<ApiResponse<VerifyPinResponse>>> {
    let user = super::fetch_actor(&state, &auth).await?;

    let pin_hash = user.pin_hash.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Validation("No PIN has been set".into()))
    })?;

    let valid = verify_password(&input.pin, pin_hash)
        .map_err(|e| AppError::InternalError(format!("PIN verification error: {e}")))?;

    Ok(Json(ApiResponse::new(VerifyPinResponse { valid })))
}

// ── Private helpers ──────────────────────────────────────────────────────

/// PINs are 4-8 digits.
fn validate_pin(pin: &str) -> AppResult<()> {
    let ok = (4..=8).contains(&pin.len()) && pin.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(
            "PIN must be 4-8 digits".into(),
        )))
    }
}
