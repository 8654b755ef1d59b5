//! Handlers for the `/admin` resource: user management, the archive
//! (deleted notes/replies, restore, permanent delete), and invite codes.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use corkboard_core::error::CoreError;
use corkboard_core::invites::{generate_invite_code, INVITE_CODE_TTL_MINS};
use corkboard_core::roles::validate_role;
use corkboard_core::types::{DbId, Timestamp};
use corkboard_db::models::archive::{DeletedNoteResponse, DeletedReplyResponse};
use corkboard_db::models::invite_code::InviteCodeWithCreator;
use corkboard_db::models::user::{AdminUserResponse, UserResponse};
use corkboard_db::repositories::{ArchiveRepo, InviteCodeRepo, RestoreOutcome, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Request body for `POST /admin/invite-codes`.
#[derive(Debug, Deserialize)]
pub struct GenerateInviteRequest {
    /// When set, the code is emailed to this address.
    pub email: Option<String>,
}

/// Response payload for invite-code generation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInviteResponse {
    pub code: String,
    pub expires_at: Timestamp,
    /// Whether the code was successfully emailed.
    pub email_sent: bool,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
///
/// List all users with their note and reply counts.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<Vec<AdminUserResponse>>>> {
    let rows = UserRepo::list_with_counts(&state.pool).await?;
    let users = rows.into_iter().map(AdminUserResponse::from).collect();
    Ok(Json(ApiResponse::new(users)))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Delete a user account. Live notes and replies cascade away; archived
/// snapshots keep their denormalized display names. Self-deletion is
/// rejected so an instance cannot lose its last admin by accident.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Option<()>>>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot delete your own account".into(),
        )));
    }

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = %id, deleted_by = %admin.user_id, "user deleted");
    Ok(Json(ApiResponse::new(None)))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Promote or demote a user. Changing one's own role is rejected.
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    validate_role(&input.role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot change your own role".into(),
        )));
    }

    let user = UserRepo::update_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(ApiResponse::new(user.into())))
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/deleted-notes
///
/// List archived notes, most recently deleted first.
pub async fn list_deleted_notes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<Vec<DeletedNoteResponse>>>> {
    let rows = ArchiveRepo::list_deleted_notes(&state.pool).await?;
    let notes = rows.into_iter().map(DeletedNoteResponse::from).collect();
    Ok(Json(ApiResponse::new(notes)))
}

/// POST /api/v1/admin/deleted-notes/{id}/restore
///
/// Replay an archived note into the live tables under its original id.
/// Fails with a domain error when the original author no longer exists;
/// reply snapshots from since-deleted users are silently dropped.
pub async fn restore_note(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Option<()>>>> {
    let outcome = ArchiveRepo::restore_note(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DeletedNote",
            id,
        }))?;

    match outcome {
        RestoreOutcome::Restored {
            note,
            replies_restored,
            replies_dropped,
        } => {
            tracing::info!(
                note_id = %note.id,
                replies_restored,
                replies_dropped,
                restored_by = %admin.user_id,
                "note restored from archive"
            );
            Ok(Json(ApiResponse::new(None)))
        }
        RestoreOutcome::OwnerMissing => Err(AppError::Core(CoreError::Conflict(
            "The note's original author no longer exists".into(),
        ))),
    }
}

/// DELETE /api/v1/admin/deleted-notes/{id}
///
/// Remove an archived note for good. Irreversible.
pub async fn permanently_delete_note(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Option<()>>>> {
    let deleted = ArchiveRepo::permanently_delete_note(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "DeletedNote",
            id,
        }));
    }

    tracing::info!(archive_id = %id, deleted_by = %admin.user_id, "archived note purged");
    Ok(Json(ApiResponse::new(None)))
}

/// GET /api/v1/admin/deleted-replies
///
/// List archived replies, most recently deleted first.
pub async fn list_deleted_replies(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<Vec<DeletedReplyResponse>>>> {
    let rows = ArchiveRepo::list_deleted_replies(&state.pool).await?;
    let replies = rows.into_iter().map(DeletedReplyResponse::from).collect();
    Ok(Json(ApiResponse::new(replies)))
}

// ---------------------------------------------------------------------------
// Invite codes
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/invite-codes
///
/// Generate a single-use invite code valid for 15 minutes, optionally
/// emailing it. Email delivery failure does not fail the request; the
/// `emailSent` flag reports what happened.
pub async fn generate_invite(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<GenerateInviteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<GenerateInviteResponse>>)> {
    let code = generate_invite_code();
    let expires_at = Utc::now() + Duration::minutes(INVITE_CODE_TTL_MINS);

    let invite = InviteCodeRepo::create(&state.pool, &code, admin.user_id, expires_at).await?;

    let mut email_sent = false;
    if let Some(ref email) = input.email {
        match &state.mailer {
            Some(mailer) => match mailer.send_invite(email, &invite.code).await {
                Ok(()) => email_sent = true,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to send invite email");
                }
            },
            None => {
                tracing::warn!("invite email requested but SMTP is not configured");
            }
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(GenerateInviteResponse {
            code: invite.code,
            expires_at: invite.expires_at,
            email_sent,
        })),
    ))
}

/// GET /api/v1/admin/invite-codes
///
/// The 50 most recent codes with their creators.
pub async fn list_invite_codes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<ApiResponse<Vec<InviteCodeWithCreator>>>> {
    let codes = InviteCodeRepo::list_recent(&state.pool).await?;
    Ok(Json(ApiResponse::new(codes)))
}
