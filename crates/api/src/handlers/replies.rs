//! Handlers for `/notes/{id}/replies`.
//!
//! Replies attach to published notes only. Edits are author-only;
//! deletion is author-or-admin and goes through the archive.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use corkboard_core::error::CoreError;
use corkboard_core::notes::{validate_content, STATUS_DRAFT};
use corkboard_core::roles::{can_moderate, is_owner};
use corkboard_core::types::DbId;
use corkboard_db::models::reply::{CreateReply, ReplyResponse, UpdateReply};
use corkboard_db::repositories::{ArchiveRepo, NoteRepo, ReplyRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/notes/{id}/replies
///
/// Add a reply; bumps the note's activity timestamp in the same
/// transaction. `replyToId` is stored as given -- quoting a reply that is
/// later deleted leaves a dangling id the clients render as a tombstone.
pub async fn create_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(note_id): Path<DbId>,
    Json(input): Json<CreateReply>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReplyResponse>>)> {
    validate_content(&input.content)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let note = NoteRepo::find_by_id(&state.pool, note_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Note",
            id: note_id,
        }))?;
    if note.status == STATUS_DRAFT {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot reply to a draft".into(),
        )));
    }

    let reply = ReplyRepo::create(&state.pool, note_id, auth.user_id, &input).await?;
    let row = ReplyRepo::find_summary(&state.pool, reply.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created reply vanished".into()))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(row.into()))))
}

/// PUT /api/v1/notes/{id}/replies/{reply_id}
///
/// Edit a reply's content. Author only -- no admin override. The pre-edit
/// content is archived in the same transaction.
pub async fn update_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((note_id, reply_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateReply>,
) -> AppResult<Json<ApiResponse<ReplyResponse>>> {
    validate_content(&input.content)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let reply = ReplyRepo::find_by_id(&state.pool, reply_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reply",
            id: reply_id,
        }))?;
    if reply.note_id != note_id {
        return Err(AppError::Core(CoreError::Validation(
            "Reply does not belong to this note".into(),
        )));
    }
    if !is_owner(auth.user_id, reply.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author can edit this reply".into(),
        )));
    }

    let editor = super::fetch_actor(&state, &auth).await?;
    ReplyRepo::update_with_history(
        &state.pool,
        reply_id,
        &input.content,
        editor.id,
        &editor.display_name,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Reply",
        id: reply_id,
    }))?;

    let row = ReplyRepo::find_summary(&state.pool, reply_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reply",
            id: reply_id,
        }))?;
    Ok(Json(ApiResponse::new(row.into())))
}

/// DELETE /api/v1/notes/{id}/replies/{reply_id}
///
/// Soft-delete a reply: snapshot into the archive, then remove the live
/// row. Author or admin.
pub async fn delete_reply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((note_id, reply_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ApiResponse<Option<()>>>> {
    let reply = ReplyRepo::find_by_id(&state.pool, reply_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reply",
            id: reply_id,
        }))?;
    if reply.note_id != note_id {
        return Err(AppError::Core(CoreError::Validation(
            "Reply does not belong to this note".into(),
        )));
    }
    if !can_moderate(auth.user_id, &auth.role, reply.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author or an admin can delete this reply".into(),
        )));
    }

    let actor = super::fetch_actor(&state, &auth).await?;
    let archived = ArchiveRepo::archive_reply(&state.pool, reply_id, actor.id, &actor.display_name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Reply",
            id: reply_id,
        }))?;

    tracing::info!(
        reply_id = %reply_id,
        archive_id = %archived.id,
        deleted_by = %actor.id,
        "reply archived"
    );
    Ok(Json(ApiResponse::new(None)))
}
