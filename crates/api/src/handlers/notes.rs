//! Handlers for the `/notes` resource: listing, detail, lifecycle.
//!
//! Visibility: a draft exists only for its owner (other users get the
//! same 404 as for a missing id). Editing is owner-only with no admin
//! override; deletion is owner-or-admin and goes through the archive.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use corkboard_core::error::CoreError;
use corkboard_core::notes::{
    validate_color, validate_content, validate_layer, validate_title, LAYER_SURFACE, STATUS_DRAFT,
};
use corkboard_core::roles::{can_moderate, is_owner};
use corkboard_core::types::DbId;
use corkboard_db::models::note::{CreateNote, NoteDetailResponse, NoteResponse, UpdateNote};
use corkboard_db::repositories::{ArchiveRepo, NoteRepo, ReplyRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for the note listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    /// Layer to list (default `surface`).
    pub layer: Option<String>,
}

/// GET /api/v1/notes
///
/// List notes in a layer, newest activity first. Drafts appear only in
/// their owner's listing.
pub async fn list_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListNotesQuery>,
) -> AppResult<Json<ApiResponse<Vec<NoteResponse>>>> {
    let layer = params.layer.as_deref().unwrap_or(LAYER_SURFACE);
    validate_layer(layer).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let rows = NoteRepo::list_for_viewer(&state.pool, layer, auth.user_id).await?;
    let notes = rows.into_iter().map(NoteResponse::from).collect();
    Ok(Json(ApiResponse::new(notes)))
}

/// GET /api/v1/notes/{id}
///
/// Note detail with the ordered reply thread.
pub async fn get_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<NoteDetailResponse>>> {
    let row = NoteRepo::find_summary(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    // A draft is invisible to everyone but its owner.
    if row.status == STATUS_DRAFT && !is_owner(auth.user_id, row.user_id) {
        return Err(AppError::Core(CoreError::NotFound { entity: "Note", id }));
    }

    let replies = ReplyRepo::list_for_note(&state.pool, id).await?;
    Ok(Json(ApiResponse::new(NoteDetailResponse {
        note: row.into(),
        replies: replies.into_iter().map(Into::into).collect(),
    })))
}

/// POST /api/v1/notes
///
/// Create a note (draft or published).
pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<ApiResponse<NoteResponse>>)> {
    if let Some(ref title) = input.title {
        validate_title(title).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    validate_content(&input.content)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if let Some(ref color) = input.color {
        validate_color(color).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(ref layer) = input.layer {
        validate_layer(layer).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let note = NoteRepo::create(&state.pool, auth.user_id, &input).await?;
    let row = NoteRepo::find_summary(&state.pool, note.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created note vanished".into()))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(row.into()))))
}

/// PUT /api/v1/notes/{id}
///
/// Edit title/content/color. Owner only -- admins cannot edit other
/// people's notes, only delete them. Published edits that change the
/// title or content archive the pre-edit pair first.
pub async fn update_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNote>,
) -> AppResult<Json<ApiResponse<NoteResponse>>> {
    if let Some(ref title) = input.title {
        validate_title(title).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(ref content) = input.content {
        validate_content(content).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if let Some(ref color) = input.color {
        validate_color(color).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    if !is_owner(auth.user_id, note.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner can edit this note".into(),
        )));
    }

    let editor = super::fetch_actor(&state, &auth).await?;
    NoteRepo::update_with_history(&state.pool, id, &input, editor.id, &editor.display_name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    let row = NoteRepo::find_summary(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    Ok(Json(ApiResponse::new(row.into())))
}

/// PUT /api/v1/notes/{id}/publish
///
/// One-way draft -> published transition. Owner only.
pub async fn publish_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<NoteResponse>>> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    if !is_owner(auth.user_id, note.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner can publish this note".into(),
        )));
    }

    // The WHERE status = 'draft' guard makes a second publish a no-match.
    NoteRepo::publish(&state.pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Note not found or is not a draft".into(),
        ))
    })?;

    let row = NoteRepo::find_summary(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    Ok(Json(ApiResponse::new(row.into())))
}

/// DELETE /api/v1/notes/{id}
///
/// Soft-delete: snapshot the note and its thread into the archive, then
/// remove the live rows. Owner or admin.
pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Option<()>>>> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;
    if !can_moderate(auth.user_id, &auth.role, note.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner or an admin can delete this note".into(),
        )));
    }

    let actor = super::fetch_actor(&state, &auth).await?;
    let archived = ArchiveRepo::archive_note(&state.pool, id, actor.id, &actor.display_name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Note", id }))?;

    tracing::info!(
        note_id = %id,
        archive_id = %archived.id,
        deleted_by = %actor.id,
        "note archived"
    );
    Ok(Json(ApiResponse::new(None)))
}
