//! Note entity model and DTOs.

use corkboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::reply::ReplyResponse;
use crate::models::user::NoteUser;

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: DbId,
    pub title: Option<String>,
    pub content: String,
    pub color: String,
    pub status: String,
    pub layer: String,
    pub user_id: DbId,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new note.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    pub title: Option<String>,
    pub content: String,
    pub color: Option<String>,
    pub is_draft: Option<bool>,
    pub layer: Option<String>,
}

/// DTO for updating a note. Only provided fields are applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
}

/// Flat row backing note listings: the note plus its author's current
/// display name and live reply count.
#[derive(Debug, FromRow)]
pub struct NoteListRow {
    pub id: DbId,
    pub title: Option<String>,
    pub content: String,
    pub color: String,
    pub status: String,
    pub layer: String,
    pub user_id: DbId,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_display_name: String,
    pub reply_count: i64,
}

/// Note as serialized to clients: author projection + `_count.replies`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: DbId,
    pub title: Option<String>,
    pub content: String,
    pub color: String,
    pub status: String,
    pub layer: String,
    pub user_id: DbId,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user: NoteUser,
    #[serde(rename = "_count")]
    pub count: NoteCounts,
}

#[derive(Debug, Serialize)]
pub struct NoteCounts {
    pub replies: i64,
}

impl From<NoteListRow> for NoteResponse {
    fn from(row: NoteListRow) -> Self {
        NoteResponse {
            id: row.id,
            title: row.title,
            content: row.content,
            color: row.color,
            status: row.status,
            layer: row.layer,
            user_id: row.user_id,
            last_activity_at: row.last_activity_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: NoteUser {
                id: row.user_id,
                display_name: row.user_display_name,
            },
            count: NoteCounts {
                replies: row.reply_count,
            },
        }
    }
}

/// Note detail: the note plus its ordered reply thread.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDetailResponse {
    #[serde(flatten)]
    pub note: NoteResponse,
    pub replies: Vec<ReplyResponse>,
}
