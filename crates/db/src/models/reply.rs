//! Reply entity model and DTOs.

use corkboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::NoteUser;

/// A row from the `replies` table.
///
/// `reply_to_id` is a loose reference: the quoted reply may have been
/// deleted since, in which case the id dangles and the client renders a
/// tombstone instead of the quote.
#[derive(Debug, Clone, FromRow)]
pub struct Reply {
    pub id: DbId,
    pub content: String,
    pub note_id: DbId,
    pub user_id: DbId,
    pub reply_to_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a reply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReply {
    pub content: String,
    pub reply_to_id: Option<DbId>,
}

/// DTO for editing a reply.
#[derive(Debug, Deserialize)]
pub struct UpdateReply {
    pub content: String,
}

/// Flat row backing reply listings (reply + author display name).
#[derive(Debug, FromRow)]
pub struct ReplyListRow {
    pub id: DbId,
    pub content: String,
    pub note_id: DbId,
    pub user_id: DbId,
    pub reply_to_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_display_name: String,
}

/// Reply as serialized to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: DbId,
    pub content: String,
    pub note_id: DbId,
    pub user_id: DbId,
    pub reply_to_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user: NoteUser,
}

impl From<ReplyListRow> for ReplyResponse {
    fn from(row: ReplyListRow) -> Self {
        ReplyResponse {
            id: row.id,
            content: row.content,
            note_id: row.note_id,
            user_id: row.user_id,
            reply_to_id: row.reply_to_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: NoteUser {
                id: row.user_id,
                display_name: row.user_display_name,
            },
        }
    }
}
