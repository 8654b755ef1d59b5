//! Archive models for soft-deleted notes and replies.
//!
//! These are independent aggregates: every field a reader needs (including
//! author display names) is denormalized at delete time, so the rows stay
//! meaningful even after the referenced users or notes are gone.

use corkboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Point-in-time copy of a reply, stored inside `deleted_notes.replies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplySnapshot {
    pub id: DbId,
    pub content: String,
    pub user_id: DbId,
    pub user_name: String,
    pub created_at: Timestamp,
}

/// A row from the `deleted_notes` archive table.
#[derive(Debug, Clone, FromRow)]
pub struct DeletedNote {
    pub id: DbId,
    pub original_note_id: DbId,
    pub title: Option<String>,
    pub content: String,
    pub color: String,
    pub note_user_id: DbId,
    pub note_user_name: String,
    pub replies: Json<Vec<ReplySnapshot>>,
    pub deleted_by_id: DbId,
    pub deleted_by_name: String,
    pub note_created_at: Timestamp,
    pub deleted_at: Timestamp,
}

/// Archived note as serialized to the admin clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedNoteResponse {
    pub id: DbId,
    pub original_note_id: DbId,
    pub title: Option<String>,
    pub content: String,
    pub color: String,
    pub note_user_id: DbId,
    pub note_user_name: String,
    pub replies: Vec<ReplySnapshot>,
    pub deleted_by_id: DbId,
    pub deleted_by_name: String,
    /// Display hint: self-deleted vs removed by a moderator.
    pub deleted_by_owner: bool,
    pub note_created_at: Timestamp,
    pub deleted_at: Timestamp,
}

impl From<DeletedNote> for DeletedNoteResponse {
    fn from(row: DeletedNote) -> Self {
        let deleted_by_owner = row.deleted_by_id == row.note_user_id;
        DeletedNoteResponse {
            id: row.id,
            original_note_id: row.original_note_id,
            title: row.title,
            content: row.content,
            color: row.color,
            note_user_id: row.note_user_id,
            note_user_name: row.note_user_name,
            replies: row.replies.0,
            deleted_by_id: row.deleted_by_id,
            deleted_by_name: row.deleted_by_name,
            deleted_by_owner,
            note_created_at: row.note_created_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// A row from the `deleted_replies` archive table.
#[derive(Debug, Clone, FromRow)]
pub struct DeletedReply {
    pub id: DbId,
    pub original_reply_id: DbId,
    pub content: String,
    pub note_id: DbId,
    pub note_title: Option<String>,
    pub reply_user_id: DbId,
    pub reply_user_name: String,
    pub deleted_by_id: DbId,
    pub deleted_by_name: String,
    pub reply_created_at: Timestamp,
    pub deleted_at: Timestamp,
}

/// Archived reply as serialized to the admin clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedReplyResponse {
    pub id: DbId,
    pub original_reply_id: DbId,
    pub content: String,
    pub note_id: DbId,
    pub note_title: Option<String>,
    pub reply_user_id: DbId,
    pub reply_user_name: String,
    pub deleted_by_id: DbId,
    pub deleted_by_name: String,
    /// Display hint: self-deleted vs removed by a moderator.
    pub deleted_by_owner: bool,
    pub reply_created_at: Timestamp,
    pub deleted_at: Timestamp,
}

impl From<DeletedReply> for DeletedReplyResponse {
    fn from(row: DeletedReply) -> Self {
        let deleted_by_owner = row.deleted_by_id == row.reply_user_id;
        DeletedReplyResponse {
            id: row.id,
            original_reply_id: row.original_reply_id,
            content: row.content,
            note_id: row.note_id,
            note_title: row.note_title,
            reply_user_id: row.reply_user_id,
            reply_user_name: row.reply_user_name,
            deleted_by_id: row.deleted_by_id,
            deleted_by_name: row.deleted_by_name,
            deleted_by_owner,
            reply_created_at: row.reply_created_at,
            deleted_at: row.deleted_at,
        }
    }
}
