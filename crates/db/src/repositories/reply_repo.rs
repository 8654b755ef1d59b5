//! Repository for the `replies` table.

use corkboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::reply::{CreateReply, Reply, ReplyListRow};

/// Column list for bare `replies` queries.
const COLUMNS: &str = "id, content, note_id, user_id, reply_to_id, created_at, updated_at";

/// Column list for listing queries: reply + author name.
const LIST_COLUMNS: &str = "r.id, r.content, r.note_id, r.user_id, r.reply_to_id, \
    r.created_at, r.updated_at, u.display_name AS user_display_name";

/// Provides CRUD operations for replies.
pub struct ReplyRepo;

impl ReplyRepo {
    /// Insert a reply and bump the parent note's activity timestamp.
    ///
    /// Both writes run in one transaction; the `last_activity_at` bump is
    /// what reorders the feed to surface active threads. `reply_to_id` is
    /// stored as given -- the referenced reply is not required to exist.
    pub async fn create(
        pool: &PgPool,
        note_id: DbId,
        user_id: DbId,
        input: &CreateReply,
    ) -> Result<Reply, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO replies (content, note_id, user_id, reply_to_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let reply = sqlx::query_as::<_, Reply>(&query)
            .bind(&input.content)
            .bind(note_id)
            .bind(user_id)
            .bind(input.reply_to_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE notes SET last_activity_at = NOW() WHERE id = $1")
            .bind(note_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(reply)
    }

    /// Find a reply by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reply>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM replies WHERE id = $1");
        sqlx::query_as::<_, Reply>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a reply with its author projection.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReplyListRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM replies r
             JOIN users u ON u.id = r.user_id
             WHERE r.id = $1"
        );
        sqlx::query_as::<_, ReplyListRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a note's replies in thread order (oldest first).
    pub async fn list_for_note(
        pool: &PgPool,
        note_id: DbId,
    ) -> Result<Vec<ReplyListRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM replies r
             JOIN users u ON u.id = r.user_id
             WHERE r.note_id = $1
             ORDER BY r.created_at ASC"
        );
        sqlx::query_as::<_, ReplyListRow>(&query)
            .bind(note_id)
            .fetch_all(pool)
            .await
    }

    /// Update a reply's content, archiving the pre-edit content to
    /// `reply_edit_history` in the same transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_with_history(
        pool: &PgPool,
        id: DbId,
        content: &str,
        editor_id: DbId,
        editor_name: &str,
    ) -> Result<Option<Reply>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM replies WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Reply>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let current = match current {
            Some(reply) => reply,
            None => return Ok(None),
        };

        sqlx::query(
            "INSERT INTO reply_edit_history (reply_id, content, edited_by_id, edited_by_name)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(current.id)
        .bind(&current.content)
        .bind(editor_id)
        .bind(editor_name)
        .execute(&mut *tx)
        .await?;

        let update = format!(
            "UPDATE replies SET content = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Reply>(&update)
            .bind(id)
            .bind(content)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}
