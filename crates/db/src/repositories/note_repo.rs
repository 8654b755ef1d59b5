//! Repository for the `notes` table.

use corkboard_core::notes::{DEFAULT_COLOR, LAYER_SURFACE, STATUS_DRAFT, STATUS_PUBLISHED};
use corkboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{CreateNote, Note, NoteListRow, UpdateNote};

/// Column list for bare `notes` queries.
const COLUMNS: &str = "id, title, content, color, status, layer, user_id, \
    last_activity_at, created_at, updated_at";

/// Column list for listing queries: note + author name + reply count.
const LIST_COLUMNS: &str = "n.id, n.title, n.content, n.color, n.status, n.layer, n.user_id, \
    n.last_activity_at, n.created_at, n.updated_at, \
    u.display_name AS user_display_name, \
    (SELECT COUNT(*) FROM replies r WHERE r.note_id = n.id) AS reply_count";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Create a note owned by `user_id`, returning the created row.
    ///
    /// Defaults are applied here: color `yellow`, layer `surface`,
    /// status `published` unless `is_draft` is set.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateNote,
    ) -> Result<Note, sqlx::Error> {
        let color = input.color.as_deref().unwrap_or(DEFAULT_COLOR);
        let layer = input.layer.as_deref().unwrap_or(LAYER_SURFACE);
        let status = if input.is_draft.unwrap_or(false) {
            STATUS_DRAFT
        } else {
            STATUS_PUBLISHED
        };
        let query = format!(
            "INSERT INTO notes (title, content, color, status, layer, user_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(color)
            .bind(status)
            .bind(layer)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a note by its ID (no visibility filter -- callers check ownership).
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a note with its author projection and reply count.
    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NoteListRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM notes n
             JOIN users u ON u.id = n.user_id
             WHERE n.id = $1"
        );
        sqlx::query_as::<_, NoteListRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List notes in a layer as seen by `viewer_id`.
    ///
    /// Drafts are visible only to their owner; published notes to
    /// everyone. Ordered by last activity, newest first, so threads with
    /// fresh replies float to the top of the feed.
    pub async fn list_for_viewer(
        pool: &PgPool,
        layer: &str,
        viewer_id: DbId,
    ) -> Result<Vec<NoteListRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM notes n
             JOIN users u ON u.id = n.user_id
             WHERE n.layer = $1 AND (n.status = 'published' OR n.user_id = $2)
             ORDER BY n.last_activity_at DESC"
        );
        sqlx::query_as::<_, NoteListRow>(&query)
            .bind(layer)
            .bind(viewer_id)
            .fetch_all(pool)
            .await
    }

    /// Update a note, archiving the pre-edit state when required.
    ///
    /// If the note is published and the update actually changes the title
    /// or content, the pre-change (title, content) pair is written to
    /// `note_edit_history` in the same transaction, attributed to the
    /// editor. Draft edits are never archived.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_with_history(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
        editor_id: DbId,
        editor_name: &str,
    ) -> Result<Option<Note>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM notes WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Note>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let current = match current {
            Some(note) => note,
            None => return Ok(None),
        };

        let title_changes = matches!(&input.title, Some(t) if Some(t.as_str()) != current.title.as_deref());
        let content_changes =
            matches!(&input.content, Some(c) if c.as_str() != current.content.as_str());

        if current.status == STATUS_PUBLISHED && (title_changes || content_changes) {
            sqlx::query(
                "INSERT INTO note_edit_history (note_id, title, content, edited_by_id, edited_by_name)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(current.id)
            .bind(&current.title)
            .bind(&current.content)
            .bind(editor_id)
            .bind(editor_name)
            .execute(&mut *tx)
            .await?;
        }

        let update = format!(
            "UPDATE notes SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                color = COALESCE($4, color)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Note>(&update)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.color)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Publish a draft. One-way: only rows currently in `draft` match.
    ///
    /// Returns `None` when the note does not exist *or* is not a draft;
    /// callers that already verified existence can report the combined
    /// "not found or not a draft" failure.
    pub async fn publish(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET status = 'published', last_activity_at = NOW()
             WHERE id = $1 AND status = 'draft'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
