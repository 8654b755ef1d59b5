//! The soft-delete / restore engine.
//!
//! Deleting a note or reply moves it into an archive table as a flattened
//! snapshot (author display names resolved at delete time) and removes the
//! live row, all in one transaction. Restoring replays an archived note
//! back into the live tables under its original id, re-validating every
//! referenced user against the current `users` table.

use corkboard_core::notes::{coerce_color, LAYER_SURFACE, STATUS_PUBLISHED};
use corkboard_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::archive::{DeletedNote, DeletedReply, ReplySnapshot};
use crate::models::note::Note;

/// Column list for `deleted_notes` queries.
const NOTE_COLUMNS: &str = "id, original_note_id, title, content, color, note_user_id, \
    note_user_name, replies, deleted_by_id, deleted_by_name, note_created_at, deleted_at";

/// Column list for `deleted_replies` queries.
const REPLY_COLUMNS: &str = "id, original_reply_id, content, note_id, note_title, \
    reply_user_id, reply_user_name, deleted_by_id, deleted_by_name, reply_created_at, deleted_at";

/// Column list for live `notes` rows returned by restore.
const LIVE_NOTE_COLUMNS: &str = "id, title, content, color, status, layer, user_id, \
    last_activity_at, created_at, updated_at";

/// Result of a restore attempt on an existing archive row.
#[derive(Debug)]
pub enum RestoreOutcome {
    /// The note is live again; reply snapshots from since-deleted users
    /// were dropped.
    Restored {
        note: Note,
        replies_restored: usize,
        replies_dropped: usize,
    },
    /// The note's owner no longer exists; nothing was written.
    OwnerMissing,
}

/// Archival and restore operations for notes and replies.
pub struct ArchiveRepo;

impl ArchiveRepo {
    /// Snapshot a note (with its full reply thread) into `deleted_notes`
    /// and remove the live row.
    ///
    /// All-or-nothing: if the snapshot insert fails the live note is
    /// untouched. Returns `None` if the note does not exist.
    pub async fn archive_note(
        pool: &PgPool,
        note_id: DbId,
        deleted_by_id: DbId,
        deleted_by_name: &str,
    ) -> Result<Option<DeletedNote>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let note: Option<(Option<String>, String, String, DbId, String, Timestamp)> =
            sqlx::query_as(
                "SELECT n.title, n.content, n.color, n.user_id, u.display_name, n.created_at
                 FROM notes n JOIN users u ON u.id = n.user_id
                 WHERE n.id = $1
                 FOR UPDATE OF n",
            )
            .bind(note_id)
            .fetch_optional(&mut *tx)
            .await?;
        let (title, content, color, note_user_id, note_user_name, note_created_at) = match note {
            Some(row) => row,
            None => return Ok(None),
        };

        // Resolve each reply author's display name now; the snapshot must
        // stay readable after the author is gone.
        let snapshots: Vec<ReplySnapshot> = sqlx::query_as::<
            _,
            (DbId, String, DbId, String, Timestamp),
        >(
            "SELECT r.id, r.content, r.user_id, u.display_name, r.created_at
             FROM replies r JOIN users u ON u.id = r.user_id
             WHERE r.note_id = $1
             ORDER BY r.created_at ASC",
        )
        .bind(note_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(id, content, user_id, user_name, created_at)| ReplySnapshot {
            id,
            content,
            user_id,
            user_name,
            created_at,
        })
        .collect();

        let insert = format!(
            "INSERT INTO deleted_notes
                (original_note_id, title, content, color, note_user_id, note_user_name,
                 replies, deleted_by_id, deleted_by_name, note_created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {NOTE_COLUMNS}"
        );
        let deleted = sqlx::query_as::<_, DeletedNote>(&insert)
            .bind(note_id)
            .bind(&title)
            .bind(&content)
            .bind(&color)
            .bind(note_user_id)
            .bind(&note_user_name)
            .bind(Json(&snapshots))
            .bind(deleted_by_id)
            .bind(deleted_by_name)
            .bind(note_created_at)
            .fetch_one(&mut *tx)
            .await?;

        // Cascade removes the live replies.
        sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(note_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(deleted))
    }

    /// Snapshot a single reply into `deleted_replies` and remove it.
    ///
    /// Returns `None` if the reply does not exist.
    pub async fn archive_reply(
        pool: &PgPool,
        reply_id: DbId,
        deleted_by_id: DbId,
        deleted_by_name: &str,
    ) -> Result<Option<DeletedReply>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let reply: Option<(String, DbId, Option<String>, DbId, String, Timestamp)> =
            sqlx::query_as(
                "SELECT r.content, r.note_id, n.title, r.user_id, u.display_name, r.created_at
                 FROM replies r
                 JOIN notes n ON n.id = r.note_id
                 JOIN users u ON u.id = r.user_id
                 WHERE r.id = $1
                 FOR UPDATE OF r",
            )
            .bind(reply_id)
            .fetch_optional(&mut *tx)
            .await?;
        let (content, note_id, note_title, reply_user_id, reply_user_name, reply_created_at) =
            match reply {
                Some(row) => row,
                None => return Ok(None),
            };

        let insert = format!(
            "INSERT INTO deleted_replies
                (original_reply_id, content, note_id, note_title, reply_user_id,
                 reply_user_name, deleted_by_id, deleted_by_name, reply_created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {REPLY_COLUMNS}"
        );
        let deleted = sqlx::query_as::<_, DeletedReply>(&insert)
            .bind(reply_id)
            .bind(&content)
            .bind(note_id)
            .bind(&note_title)
            .bind(reply_user_id)
            .bind(&reply_user_name)
            .bind(deleted_by_id)
            .bind(deleted_by_name)
            .bind(reply_created_at)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM replies WHERE id = $1")
            .bind(reply_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(deleted))
    }

    /// List archived notes, most recently deleted first.
    pub async fn list_deleted_notes(pool: &PgPool) -> Result<Vec<DeletedNote>, sqlx::Error> {
        let query =
            format!("SELECT {NOTE_COLUMNS} FROM deleted_notes ORDER BY deleted_at DESC");
        sqlx::query_as::<_, DeletedNote>(&query).fetch_all(pool).await
    }

    /// List archived replies, most recently deleted first.
    pub async fn list_deleted_replies(pool: &PgPool) -> Result<Vec<DeletedReply>, sqlx::Error> {
        let query =
            format!("SELECT {REPLY_COLUMNS} FROM deleted_replies ORDER BY deleted_at DESC");
        sqlx::query_as::<_, DeletedReply>(&query).fetch_all(pool).await
    }

    /// Find an archived note by archive-row id.
    pub async fn find_deleted_note(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DeletedNote>, sqlx::Error> {
        let query = format!("SELECT {NOTE_COLUMNS} FROM deleted_notes WHERE id = $1");
        sqlx::query_as::<_, DeletedNote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replay an archived note back into the live tables.
    ///
    /// Best-effort reconstruction, not a guaranteed byte-identical
    /// restore:
    ///
    /// - fails without writing anything when the note's owner no longer
    ///   exists (a note cannot come back orphaned);
    /// - silently drops reply snapshots whose authors are gone;
    /// - re-inserts the note under its *original* id so external
    ///   references stay stable, with `last_activity_at` set to the
    ///   latest surviving reply's timestamp (or the note's own creation
    ///   time when no replies survive);
    /// - coerces a snapshot color that has left the allowed set back to
    ///   the default instead of rejecting the restore;
    /// - deletes the archive row on success.
    ///
    /// Returns `None` if no archive row with the given id exists.
    pub async fn restore_note(
        pool: &PgPool,
        deleted_note_id: DbId,
    ) -> Result<Option<RestoreOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {NOTE_COLUMNS} FROM deleted_notes WHERE id = $1 FOR UPDATE"
        );
        let archived = sqlx::query_as::<_, DeletedNote>(&select)
            .bind(deleted_note_id)
            .fetch_optional(&mut *tx)
            .await?;
        let archived = match archived {
            Some(row) => row,
            None => return Ok(None),
        };

        let (owner_exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(archived.note_user_id)
                .fetch_one(&mut *tx)
                .await?;
        if !owner_exists {
            return Ok(Some(RestoreOutcome::OwnerMissing));
        }

        // Filter the snapshot set down to replies whose authors still exist.
        let snapshots = archived.replies.0;
        let author_ids: Vec<DbId> = snapshots.iter().map(|s| s.user_id).collect();
        let live_authors: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = ANY($1)")
                .bind(&author_ids)
                .fetch_all(&mut *tx)
                .await?;
        let live_authors: std::collections::HashSet<DbId> =
            live_authors.into_iter().map(|(id,)| id).collect();

        let total = snapshots.len();
        let surviving: Vec<ReplySnapshot> = snapshots
            .into_iter()
            .filter(|s| live_authors.contains(&s.user_id))
            .collect();
        let dropped = total - surviving.len();

        let last_activity_at = surviving
            .iter()
            .map(|s| s.created_at)
            .max()
            .unwrap_or(archived.note_created_at);

        let insert_note = format!(
            "INSERT INTO notes
                (id, title, content, color, status, layer, user_id, last_activity_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {LIVE_NOTE_COLUMNS}"
        );
        let note = sqlx::query_as::<_, Note>(&insert_note)
            .bind(archived.original_note_id)
            .bind(&archived.title)
            .bind(&archived.content)
            .bind(coerce_color(&archived.color))
            .bind(STATUS_PUBLISHED)
            .bind(LAYER_SURFACE)
            .bind(archived.note_user_id)
            .bind(last_activity_at)
            .bind(archived.note_created_at)
            .fetch_one(&mut *tx)
            .await?;

        for snapshot in &surviving {
            sqlx::query(
                "INSERT INTO replies (id, content, note_id, user_id, created_at)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(snapshot.id)
            .bind(&snapshot.content)
            .bind(note.id)
            .bind(snapshot.user_id)
            .bind(snapshot.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM deleted_notes WHERE id = $1")
            .bind(deleted_note_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(RestoreOutcome::Restored {
            note,
            replies_restored: surviving.len(),
            replies_dropped: dropped,
        }))
    }

    /// Remove an archived note for good. Returns `true` if a row was
    /// deleted. Irreversible; never touches live data.
    pub async fn permanently_delete_note(
        pool: &PgPool,
        deleted_note_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deleted_notes WHERE id = $1")
            .bind(deleted_note_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
