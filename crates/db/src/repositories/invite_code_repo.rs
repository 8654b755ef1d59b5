//! Repository for the `invite_codes` table.
//!
//! Code consumption happens inside the registration transaction in
//! [`crate::repositories::UserRepo::register_with_invite`].

use corkboard_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::invite_code::{InviteCode, InviteCodeWithCreator};

/// Column list shared across queries.
const COLUMNS: &str = "id, code, creator_id, used, used_by, expires_at, created_at";

/// Provides operations for invite codes.
pub struct InviteCodeRepo;

impl InviteCodeRepo {
    /// Insert a freshly generated code, returning the created row.
    pub async fn create(
        pool: &PgPool,
        code: &str,
        creator_id: DbId,
        expires_at: Timestamp,
    ) -> Result<InviteCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO invite_codes (code, creator_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InviteCode>(&query)
            .bind(code)
            .bind(creator_id)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// List the 50 most recent codes with their creators' display names.
    pub async fn list_recent(pool: &PgPool) -> Result<Vec<InviteCodeWithCreator>, sqlx::Error> {
        sqlx::query_as::<_, InviteCodeWithCreator>(
            "SELECT i.id, i.code, i.creator_id, u.display_name AS creator_name,
                    i.used, i.used_by, i.expires_at, i.created_at
             FROM invite_codes i
             JOIN users u ON u.id = i.creator_id
             ORDER BY i.created_at DESC
             LIMIT 50",
        )
        .fetch_all(pool)
        .await
    }
}
