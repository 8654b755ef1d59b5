//! Repository for the `users` table, including invite-gated registration.

use chrono::Utc;
use corkboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{AdminUserRow, CreateUser, UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, display_name, password_hash, avatar, role, pin_hash, \
                        created_at, updated_at";

/// Result of an invite-gated registration attempt.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// User created and the invite code consumed.
    Registered(User),
    /// No invite code row matches the supplied code.
    InviteNotFound,
    /// The code exists but was already consumed.
    InviteUsed,
    /// The code exists but its 15-minute window has passed.
    InviteExpired,
}

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Register a new user, consuming the given invite code.
    ///
    /// The code lookup, user insert, and code consumption run in one
    /// transaction; an invalid code leaves the database untouched. The
    /// code row is locked (`FOR UPDATE`) so two registrations cannot
    /// consume the same code.
    pub async fn register_with_invite(
        pool: &PgPool,
        input: &CreateUser,
        invite_code: &str,
    ) -> Result<RegisterOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let invite: Option<(DbId, bool, chrono::DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, used, expires_at FROM invite_codes WHERE code = $1 FOR UPDATE",
        )
        .bind(invite_code)
        .fetch_optional(&mut *tx)
        .await?;

        let (invite_id, used, expires_at) = match invite {
            Some(row) => row,
            None => return Ok(RegisterOutcome::InviteNotFound),
        };
        if used {
            return Ok(RegisterOutcome::InviteUsed);
        }
        if expires_at < Utc::now() {
            return Ok(RegisterOutcome::InviteExpired);
        }

        let query = format!(
            "INSERT INTO users (email, display_name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE invite_codes SET used = TRUE, used_by = $2 WHERE id = $1")
            .bind(invite_id)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RegisterOutcome::Registered(user))
    }

    /// Insert a user directly, without an invite code.
    ///
    /// Used for bootstrap and test fixtures; the registration endpoint
    /// always goes through [`UserRepo::register_with_invite`].
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by display name (case-sensitive).
    pub async fn find_by_display_name(
        pool: &PgPool,
        display_name: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE display_name = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(display_name)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by login identifier: email or display name.
    pub async fn find_by_identifier(
        pool: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1 OR display_name = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// List all users with their note and reply counts, newest first.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<AdminUserRow>, sqlx::Error> {
        sqlx::query_as::<_, AdminUserRow>(
            "SELECT u.id, u.email, u.display_name, u.role, u.created_at, u.updated_at,
                    (SELECT COUNT(*) FROM notes n WHERE n.user_id = u.id) AS note_count,
                    (SELECT COUNT(*) FROM replies r WHERE r.user_id = u.id) AS reply_count
             FROM users u
             ORDER BY u.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update the caller's profile. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                avatar = COALESCE($3, avatar)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.avatar)
            .fetch_optional(pool)
            .await
    }

    /// Replace the stored password hash.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or replace the hidden-layer PIN hash.
    pub async fn update_pin(
        pool: &PgPool,
        id: DbId,
        pin_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET pin_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(pin_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change a user's role. Returns the updated row, `None` if missing.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. Returns `true` if a row was deleted.
    ///
    /// Live notes and replies cascade away; archived snapshots keep the
    /// denormalized display names and are unaffected.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
