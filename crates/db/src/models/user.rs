//! User entity model and DTOs.

use corkboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password and PIN hashes -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub role: String,
    pub pin_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no credential material).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub role: String,
    /// Whether a hidden-layer PIN has been set (the hash itself never leaves the server).
    pub has_pin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar: user.avatar,
            role: user.role,
            has_pin: user.pin_hash.is_some(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Minimal author projection embedded in note and reply responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUser {
    pub id: DbId,
    pub display_name: String,
}

/// DTO for creating a new user at registration time.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

/// DTO for updating the caller's own profile. All fields are optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

/// Flat row backing the admin user listing (user + content counts).
#[derive(Debug, FromRow)]
pub struct AdminUserRow {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub note_count: i64,
    pub reply_count: i64,
}

/// Admin listing entry with the `_count` projection the clients expect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(rename = "_count")]
    pub count: AdminUserCounts,
}

#[derive(Debug, Serialize)]
pub struct AdminUserCounts {
    pub notes: i64,
    pub replies: i64,
}

impl From<AdminUserRow> for AdminUserResponse {
    fn from(row: AdminUserRow) -> Self {
        AdminUserResponse {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
            count: AdminUserCounts {
                notes: row.note_count,
                replies: row.reply_count,
            },
        }
    }
}
