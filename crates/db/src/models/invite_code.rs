//! Invite code model.

use corkboard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `invite_codes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InviteCode {
    pub id: DbId,
    pub code: String,
    pub creator_id: DbId,
    pub used: bool,
    pub used_by: Option<DbId>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// Invite code with its creator's display name, for the admin listing.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InviteCodeWithCreator {
    pub id: DbId,
    pub code: String,
    pub creator_id: DbId,
    pub creator_name: String,
    pub used: bool,
    pub used_by: Option<DbId>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
