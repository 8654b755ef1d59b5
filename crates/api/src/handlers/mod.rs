//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod notes;
pub mod replies;
pub mod users;

use corkboard_core::error::CoreError;
use corkboard_db::models::user::User;
use corkboard_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Resolve the authenticated user's full row.
///
/// Needed wherever an operation attributes a write to the actor's current
/// display name (edit history, deletion snapshots). A valid token whose
/// user has since been deleted yields 401.
pub(crate) async fn fetch_actor(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))
}
