//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler enforces the admin role.
///
/// ```text
/// GET    /users                        -> list_users
/// DELETE /users/{id}                   -> delete_user
/// PUT    /users/{id}/role              -> update_user_role
/// GET    /deleted-notes                -> list_deleted_notes
/// POST   /deleted-notes/{id}/restore   -> restore_note
/// DELETE /deleted-notes/{id}           -> permanently_delete_note
/// GET    /deleted-replies              -> list_deleted_replies
/// POST   /invite-codes                 -> generate_invite
/// GET    /invite-codes                 -> list_invite_codes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/users/{id}/role", put(admin::update_user_role))
        .route("/deleted-notes", get(admin::list_deleted_notes))
        .route(
            "/deleted-notes/{id}",
            delete(admin::permanently_delete_note),
        )
        .route("/deleted-notes/{id}/restore", post(admin::restore_note))
        .route("/deleted-replies", get(admin::list_deleted_replies))
        .route(
            "/invite-codes",
            get(admin::list_invite_codes).post(admin::generate_invite),
        )
}
