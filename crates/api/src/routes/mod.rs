pub mod admin;
pub mod auth;
pub mod health;
pub mod notes;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                           register (public, invite-gated)
/// /auth/login                              login (public)
/// /auth/me                                 current user
///
/// /users/me                                update profile (PUT)
/// /users/me/password                       change password (PUT)
/// /users/me/pin                            set/change hidden-layer PIN (PUT)
/// /users/me/pin/verify                     verify PIN (POST)
///
/// /notes                                   list (?layer=), create
/// /notes/{id}                              detail, update, delete
/// /notes/{id}/publish                      publish draft (PUT)
/// /notes/{id}/replies                      create reply (POST)
/// /notes/{id}/replies/{reply_id}           update, delete reply
///
/// /admin/users                             list users (admin only)
/// /admin/users/{id}                        delete user
/// /admin/users/{id}/role                   change role (PUT)
/// /admin/deleted-notes                     list archive
/// /admin/deleted-notes/{id}                permanent delete
/// /admin/deleted-notes/{id}/restore        restore (POST)
/// /admin/deleted-replies                   list archive
/// /admin/invite-codes                      list, generate
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, me).
        .nest("/auth", auth::router())
        // Profile, password, and PIN management.
        .nest("/users", users::router())
        // Notes and their nested replies.
        .nest("/notes", notes::router())
        // Admin: users, archive, invite codes.
        .nest("/admin", admin::router())
}
