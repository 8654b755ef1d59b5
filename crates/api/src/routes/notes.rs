//! Route definitions for the `/notes` resource and its nested replies.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{notes, replies};
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// GET    /                           -> list_notes (?layer=)
/// POST   /                           -> create_note
/// GET    /{id}                       -> get_note
/// PUT    /{id}                       -> update_note
/// DELETE /{id}                       -> delete_note
/// PUT    /{id}/publish               -> publish_note
/// POST   /{id}/replies               -> create_reply
/// PUT    /{id}/replies/{reply_id}    -> update_reply
/// DELETE /{id}/replies/{reply_id}    -> delete_reply
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_notes).post(notes::create_note))
        .route(
            "/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/{id}/publish", put(notes::publish_note))
        .route("/{id}/replies", post(replies::create_reply))
        .route(
            "/{id}/replies/{reply_id}",
            put(replies::update_reply).delete(replies::delete_reply),
        )
}
