//! Route definitions for the `/users` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// PUT  /me            -> update_profile
/// PUT  /me/password   -> change_password
/// PUT  /me/pin        -> set_pin
/// POST /me/pin/verify -> verify_pin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", put(users::update_profile))
        .route("/me/password", put(users::change_password))
        .route("/me/pin", put(users::set_pin))
        .route("/me/pin/verify", post(users::verify_pin))
}
