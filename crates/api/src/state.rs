use std::sync::Arc;

use crate::config::ServerConfig;
use crate::email::InviteMailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: corkboard_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// SMTP mailer for invite codes; `None` when SMTP is not configured.
    pub mailer: Option<Arc<InviteMailer>>,
}
