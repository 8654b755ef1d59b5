//! Shared response envelope types for API handlers.
//!
//! All API responses use the `{ "success": true, "data": ... }` envelope;
//! error paths produce `{ "success": false, "error": ... }` (see
//! [`crate::error::AppError`]). Use [`ApiResponse`] instead of ad-hoc
//! `serde_json::json!` so the envelope stays consistent and type-checked.

use serde::Serialize;

/// Standard success envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(ApiResponse::new(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
