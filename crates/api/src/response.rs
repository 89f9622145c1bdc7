//! Shared response envelope types for API handlers.
//!
//! Animal endpoints answer with a `{ "message": ..., "data": ... }` envelope,
//! the contract the shelter client was built against.

use serde::Serialize;

/// `{ "message": "...", "data": T }` envelope carrying a human-readable summary.
///
/// # Example
///
/// ```ignore
/// Ok(Json(MessageResponse::new("Animals retrieved successfully", animals)))
/// ```
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> MessageResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self { message, data }
    }
}
