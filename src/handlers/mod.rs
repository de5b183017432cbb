//! HTTP handlers

use axum::http::Uri;

use crate::AppError;

pub mod health;
pub mod page;
pub mod predict;
pub mod tracks;

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
