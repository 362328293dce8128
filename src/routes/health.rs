use actix_web::{get, Responder};
use chrono::Utc;
use serde_json::json;

use crate::response::{ApiResponse, SuccessKind};

/// Welcome message at the root path.
#[get("/")]
pub async fn home() -> impl Responder {
    ApiResponse::success(SuccessKind::Ok).data("Welcome to the to-do API")
}

/// Health check endpoint
///
/// Returns the current status of the API and timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    ApiResponse::success(SuccessKind::Ok).data(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}
