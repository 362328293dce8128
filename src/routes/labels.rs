use actix_web::{post, web, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::User,
    response::{ApiResponse, SuccessKind},
    validation::{rules, BodyRules, ValidatedJson, ValidationField},
};

#[derive(Debug, Deserialize)]
pub struct LabelInput {
    pub label: String,
}

impl BodyRules for LabelInput {
    const RULES: &'static [ValidationField] = rules::CREATE_LABEL;
}

/// Adds a label to the caller's vocabulary and returns the full list.
#[post("")]
pub async fn create_label(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
    input: ValidatedJson<LabelInput>,
) -> Result<impl Responder, AppError> {
    let labels = User::add_label(&pool, user_id.0, input.into_inner().label).await?;

    Ok(ApiResponse::success(SuccessKind::Created).data(json!({ "labels": labels })))
}
