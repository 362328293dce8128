use actix_web::{get, web, Responder};
use sqlx::PgPool;

use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{User, UserSummary},
    response::{ApiResponse, SuccessKind},
};

/// The caller's name and label vocabulary.
#[get("")]
pub async fn get_user(
    pool: web::Data<PgPool>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = User::find_by_id(&pool, user_id.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(ApiResponse::success(SuccessKind::Ok).data(UserSummary::from(user)))
}
