use crate::{
    auth::{generate_token, verify_password, AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    models::{User, UserProfile},
    response::{ApiResponse, SuccessKind},
    validation::ValidatedJson,
};
use actix_web::{post, web, Responder};
use sqlx::PgPool;

/// Register a new user
///
/// Creates the account with the default label vocabulary and returns its public profile.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: ValidatedJson<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let RegisterRequest {
        name,
        email,
        password,
    } = register_data.into_inner();

    let user = User::create(&pool, &name, &email, &password).await?;

    Ok(ApiResponse::success(SuccessKind::Created).data(UserProfile::from(user)))
}

/// Login user
///
/// Authenticates a user and returns an authentication token with the user's profile.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: ValidatedJson<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = User::find_by_email(&pool, &login_data.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        log::warn!("Failed login for user {}", user.id);
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = generate_token(user.id, &user.email)?;
    log::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(SuccessKind::Ok).data(AuthResponse {
        token,
        user: user.into(),
    }))
}
