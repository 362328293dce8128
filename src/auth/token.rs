use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// How long an issued token stays valid.
pub const TOKEN_TTL_DAYS: i64 = 5;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Email the user logged in with.
    pub email: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

fn jwt_secret() -> Result<String, AppError> {
    std::env::var("JWT_SECRET").map_err(|_| {
        log::error!("JWT_SECRET is not set");
        AppError::InternalServerError("JWT_SECRET not set".into())
    })
}

/// Generates a JWT for a user, valid for [`TOKEN_TTL_DAYS`] days.
///
/// Signed with the `JWT_SECRET` environment variable. Returns
/// `AppError::InternalServerError` if the secret is missing or encoding fails.
pub fn generate_token(user_id: i32, email: &str) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(TOKEN_TTL_DAYS))
        .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret()?.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// Returns `AppError::Unauthorized` if the token is malformed, its signature is
/// invalid, or it has expired.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let secret = jwt_secret()?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref JWT_ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    }

    // Runs test logic with a temporarily set JWT_SECRET
    fn run_with_temp_jwt_secret<F>(secret_value: &str, test_logic: F)
    where
        F: FnOnce(),
    {
        let _guard = JWT_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let original_secret_val = std::env::var("JWT_SECRET").ok();
        std::env::set_var("JWT_SECRET", secret_value);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(test_logic));

        if let Some(original) = original_secret_val {
            std::env::set_var("JWT_SECRET", original);
        } else {
            std::env::remove_var("JWT_SECRET");
        }

        if let Err(panic_payload) = result {
            std::panic::resume_unwind(panic_payload);
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        run_with_temp_jwt_secret("test_secret_for_gen_verify", || {
            let token = generate_token(1, "user@example.com").unwrap();
            let claims = verify_token(&token).unwrap();
            assert_eq!(claims.sub, 1);
            assert_eq!(claims.email, "user@example.com");

            let ttl = claims.exp as i64 - chrono::Utc::now().timestamp();
            assert!(ttl > 4 * 24 * 3600 && ttl <= 5 * 24 * 3600);
        });
    }

    #[test]
    fn test_token_expiration() {
        run_with_temp_jwt_secret("test_secret_for_expiration", || {
            let expiration = (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize;

            let claims_expired = Claims {
                sub: 2,
                email: "user@example.com".to_string(),
                exp: expiration,
            };
            let expired_token = encode(
                &Header::default(),
                &claims_expired,
                &EncodingKey::from_secret("test_secret_for_expiration".as_bytes()),
            )
            .unwrap();

            match verify_token(&expired_token) {
                Err(AppError::Unauthorized(msg)) => {
                    assert!(msg.contains("Invalid token: ExpiredSignature"));
                }
                Ok(_) => panic!("Token should have been invalid due to expiration"),
                Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
            }
        });
    }

    #[test]
    fn test_token_signed_with_other_secret() {
        let token = std::sync::Mutex::new(String::new());
        run_with_temp_jwt_secret("first_secret", || {
            *token.lock().unwrap() = generate_token(3, "user@example.com").unwrap();
        });
        run_with_temp_jwt_secret("a_completely_different_secret", || {
            match verify_token(&token.lock().unwrap()) {
                Err(AppError::Unauthorized(msg)) => {
                    assert!(msg.contains("Invalid token: InvalidSignature"));
                }
                Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
                Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
            }
        });
    }

    #[test]
    fn test_missing_secret() {
        let _guard = JWT_ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let original = std::env::var("JWT_SECRET").ok();
        std::env::remove_var("JWT_SECRET");

        let result = generate_token(1, "user@example.com");

        if let Some(original) = original {
            std::env::set_var("JWT_SECRET", original);
        }
        assert!(matches!(result, Err(AppError::InternalServerError(_))));
    }
}
