pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::models::UserProfile;
use crate::validation::{rules, BodyRules, ValidationField};

pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Represents the payload for a user login request.
///
/// Arrives with `password` base64-encoded; by the time a handler sees it the
/// validation mask has decoded it and lowercased `email`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl BodyRules for LoginRequest {
    const RULES: &'static [ValidationField] = rules::LOGIN;
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name, pascal-cased by the validation mask.
    pub name: String,
    pub email: String,
    pub password: String,
}

impl BodyRules for RegisterRequest {
    const RULES: &'static [ValidationField] = rules::REGISTER;
}

/// Response structure after a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The JWT (JSON Web Token) for session authentication.
    pub token: String,
    pub user: UserProfile,
}
