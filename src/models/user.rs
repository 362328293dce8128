use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::labels::{decode_labels, default_labels, encode_labels};
use crate::auth::password::hash_password;
use crate::error::AppError;

const USER_COLUMNS: &str = "id, name, email, password_hash, labels";

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Label vocabulary offered when tagging tasks.
    pub labels: Vec<String>,
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
    labels: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            labels: decode_labels(&row.labels)?,
        })
    }
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub labels: Vec<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            labels: user.labels,
        }
    }
}

/// Body of `GET /users`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub name: String,
    pub labels: Vec<String>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        UserSummary {
            name: user.name,
            labels: user.labels,
        }
    }
}

/// Appends `label` to `labels`, rejecting exact duplicates.
pub fn push_label(labels: &mut Vec<String>, label: String) -> Result<(), AppError> {
    if labels.contains(&label) {
        return Err(AppError::Conflict("Label already exists".into()));
    }
    labels.push(label);
    Ok(())
}

impl User {
    /// Registers a user with the default label vocabulary.
    /// `password` is the decoded plain text; only its bcrypt hash is stored.
    pub async fn create(pool: &PgPool, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        if User::find_by_email(pool, email).await?.is_some() {
            return Err(AppError::Conflict("Email already in use".into()));
        }

        let password_hash = hash_password(password)?;
        let labels = encode_labels(&default_labels())?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password_hash, labels) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(&labels)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            // Lost a race with a concurrent registration.
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                AppError::Conflict("Email already in use".into())
            }
            _ => AppError::from(e),
        })?;

        log::info!("Registered user {}", row.id);
        row.try_into()
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Adds `label` to the user's vocabulary and returns the updated list.
    pub async fn add_label(pool: &PgPool, id: i32, label: String) -> Result<Vec<String>, AppError> {
        let mut user = User::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        push_label(&mut user.labels, label)?;

        sqlx::query("UPDATE users SET labels = $1 WHERE id = $2")
            .bind(encode_labels(&user.labels)?)
            .bind(id)
            .execute(pool)
            .await?;

        log::info!("User {} now has {} labels", id, user.labels.len());
        Ok(user.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_label() {
        let mut labels = default_labels();
        push_label(&mut labels, "Compras".to_string()).unwrap();
        assert_eq!(labels.last().map(String::as_str), Some("Compras"));

        match push_label(&mut labels, "Personal".to_string()) {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Label already exists"),
            other => panic!("Expected a conflict, got {:?}", other),
        }
        assert_eq!(labels.len(), 4);
    }

    #[test]
    fn test_profile_hides_password_hash() {
        let user = User {
            id: 1,
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            labels: default_labels(),
        };

        let value = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["labels"][0], "Trabajo");
    }

    #[test]
    fn test_row_with_corrupt_labels_is_an_error() {
        let row = UserRow {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            labels: "Trabajo".to_string(),
        };
        assert!(matches!(User::try_from(row), Err(AppError::InternalServerError(_))));
    }
}
