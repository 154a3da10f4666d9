use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid password: {0}")]
    WeakPassword(String),
    #[error("Email already registered: {0}")]
    EmailTaken(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create a new account with a salted password digest
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserError::InvalidName("Name is required".to_string()));
        }
        if name.len() > 100 {
            return Err(UserError::InvalidName(
                "Name must be less than 100 characters".to_string(),
            ));
        }

        super::validate_email(email).map_err(UserError::InvalidEmail)?;

        if password.len() < 8 {
            return Err(UserError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let hash = hash_password(&salt, password);

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_salt, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&salt)
        .bind(&hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            // Unique violation on users.email: the address raced us or already exists
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(UserError::EmailTaken(email.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and return the matching user
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if hash_password(&user.password_salt, password) != user.password_hash {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, UserError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::NotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

/// Salted password digest. The salt is a per-user uuid stored alongside
/// the hash, so identical passwords never share a digest.
fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
