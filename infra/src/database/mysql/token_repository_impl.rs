//! MySQL implementation of the RefreshTokenRepository trait.
//!
//! Rows are keyed by `token_hash`. Expiry is compared against the injected
//! clock rather than the database server time, so every store agrees on "now".

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use st_core::domain::RefreshToken;
use st_core::errors::DomainError;
use st_core::repositories::RefreshTokenRepository;
use st_core::services::Clock;

use super::{db_error, parse_uuid};

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, expires_at, created_at, updated_at";

/// MySQL implementation of RefreshTokenRepository
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
    clock: Arc<dyn Clock>,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    /// * `clock` - Time source for expiry filtering
    pub fn new(pool: MySqlPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let column = |name: &str, e: sqlx::Error| {
            DomainError::internal(format!("Failed to get {}: {}", name, e))
        };

        let id: String = row.try_get("id").map_err(|e| column("id", e))?;
        let user_id: String = row.try_get("user_id").map_err(|e| column("user_id", e))?;

        Ok(RefreshToken {
            id: parse_uuid("refresh_tokens.id", &id)?,
            user_id: parse_uuid("refresh_tokens.user_id", &user_id)?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| column("token_hash", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column("expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column("updated_at", e))?,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.expires_at)
            .bind(token.created_at)
            .bind(token.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to save refresh token", e))?;

        Ok(token)
    }

    async fn find_by_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? AND expires_at > ? LIMIT 1",
            TOKEN_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .bind(self.clock.now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE user_id = ? AND expires_at > ? \
             ORDER BY created_at DESC",
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(self.clock.now())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list refresh tokens", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, DomainError> {
        // A single DELETE is atomic; rows_affected tells concurrent callers apart
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete user refresh tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(self.clock.now())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete expired refresh tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
