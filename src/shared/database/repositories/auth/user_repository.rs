use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{PgPool, Row};

use crate::domains::auth::models::User;
use crate::domains::ledger::models::UserId;

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 사용자 생성. 로그인이 이미 있으면 None
    // Create user; None when the login is taken
    pub async fn create_user(&self, login: &str, password_hash: &str) -> Result<Option<UserId>> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (login, password_hash, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (login) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(id)
    }

    // 로그인으로 사용자 조회
    // Get user by login
    pub async fn get_user_by_login(&self, login: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, login, password_hash, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by login")?;

        let row = match row {
            Some(r) => r,
            None => return Ok(None),
        };

        Ok(Some(User {
            id: row.get("id"),
            login: row.get("login"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }))
    }
}
