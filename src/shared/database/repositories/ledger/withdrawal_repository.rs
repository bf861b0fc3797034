use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::domains::ledger::models::{OrderNumber, UserId, Withdrawal};

pub struct WithdrawalRepository {
    pool: PgPool,
}

impl WithdrawalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 잔고 확인 후 출금 기록 (하나의 트랜잭션)
    /// Check the balance and record the withdrawal in one transaction
    ///
    /// 사용자 행을 FOR UPDATE로 잠가 같은 사용자의 동시 출금을 직렬화하고,
    /// 잔고 조건을 INSERT ... SELECT ... WHERE 에 넣어 검사와 기록을 한 문장으로 수행합니다.
    ///
    /// 반환값: 기록되었으면 true, 잔고 부족이면 false
    pub async fn withdraw_if_sufficient(
        &self,
        user_id: UserId,
        order: &OrderNumber,
        amount: Decimal,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut tx)
            .await
            .context("Failed to lock user row")?;

        let result = sqlx::query(
            r#"
            INSERT INTO withdrawals (user_id, order_number, amount, processed_at)
            SELECT $1, $2, $3, $4
            WHERE (
                SELECT COALESCE(SUM(accrual), 0)
                FROM orders
                WHERE user_id = $1 AND status = 'PROCESSED'
            ) - (
                SELECT COALESCE(SUM(amount), 0)
                FROM withdrawals
                WHERE user_id = $1
            ) >= $3
            "#,
        )
        .bind(user_id)
        .bind(order.as_str())
        .bind(amount)
        .bind(Utc::now())
        .execute(&mut tx)
        .await
        .context("Failed to insert withdrawal")?;

        if result.rows_affected() == 0 {
            tx.rollback().await.context("Failed to roll back withdrawal")?;
            return Ok(false);
        }

        tx.commit().await.context("Failed to commit withdrawal")?;
        Ok(true)
    }

    /// 사용자의 출금 내역 (처리 순)
    /// Get user withdrawals, oldest first
    pub async fn get_all_by_user(&self, user_id: UserId) -> Result<Vec<Withdrawal>> {
        let rows = sqlx::query(
            r#"
            SELECT order_number, user_id, amount, processed_at
            FROM withdrawals
            WHERE user_id = $1
            ORDER BY processed_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch user withdrawals")?;

        Ok(rows
            .iter()
            .map(|row| Withdrawal {
                order: OrderNumber::from_stored(row.get("order_number")),
                user_id: row.get("user_id"),
                sum: row.get("amount"),
                processed_at: row.get("processed_at"),
            })
            .collect())
    }

    /// 잔고 계산용 합계 (적립 합계, 출금 합계)를 한 문장으로 조회
    /// Accrued and withdrawn totals read in a single statement
    pub async fn get_totals(&self, user_id: UserId) -> Result<(Decimal, Decimal)> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COALESCE(SUM(accrual), 0)
                 FROM orders
                 WHERE user_id = $1 AND status = 'PROCESSED') AS accrued,
                (SELECT COALESCE(SUM(amount), 0)
                 FROM withdrawals
                 WHERE user_id = $1) AS withdrawn
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute balance totals")?;

        Ok((row.get("accrued"), row.get("withdrawn")))
    }
}
