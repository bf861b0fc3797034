use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::domains::ledger::models::{Order, OrderNumber, OrderStatus, UserId};

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 주문 삽입 (이미 있으면 아무것도 하지 않음)
    /// Insert an order unless the number already exists
    ///
    /// 반환값: 새로 삽입되었으면 true
    pub async fn insert_if_absent(&self, user_id: UserId, number: &OrderNumber) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO orders (number, user_id, status, uploaded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (number) DO NOTHING
            "#,
        )
        .bind(number.as_str())
        .bind(user_id)
        .bind(OrderStatus::New.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .context("Failed to insert order")?;

        Ok(result.rows_affected() == 1)
    }

    /// 주문 소유자 조회
    /// Get the owner of an order
    pub async fn get_owner(&self, number: &OrderNumber) -> Result<Option<UserId>> {
        sqlx::query_scalar::<_, i64>("SELECT user_id FROM orders WHERE number = $1")
            .bind(number.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch order owner")
    }

    /// 사용자의 주문 목록 (업로드 순)
    /// Get user orders, oldest first
    pub async fn get_all_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT number, user_id, status, accrual, uploaded_at
            FROM orders
            WHERE user_id = $1
            ORDER BY uploaded_at ASC, number ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch user orders")?;

        rows.iter().map(|r| self.row_to_order(r)).collect()
    }

    /// 판정 대기 중인 주문 번호 (NEW, PROCESSING)
    /// Numbers of orders awaiting a verdict
    pub async fn get_pending_numbers(&self) -> Result<Vec<OrderNumber>> {
        let numbers = sqlx::query_scalar::<_, String>(
            r#"
            SELECT number
            FROM orders
            WHERE status IN ('NEW', 'PROCESSING')
            ORDER BY uploaded_at ASC, number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch pending orders")?;

        Ok(numbers.into_iter().map(OrderNumber::from_stored).collect())
    }

    /// 상태 변경 (허용된 이전 상태에서만)
    /// Update status only from an allowed predecessor
    pub async fn update_status(&self, number: &OrderNumber, status: OrderStatus) -> Result<u64> {
        let predecessors: Vec<String> = status
            .predecessors()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = $2
            WHERE number = $1 AND status = ANY($3)
            "#,
        )
        .bind(number.as_str())
        .bind(status.as_str())
        .bind(&predecessors)
        .execute(&self.pool)
        .await
        .context("Failed to update order status")?;

        Ok(result.rows_affected())
    }

    /// PROCESSED 확정 (상태와 적립 포인트를 한 문장으로 기록)
    /// Mark a non-terminal order PROCESSED with its accrual in one statement
    pub async fn mark_processed(&self, number: &OrderNumber, accrual: Decimal) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'PROCESSED', accrual = $2
            WHERE number = $1 AND status IN ('NEW', 'PROCESSING')
            "#,
        )
        .bind(number.as_str())
        .bind(accrual)
        .execute(&self.pool)
        .await
        .context("Failed to mark order processed")?;

        Ok(result.rows_affected())
    }

    /// Row를 Order로 변환하는 헬퍼 메서드
    /// Helper method to convert Row to Order
    fn row_to_order(&self, row: &sqlx::postgres::PgRow) -> Result<Order> {
        let status: String = row.get("status");
        Ok(Order {
            number: OrderNumber::from_stored(row.get("number")),
            user_id: row.get("user_id"),
            status: status.parse()?,
            accrual: row.get("accrual"),
            uploaded_at: row.get("uploaded_at"),
        })
    }
}
