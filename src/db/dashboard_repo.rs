// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_snapshot, error::AppError},
    models::dashboard::{ChannelToday, CustomerTypeToday, DashboardSummary, PaymentTypeToday},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        // One snapshot for every figure on the page
        let mut tx = begin_snapshot(&self.pool).await?;

        // A. Today's sales
        let (today_revenue, today_orders) = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(total_price), 0), COUNT(*)
            FROM sales
            WHERE DATE(created_at) = CURRENT_DATE
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // B. Customer base
        let total_customers = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&mut *tx)
            .await?;

        // C. Outstanding payments, all time
        let pending_amount = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_price), 0) FROM sales WHERE payment_status = 'pending'",
        )
        .fetch_one(&mut *tx)
        .await?;

        // D. Today's breakdowns
        let payment_breakdown = sqlx::query_as::<_, PaymentTypeToday>(
            r#"
            SELECT payment_type, COUNT(*) AS orders, COALESCE(SUM(total_price), 0) AS amount
            FROM sales
            WHERE DATE(created_at) = CURRENT_DATE
            GROUP BY payment_type
            ORDER BY payment_type
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let customer_breakdown = sqlx::query_as::<_, CustomerTypeToday>(
            r#"
            SELECT c.customer_type, COUNT(*) AS orders, COALESCE(SUM(s.total_price), 0) AS amount
            FROM sales s
            JOIN customers c ON s.customer_id = c.id
            WHERE DATE(s.created_at) = CURRENT_DATE
            GROUP BY c.customer_type
            ORDER BY c.customer_type
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let channel_breakdown = sqlx::query_as::<_, ChannelToday>(
            r#"
            SELECT sales_channel, COUNT(*) AS orders, COALESCE(SUM(total_price), 0) AS amount
            FROM sales
            WHERE DATE(created_at) = CURRENT_DATE
            GROUP BY sales_channel
            ORDER BY sales_channel
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            today_revenue,
            today_orders,
            total_customers,
            pending_amount,
            payment_breakdown,
            customer_breakdown,
            channel_breakdown,
        })
    }
}
