// src/db/sale_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{violation, Violation},
        error::AppError,
    },
    models::sale::{PaymentStatus, SalePayload, SaleRecord},
    services::pricing::{PricingError, SaleTotals},
};

pub(crate) const SALE_SELECT: &str = r#"
    SELECT s.id, s.customer_id, s.product_id, s.sales_agent_id,
           s.quantity, s.price_per_unit, s.subtotal, s.tax_rate, s.tax_amount, s.total_price,
           s.payment_type, s.payment_status, s.sales_channel, s.notes,
           s.created_at, s.updated_at,
           c.full_name AS customer_name, c.customer_type,
           p.name AS product_name,
           u.name AS agent_name,
           pr.name AS province_name, ci.name AS city_name
    FROM sales s
    JOIN customers c ON s.customer_id = c.id
    JOIN products p ON s.product_id = p.id
    LEFT JOIN sales_agents sa ON s.sales_agent_id = sa.id
    LEFT JOIN users u ON sa.user_id = u.id
    LEFT JOIN provinces pr ON c.province_id = pr.id
    LEFT JOIN cities ci ON c.city_id = ci.id
"#;

// A sale pointing at a missing row is a 404 for that row, a rejected amount a 400
fn map_reference_error(e: sqlx::Error) -> AppError {
    match violation(&e) {
        Some(Violation::ForeignKey("sales_customer_id_fkey")) => AppError::NotFound("Customer"),
        Some(Violation::ForeignKey("sales_product_id_fkey")) => AppError::NotFound("Product"),
        Some(Violation::ForeignKey("sales_sales_agent_id_fkey")) => AppError::NotFound("Sales agent"),
        Some(Violation::Check("sales_quantity_check")) => PricingError::NonPositiveQuantity.into(),
        Some(Violation::Check("sales_price_per_unit_check")) => PricingError::NonPositivePrice.into(),
        _ => e.into(),
    }
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<SaleRecord>, AppError> {
        let sales = sqlx::query_as::<_, SaleRecord>(&format!(
            "{SALE_SELECT} ORDER BY s.created_at DESC, s.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<SaleRecord>, AppError> {
        let sale = sqlx::query_as::<_, SaleRecord>(&format!("{SALE_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    pub async fn create(&self, payload: &SalePayload, totals: &SaleTotals) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO sales (
                customer_id, product_id, sales_agent_id, quantity, price_per_unit,
                subtotal, tax_rate, tax_amount, total_price,
                payment_type, payment_status, sales_channel, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(payload.customer_id)
        .bind(payload.product_id)
        .bind(payload.sales_agent_id)
        .bind(payload.quantity)
        .bind(payload.price_per_unit)
        .bind(totals.subtotal)
        .bind(totals.tax_rate)
        .bind(totals.tax_amount)
        .bind(totals.total_price)
        .bind(payload.payment_type)
        .bind(payload.payment_status)
        .bind(payload.sales_channel)
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(map_reference_error)
    }

    pub async fn update(&self, id: i32, payload: &SalePayload, totals: &SaleTotals) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE sales
            SET customer_id = $2, product_id = $3, sales_agent_id = $4,
                quantity = $5, price_per_unit = $6,
                subtotal = $7, tax_rate = $8, tax_amount = $9, total_price = $10,
                payment_type = $11, payment_status = $12, sales_channel = $13, notes = $14,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload.customer_id)
        .bind(payload.product_id)
        .bind(payload.sales_agent_id)
        .bind(payload.quantity)
        .bind(payload.price_per_unit)
        .bind(totals.subtotal)
        .bind(totals.tax_rate)
        .bind(totals.tax_amount)
        .bind(totals.total_price)
        .bind(payload.payment_type)
        .bind(payload.payment_status)
        .bind(payload.sales_channel)
        .bind(&payload.notes)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_payment_status(&self, id: i32, status: PaymentStatus) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE sales SET payment_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
