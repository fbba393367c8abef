// src/db/customer_repo.rs

use sqlx::PgPool;

use crate::{
    common::{
        db_utils::{violation, Violation},
        error::AppError,
    },
    db::sale_repo::SALE_SELECT,
    models::{
        customer::{Customer, CustomerPayload, CustomerSummary, CustomerType},
        sale::SaleRecord,
    },
};

const CUSTOMER_SELECT: &str = r#"
    SELECT c.id, c.full_name, c.customer_type, c.business_name, c.contact, c.whatsapp,
           c.email, c.address, c.province_id, c.city_id, c.town_id,
           p.name AS province_name, ci.name AS city_name, t.name AS town_name,
           c.created_at, c.updated_at
    FROM customers c
    LEFT JOIN provinces p ON c.province_id = p.id
    LEFT JOIN cities ci ON c.city_id = ci.id
    LEFT JOIN towns t ON c.town_id = t.id
"#;

// Unknown location ids are reported as missing references
fn map_location_error(e: sqlx::Error) -> AppError {
    match violation(&e) {
        Some(Violation::ForeignKey("customers_province_id_fkey")) => AppError::NotFound("Province"),
        Some(Violation::ForeignKey("customers_city_id_fkey")) => AppError::NotFound("City"),
        Some(Violation::ForeignKey("customers_town_id_fkey")) => AppError::NotFound("Town"),
        _ => e.into(),
    }
}

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Newest first
    pub async fn list(&self, customer_type: Option<CustomerType>) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            {CUSTOMER_SELECT}
            WHERE ($1::customer_type IS NULL OR c.customer_type = $1)
            ORDER BY c.created_at DESC, c.id DESC
            "#
        ))
        .bind(customer_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!("{CUSTOMER_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn sales_history(&self, customer_id: i32) -> Result<Vec<SaleRecord>, AppError> {
        let sales = sqlx::query_as::<_, SaleRecord>(&format!(
            "{SALE_SELECT} WHERE s.customer_id = $1 ORDER BY s.created_at DESC, s.id DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    pub async fn summary(&self, customer_id: i32) -> Result<CustomerSummary, AppError> {
        let summary = sqlx::query_as::<_, CustomerSummary>(
            r#"
            SELECT COUNT(*) AS total_orders,
                   COALESCE(SUM(total_price), 0) AS total_spent,
                   COALESCE(SUM(total_price) FILTER (WHERE payment_status = 'pending'), 0) AS pending_amount
            FROM sales
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn create(&self, payload: &CustomerPayload) -> Result<i32, AppError> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO customers (
                full_name, customer_type, business_name, contact, whatsapp,
                email, address, province_id, city_id, town_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&payload.full_name)
        .bind(payload.customer_type)
        .bind(&payload.business_name)
        .bind(&payload.contact)
        .bind(&payload.whatsapp)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(payload.province_id)
        .bind(payload.city_id)
        .bind(payload.town_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_location_error)
    }

    pub async fn update(&self, id: i32, payload: &CustomerPayload) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET full_name = $2, customer_type = $3, business_name = $4, contact = $5,
                whatsapp = $6, email = $7, address = $8,
                province_id = $9, city_id = $10, town_id = $11,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&payload.full_name)
        .bind(payload.customer_type)
        .bind(&payload.business_name)
        .bind(&payload.contact)
        .bind(&payload.whatsapp)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(payload.province_id)
        .bind(payload.city_id)
        .bind(payload.town_id)
        .execute(&self.pool)
        .await
        .map_err(map_location_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Refused by the database while any sale references the customer.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::ForeignKey("sales_customer_id_fkey")) => {
                    AppError::Conflict("Cannot delete customer with existing sales.".to_string())
                }
                _ => e.into(),
            })?;

        Ok(result.rows_affected() > 0)
    }
}
