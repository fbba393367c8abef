// src/db/product_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::product::{Product, ProductPayload},
};

const PRODUCT_COLUMNS: &str = r#"
    id, name, category, target_customer, unit, weight_per_unit, price_per_unit,
    is_active, created_at, updated_at
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn create(&self, payload: &ProductPayload) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, category, target_customer, unit, weight_per_unit, price_per_unit)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&payload.name)
        .bind(&payload.category)
        .bind(payload.target_customer)
        .bind(payload.unit)
        .bind(payload.weight_per_unit)
        .bind(payload.price_per_unit)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    pub async fn update(&self, id: i32, payload: &ProductPayload) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, category = $3, target_customer = $4, unit = $5,
                weight_per_unit = $6, price_per_unit = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.category)
        .bind(payload.target_customer)
        .bind(payload.unit)
        .bind(payload.weight_per_unit)
        .bind(payload.price_per_unit)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    // Flips is_active in place
    pub async fn toggle_active(&self, id: i32) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET is_active = NOT is_active, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }
}
