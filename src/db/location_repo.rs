// src/db/location_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::location::{City, Province, Town},
};

// Read-only reference data
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn provinces(&self) -> Result<Vec<Province>, AppError> {
        let rows = sqlx::query_as::<_, Province>("SELECT id, name FROM provinces ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn cities(&self, province_id: i32) -> Result<Vec<City>, AppError> {
        let rows = sqlx::query_as::<_, City>(
            "SELECT id, province_id, name FROM cities WHERE province_id = $1 ORDER BY name",
        )
        .bind(province_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn towns(&self, city_id: i32) -> Result<Vec<Town>, AppError> {
        let rows = sqlx::query_as::<_, Town>(
            "SELECT id, city_id, name FROM towns WHERE city_id = $1 ORDER BY name",
        )
        .bind(city_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
