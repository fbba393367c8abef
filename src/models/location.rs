// src/models/location.rs

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Province {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct City {
    pub id: i32,
    pub province_id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Town {
    pub id: i32,
    pub city_id: i32,
    pub name: String,
}
