// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "target_customer")]
pub enum TargetCustomer {
    B2B,
    B2C,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_unit", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductUnit {
    Kg,
    Bag,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub target_customer: TargetCustomer,
    pub unit: ProductUnit,
    pub weight_per_unit: Decimal,
    pub price_per_unit: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("Value must be greater than zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "Product name is required."))]
    #[serde(default)]
    #[schema(example = "Flour 10kg Bag")]
    pub name: String,

    pub category: Option<String>,

    #[serde(default)]
    pub target_customer: TargetCustomer,

    pub unit: ProductUnit,

    #[validate(custom(function = "validate_positive"))]
    #[serde(default)]
    #[schema(example = 10.0)]
    pub weight_per_unit: Decimal,

    #[validate(custom(function = "validate_positive"))]
    #[serde(default)]
    #[schema(example = 850.0)]
    pub price_per_unit: Decimal,
}
