// src/models/customer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::sale::SaleRecord;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "customer_type")]
pub enum CustomerType {
    B2B,
    B2C,
}

impl CustomerType {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerType::B2B => "B2B",
            CustomerType::B2C => "B2C",
        }
    }
}

// Customer row joined with its location names
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub full_name: String,
    pub customer_type: CustomerType,
    pub business_name: Option<String>,
    pub contact: String,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub province_id: i32,
    pub city_id: i32,
    pub town_id: i32,
    pub province_name: Option<String>,
    pub city_name: Option<String>,
    pub town_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, sqlx::FromRow, ToSchema)]
pub struct CustomerSummary {
    pub total_orders: i64,
    pub total_spent: Decimal,
    pub pending_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub sales: Vec<SaleRecord>,
    pub summary: CustomerSummary,
}

/// Body of POST and PUT. Required ids default to 0 so a missing one is a
/// field error instead of a body rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_business_name"))]
pub struct CustomerPayload {
    #[validate(length(min = 1, message = "Full name is required."))]
    #[serde(default)]
    pub full_name: String,

    pub customer_type: CustomerType,

    pub business_name: Option<String>,

    #[validate(length(min = 1, message = "Contact is required."))]
    #[serde(default)]
    pub contact: String,

    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,

    #[validate(range(min = 1, message = "Province is required."))]
    #[serde(default)]
    pub province_id: i32,

    #[validate(range(min = 1, message = "City is required."))]
    #[serde(default)]
    pub city_id: i32,

    #[validate(range(min = 1, message = "Town is required."))]
    #[serde(default)]
    pub town_id: i32,
}

fn validate_business_name(payload: &CustomerPayload) -> Result<(), ValidationError> {
    let missing = payload
        .business_name
        .as_deref()
        .is_none_or(|name| name.trim().is_empty());

    if payload.customer_type == CustomerType::B2B && missing {
        let mut err = ValidationError::new("business_name");
        err.message = Some("Business name required for B2B customers".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct CustomerQuery {
    pub customer_type: Option<CustomerType>,
}
