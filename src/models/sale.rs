// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    models::{customer::CustomerType, product::validate_positive},
    services::pricing::{check_amount, MAX_AMOUNT, MAX_TAX_RATE},
};

fn bounds_error(value: Decimal, limit: Decimal) -> Result<(), ValidationError> {
    check_amount(value, limit).map_err(|e| {
        let mut err = ValidationError::new("range");
        err.message = Some(e.to_string().into());
        err
    })
}

// Quantity and unit price: positive, cents at most, below 100,000,000
fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(value)?;
    bounds_error(*value, MAX_AMOUNT)
}

fn validate_tax_rate(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Tax rate cannot be negative.".into());
        return Err(err);
    }
    bounds_error(*value, MAX_TAX_RATE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Deposit,
    Cash,
    BankTransfer,
    Credit,
}

impl PaymentType {
    /// Everything except credit is settled at the time of sale.
    pub fn is_upfront(self) -> bool {
        self != PaymentType::Credit
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Deposit => "deposit",
            PaymentType::Cash => "cash",
            PaymentType::BankTransfer => "bank_transfer",
            PaymentType::Credit => "credit",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sales_channel", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SalesChannel {
    Website,
    Whatsapp,
    Call,
    #[sqlx(rename = "in-person")]
    #[serde(rename = "in-person")]
    InPerson,
}

impl SalesChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            SalesChannel::Website => "website",
            SalesChannel::Whatsapp => "whatsapp",
            SalesChannel::Call => "call",
            SalesChannel::InPerson => "in-person",
        }
    }
}

// Sale joined with the names the screens display
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct SaleRecord {
    pub id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub sales_agent_id: i32,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_price: Decimal,
    pub payment_type: PaymentType,
    pub payment_status: PaymentStatus,
    pub sales_channel: SalesChannel,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub customer_name: String,
    pub customer_type: CustomerType,
    pub product_name: String,
    pub agent_name: Option<String>,
    pub province_name: Option<String>,
    pub city_name: Option<String>,
}

/// Body of POST and PUT. Any client-side total is ignored; amounts are
/// always recomputed.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SalePayload {
    #[validate(range(min = 1, message = "Customer is required."))]
    #[serde(default)]
    pub customer_id: i32,

    #[validate(range(min = 1, message = "Product is required."))]
    #[serde(default)]
    pub product_id: i32,

    #[validate(range(min = 1, message = "Sales agent is required."))]
    #[serde(default)]
    pub sales_agent_id: i32,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 10.0)]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    #[schema(example = 85.0)]
    pub price_per_unit: Decimal,

    #[validate(custom(function = "validate_tax_rate"))]
    #[schema(example = 5.0)]
    pub tax_rate: Option<Decimal>,

    pub payment_type: PaymentType,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    pub sales_channel: SalesChannel,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentStatusPayload {
    pub payment_status: PaymentStatus,
}
