// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    customer::CustomerType,
    sale::{PaymentType, SalesChannel},
};

// Today's figures for the landing page
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub today_revenue: Decimal,
    pub today_orders: i64,
    pub total_customers: i64,
    pub pending_amount: Decimal,
    pub payment_breakdown: Vec<PaymentTypeToday>,
    pub customer_breakdown: Vec<CustomerTypeToday>,
    pub channel_breakdown: Vec<ChannelToday>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct PaymentTypeToday {
    pub payment_type: PaymentType,
    pub orders: i64,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct CustomerTypeToday {
    pub customer_type: CustomerType,
    pub orders: i64,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct ChannelToday {
    pub sales_channel: SalesChannel,
    pub orders: i64,
    pub amount: Decimal,
}
