// src/models/report.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{de::IntoDeserializer, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{
    customer::CustomerType,
    sale::{PaymentStatus, PaymentType, SalesChannel},
};

// =============================================================================
//  FILTERS
// =============================================================================

/// Optional report filters. Empty query values (`?region=`) count as absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportFilter {
    /// Inclusive, compared against the sale's calendar day.
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "2025-01-01")]
    pub start_date: Option<NaiveDate>,

    /// Inclusive.
    #[serde(default, deserialize_with = "empty_as_none")]
    #[param(value_type = Option<String>, example = "2025-12-31")]
    pub end_date: Option<NaiveDate>,

    /// Province name, case-insensitive.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub region: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub sales_channel: Option<SalesChannel>,

    #[serde(default, deserialize_with = "empty_as_none")]
    pub customer_type: Option<CustomerType>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::deserialize(value.to_string().into_deserializer()).map(Some),
    }
}

// =============================================================================
//  SUMMARY
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_revenue: Decimal,
    pub total_orders: i64,
    /// Rounded to the nearest whole unit.
    pub avg_order_value: Decimal,
    pub active_products: i64,
    pub sales_trend: Vec<MonthlyRevenue>,
    pub payment_methods: Vec<PaymentMethodAmount>,
    pub customer_types: Vec<CustomerTypeRevenue>,
    pub regional_performance: Vec<RegionPerformance>,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct PaymentMethodAmount {
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub payment_type: PaymentType,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct CustomerTypeRevenue {
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub customer_type: CustomerType,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct RegionPerformance {
    pub name: String,
    pub revenue: Decimal,
    pub orders: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub name: String,
    pub units_sold: Decimal,
    pub revenue: Decimal,
}

// =============================================================================
//  EXPORT
// =============================================================================

/// One sale line of the report, shared by JSON, spreadsheet and PDF output.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ReportRow {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_type: CustomerType,
    pub city: Option<String>,
    pub region: Option<String>,
    pub product_name: String,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub total_price: Decimal,
    pub payment_type: PaymentType,
    pub payment_status: PaymentStatus,
    pub sales_channel: SalesChannel,
    pub agent_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow, ToSchema)]
pub struct ReportTotals {
    pub total_sales: i64,
    pub total_revenue: Decimal,
    pub paid_upfront_amount: Decimal,
    pub credit_amount: Decimal,
}

/// Everything an export writer needs, taken from one snapshot.
#[derive(Debug, Clone)]
pub struct SalesReport {
    pub generated_on: NaiveDate,
    pub rows: Vec<ReportRow>,
    pub totals: ReportTotals,
    pub payment_methods: Vec<PaymentMethodAmount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn filter(pairs: &[(&str, &str)]) -> ReportFilter {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let value = serde_json::to_value(map).unwrap();
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_values_are_absent() {
        let f = filter(&[("start_date", ""), ("region", "  "), ("sales_channel", "")]);
        assert!(f.start_date.is_none());
        assert!(f.region.is_none());
        assert!(f.sales_channel.is_none());
    }

    #[test]
    fn test_typed_values_parse() {
        let f = filter(&[
            ("start_date", "2025-03-01"),
            ("end_date", "2025-03-31"),
            ("region", "punjab"),
            ("sales_channel", "in-person"),
            ("customer_type", "B2B"),
        ]);
        assert_eq!(f.start_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(f.end_date, NaiveDate::from_ymd_opt(2025, 3, 31));
        assert_eq!(f.region.as_deref(), Some("punjab"));
        assert_eq!(f.sales_channel, Some(SalesChannel::InPerson));
        assert_eq!(f.customer_type, Some(CustomerType::B2B));
    }

    #[test]
    fn test_summary_keys_are_camel_case() {
        let summary = ReportSummary {
            total_revenue: Decimal::ZERO,
            total_orders: 0,
            avg_order_value: Decimal::ZERO,
            active_products: 0,
            sales_trend: vec![],
            payment_methods: vec![PaymentMethodAmount {
                payment_type: PaymentType::Credit,
                amount: Decimal::ONE,
            }],
            customer_types: vec![],
            regional_performance: vec![],
            top_products: vec![TopProduct {
                name: "Flour 10kg Bag".into(),
                units_sold: Decimal::TEN,
                revenue: Decimal::ONE,
            }],
        };

        let value = serde_json::to_value(summary).unwrap();
        for key in [
            "totalRevenue",
            "totalOrders",
            "avgOrderValue",
            "activeProducts",
            "salesTrend",
            "paymentMethods",
            "customerTypes",
            "regionalPerformance",
            "topProducts",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["paymentMethods"][0]["type"], "credit");
        assert!(value["topProducts"][0].get("unitsSold").is_some());
    }
}
