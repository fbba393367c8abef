// src/db/report_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::{
        customer::CustomerType,
        report::{
            CustomerTypeRevenue, MonthlyRevenue, PaymentMethodAmount, RegionPerformance,
            ReportFilter, ReportRow, ReportTotals, TopProduct,
        },
        sale::SalesChannel,
    },
};

// Every report query reads from the same joined row set
const REPORT_FROM: &str = r#"
    FROM sales s
    JOIN customers c ON s.customer_id = c.id
    JOIN products p ON s.product_id = p.id
    LEFT JOIN provinces pr ON c.province_id = pr.id
    LEFT JOIN cities ci ON c.city_id = ci.id
    LEFT JOIN sales_agents sa ON s.sales_agent_id = sa.id
    LEFT JOIN users u ON sa.user_id = u.id
    WHERE 1=1
"#;

// ---
// Predicates
// ---

/// One AND-ed clause of the report WHERE.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    FromDate(NaiveDate),
    ToDate(NaiveDate),
    Region(String),
    Channel(SalesChannel),
    CustomerType(CustomerType),
}

impl Predicate {
    pub fn push(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::FromDate(date) => {
                qb.push(" AND DATE(s.created_at) >= ").push_bind(*date);
            }
            Predicate::ToDate(date) => {
                qb.push(" AND DATE(s.created_at) <= ").push_bind(*date);
            }
            Predicate::Region(name) => {
                qb.push(" AND LOWER(pr.name) = LOWER(").push_bind(name.clone()).push(")");
            }
            Predicate::Channel(channel) => {
                qb.push(" AND s.sales_channel = ").push_bind(*channel);
            }
            Predicate::CustomerType(customer_type) => {
                qb.push(" AND c.customer_type = ").push_bind(*customer_type);
            }
        }
    }
}

impl ReportFilter {
    /// Present filters only, in a fixed order.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(date) = self.start_date {
            predicates.push(Predicate::FromDate(date));
        }
        if let Some(date) = self.end_date {
            predicates.push(Predicate::ToDate(date));
        }
        if let Some(region) = &self.region {
            predicates.push(Predicate::Region(region.clone()));
        }
        if let Some(channel) = self.sales_channel {
            predicates.push(Predicate::Channel(channel));
        }
        if let Some(customer_type) = self.customer_type {
            predicates.push(Predicate::CustomerType(customer_type));
        }

        predicates
    }
}

/// `SELECT <select> FROM ... WHERE 1=1 AND <filters>`, ready for a tail.
pub(crate) fn filtered_query<'a>(select: &str, filter: &ReportFilter) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(select);
    qb.push(REPORT_FROM);
    for predicate in filter.predicates() {
        predicate.push(&mut qb);
    }
    qb
}

// ---
// Repository
// ---

/// Stateless: every method runs on the caller's connection so one report
/// can read all aggregates from a single snapshot.
#[derive(Clone, Default)]
pub struct ReportRepository;

impl ReportRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn headline(
        &self,
        conn: &mut PgConnection,
        filter: &ReportFilter,
    ) -> Result<(Decimal, i64, Decimal), AppError> {
        let mut qb = filtered_query(
            r#"
            SELECT COALESCE(SUM(s.total_price), 0),
                   COUNT(s.id),
                   ROUND(COALESCE(AVG(s.total_price), 0), 0)
            "#,
            filter,
        );
        let row = qb.build_query_as::<(Decimal, i64, Decimal)>().fetch_one(&mut *conn).await?;
        Ok(row)
    }

    // Distinct products sold that are still active
    pub async fn active_products(&self, conn: &mut PgConnection, filter: &ReportFilter) -> Result<i64, AppError> {
        let mut qb = filtered_query("SELECT COUNT(DISTINCT s.product_id)", filter);
        qb.push(" AND p.is_active");
        let count = qb.build_query_scalar::<i64>().fetch_one(&mut *conn).await?;
        Ok(count)
    }

    pub async fn monthly_trend(
        &self,
        conn: &mut PgConnection,
        filter: &ReportFilter,
    ) -> Result<Vec<MonthlyRevenue>, AppError> {
        let mut qb = filtered_query(
            r#"
            SELECT to_char(date_trunc('month', s.created_at), 'YYYY-MM') AS month,
                   COALESCE(SUM(s.total_price), 0) AS revenue
            "#,
            filter,
        );
        qb.push(" GROUP BY 1 ORDER BY 1 ASC");
        let rows = qb.build_query_as::<MonthlyRevenue>().fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    pub async fn payment_methods(
        &self,
        conn: &mut PgConnection,
        filter: &ReportFilter,
    ) -> Result<Vec<PaymentMethodAmount>, AppError> {
        let mut qb = filtered_query(
            "SELECT s.payment_type AS type, COALESCE(SUM(s.total_price), 0) AS amount",
            filter,
        );
        qb.push(" GROUP BY s.payment_type ORDER BY s.payment_type");
        let rows = qb.build_query_as::<PaymentMethodAmount>().fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    pub async fn customer_types(
        &self,
        conn: &mut PgConnection,
        filter: &ReportFilter,
    ) -> Result<Vec<CustomerTypeRevenue>, AppError> {
        let mut qb = filtered_query(
            "SELECT c.customer_type AS type, COALESCE(SUM(s.total_price), 0) AS revenue",
            filter,
        );
        qb.push(" GROUP BY c.customer_type ORDER BY c.customer_type");
        let rows = qb.build_query_as::<CustomerTypeRevenue>().fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    // Unnamed regions are left out
    pub async fn regions(
        &self,
        conn: &mut PgConnection,
        filter: &ReportFilter,
    ) -> Result<Vec<RegionPerformance>, AppError> {
        let mut qb = filtered_query(
            r#"
            SELECT pr.name AS name,
                   COALESCE(SUM(s.total_price), 0) AS revenue,
                   COUNT(s.id) AS orders
            "#,
            filter,
        );
        qb.push(" AND pr.name IS NOT NULL GROUP BY pr.name ORDER BY revenue DESC, pr.name ASC");
        let rows = qb.build_query_as::<RegionPerformance>().fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    // Ties keep the product's insertion order
    pub async fn top_products(
        &self,
        conn: &mut PgConnection,
        filter: &ReportFilter,
    ) -> Result<Vec<TopProduct>, AppError> {
        let mut qb = filtered_query(
            r#"
            SELECT p.name AS name,
                   COALESCE(SUM(s.quantity), 0) AS units_sold,
                   COALESCE(SUM(s.total_price), 0) AS revenue
            "#,
            filter,
        );
        qb.push(" GROUP BY p.id, p.name ORDER BY revenue DESC, p.id ASC LIMIT 5");
        let rows = qb.build_query_as::<TopProduct>().fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    pub async fn rows(&self, conn: &mut PgConnection, filter: &ReportFilter) -> Result<Vec<ReportRow>, AppError> {
        let mut qb = filtered_query(
            r#"
            SELECT s.id, s.created_at,
                   c.full_name AS customer_name, c.customer_type,
                   ci.name AS city, pr.name AS region,
                   p.name AS product_name,
                   s.quantity, s.price_per_unit, s.total_price,
                   s.payment_type, s.payment_status, s.sales_channel,
                   u.name AS agent_name, s.notes
            "#,
            filter,
        );
        qb.push(" ORDER BY s.created_at DESC, s.id DESC");
        let rows = qb.build_query_as::<ReportRow>().fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    pub async fn totals(&self, conn: &mut PgConnection, filter: &ReportFilter) -> Result<ReportTotals, AppError> {
        let mut qb = filtered_query(
            r#"
            SELECT COUNT(s.id) AS total_sales,
                   COALESCE(SUM(s.total_price), 0) AS total_revenue,
                   COALESCE(SUM(s.total_price) FILTER (WHERE s.payment_type <> 'credit'), 0) AS paid_upfront_amount,
                   COALESCE(SUM(s.total_price) FILTER (WHERE s.payment_type = 'credit'), 0) AS credit_amount
            "#,
            filter,
        );
        let totals = qb.build_query_as::<ReportTotals>().fetch_one(&mut *conn).await?;
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filter: &ReportFilter) -> String {
        filtered_query("SELECT COUNT(*)", filter).sql().to_string()
    }

    #[test]
    fn test_no_filters_no_predicates() {
        let filter = ReportFilter::default();
        assert!(filter.predicates().is_empty());

        let sql = sql_for(&filter);
        assert!(sql.trim_end().ends_with("WHERE 1=1"));
        assert!(!sql.contains('$'));
    }

    #[test]
    fn test_each_predicate_clause() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let cases = [
            (Predicate::FromDate(date), " AND DATE(s.created_at) >= $1"),
            (Predicate::ToDate(date), " AND DATE(s.created_at) <= $1"),
            (Predicate::Region("Punjab".into()), " AND LOWER(pr.name) = LOWER($1)"),
            (Predicate::Channel(SalesChannel::Call), " AND s.sales_channel = $1"),
            (Predicate::CustomerType(CustomerType::B2C), " AND c.customer_type = $1"),
        ];

        for (predicate, expected) in cases {
            let mut qb = QueryBuilder::<Postgres>::new("");
            predicate.push(&mut qb);
            assert_eq!(qb.sql(), expected);
        }
    }

    #[test]
    fn test_all_filters_chain_in_order() {
        let filter = ReportFilter {
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31),
            region: Some("kpk".into()),
            sales_channel: Some(SalesChannel::InPerson),
            customer_type: Some(CustomerType::B2B),
        };

        let sql = sql_for(&filter);
        let from = sql.find("DATE(s.created_at) >= $1").unwrap();
        let to = sql.find("DATE(s.created_at) <= $2").unwrap();
        let region = sql.find("LOWER(pr.name) = LOWER($3)").unwrap();
        let channel = sql.find("s.sales_channel = $4").unwrap();
        let kind = sql.find("c.customer_type = $5").unwrap();
        assert!(from < to && to < region && region < channel && channel < kind);
    }

    #[test]
    fn test_absent_filters_add_nothing() {
        let filter = ReportFilter { region: Some("Punjab".into()), ..Default::default() };
        let sql = sql_for(&filter);

        assert!(sql.contains("LOWER(pr.name) = LOWER($1)"));
        assert!(!sql.contains("created_at) >="));
        assert!(!sql.contains("sales_channel ="));
        assert!(!sql.contains("$2"));
    }
}
