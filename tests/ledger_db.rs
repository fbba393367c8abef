// tests/ledger_db.rs
//
// Runs against a real Postgres when TEST_DATABASE_URL is set; otherwise
// every test returns early.

use std::path::PathBuf;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use flour_crm::{
    common::error::AppError,
    db::{
        user_repo::NewUser,
        AgentRepository, CustomerRepository, ProductRepository, ReportRepository, SaleRepository,
        UserRepository,
    },
    models::{
        agent::{AgentType, OnboardPayload},
        customer::{Customer, CustomerPayload},
        permissions::Role,
        product::ProductPayload,
        report::ReportFilter,
        sale::{SalePayload, SaleRecord},
    },
    services::{
        agent_service::AgentService, customer_service::CustomerService, product_service::ProductService,
        pricing::{PricingError, SaleTotals},
        report_service::ReportService,
        sale_service::SaleService,
    },
};

struct Services {
    pool: PgPool,
    agents: AgentService,
    customers: CustomerService,
    products: ProductService,
    sales: SaleService,
    reports: ReportService,
}

async fn services() -> Option<Services> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("TEST_DATABASE_URL must point at a reachable database");
    sqlx::migrate!().run(&pool).await.expect("migrations should apply");

    Some(Services {
        agents: AgentService::new(
            pool.clone(),
            UserRepository::new(pool.clone()),
            AgentRepository::new(pool.clone()),
        ),
        customers: CustomerService::new(CustomerRepository::new(pool.clone())),
        products: ProductService::new(ProductRepository::new(pool.clone())),
        sales: SaleService::new(SaleRepository::new(pool.clone())),
        reports: ReportService::new(pool.clone(), ReportRepository::new(), PathBuf::from("fonts")),
        pool,
    })
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

fn onboard_payload(email: &str, agent_type: &str) -> OnboardPayload {
    serde_json::from_value(json!({
        "name": "Test Agent",
        "email": email,
        "agent_type": agent_type,
        "commission_rate": 2.5,
    }))
    .unwrap()
}

// First seeded Punjab town, with its city and province
async fn punjab_town(pool: &PgPool) -> (i32, i32, i32) {
    sqlx::query_as(
        "SELECT p.id, c.id, t.id
         FROM towns t
         JOIN cities c ON c.id = t.city_id
         JOIN provinces p ON p.id = c.province_id
         WHERE p.name = 'Punjab'
         ORDER BY t.id
         LIMIT 1",
    )
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn new_customer(s: &Services) -> Customer {
    let (province_id, city_id, town_id) = punjab_town(&s.pool).await;
    let payload: CustomerPayload = serde_json::from_value(json!({
        "full_name": unique("customer"),
        "customer_type": "B2B",
        "business_name": "Test Bakery",
        "contact": "0300-0000000",
        "province_id": province_id,
        "city_id": city_id,
        "town_id": town_id,
    }))
    .unwrap();
    s.customers.create(&payload).await.unwrap()
}

async fn new_sale(s: &Services, customer_id: i32) -> SaleRecord {
    new_sale_with(s, customer_id, json!(10), json!(85), json!(5)).await
}

async fn new_sale_with(
    s: &Services,
    customer_id: i32,
    quantity: serde_json::Value,
    price_per_unit: serde_json::Value,
    tax_rate: serde_json::Value,
) -> SaleRecord {
    let product: ProductPayload = serde_json::from_value(json!({
        "name": unique("flour"),
        "unit": "bag",
        "weight_per_unit": 10,
        "price_per_unit": 85,
    }))
    .unwrap();
    let product = s.products.create(&product).await.unwrap();

    let onboarded = s
        .agents
        .onboard(&onboard_payload(&format!("{}@test.flourcrm.com", unique("agent")), "B2B"))
        .await
        .unwrap();

    let sale: SalePayload = serde_json::from_value(json!({
        "customer_id": customer_id,
        "product_id": product.id,
        "sales_agent_id": onboarded.agent.id,
        "quantity": quantity,
        "price_per_unit": price_per_unit,
        "tax_rate": tax_rate,
        "total_price": 1,
        "payment_type": "credit",
        "sales_channel": "whatsapp",
    }))
    .unwrap();
    s.sales.create(&sale).await.unwrap()
}

#[tokio::test]
async fn test_sale_totals_are_recomputed() {
    let Some(s) = services().await else { return };
    let customer = new_customer(&s).await;

    let sale = new_sale(&s, customer.id).await;

    assert_eq!(sale.subtotal, Decimal::new(850, 0));
    assert_eq!(sale.tax_amount, Decimal::new(425, 1));
    assert_eq!(sale.total_price, Decimal::new(8925, 1));
}

#[tokio::test]
async fn test_fractional_sale_is_stored_exactly() {
    let Some(s) = services().await else { return };
    let customer = new_customer(&s).await;

    let sale = new_sale_with(&s, customer.id, json!(12.5), json!(85.55), json!(17.25)).await;

    let expected = Decimal::new(125, 1)
        * Decimal::new(8555, 2)
        * (Decimal::ONE + Decimal::new(1725, 2) / Decimal::ONE_HUNDRED);
    assert_eq!(sale.quantity, Decimal::new(125, 1));
    assert_eq!(sale.total_price, expected);
    assert_eq!(sale.total_price, sale.subtotal + sale.tax_amount);
}

#[tokio::test]
async fn test_amount_rejected_by_the_table_is_a_bad_request() {
    let Some(s) = services().await else { return };
    let customer = new_customer(&s).await;
    let sale = new_sale(&s, customer.id).await;

    let payload: SalePayload = serde_json::from_value(json!({
        "customer_id": customer.id,
        "product_id": sale.product_id,
        "sales_agent_id": sale.sales_agent_id,
        "quantity": 0,
        "price_per_unit": 85,
        "payment_type": "cash",
        "sales_channel": "call",
    }))
    .unwrap();
    let totals = SaleTotals {
        subtotal: Decimal::ZERO,
        tax_rate: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total_price: Decimal::ZERO,
    };

    let err = SaleRepository::new(s.pool.clone()).create(&payload, &totals).await.unwrap_err();
    assert!(matches!(err, AppError::Pricing(PricingError::NonPositiveQuantity)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

fn new_user(email: &str) -> NewUser<'_> {
    NewUser {
        name: "Case Test",
        email,
        password_hash: "x",
        role: Role::Agent,
        access_level: None,
        permissions: None,
    }
}

#[tokio::test]
async fn test_email_uniqueness_ignores_case() {
    let Some(s) = services().await else { return };
    let email = format!("{}@test.flourcrm.com", unique("case"));
    let repo = UserRepository::new(s.pool.clone());

    repo.create_user(&s.pool, new_user(&email)).await.unwrap();
    let err = repo.create_user(&s.pool, new_user(&email.to_uppercase())).await.unwrap_err();
    assert!(matches!(err, AppError::EmailAlreadyExists));
}

#[tokio::test]
async fn test_monthly_trend_sums_to_total_revenue() {
    let Some(s) = services().await else { return };
    let customer = new_customer(&s).await;
    new_sale(&s, customer.id).await;

    let summary = s.reports.summary(&ReportFilter::default()).await.unwrap();
    let trend_total: Decimal = summary.sales_trend.iter().map(|m| m.revenue).sum();

    assert_eq!(trend_total, summary.total_revenue);
    assert!(summary.total_orders >= 1);
}

#[tokio::test]
async fn test_region_filter_ignores_case() {
    let Some(s) = services().await else { return };
    let customer = new_customer(&s).await;
    new_sale(&s, customer.id).await;

    let lower = ReportFilter { region: Some("punjab".into()), ..Default::default() };
    let upper = ReportFilter { region: Some("PUNJAB".into()), ..Default::default() };

    let lower = s.reports.summary(&lower).await.unwrap();
    let upper = s.reports.summary(&upper).await.unwrap();

    assert_eq!(lower.total_revenue, upper.total_revenue);
    assert_eq!(lower.total_orders, upper.total_orders);
    assert!(lower.total_orders >= 1);
}

#[tokio::test]
async fn test_export_rows_match_totals() {
    let Some(s) = services().await else { return };
    let customer = new_customer(&s).await;
    new_sale(&s, customer.id).await;

    let report = s.reports.snapshot(&ReportFilter::default()).await.unwrap();
    let revenue: Decimal = report.rows.iter().map(|r| r.total_price).sum();

    assert_eq!(report.rows.len() as i64, report.totals.total_sales);
    assert_eq!(revenue, report.totals.total_revenue);
    assert_eq!(
        report.totals.paid_upfront_amount + report.totals.credit_amount,
        report.totals.total_revenue
    );
}

#[tokio::test]
async fn test_customer_with_sales_cannot_be_deleted() {
    let Some(s) = services().await else { return };
    let customer = new_customer(&s).await;
    new_sale(&s, customer.id).await;

    let err = s.customers.delete(customer.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Still there
    assert!(s.customers.get(customer.id).await.is_ok());
}

#[tokio::test]
async fn test_deleting_missing_customer_is_not_found() {
    let Some(s) = services().await else { return };

    let err = s.customers.delete(i32::MAX).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_sale_for_missing_customer_is_not_found() {
    let Some(s) = services().await else { return };

    let sale: SalePayload = serde_json::from_value(json!({
        "customer_id": i32::MAX,
        "product_id": 1,
        "sales_agent_id": 1,
        "quantity": 1,
        "price_per_unit": 1,
        "payment_type": "cash",
        "sales_channel": "call",
    }))
    .unwrap();

    let err = s.sales.create(&sale).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_duplicate_onboarding_leaves_no_partial_rows() {
    let Some(s) = services().await else { return };
    let email = format!("{}@test.flourcrm.com", unique("dup"));

    let first = s.agents.onboard(&onboard_payload(&email, "B2C")).await.unwrap();
    assert!(first.temporary_password);

    let err = s.agents.onboard(&onboard_payload(&email, "B2B")).await.unwrap_err();
    assert!(matches!(err, AppError::EmailAlreadyExists));

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&s.pool)
        .await
        .unwrap();
    let agents: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sales_agents sa JOIN users u ON u.id = sa.user_id WHERE u.email = $1",
    )
    .bind(&email)
    .fetch_one(&s.pool)
    .await
    .unwrap();

    assert_eq!(users, 1);
    assert_eq!(agents, 1);
}

#[tokio::test]
async fn test_agent_type_filter_includes_both() {
    let Some(s) = services().await else { return };
    let both = s
        .agents
        .onboard(&onboard_payload(&format!("{}@test.flourcrm.com", unique("both")), "Both"))
        .await
        .unwrap();

    let b2b = s.agents.list(Some(AgentType::B2B)).await.unwrap();
    assert!(b2b.iter().any(|a| a.id == both.agent.id));
    assert!(b2b.iter().all(|a| a.agent_type != AgentType::B2C));
}
