// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::middleware::auth::SESSION_COOKIE;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::status,
        handlers::auth::list_users,
        handlers::auth::update_access,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::toggle_product,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::create_sale,
        handlers::sales::update_sale,
        handlers::sales::delete_sale,
        handlers::sales::update_payment_status,

        // --- Sales agents ---
        handlers::agents::list_agents,
        handlers::agents::create_agent,
        handlers::agents::onboard_agent,
        handlers::agents::update_agent,

        // --- Locations ---
        handlers::locations::list_provinces,
        handlers::locations::list_cities,
        handlers::locations::list_towns,

        // --- Dashboard & reports ---
        handlers::dashboard::get_dashboard,
        handlers::reports::get_summary,
        handlers::reports::get_rows,
        handlers::reports::export_excel,
        handlers::reports::export_pdf,
    ),
    components(
        schemas(
            // --- Auth ---
            models::permissions::Role,
            models::permissions::AccessLevel,
            models::permissions::Resource,
            models::permissions::Action,
            models::permissions::ActionFlags,
            models::auth::Principal,
            models::auth::UserSummary,
            models::auth::LoginPayload,
            models::auth::LoginResponse,
            models::auth::SessionStatus,

            // --- Customers ---
            models::customer::CustomerType,
            models::customer::Customer,
            models::customer::CustomerSummary,
            models::customer::CustomerDetail,
            models::customer::CustomerPayload,

            // --- Products ---
            models::product::TargetCustomer,
            models::product::ProductUnit,
            models::product::Product,
            models::product::ProductPayload,

            // --- Sales ---
            models::sale::PaymentType,
            models::sale::PaymentStatus,
            models::sale::SalesChannel,
            models::sale::SaleRecord,
            models::sale::SalePayload,
            models::sale::PaymentStatusPayload,

            // --- Agents ---
            models::agent::AgentType,
            models::agent::SalesAgent,
            models::agent::CreateAgentPayload,
            models::agent::UpdateAgentPayload,
            models::agent::OnboardResponse,

            // --- Locations ---
            models::location::Province,
            models::location::City,
            models::location::Town,

            // --- Dashboard & reports ---
            models::dashboard::DashboardSummary,
            models::dashboard::PaymentTypeToday,
            models::dashboard::CustomerTypeToday,
            models::dashboard::ChannelToday,
            models::report::ReportSummary,
            models::report::MonthlyRevenue,
            models::report::PaymentMethodAmount,
            models::report::CustomerTypeRevenue,
            models::report::RegionPerformance,
            models::report::TopProduct,
            models::report::ReportRow,
            models::report::ReportTotals,
        )
    ),
    tags(
        (name = "Auth", description = "Login, session status and user access"),
        (name = "Customers", description = "B2B and B2C customers"),
        (name = "Products", description = "Flour products and pricing"),
        (name = "Sales", description = "Sales ledger and payment status"),
        (name = "Sales Agents", description = "Agents and onboarding"),
        (name = "Locations", description = "Province, city and town reference data"),
        (name = "Dashboard", description = "Today's figures"),
        (name = "Reports", description = "Filtered aggregates and Excel/PDF exports")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}
