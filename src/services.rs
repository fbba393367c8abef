pub mod agent_service;
pub mod auth;
pub mod customer_service;
pub mod dashboard_service;
pub mod export;
pub mod pricing;
pub mod product_service;
pub mod report_service;
pub mod sale_service;
pub mod session;
