pub mod user_repo;
pub use user_repo::UserRepository;
pub mod agent_repo;
pub use agent_repo::AgentRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod sale_repo;
pub use sale_repo::SaleRepository;
pub mod location_repo;
pub use location_repo::LocationRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
