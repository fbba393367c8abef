pub mod agent;
pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod location;
pub mod permissions;
pub mod product;
pub mod report;
pub mod sale;
