pub mod agents;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod locations;
pub mod pages;
pub mod products;
pub mod reports;
pub mod sales;
