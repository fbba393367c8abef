// src/services/customer_service.rs

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::customer::{Customer, CustomerDetail, CustomerPayload, CustomerType},
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, customer_type: Option<CustomerType>) -> Result<Vec<Customer>, AppError> {
        self.repo.list(customer_type).await
    }

    pub async fn get(&self, id: i32) -> Result<CustomerDetail, AppError> {
        let customer = self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Customer"))?;
        let sales = self.repo.sales_history(id).await?;
        let summary = self.repo.summary(id).await?;

        Ok(CustomerDetail { customer, sales, summary })
    }

    pub async fn create(&self, payload: &CustomerPayload) -> Result<Customer, AppError> {
        let id = self.repo.create(payload).await?;
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Customer"))
    }

    pub async fn update(&self, id: i32, payload: &CustomerPayload) -> Result<Customer, AppError> {
        if !self.repo.update(id, payload).await? {
            return Err(AppError::NotFound("Customer"));
        }
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Customer"))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Customer"));
        }
        tracing::info!(customer_id = id, "customer deleted");
        Ok(())
    }
}
