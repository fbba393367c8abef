// src/services/sale_service.rs

use crate::{
    common::error::AppError,
    db::SaleRepository,
    models::sale::{PaymentStatus, SalePayload, SaleRecord},
    services::pricing::compute_totals,
};

#[derive(Clone)]
pub struct SaleService {
    repo: SaleRepository,
}

impl SaleService {
    pub fn new(repo: SaleRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<SaleRecord>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<SaleRecord, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Sale"))
    }

    // Amounts are always recomputed from quantity, price and tax rate
    pub async fn create(&self, payload: &SalePayload) -> Result<SaleRecord, AppError> {
        let totals = compute_totals(payload.quantity, payload.price_per_unit, payload.tax_rate)?;
        let id = self.repo.create(payload, &totals).await?;

        tracing::info!(sale_id = id, total = %totals.total_price, "sale recorded");
        self.get(id).await
    }

    pub async fn update(&self, id: i32, payload: &SalePayload) -> Result<SaleRecord, AppError> {
        let totals = compute_totals(payload.quantity, payload.price_per_unit, payload.tax_rate)?;

        if !self.repo.update(id, payload, &totals).await? {
            return Err(AppError::NotFound("Sale"));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Sale"));
        }
        Ok(())
    }

    pub async fn set_payment_status(&self, id: i32, status: PaymentStatus) -> Result<SaleRecord, AppError> {
        if !self.repo.set_payment_status(id, status).await? {
            return Err(AppError::NotFound("Sale"));
        }
        self.get(id).await
    }
}
