// src/services/product_service.rs

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{Product, ProductPayload},
};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Product, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Product"))
    }

    pub async fn create(&self, payload: &ProductPayload) -> Result<Product, AppError> {
        self.repo.create(payload).await
    }

    pub async fn update(&self, id: i32, payload: &ProductPayload) -> Result<Product, AppError> {
        self.repo.update(id, payload).await?.ok_or(AppError::NotFound("Product"))
    }

    pub async fn toggle(&self, id: i32) -> Result<Product, AppError> {
        let product = self.repo.toggle_active(id).await?.ok_or(AppError::NotFound("Product"))?;
        tracing::info!(product_id = id, is_active = product.is_active, "product toggled");
        Ok(product)
    }
}
