// src/services/report_service.rs

use std::path::PathBuf;

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::{db_utils::begin_snapshot, error::AppError},
    db::ReportRepository,
    models::report::{ReportFilter, ReportRow, ReportSummary, SalesReport},
    services::export::{PdfWriter, ReportWriter, SpreadsheetWriter},
};

/// A rendered export ready to be sent as an attachment.
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: &'static str,
}

#[derive(Clone)]
pub struct ReportService {
    pool: PgPool,
    repo: ReportRepository,
    fonts_dir: PathBuf,
}

impl ReportService {
    pub fn new(pool: PgPool, repo: ReportRepository, fonts_dir: PathBuf) -> Self {
        Self { pool, repo, fonts_dir }
    }

    pub async fn summary(&self, filter: &ReportFilter) -> Result<ReportSummary, AppError> {
        let mut tx = begin_snapshot(&self.pool).await?;

        let (total_revenue, total_orders, avg_order_value) = self.repo.headline(&mut tx, filter).await?;
        let active_products = self.repo.active_products(&mut tx, filter).await?;
        let sales_trend = self.repo.monthly_trend(&mut tx, filter).await?;
        let payment_methods = self.repo.payment_methods(&mut tx, filter).await?;
        let customer_types = self.repo.customer_types(&mut tx, filter).await?;
        let regional_performance = self.repo.regions(&mut tx, filter).await?;
        let top_products = self.repo.top_products(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(ReportSummary {
            total_revenue,
            total_orders,
            avg_order_value,
            active_products,
            sales_trend,
            payment_methods,
            customer_types,
            regional_performance,
            top_products,
        })
    }

    pub async fn rows(&self, filter: &ReportFilter) -> Result<Vec<ReportRow>, AppError> {
        let mut tx = begin_snapshot(&self.pool).await?;
        let rows = self.repo.rows(&mut tx, filter).await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Rows, totals and payment split for the filter, from one snapshot.
    pub async fn snapshot(&self, filter: &ReportFilter) -> Result<SalesReport, AppError> {
        let mut tx = begin_snapshot(&self.pool).await?;

        let rows = self.repo.rows(&mut tx, filter).await?;
        let totals = self.repo.totals(&mut tx, filter).await?;
        let payment_methods = self.repo.payment_methods(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(SalesReport {
            generated_on: Utc::now().date_naive(),
            rows,
            totals,
            payment_methods,
        })
    }

    pub fn spreadsheet_writer(&self) -> SpreadsheetWriter {
        SpreadsheetWriter
    }

    pub fn pdf_writer(&self) -> PdfWriter {
        PdfWriter::new(self.fonts_dir.clone())
    }

    /// Same snapshot, different writer. Rendering runs on the blocking pool.
    pub async fn export<W: ReportWriter>(&self, filter: &ReportFilter, writer: W) -> Result<ExportFile, AppError> {
        let report = self.snapshot(filter).await?;

        let content_type = writer.content_type();
        let file_name = writer.file_name();

        let bytes = tokio::task::spawn_blocking(move || writer.render(&report))
            .await
            .map_err(|e| anyhow::anyhow!("report rendering task failed: {}", e))??;

        tracing::info!(file_name, size = bytes.len(), "report exported");

        Ok(ExportFile { bytes, content_type, file_name })
    }
}
