// src/services/export.rs

use std::path::PathBuf;

use genpdf::{elements, style, Element};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_xlsxwriter::{Color, Format, Workbook};

use crate::{common::error::AppError, models::report::SalesReport};

/// Serializes one report snapshot into a downloadable document.
pub trait ReportWriter: Send + 'static {
    fn content_type(&self) -> &'static str;
    fn file_name(&self) -> &'static str;
    fn render(&self, report: &SalesReport) -> Result<Vec<u8>, AppError>;
}

fn money(value: Decimal) -> String {
    format!("Rs. {:.2}", value.round_dp(2))
}

// =============================================================================
//  SPREADSHEET
// =============================================================================

const SHEET_NAME: &str = "Sales Report";

// (header, width)
const COLUMNS: [(&str, f64); 15] = [
    ("Sale ID", 10.0),
    ("Date", 15.0),
    ("Customer", 20.0),
    ("Type", 10.0),
    ("City", 15.0),
    ("Region", 10.0),
    ("Product", 20.0),
    ("Quantity", 10.0),
    ("Price/Unit", 12.0),
    ("Total", 12.0),
    ("Payment Type", 12.0),
    ("Payment Status", 12.0),
    ("Channel", 12.0),
    ("Agent", 15.0),
    ("Notes", 30.0),
];

/// One sheet, one row per sale, bold grey header.
pub struct SpreadsheetWriter;

impl ReportWriter for SpreadsheetWriter {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn file_name(&self) -> &'static str {
        "sales-report.xlsx"
    }

    fn render(&self, report: &SalesReport) -> Result<Vec<u8>, AppError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        let header = Format::new().set_bold().set_background_color(Color::RGB(0xE0E0E0));
        for (col, (title, width)) in COLUMNS.iter().enumerate() {
            let col = col as u16;
            sheet.write_string_with_format(0, col, *title, &header)?;
            sheet.set_column_width(col, *width)?;
        }

        for (index, sale) in report.rows.iter().enumerate() {
            let row = index as u32 + 1;
            let number = |value: Decimal| value.to_f64().unwrap_or_default();

            sheet.write_number(row, 0, f64::from(sale.id))?;
            sheet.write_string(row, 1, sale.created_at.date_naive().format("%Y-%m-%d").to_string())?;
            sheet.write_string(row, 2, &sale.customer_name)?;
            sheet.write_string(row, 3, sale.customer_type.as_str())?;
            sheet.write_string(row, 4, sale.city.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 5, sale.region.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 6, &sale.product_name)?;
            sheet.write_number(row, 7, number(sale.quantity))?;
            sheet.write_number(row, 8, number(sale.price_per_unit))?;
            sheet.write_number(row, 9, number(sale.total_price))?;
            sheet.write_string(row, 10, sale.payment_type.as_str())?;
            sheet.write_string(row, 11, sale.payment_status.as_str())?;
            sheet.write_string(row, 12, sale.sales_channel.as_str())?;
            sheet.write_string(row, 13, sale.agent_name.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 14, sale.notes.as_deref().unwrap_or(""))?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

// =============================================================================
//  PDF
// =============================================================================

/// Summary-only document: totals and the payment split.
pub struct PdfWriter {
    fonts_dir: PathBuf,
}

impl PdfWriter {
    pub fn new(fonts_dir: PathBuf) -> Self {
        Self { fonts_dir }
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::ExportError(e.to_string())
}

impl ReportWriter for PdfWriter {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_name(&self) -> &'static str {
        "sales-report.pdf"
    }

    fn render(&self, report: &SalesReport) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(self.fonts_dir.display().to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title("Flour CRM Sales Report");
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- Header ---
        doc.push(
            elements::Paragraph::new("Flour CRM Sales Report")
                .styled(style::Style::new().bold().with_font_size(20)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Generated on: {}",
            report.generated_on.format("%Y-%m-%d")
        )));
        doc.push(elements::Break::new(1.5));

        // --- Summary ---
        let totals = &report.totals;
        doc.push(elements::Paragraph::new("Summary").styled(style::Style::new().bold().with_font_size(16)));
        doc.push(elements::Paragraph::new(format!("Total Sales: {}", totals.total_sales)));
        doc.push(elements::Paragraph::new(format!("Total Revenue: {}", money(totals.total_revenue))));
        doc.push(elements::Paragraph::new(format!(
            "Paid Upfront (Deposit/Cash/Bank): {}",
            money(totals.paid_upfront_amount)
        )));
        doc.push(elements::Paragraph::new(format!("Credit Amount: {}", money(totals.credit_amount))));
        doc.push(elements::Break::new(1.5));

        // --- Payment breakdown ---
        doc.push(
            elements::Paragraph::new("Revenue by Payment Type")
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        let mut table = elements::TableLayout::new(vec![3, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Payment Type").styled(bold))
            .element(elements::Paragraph::new("Amount").styled(bold))
            .push()
            .map_err(pdf_error)?;

        for method in &report.payment_methods {
            table
                .row()
                .element(elements::Paragraph::new(method.payment_type.as_str()))
                .element(elements::Paragraph::new(money(method.amount)))
                .push()
                .map_err(pdf_error)?;
        }
        doc.push(table);

        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;

        Ok(buffer)
    }
}
