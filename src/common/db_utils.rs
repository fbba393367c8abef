use sqlx::{PgPool, Postgres, Transaction};

use crate::common::error::AppError;

/// Constraint violations the handlers translate into 400/404/409 answers.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Violation<'a> {
    Unique(&'a str),
    ForeignKey(&'a str),
    Check(&'a str),
}

/// Extracts the violated constraint (by name) from a database error.
pub(crate) fn violation(error: &sqlx::Error) -> Option<Violation<'_>> {
    let db_err = error.as_database_error()?;
    let constraint = db_err.constraint().unwrap_or("");

    if db_err.is_unique_violation() {
        Some(Violation::Unique(constraint))
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey(constraint))
    } else if db_err.is_check_violation() {
        Some(Violation::Check(constraint))
    } else {
        None
    }
}

// ---
// Read snapshot for reports
// ---
/// Opens a read-only REPEATABLE READ transaction so every aggregate of one
/// report sees the same rows.
pub(crate) async fn begin_snapshot(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}
