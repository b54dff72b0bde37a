use async_trait::async_trait;
use sqlx::MySqlPool;
use crate::core::error::AppError;
use rust_decimal::Decimal;

/// Repository for tax aggregation queries
#[async_trait]
pub trait TaxRepository: Send + Sync {
    /// Get tax totals grouped by currency and rate for a date range
    async fn get_tax_breakdown(
        &self,
        start_date: chrono::NaiveDateTime,
        end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<TaxBreakdown>, AppError>;
}

#[derive(Debug, Clone)]
pub struct TaxBreakdown {
    pub currency: String,
    pub tax_rate: Decimal,
    pub total_amount: Decimal,
    pub transaction_count: i64,
}

pub struct MySqlTaxRepository {
    pool: MySqlPool,
}

impl MySqlTaxRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxRepository for MySqlTaxRepository {
    async fn get_tax_breakdown(
        &self,
        _start_date: chrono::NaiveDateTime,
        _end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<TaxBreakdown>, AppError> {
        // TODO: Implement tax breakdown query
        // This is a stub that will make tests fail
        Ok(vec![])
    }
}
