use async_trait::async_trait;
use sqlx::MySqlPool;
use crate::core::error::AppError;
use crate::modules::reports::models::{ServiceFeeBreakdown, TaxBreakdown, CurrencyTotal};

/// Repository for financial report aggregation queries
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Get service fee breakdown by gateway and currency
    async fn get_service_fee_breakdown(
        &self,
        start_date: chrono::NaiveDateTime,
        end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<ServiceFeeBreakdown>, AppError>;

    /// Get tax breakdown by currency and rate
    async fn get_tax_breakdown(
        &self,
        start_date: chrono::NaiveDateTime,
        end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<TaxBreakdown>, AppError>;

    /// Get total revenue by currency
    async fn get_revenue_by_currency(
        &self,
        start_date: chrono::NaiveDateTime,
        end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<CurrencyTotal>, AppError>;
}

pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn get_service_fee_breakdown(
        &self,
        _start_date: chrono::NaiveDateTime,
        _end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<ServiceFeeBreakdown>, AppError> {
        // TODO: Implement service fee breakdown query
        // This is a stub that will make tests fail
        Ok(vec![])
    }

    async fn get_tax_breakdown(
        &self,
        _start_date: chrono::NaiveDateTime,
        _end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<TaxBreakdown>, AppError> {
        // TODO: Implement tax breakdown query
        // This is a stub that will make tests fail
        Ok(vec![])
    }

    async fn get_revenue_by_currency(
        &self,
        _start_date: chrono::NaiveDateTime,
        _end_date: chrono::NaiveDateTime,
    ) -> Result<Vec<CurrencyTotal>, AppError> {
        // TODO: Implement revenue query
        // This is a stub that will make tests fail
        Ok(vec![])
    }
}
