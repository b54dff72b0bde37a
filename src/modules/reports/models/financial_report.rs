use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Financial report aggregating service fees and taxes over a date range
/// Implements FR-012 (financial reporting), FR-063 (breakdowns), FR-064 (currency separation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Start date of the reporting period (inclusive)
    pub start_date: NaiveDate,
    /// End date of the reporting period (inclusive)
    pub end_date: NaiveDate,
    /// Service fee breakdown by gateway and currency
    pub service_fees: Vec<ServiceFeeBreakdown>,
    /// Tax breakdown by rate and currency
    pub taxes: Vec<TaxBreakdown>,
}

/// Service fee aggregation grouped by gateway and currency (FR-063)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceFeeBreakdown {
    /// Gateway identifier (e.g., "xendit", "midtrans")
    pub gateway: String,
    /// Currency code (e.g., "IDR", "USD")
    pub currency: String,
    /// Total service fees collected in this currency for this gateway
    pub total_amount: Decimal,
    /// Number of transactions that contributed to this total
    pub transaction_count: i64,
}

/// Tax aggregation grouped by rate and currency (FR-063, FR-064)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Tax rate as decimal (e.g., 0.11 for 11% VAT)
    pub tax_rate: Decimal,
    /// Currency code (e.g., "IDR", "USD")
    pub currency: String,
    /// Total tax collected at this rate in this currency
    pub total_amount: Decimal,
    /// Number of line items that contributed to this total
    pub transaction_count: i64,
}

impl FinancialReport {
    /// Create a new financial report for the specified date range
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        service_fees: Vec<ServiceFeeBreakdown>,
        taxes: Vec<TaxBreakdown>,
    ) -> Self {
        Self {
            start_date,
            end_date,
            service_fees,
            taxes,
        }
    }

    /// Check if the report is empty (no service fees or taxes)
    pub fn is_empty(&self) -> bool {
        self.service_fees.is_empty() && self.taxes.is_empty()
    }

    /// Get total service fees across all gateways and currencies
    pub fn total_service_fees(&self) -> Decimal {
        self.service_fees
            .iter()
            .map(|sf| sf.total_amount)
            .sum()
    }

    /// Get total taxes across all rates and currencies
    pub fn total_taxes(&self) -> Decimal {
        self.taxes
            .iter()
            .map(|t| t.total_amount)
            .sum()
    }
}

impl ServiceFeeBreakdown {
    /// Create a new service fee breakdown
    pub fn new(gateway: String, currency: String, total_amount: Decimal, transaction_count: i64) -> Self {
        Self {
            gateway,
            currency,
            total_amount,
            transaction_count,
        }
    }
}

impl TaxBreakdown {
    /// Create a new tax breakdown
    pub fn new(tax_rate: Decimal, currency: String, total_amount: Decimal, transaction_count: i64) -> Self {
        Self {
            tax_rate,
            currency,
            total_amount,
            transaction_count,
        }
    }
}
