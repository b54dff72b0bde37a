use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{error, info};

use crate::core::error::AppError;
use crate::modules::invoices::models::InvoiceStatus;
use crate::modules::invoices::repositories::invoice_repository::InvoiceRepository;

/// Background job for checking and expiring invoices per FR-045
/// 
/// Runs every 5 minutes using tokio interval timer
/// Queries invoices with expires_at < current_time AND status IN ('draft', 'pending', 'partially_paid')
/// Updates status to 'expired'
/// Logs expiration events
pub struct ExpirationChecker {
    invoice_repo: Arc<dyn InvoiceRepository>,
}

impl ExpirationChecker {
    pub fn new(invoice_repo: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoice_repo }
    }

    /// Start the background expiration checker
    /// This should be spawned as a tokio task in main.rs
    pub async fn start(self: Arc<Self>) {
        info!("Starting invoice expiration checker (runs every 5 minutes)");

        let mut ticker = interval(Duration::from_secs(300)); // 5 minutes

        loop {
            ticker.tick().await;

            match self.check_and_expire_invoices().await {
                Ok(expired_count) => {
                    if expired_count > 0 {
                        info!(
                            expired_count = expired_count,
                            "Expired invoices processed"
                        );
                    }
                }
                Err(e) => {
                    error!(
                        error = %e,
                        "Error checking expired invoices"
                    );
                }
            }
        }
    }

    /// Check for expired invoices and update their status
    async fn check_and_expire_invoices(&self) -> Result<usize, AppError> {
        // TODO: Implement actual database query
        // Query: SELECT id FROM invoices 
        //        WHERE expires_at < NOW() 
        //        AND status IN ('draft', 'pending', 'partially_paid')
        // 
        // For each invoice:
        // - Update status to 'expired'
        // - Log expiration event
        
        info!("Checking for expired invoices");
        
        // Placeholder - actual implementation needs database query
        let expired_count = 0;
        
        Ok(expired_count)
    }
}
