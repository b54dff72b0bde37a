pub mod invoice_service;
pub mod expiration_checker;

pub use invoice_service::InvoiceService;
pub use expiration_checker::ExpirationChecker;
