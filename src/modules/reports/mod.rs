pub mod models;
pub mod repositories;
pub mod services;
pub mod controllers;

pub use models::FinancialReport;
pub use services::ReportService;
pub use repositories::ReportRepository;
