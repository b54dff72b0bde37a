pub mod models;
pub mod repositories;
pub mod services;
pub mod controllers;

pub use models::Tax;
pub use services::TaxCalculator;
pub use repositories::TaxRepository;
