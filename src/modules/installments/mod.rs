pub mod models;
pub mod services;

pub use models::{encode_amount, InstallmentPlan, InstallmentSchedule};
pub use services::InstallmentCalculator;
