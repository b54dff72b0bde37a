pub mod installment_plan;

pub use installment_plan::{encode_amount, InstallmentPlan, InstallmentSchedule};
