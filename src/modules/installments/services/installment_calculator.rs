use chrono::{Months, NaiveDate};
use tracing::debug;

use crate::core::{AppError, Result};
use crate::modules::installments::models::{InstallmentPlan, InstallmentSchedule};

/// Calculator for the gateway's fixed three-installment plan
pub struct InstallmentCalculator;

impl InstallmentCalculator {
    /// Split `total_amount` (minor units) into three installments and
    /// schedule the two deferred charges from `from`, the conversion date.
    ///
    /// Installments 2 and 3 each get `total / 3` rounded down; the first
    /// installment takes the rest, so the plan sums back to `total_amount`
    /// exactly and no minor unit is lost to rounding. Due dates are one and
    /// two calendar months out; adding a month to a month-end date clamps
    /// to the last valid day of the target month, and the second addition
    /// starts from the clamped first date.
    pub fn compute_plan(
        total_amount: u64,
        from: NaiveDate,
    ) -> Result<(InstallmentPlan, InstallmentSchedule)> {
        let deferred = total_amount / 3;
        let first = total_amount - deferred * 2;

        let plan = InstallmentPlan {
            first,
            second: deferred,
            third: deferred,
        };
        debug_assert_eq!(plan.total(), total_amount);

        let first_due = from
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::validation("Failed to calculate first due date"))?;
        let second_due = first_due
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::validation("Failed to calculate second due date"))?;

        debug!(
            total_amount,
            first = plan.first,
            deferred,
            %first_due,
            %second_due,
            "Computed three-time payment plan"
        );

        Ok((
            plan,
            InstallmentSchedule {
                first_due,
                second_due,
            },
        ))
    }
}
