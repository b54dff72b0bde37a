use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Three-way split of a payment amount, in minor currency units
///
/// The second and third installments are equal; the first absorbs whatever
/// rounding remainder the division leaves, so the three always sum back to
/// the original total exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    /// Charged immediately, carries the rounding remainder
    pub first: u64,
    /// Charged one month out
    pub second: u64,
    /// Charged two months out
    pub third: u64,
}

impl InstallmentPlan {
    pub fn total(&self) -> u64 {
        self.first + self.second + self.third
    }
}

/// Due dates for the two deferred installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    pub first_due: NaiveDate,
    pub second_due: NaiveDate,
}

impl InstallmentSchedule {
    /// First due date in the gateway's `DD/MM/YYYY` encoding
    pub fn first_due_encoded(&self) -> String {
        self.first_due.format("%d/%m/%Y").to_string()
    }

    /// Second due date in the gateway's `DD/MM/YYYY` encoding
    pub fn second_due_encoded(&self) -> String {
        self.second_due.format("%d/%m/%Y").to_string()
    }

    /// Minimum card validity as `YYMM`: the card must still be live when
    /// the last installment is drawn
    pub fn card_validity_encoded(&self) -> String {
        self.second_due.format("%y%m").to_string()
    }
}

/// Gateway encoding of a minor-unit amount: zero-padded to three digits,
/// wider values pass through untruncated
pub fn encode_amount(amount: u64) -> String {
    format!("{:03}", amount)
}
