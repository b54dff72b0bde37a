use serde::{Deserialize, Serialize};

/// Read-only projection of the host order, captured at conversion time
///
/// The host framework owns the live order; this snapshot carries the only
/// fields the gateway request needs and is discarded once the parameter
/// set is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Host order number, used as the gateway reference
    pub number: String,

    /// Total to charge, in minor currency units
    pub amount: u64,

    /// ISO currency code as the host stores it (e.g. "EUR")
    pub currency_code: String,

    pub customer: CustomerSnapshot,

    /// Absent when the order has no billing address yet; conversion fails
    /// fast on that rather than emitting malformed XML
    pub billing_address: Option<BillingAddress>,

    /// Number of items in the cart
    pub item_count: u32,
}

/// Customer identity fields the gateway request carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: String,
    pub email: String,
}

/// Billing address fields rendered into the billing XML fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingAddress {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postcode: String,
    pub city: String,
    /// ISO 3166-1 alpha-2; France is assumed when absent
    pub country_code: Option<String>,
}
