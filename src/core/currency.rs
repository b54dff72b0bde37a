use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{AppError, Result};

/// Currencies the gateway prices in, keyed by the code the host order
/// carries. The gateway wants the ISO 4217 numeric code as a string because
/// leading zeros are significant on the wire (AUD is `036`, not `36`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    EUR,
    USD,
    CHF,
    GBP,
    CAD,
    JPY,
    /// Legacy gateway code for the Mexican peso
    MXP,
    TRY,
    AUD,
    NZD,
    NOK,
    /// Legacy gateway code for the Brazilian real
    BRC,
    /// Legacy gateway code for the Argentine peso
    ARP,
    KHR,
    TWD,
    SEK,
    DKK,
    KRW,
    SGD,
    XPF,
    XOF,
}

impl Currency {
    /// Resolve a host currency code against the gateway table
    ///
    /// Anything outside the table is a hard failure: a request with a
    /// missing currency field must never reach the gateway.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "EUR" => Ok(Currency::EUR),
            "USD" => Ok(Currency::USD),
            "CHF" => Ok(Currency::CHF),
            "GBP" => Ok(Currency::GBP),
            "CAD" => Ok(Currency::CAD),
            "JPY" => Ok(Currency::JPY),
            "MXP" => Ok(Currency::MXP),
            "TRY" => Ok(Currency::TRY),
            "AUD" => Ok(Currency::AUD),
            "NZD" => Ok(Currency::NZD),
            "NOK" => Ok(Currency::NOK),
            "BRC" => Ok(Currency::BRC),
            "ARP" => Ok(Currency::ARP),
            "KHR" => Ok(Currency::KHR),
            "TWD" => Ok(Currency::TWD),
            "SEK" => Ok(Currency::SEK),
            "DKK" => Ok(Currency::DKK),
            "KRW" => Ok(Currency::KRW),
            "SGD" => Ok(Currency::SGD),
            "XPF" => Ok(Currency::XPF),
            "XOF" => Ok(Currency::XOF),
            other => Err(AppError::UnknownCurrency(other.to_string())),
        }
    }

    /// Returns the 3-digit numeric code the gateway expects
    pub fn numeric_code(&self) -> &'static str {
        match self {
            Currency::EUR => "978",
            Currency::USD => "840",
            Currency::CHF => "756",
            Currency::GBP => "826",
            Currency::CAD => "124",
            Currency::JPY => "392",
            Currency::MXP => "484",
            Currency::TRY => "949",
            Currency::AUD => "036",
            Currency::NZD => "554",
            Currency::NOK => "578",
            Currency::BRC => "986",
            Currency::ARP => "032",
            Currency::KHR => "116",
            Currency::TWD => "901",
            Currency::SEK => "752",
            Currency::DKK => "208",
            Currency::KRW => "410",
            Currency::SGD => "702",
            Currency::XPF => "953",
            Currency::XOF => "952",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::str::FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

impl TryFrom<&str> for Currency {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}
