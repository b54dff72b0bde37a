use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// The gateway's request parameter vocabulary
///
/// A closed enumeration instead of free-form strings so a misspelled field
/// name is a compile error, not a silently dropped parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PayboxField {
    Site,
    Rang,
    Identifiant,
    Hash,
    Retour,
    Time,
    TypePaiement,
    TypeCarte,
    Total,
    Devise,
    Cmd,
    Porteur,
    Billing,
    Customer,
    ShoppingCart,
    Effectue,
    Annule,
    Refuse,
    Attente,
    RepondreA,
    Mont1,
    Mont2,
    Date1,
    Date2,
    DateValMax,
}

impl PayboxField {
    /// Wire name of the parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            PayboxField::Site => "PBX_SITE",
            PayboxField::Rang => "PBX_RANG",
            PayboxField::Identifiant => "PBX_IDENTIFIANT",
            PayboxField::Hash => "PBX_HASH",
            PayboxField::Retour => "PBX_RETOUR",
            PayboxField::Time => "PBX_TIME",
            PayboxField::TypePaiement => "PBX_TYPEPAIEMENT",
            PayboxField::TypeCarte => "PBX_TYPECARTE",
            PayboxField::Total => "PBX_TOTAL",
            PayboxField::Devise => "PBX_DEVISE",
            PayboxField::Cmd => "PBX_CMD",
            PayboxField::Porteur => "PBX_PORTEUR",
            PayboxField::Billing => "PBX_BILLING",
            PayboxField::Customer => "PBX_CUSTOMER",
            PayboxField::ShoppingCart => "PBX_SHOPPINGCART",
            PayboxField::Effectue => "PBX_EFFECTUE",
            PayboxField::Annule => "PBX_ANNULE",
            PayboxField::Refuse => "PBX_REFUSE",
            PayboxField::Attente => "PBX_ATTENTE",
            PayboxField::RepondreA => "PBX_REPONDRE_A",
            PayboxField::Mont1 => "PBX_2MONT1",
            PayboxField::Mont2 => "PBX_2MONT2",
            PayboxField::Date1 => "PBX_DATE1",
            PayboxField::Date2 => "PBX_DATE2",
            PayboxField::DateValMax => "PBX_DATEVALMAX",
        }
    }
}

impl fmt::Display for PayboxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One gateway request's worth of parameters
///
/// Built once per conversion attempt, then handed to the transport layer
/// as flat string pairs; nothing mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    values: BTreeMap<PayboxField, String>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: PayboxField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: PayboxField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: PayboxField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PayboxField, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Flatten into the `(name, value)` pairs the transport layer posts
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.values
            .into_iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// String-keyed view for hosts that want a plain map
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.clone()))
            .collect()
    }
}

/// The two payment products this plugin can drive; mutually exclusive
/// builder modes, never active together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentVariant {
    /// Card payment split over three monthly charges
    ThreeTimeCard,
    /// Single charge through the Limonetik aggregator
    Limonetik,
}

impl PaymentVariant {
    pub fn payment_type(&self) -> &'static str {
        match self {
            PaymentVariant::ThreeTimeCard => "CARTE",
            PaymentVariant::Limonetik => "LIMONETIK",
        }
    }

    pub fn card_type(&self) -> &'static str {
        match self {
            PaymentVariant::ThreeTimeCard => "CB",
            PaymentVariant::Limonetik => "SOF3XSF",
        }
    }

    pub fn is_installment(&self) -> bool {
        matches!(self, PaymentVariant::ThreeTimeCard)
    }
}

impl std::str::FromStr for PaymentVariant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "3xcb" | "carte" => Ok(PaymentVariant::ThreeTimeCard),
            "limonetik" => Ok(PaymentVariant::Limonetik),
            other => Err(AppError::configuration(format!(
                "Invalid PAYBOX_PAYMENT_VARIANT: {}",
                other
            ))),
        }
    }
}

/// Callback target URLs resolved by the host's transaction-token layer
///
/// The four customer-facing targets routinely point at the same URL; the
/// server-to-server notification target is optional and its absence is
/// never fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackUrls {
    pub success: String,
    pub cancel: String,
    pub refused: String,
    pub pending: String,
    pub notify: Option<String>,
}

impl CallbackUrls {
    /// All four customer-facing events routed to one URL, the common case
    /// for token-based hosts
    pub fn uniform(target: impl Into<String>, notify: Option<String>) -> Self {
        let target = target.into();
        Self {
            success: target.clone(),
            cancel: target.clone(),
            refused: target.clone(),
            pending: target,
            notify,
        }
    }
}
