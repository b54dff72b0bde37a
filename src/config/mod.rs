use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

use crate::core::{AppError, Result};
use crate::modules::gateways::models::PaymentVariant;

// Default servers urls
pub const SERVER_TEST: &str = "https://preprod-tpeweb.paybox.com/php/";
pub const SERVER_PRODUCTION: &str = "https://tpeweb.paybox.com/php/";

/// Protocol revision announced to the gateway
pub const INTERFACE_VERSION: &str = "IR_WS_2.17";

/// Layout of the variables the gateway echoes back on every callback;
/// single-letter tags are the gateway's own vocabulary
pub const RETURN_VARIABLES: &str =
    "Mt:M;Ref:R;Auto:A;Appel:T;Abo:B;Reponse:E;Transaction:S;Pays:Y;Signature:K";

/// Digest the transport layer signs the parameter set with
pub const HASH_ALGORITHM: &str = "SHA512";

/// Gateway account configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PayboxConfig {
    /// Merchant site number
    pub site: String,
    /// Merchant rank
    pub rang: String,
    /// Merchant login
    pub identifiant: String,
    /// Shared secret the transport layer signs requests with; never used
    /// inside this crate
    pub hmac_key: String,
    pub environment: GatewayEnvironment,
    pub variant: PaymentVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    Sandbox,
    Production,
}

impl fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayEnvironment::Sandbox => write!(f, "sandbox"),
            GatewayEnvironment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for GatewayEnvironment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sandbox" => Ok(GatewayEnvironment::Sandbox),
            "production" => Ok(GatewayEnvironment::Production),
            other => Err(AppError::configuration(format!(
                "Invalid PAYBOX_ENVIRONMENT: {}",
                other
            ))),
        }
    }
}

impl PayboxConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = PayboxConfig {
            site: env::var("PAYBOX_SITE")
                .map_err(|_| AppError::configuration("PAYBOX_SITE not set"))?,
            rang: env::var("PAYBOX_RANG")
                .map_err(|_| AppError::configuration("PAYBOX_RANG not set"))?,
            identifiant: env::var("PAYBOX_IDENTIFIANT")
                .map_err(|_| AppError::configuration("PAYBOX_IDENTIFIANT not set"))?,
            hmac_key: env::var("PAYBOX_HMAC_KEY")
                .map_err(|_| AppError::configuration("PAYBOX_HMAC_KEY not set"))?,
            environment: env::var("PAYBOX_ENVIRONMENT")
                .unwrap_or_else(|_| "sandbox".to_string())
                .parse()?,
            variant: env::var("PAYBOX_PAYMENT_VARIANT")
                .unwrap_or_else(|_| "3xcb".to_string())
                .parse()?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.site.trim().is_empty() {
            return Err(AppError::configuration("site must not be empty"));
        }

        if self.rang.trim().is_empty() {
            return Err(AppError::configuration("rang must not be empty"));
        }

        if self.identifiant.trim().is_empty() {
            return Err(AppError::configuration("identifiant must not be empty"));
        }

        if self.hmac_key.trim().is_empty() {
            return Err(AppError::configuration("hmac_key must not be empty"));
        }

        Ok(())
    }

    /// Gateway endpoint for the configured environment
    pub fn server_url(&self) -> &'static str {
        match self.environment {
            GatewayEnvironment::Sandbox => SERVER_TEST,
            GatewayEnvironment::Production => SERVER_PRODUCTION,
        }
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == GatewayEnvironment::Sandbox
    }
}
