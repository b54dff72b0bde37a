pub mod models;
pub mod services;

pub use models::{
    BillingAddress, CallbackUrls, CustomerSnapshot, OrderSnapshot, ParameterSet, PayboxField,
    PaymentVariant,
};
pub use services::{FieldPolicy, Locale, RequestBuilder};
