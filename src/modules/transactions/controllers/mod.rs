pub mod transaction_controller;
pub mod webhook_controller;

pub use transaction_controller::TransactionController;
pub use webhook_controller::WebhookController;
