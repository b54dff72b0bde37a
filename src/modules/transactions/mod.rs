pub mod models;
pub mod repositories;
pub mod services;
pub mod controllers;

pub use models::{
    CreateTransactionRequest, PaymentTransaction, TransactionResponse, TransactionStatus,
};
