pub mod client;
pub mod models;

pub use client::{Environment, PlaidApi, PlaidClient, PlaidCredentials, PlaidError};
pub use models::{TokenExchange, TransactionsPage};
