use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance snapshot attached to an account at import time.
/// `limit` is only meaningful for credit-type accounts and stays null elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    pub current: Option<Decimal>,
    pub available: Option<Decimal>,
    pub limit: Option<Decimal>,
}

/// A linked bank account as persisted for one user.
///
/// Keyed by the provider-assigned `account_id`, which makes re-import a
/// plain overwrite. Provider enum values for type/subtype are carried as
/// their string representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    pub mask: Option<String>,
    pub balances: Balances,
}

impl Account {
    pub fn new(account_id: &str, name: &str, account_type: &str) -> Self {
        Account {
            account_id: account_id.to_string(),
            name: name.to_string(),
            official_name: None,
            account_type: account_type.to_string(),
            subtype: None,
            mask: None,
            balances: Balances::default(),
        }
    }
}
