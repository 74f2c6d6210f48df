use chrono::NaiveDate;
use moonwallet_core::{Account, Balances, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ── Request bodies ────────────────────────────────────────────────────────────
// Every Plaid request carries the client credentials in the body.

#[derive(Debug, Serialize)]
pub struct LinkTokenCreateRequest<'a> {
    pub client_id: &'a str,
    pub secret: &'a str,
    pub client_name: &'a str,
    pub language: &'a str,
    pub country_codes: &'a [&'a str],
    pub products: &'a [&'a str],
    pub user: LinkTokenUser<'a>,
}

#[derive(Debug, Serialize)]
pub struct LinkTokenUser<'a> {
    pub client_user_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PublicTokenExchangeRequest<'a> {
    pub client_id: &'a str,
    pub secret: &'a str,
    pub public_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AccountsGetRequest<'a> {
    pub client_id: &'a str,
    pub secret: &'a str,
    pub access_token: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TransactionsSyncRequest<'a> {
    pub client_id: &'a str,
    pub secret: &'a str,
    pub access_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<&'a str>,
}

// ── Response bodies ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LinkTokenCreateResponse {
    pub link_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PublicTokenExchangeResponse {
    pub access_token: String,
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountsGetResponse {
    pub accounts: Vec<PlaidAccount>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsSyncResponse {
    pub added: Vec<PlaidTransaction>,
    #[serde(default)]
    pub modified: Vec<PlaidTransaction>,
    #[serde(default)]
    pub removed: Vec<RemovedTransaction>,
    pub next_cursor: String,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct RemovedTransaction {
    pub transaction_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaidAccount {
    pub account_id: String,
    pub name: String,
    pub official_name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    pub mask: Option<String>,
    pub balances: PlaidBalances,
}

#[derive(Debug, Deserialize)]
pub struct PlaidBalances {
    pub current: Option<Decimal>,
    pub available: Option<Decimal>,
    #[serde(default)]
    pub limit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct PlaidTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub name: String,
    pub merchant_name: Option<String>,
    pub payment_channel: Option<String>,
    pub pending: bool,
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PersonalFinanceCategory {
    pub primary: String,
    pub detailed: String,
}

/// Error body Plaid returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct PlaidApiErrorBody {
    pub error_type: String,
    pub error_code: String,
    pub error_message: String,
}

// ── Domain conversions ────────────────────────────────────────────────────────

impl From<PlaidAccount> for Account {
    fn from(a: PlaidAccount) -> Self {
        Account {
            account_id: a.account_id,
            name: a.name,
            official_name: a.official_name,
            account_type: a.account_type,
            subtype: a.subtype,
            mask: a.mask,
            balances: Balances {
                current: a.balances.current,
                available: a.balances.available,
                limit: a.balances.limit,
            },
        }
    }
}

impl From<PlaidTransaction> for Transaction {
    fn from(t: PlaidTransaction) -> Self {
        let (category, subcategory) = match t.personal_finance_category {
            Some(c) => (Some(c.primary), Some(c.detailed)),
            None => (None, None),
        };
        Transaction {
            transaction_id: t.transaction_id,
            account_id: t.account_id,
            amount: t.amount,
            date: t.date,
            name: t.name,
            merchant_name: t.merchant_name,
            payment_channel: t.payment_channel,
            pending: t.pending,
            category,
            subcategory,
            logo: t.logo_url,
        }
    }
}

/// Result of exchanging a public token for long-lived credentials.
#[derive(Debug, Clone)]
pub struct TokenExchange {
    pub access_token: String,
    pub item_id: String,
}

/// One page of the transactions sync stream, already converted to domain
/// transactions. Only additions are carried; the import path ignores the
/// modified and removed sets.
#[derive(Debug, Clone)]
pub struct TransactionsPage {
    pub added: Vec<Transaction>,
    pub next_cursor: String,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sandbox_accounts_response() {
        let body = r#"{
            "accounts": [{
                "account_id": "blgvvBlXw3cq5GMPwqB6s6q4dLKB9WcVqGDGo",
                "balances": {"available": 100.0, "current": 110.0, "limit": null,
                             "iso_currency_code": "USD", "unofficial_currency_code": null},
                "mask": "0000",
                "name": "Plaid Checking",
                "official_name": "Plaid Gold Standard 0% Interest Checking",
                "subtype": "checking",
                "type": "depository"
            }],
            "item": {"item_id": "eVBnVMp7zdTJLkRNr33Rs6zr7KNJqBFL9DrE6"},
            "request_id": "45QSn"
        }"#;

        let parsed: AccountsGetResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.accounts.len(), 1);

        let account: Account = parsed.accounts.into_iter().next().unwrap().into();
        assert_eq!(account.account_type, "depository");
        assert_eq!(account.subtype.as_deref(), Some("checking"));
        assert_eq!(account.balances.limit, None);
        assert_eq!(account.balances.current, Some(Decimal::new(110, 0)));
    }

    #[test]
    fn deserializes_sync_page_and_converts_category() {
        let body = r#"{
            "added": [{
                "transaction_id": "lPNjeW1nR6CDn5okmGQ6hEpMo4lLNoSrzqDje",
                "account_id": "BxBXxLj1m4HMXBm9WZZmCWVbPjX16EHwv99vp",
                "amount": 5.4,
                "date": "2023-09-28",
                "name": "Uber 063015 SF**POOL**",
                "merchant_name": "Uber",
                "payment_channel": "online",
                "pending": false,
                "personal_finance_category": {
                    "primary": "TRANSPORTATION",
                    "detailed": "TRANSPORTATION_TAXIS_AND_RIDE_SHARES"
                },
                "logo_url": "https://plaid.com/uber.png"
            }],
            "modified": [],
            "removed": [],
            "next_cursor": "tVUUL15lYQN5rBnfDIc1I8xudpGdIlw9nsgeXWvhOfkECvUeR663i3Dt1uf/94S8ASkitgLcIiOSqNwzzp+bh89kirazha5vuZHBb2ZA5NtCDkkV",
            "has_more": true,
            "request_id": "Wvhy9PZHQLV8njG"
        }"#;

        let parsed: TransactionsSyncResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.has_more);
        assert_eq!(parsed.added.len(), 1);

        let tx: Transaction = parsed.added.into_iter().next().unwrap().into();
        assert_eq!(tx.category.as_deref(), Some("TRANSPORTATION"));
        assert_eq!(
            tx.subcategory.as_deref(),
            Some("TRANSPORTATION_TAXIS_AND_RIDE_SHARES")
        );
        assert_eq!(tx.amount, Decimal::new(54, 1));
        assert_eq!(tx.date.to_string(), "2023-09-28");
    }

    #[test]
    fn missing_category_maps_to_none_pair() {
        let body = r#"{
            "transaction_id": "t1", "account_id": "a1", "amount": 12.0,
            "date": "2024-01-02", "name": "ACH Transfer",
            "merchant_name": null, "payment_channel": "other",
            "pending": true, "personal_finance_category": null, "logo_url": null
        }"#;
        let tx: Transaction = serde_json::from_str::<PlaidTransaction>(body).unwrap().into();
        assert_eq!(tx.category, None);
        assert_eq!(tx.subcategory, None);
        assert!(tx.pending);
        assert_eq!(tx.logo, None);
    }

    #[test]
    fn sync_request_omits_absent_cursor() {
        let req = TransactionsSyncRequest {
            client_id: "id",
            secret: "sec",
            access_token: "access-token",
            cursor: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("cursor").is_none());

        let req = TransactionsSyncRequest { cursor: Some("abc"), ..req };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["cursor"], "abc");
    }

    #[test]
    fn parses_error_body() {
        let body = r#"{
            "error_type": "INVALID_INPUT",
            "error_code": "INVALID_ACCESS_TOKEN",
            "error_message": "could not find matching access token",
            "display_message": null,
            "request_id": "8C6rx"
        }"#;
        let parsed: PlaidApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error_code, "INVALID_ACCESS_TOKEN");
    }
}
