use async_trait::async_trait;
use moonwallet_core::{Account, HandlerError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{
    AccountsGetRequest, AccountsGetResponse, LinkTokenCreateRequest, LinkTokenCreateResponse,
    LinkTokenUser, PlaidApiErrorBody, PublicTokenExchangeRequest, PublicTokenExchangeResponse,
    TokenExchange, TransactionsPage, TransactionsSyncRequest, TransactionsSyncResponse,
};

/// Link tokens are always scoped to this product set.
const PRODUCTS: &[&str] = &["auth", "transactions", "identity"];
const COUNTRY_CODES: &[&str] = &["US"];
const LANGUAGE: &str = "en";
const CLIENT_NAME: &str = "MoonWallet";

#[derive(Debug, Error)]
pub enum PlaidError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Plaid API error {code}: {message}")]
    Api { code: String, message: String },
    #[error("Plaid returned unexpected status {0}")]
    Status(u16),
}

impl From<PlaidError> for HandlerError {
    fn from(e: PlaidError) -> Self {
        HandlerError::Provider(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Development,
    Production,
}

impl Environment {
    pub fn host(self) -> &'static str {
        match self {
            Environment::Sandbox => "https://sandbox.plaid.com",
            Environment::Development => "https://development.plaid.com",
            Environment::Production => "https://production.plaid.com",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(format!("unknown Plaid environment: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaidCredentials {
    pub client_id: String,
    pub secret: String,
}

/// Abstraction over the aggregation provider.
/// The HTTP client implements it for real; tests substitute canned providers.
#[async_trait]
pub trait PlaidApi: Send + Sync {
    /// Create a link token scoped to one user.
    async fn create_link_token(&self, user_id: &str) -> Result<String, PlaidError>;

    /// Exchange a short-lived public token for long-lived credentials.
    async fn exchange_public_token(&self, public_token: &str)
        -> Result<TokenExchange, PlaidError>;

    /// Fetch all accounts with their current balance snapshots.
    async fn get_accounts(&self, access_token: &str) -> Result<Vec<Account>, PlaidError>;

    /// Fetch one page of the transactions sync stream. `cursor = None` starts
    /// from the beginning of the item's history.
    async fn sync_transactions(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsPage, PlaidError>;
}

/// Plaid REST client. Credentials ride in every request body, so the handle
/// itself is stateless and safe to share across invocations.
pub struct PlaidClient {
    http: reqwest::Client,
    host: String,
    credentials: PlaidCredentials,
}

impl PlaidClient {
    pub fn new(credentials: PlaidCredentials, environment: Environment) -> Self {
        PlaidClient {
            http: reqwest::Client::new(),
            host: environment.host().to_string(),
            credentials,
        }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, PlaidError> {
        let response = self
            .http
            .post(format!("{}{}", self.host, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(match response.json::<PlaidApiErrorBody>().await {
                Ok(e) => PlaidError::Api {
                    code: e.error_code,
                    message: e.error_message,
                },
                Err(_) => PlaidError::Status(status.as_u16()),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlaidApi for PlaidClient {
    async fn create_link_token(&self, user_id: &str) -> Result<String, PlaidError> {
        let request = LinkTokenCreateRequest {
            client_id: &self.credentials.client_id,
            secret: &self.credentials.secret,
            client_name: CLIENT_NAME,
            language: LANGUAGE,
            country_codes: COUNTRY_CODES,
            products: PRODUCTS,
            user: LinkTokenUser {
                client_user_id: user_id,
            },
        };
        let response: LinkTokenCreateResponse = self.post("/link/token/create", &request).await?;
        Ok(response.link_token)
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<TokenExchange, PlaidError> {
        let request = PublicTokenExchangeRequest {
            client_id: &self.credentials.client_id,
            secret: &self.credentials.secret,
            public_token,
        };
        let response: PublicTokenExchangeResponse =
            self.post("/item/public_token/exchange", &request).await?;
        Ok(TokenExchange {
            access_token: response.access_token,
            item_id: response.item_id,
        })
    }

    async fn get_accounts(&self, access_token: &str) -> Result<Vec<Account>, PlaidError> {
        let request = AccountsGetRequest {
            client_id: &self.credentials.client_id,
            secret: &self.credentials.secret,
            access_token,
        };
        let response: AccountsGetResponse = self.post("/accounts/get", &request).await?;
        Ok(response.accounts.into_iter().map(Account::from).collect())
    }

    async fn sync_transactions(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsPage, PlaidError> {
        let request = TransactionsSyncRequest {
            client_id: &self.credentials.client_id,
            secret: &self.credentials.secret,
            access_token,
            cursor,
        };
        let response: TransactionsSyncResponse =
            self.post("/transactions/sync", &request).await?;
        tracing::debug!(
            added = response.added.len(),
            has_more = response.has_more,
            "transactions sync page"
        );
        Ok(TransactionsPage {
            added: response.added.into_iter().map(Into::into).collect(),
            next_cursor: response.next_cursor,
            has_more: response.has_more,
        })
    }
}
