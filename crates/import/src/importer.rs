use moonwallet_core::HandlerError;
use moonwallet_plaid::PlaidApi;
use moonwallet_storage::DbPool;
use serde::Serialize;

/// Upper bound on sync pages per import. A provider that keeps reporting
/// more pages past this is treated as a sync failure rather than looping
/// forever.
pub const MAX_SYNC_PAGES: usize = 50;

/// Outcome of one import run. The token exchange either succeeded or the
/// whole call failed; the account and transaction steps each either
/// contributed counts or an entry in `errors`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportReport {
    pub accounts_imported: usize,
    pub transactions_imported: usize,
    pub pages: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    /// True only if every sub-step succeeded.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Exchange the public token, then fetch and persist accounts, balances and
/// transactions for the user.
///
/// The exchange itself failing fails the whole call. After that, the account
/// and transaction steps run independently: a failure in one is recorded in
/// the report (and logged) but does not stop the other, so the caller sees
/// exactly which parts of the import landed.
pub async fn import_user_data(
    pool: &DbPool,
    plaid: &dyn PlaidApi,
    user_id: &str,
    public_token: &str,
) -> Result<ImportReport, HandlerError> {
    if user_id.is_empty() {
        return Err(HandlerError::MissingParameter("user_id"));
    }
    if public_token.is_empty() {
        return Err(HandlerError::MissingParameter("public_token"));
    }

    let exchange = plaid.exchange_public_token(public_token).await?;
    moonwallet_storage::store_access_token(pool, user_id, &exchange.access_token, &exchange.item_id)
        .await
        .map_err(|e| HandlerError::Store(e.to_string()))?;

    let mut report = ImportReport::default();

    match import_accounts(pool, plaid, user_id, &exchange.access_token).await {
        Ok(count) => report.accounts_imported = count,
        Err(e) => {
            tracing::warn!(user = user_id, error = %e, "account import failed");
            report.errors.push(e.to_string());
        }
    }

    match sync_all_transactions(pool, plaid, user_id, &exchange.access_token).await {
        Ok((pages, count)) => {
            report.pages = pages;
            report.transactions_imported = count;
        }
        Err(e) => {
            tracing::warn!(user = user_id, error = %e, "transaction sync failed");
            report.errors.push(e.to_string());
        }
    }

    tracing::info!(
        user = user_id,
        accounts = report.accounts_imported,
        transactions = report.transactions_imported,
        pages = report.pages,
        complete = report.is_complete(),
        "import finished"
    );

    Ok(report)
}

async fn import_accounts(
    pool: &DbPool,
    plaid: &dyn PlaidApi,
    user_id: &str,
    access_token: &str,
) -> Result<usize, HandlerError> {
    let accounts = plaid.get_accounts(access_token).await?;
    let count = accounts.len();
    for account in &accounts {
        moonwallet_storage::upsert_account(pool, user_id, account)
            .await
            .map_err(|e| HandlerError::Store(e.to_string()))?;
    }
    Ok(count)
}

/// Walk the sync stream page by page, persisting each page's additions.
/// Modified and removed sets are not handled. The cursor lives only in this
/// loop; it is never persisted.
async fn sync_all_transactions(
    pool: &DbPool,
    plaid: &dyn PlaidApi,
    user_id: &str,
    access_token: &str,
) -> Result<(usize, usize), HandlerError> {
    let mut cursor: Option<String> = None;
    let mut pages = 0;
    let mut imported = 0;

    loop {
        if pages >= MAX_SYNC_PAGES {
            return Err(HandlerError::SyncOverflow(MAX_SYNC_PAGES));
        }

        let page = plaid
            .sync_transactions(access_token, cursor.as_deref())
            .await?;
        pages += 1;

        for tx in &page.added {
            moonwallet_storage::upsert_transaction(pool, user_id, tx)
                .await
                .map_err(|e| HandlerError::Store(e.to_string()))?;
            imported += 1;
        }

        if !page.has_more {
            return Ok((pages, imported));
        }
        cursor = Some(page.next_cursor);
    }
}
