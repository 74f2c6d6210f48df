use chrono::NaiveDate;
use moonwallet_core::{Account, Balances, Transaction, UserProfile};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;

pub type DbPool = Pool<Sqlite>;

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id TEXT PRIMARY KEY,
            plaid_link_token TEXT,
            link_token_created TEXT,
            plaid_access_token TEXT,
            plaid_item_id TEXT,
            last_sync TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            user_id TEXT NOT NULL,
            account_id TEXT NOT NULL,
            name TEXT NOT NULL,
            official_name TEXT,
            type TEXT NOT NULL,
            subtype TEXT,
            mask TEXT,
            balance_current TEXT,
            balance_available TEXT,
            balance_limit TEXT,
            last_updated TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, account_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            user_id TEXT NOT NULL,
            transaction_id TEXT NOT NULL,
            account_id TEXT NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            name TEXT NOT NULL,
            merchant_name TEXT,
            payment_channel TEXT,
            pending INTEGER NOT NULL DEFAULT 0,
            category TEXT,
            subcategory TEXT,
            logo TEXT,
            timestamp TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, transaction_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

// ── User profile (merge-upsert semantics) ─────────────────────────────────────

/// Store a freshly created link token. Other profile fields are untouched.
pub async fn store_link_token(
    pool: &DbPool,
    user_id: &str,
    link_token: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, plaid_link_token, link_token_created)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(user_id) DO UPDATE SET
            plaid_link_token = excluded.plaid_link_token,
            link_token_created = excluded.link_token_created
        "#,
    )
    .bind(user_id)
    .bind(link_token)
    .execute(pool)
    .await?;
    Ok(())
}

/// Store the exchanged long-lived credentials and stamp the sync time.
pub async fn store_access_token(
    pool: &DbPool,
    user_id: &str,
    access_token: &str,
    item_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, plaid_access_token, plaid_item_id, last_sync)
        VALUES (?, ?, ?, datetime('now'))
        ON CONFLICT(user_id) DO UPDATE SET
            plaid_access_token = excluded.plaid_access_token,
            plaid_item_id = excluded.plaid_item_id,
            last_sync = excluded.last_sync
        "#,
    )
    .bind(user_id)
    .bind(access_token)
    .bind(item_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_user_profile(
    pool: &DbPool,
    user_id: &str,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let row = sqlx::query_as::<
        _,
        (
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
        ),
    >(
        "SELECT plaid_link_token, link_token_created, plaid_access_token, plaid_item_id, last_sync FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| UserProfile {
        plaid_link_token: r.0,
        link_token_created: r.1,
        plaid_access_token: r.2,
        plaid_item_id: r.3,
        last_sync: r.4,
    }))
}

// ── Accounts ──────────────────────────────────────────────────────────────────

/// Upsert one account document, keyed by (user, provider account id).
pub async fn upsert_account(
    pool: &DbPool,
    user_id: &str,
    account: &Account,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO accounts (
            user_id, account_id, name, official_name, type, subtype, mask,
            balance_current, balance_available, balance_limit, last_updated
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
        ON CONFLICT(user_id, account_id) DO UPDATE SET
            name = excluded.name,
            official_name = excluded.official_name,
            type = excluded.type,
            subtype = excluded.subtype,
            mask = excluded.mask,
            balance_current = excluded.balance_current,
            balance_available = excluded.balance_available,
            balance_limit = excluded.balance_limit,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(user_id)
    .bind(&account.account_id)
    .bind(&account.name)
    .bind(&account.official_name)
    .bind(&account.account_type)
    .bind(&account.subtype)
    .bind(&account.mask)
    .bind(account.balances.current.map(|d| d.to_string()))
    .bind(account.balances.available.map(|d| d.to_string()))
    .bind(account.balances.limit.map(|d| d.to_string()))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_accounts(pool: &DbPool, user_id: &str) -> Result<Vec<Account>, sqlx::Error> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            String,
            Option<String>,
            String,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
            Option<String>,
        ),
    >(
        r#"
        SELECT account_id, name, official_name, type, subtype, mask,
               balance_current, balance_available, balance_limit
        FROM accounts WHERE user_id = ? ORDER BY rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Account {
            account_id: r.0,
            name: r.1,
            official_name: r.2,
            account_type: r.3,
            subtype: r.4,
            mask: r.5,
            balances: Balances {
                current: parse_decimal(r.6),
                available: parse_decimal(r.7),
                limit: parse_decimal(r.8),
            },
        })
        .collect())
}

// ── Transactions ──────────────────────────────────────────────────────────────

/// Upsert one transaction document, keyed by (user, provider transaction id).
pub async fn upsert_transaction(
    pool: &DbPool,
    user_id: &str,
    tx: &Transaction,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            user_id, transaction_id, account_id, amount, date, name,
            merchant_name, payment_channel, pending, category, subcategory,
            logo, timestamp
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
        ON CONFLICT(user_id, transaction_id) DO UPDATE SET
            account_id = excluded.account_id,
            amount = excluded.amount,
            date = excluded.date,
            name = excluded.name,
            merchant_name = excluded.merchant_name,
            payment_channel = excluded.payment_channel,
            pending = excluded.pending,
            category = excluded.category,
            subcategory = excluded.subcategory,
            logo = excluded.logo,
            timestamp = excluded.timestamp
        "#,
    )
    .bind(user_id)
    .bind(&tx.transaction_id)
    .bind(&tx.account_id)
    .bind(tx.amount.to_string())
    .bind(tx.date.to_string())
    .bind(&tx.name)
    .bind(&tx.merchant_name)
    .bind(&tx.payment_channel)
    .bind(tx.pending as i64)
    .bind(&tx.category)
    .bind(&tx.subcategory)
    .bind(&tx.logo)
    .execute(pool)
    .await?;
    Ok(())
}

/// All transactions for a user in insertion order. Callers decide ordering
/// beyond that (the read endpoint sorts newest-first).
pub async fn get_transactions(
    pool: &DbPool,
    user_id: &str,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            String,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            i64,
            Option<String>,
            Option<String>,
            Option<String>,
        ),
    >(
        r#"
        SELECT transaction_id, account_id, amount, date, name, merchant_name,
               payment_channel, pending, category, subcategory, logo
        FROM transactions WHERE user_id = ? ORDER BY rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Transaction {
            transaction_id: r.0,
            account_id: r.1,
            amount: r.2.parse().unwrap_or_default(),
            date: parse_date(&r.3),
            name: r.4,
            merchant_name: r.5,
            payment_channel: r.6,
            pending: r.7 != 0,
            category: r.8,
            subcategory: r.9,
            logo: r.10,
        })
        .collect())
}

fn parse_decimal(value: Option<String>) -> Option<Decimal> {
    value.and_then(|s| s.parse().ok())
}

fn parse_date(value: &str) -> NaiveDate {
    value.parse().unwrap_or(NaiveDate::MIN)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
