pub mod db;

pub use db::{
    create_db, get_accounts, get_transactions, get_user_profile, store_access_token,
    store_link_token, upsert_account, upsert_transaction, DbPool,
};
