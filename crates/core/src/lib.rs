pub mod account;
pub mod error;
pub mod transaction;
pub mod user;

pub use account::{Account, Balances};
pub use error::HandlerError;
pub use transaction::{sort_newest_first, Transaction};
pub use user::UserProfile;
