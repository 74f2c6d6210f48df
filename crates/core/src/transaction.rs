use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bank transaction as persisted for a user.
///
/// Keyed by the provider-assigned `transaction_id`; upserted on import and
/// never deleted. `category`/`subcategory` hold the provider's
/// personal-finance taxonomy (primary/detailed) when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub name: String,
    pub merchant_name: Option<String>,
    pub payment_channel: Option<String>,
    pub pending: bool,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub logo: Option<String>,
}

/// Sort newest-first. The sort is stable, so same-day transactions keep
/// their original (insertion) order.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, date: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            account_id: "acc-1".to_string(),
            amount: Decimal::new(1299, 2),
            date: date.parse().unwrap(),
            name: "Coffee".to_string(),
            merchant_name: None,
            payment_channel: Some("in store".to_string()),
            pending: false,
            category: None,
            subcategory: None,
            logo: None,
        }
    }

    #[test]
    fn sorts_by_date_descending() {
        let mut txs = vec![tx("a", "2024-01-01"), tx("b", "2024-03-01")];
        sort_newest_first(&mut txs);
        assert_eq!(txs[0].transaction_id, "b");
        assert_eq!(txs[1].transaction_id, "a");
    }

    #[test]
    fn equal_dates_keep_insertion_order() {
        let mut txs = vec![
            tx("first", "2024-02-10"),
            tx("second", "2024-02-10"),
            tx("third", "2024-02-10"),
        ];
        sort_newest_first(&mut txs);
        let ids: Vec<&str> = txs.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn date_serializes_as_iso_string() {
        let t = tx("a", "2024-11-05");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["date"], "2024-11-05");
    }
}
