use serde::{Deserialize, Serialize};

/// Per-user credential and sync bookkeeping record.
///
/// The sync cursor is deliberately absent: it lives only inside a single
/// pagination loop and is never persisted. Timestamps are server-assigned
/// by the store and read back as ISO text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub plaid_link_token: Option<String>,
    pub link_token_created: Option<String>,
    pub plaid_access_token: Option<String>,
    pub plaid_item_id: Option<String>,
    pub last_sync: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults_to_all_unset() {
        let p = UserProfile::default();
        assert!(p.plaid_link_token.is_none());
        assert!(p.plaid_access_token.is_none());
        assert!(p.last_sync.is_none());
    }

    #[test]
    fn profile_serializes_all_fields() {
        let p = UserProfile {
            plaid_link_token: Some("link-1".to_string()),
            ..UserProfile::default()
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["plaid_link_token"], "link-1");
        assert!(json["plaid_access_token"].is_null());
    }
}
