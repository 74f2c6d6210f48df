pub mod client;
pub mod prompt;

pub use client::{AdvisorError, ChatCompletions, OpenAiChat};
pub use prompt::{build_prompt, SYSTEM_PROMPT};

use moonwallet_core::HandlerError;
use moonwallet_storage::DbPool;

/// Read the user's full financial context, render the instruction template,
/// and request a completion. No filtering or size cap on the embedded data.
pub async fn advise(
    pool: &DbPool,
    chat: &dyn ChatCompletions,
    user_id: &str,
    message: &str,
) -> Result<String, HandlerError> {
    let accounts = moonwallet_storage::get_accounts(pool, user_id)
        .await
        .map_err(|e| HandlerError::Store(e.to_string()))?;
    let transactions = moonwallet_storage::get_transactions(pool, user_id)
        .await
        .map_err(|e| HandlerError::Store(e.to_string()))?;

    tracing::debug!(
        accounts = accounts.len(),
        transactions = transactions.len(),
        "assembling advice prompt"
    );

    let user_prompt = prompt::build_prompt(message, &accounts, &transactions);
    Ok(chat.complete(SYSTEM_PROMPT, &user_prompt).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use moonwallet_core::Account;
    use std::sync::Mutex;

    /// Records the prompt it was handed and returns a canned completion.
    struct RecordingChat {
        seen: Mutex<Vec<String>>,
        reply: Result<String, String>,
    }

    impl RecordingChat {
        fn replying(reply: &str) -> Self {
            RecordingChat {
                seen: Mutex::new(Vec::new()),
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            RecordingChat {
                seen: Mutex::new(Vec::new()),
                reply: Err(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl ChatCompletions for RecordingChat {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, AdvisorError> {
            self.seen.lock().unwrap().push(user.to_string());
            self.reply.clone().map_err(AdvisorError::Api)
        }
    }

    async fn test_db() -> (tempfile::TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = moonwallet_storage::create_db(&dir.path().join("store.db"))
            .await
            .unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn empty_portfolio_still_produces_advice() {
        let (_dir, pool) = test_db().await;
        let chat = RecordingChat::replying("Start an emergency fund.");

        let advice = advise(&pool, &chat, "user-1", "Where do I start?")
            .await
            .unwrap();
        assert_eq!(advice, "Start an emergency fund.");

        let seen = chat.seen.lock().unwrap();
        assert!(seen[0].contains("Where do I start?"));
        assert!(seen[0].contains("- Accounts: []"));
    }

    #[tokio::test]
    async fn prompt_carries_persisted_accounts() {
        let (_dir, pool) = test_db().await;
        moonwallet_storage::upsert_account(
            &pool,
            "user-1",
            &Account::new("acc-9", "Savings", "depository"),
        )
        .await
        .unwrap();

        let chat = RecordingChat::replying("ok");
        advise(&pool, &chat, "user-1", "hi").await.unwrap();

        let seen = chat.seen.lock().unwrap();
        assert!(seen[0].contains("acc-9"));
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_provider_error() {
        let (_dir, pool) = test_db().await;
        let chat = RecordingChat::failing("rate limited");

        let err = advise(&pool, &chat, "user-1", "hi").await.unwrap_err();
        assert_eq!(err.code(), "provider_error");
        assert!(err.to_string().contains("rate limited"));
    }
}
