use moonwallet_core::{Account, Transaction};

/// System role sent with every advice completion.
pub const SYSTEM_PROMPT: &str = "You are a concise financial advisor.";

/// Render the instruction template around the user's question and their full
/// financial context. Accounts and transactions are embedded verbatim as
/// JSON; an empty portfolio is valid input and renders as empty arrays.
pub fn build_prompt(message: &str, accounts: &[Account], transactions: &[Transaction]) -> String {
    let accounts_json =
        serde_json::to_string(accounts).unwrap_or_else(|_| "[]".to_string());
    let transactions_json =
        serde_json::to_string(transactions).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"As an AI financial advisor, analyze the user's financial data and provide personalized advice. The user asks:

"{message}"

Financial Overview:
- Accounts: {accounts_json}
- Recent Transactions: {transactions_json}

Requirements:
1. Analyze spending patterns and account balances
2. Identify specific opportunities for improvement
3. Provide 2-3 actionable recommendations
4. Consider both short-term and long-term financial health
5. Keep response concise (3-4 sentences maximum)
6. Use new lines and bullet points for clarity

Response Guidelines:
- Lead with the most impactful recommendation first
- Include specific numbers when relevant
- Focus on practical, achievable steps
- Consider the user's current financial situation
- Maintain a supportive, professional tone

Note: Response should be direct and immediately useful without any prefacing or summary statements."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonwallet_core::Account;

    #[test]
    fn embeds_user_message() {
        let prompt = build_prompt("How can I save more?", &[], &[]);
        assert!(prompt.contains("\"How can I save more?\""));
    }

    #[test]
    fn empty_portfolio_renders_empty_arrays() {
        let prompt = build_prompt("hi", &[], &[]);
        assert!(prompt.contains("- Accounts: []"));
        assert!(prompt.contains("- Recent Transactions: []"));
    }

    #[test]
    fn embeds_account_data_as_json() {
        let account = Account::new("acc-1", "Checking", "depository");
        let prompt = build_prompt("hi", &[account], &[]);
        assert!(prompt.contains("\"account_id\":\"acc-1\""));
        assert!(prompt.contains("\"type\":\"depository\""));
    }
}
