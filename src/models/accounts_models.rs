use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::models::transaction_models::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub account_number: i64,
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    pub created_at: DateTime<Utc>
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String
}

impl NewAccount {
    /// At least one of the two names has to carry something.
    pub fn is_valid(&self) -> bool {
        !self.first_name.trim().is_empty() || !self.last_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_needs_a_name() {
        let blank = NewAccount { first_name: "  ".into(), last_name: String::new() };
        assert!(!blank.is_valid());

        let first_only = NewAccount { first_name: "Ada".into(), last_name: String::new() };
        assert!(first_only.is_valid());

        let last_only = NewAccount { first_name: String::new(), last_name: "Lovelace".into() };
        assert!(last_only.is_valid());
    }

    #[test]
    fn test_transactions_are_omitted_when_not_loaded() {
        let account = Account {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            account_number: 123456,
            balance: 0,
            transactions: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("transactions").is_none());
        assert_eq!(json["account_number"], 123456);
    }
}
