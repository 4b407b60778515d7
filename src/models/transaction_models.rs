use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

const TAG_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub recipient_id: i64,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<TransactionDetails>>,
    pub transaction_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub id: i64,
    pub transaction_id: i64,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub account_id: i64,
    pub recipient_id: i64,
    pub amount: i64,
}

/// Body of both the create and the update details calls. Missing fields
/// decode as empty, which the update treats as "keep what is stored".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionDetailsRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.amount <= 0 {
            return Err(format!("transfer amount must be positive, got {}", self.amount));
        }
        Ok(())
    }
}

impl TransactionDetailsRequest {
    /// Trims every tag, drops blank ones and rejects tags that would not
    /// survive being stored as a joined string.
    pub fn normalized_tags(&self) -> Result<Vec<String>, String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            if tag.contains(TAG_SEPARATOR) {
                return Err(format!("tag `{}` must not contain `{}`", tag, TAG_SEPARATOR));
            }
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        Ok(tags)
    }
}

impl TransactionDetails {
    /// Applies a partial update. An empty description or an empty tag list
    /// leaves the stored value alone; new tags are appended after the
    /// existing ones, skipping any already present.
    pub fn merge(&mut self, description: &str, tags: &[String]) {
        if !description.is_empty() {
            self.description = description.to_string();
        }
        for tag in tags {
            if !self.tags.contains(tag) {
                self.tags.push(tag.clone());
            }
        }
    }
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(&TAG_SEPARATOR.to_string())
}

pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}
