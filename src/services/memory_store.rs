//! In-memory [`LedgerStore`] used by the handler tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use crate::error::{StorageError, StorageResult};
use crate::models::accounts_models::{Account, NewAccount};
use crate::models::transaction_models::{join_tags, split_tags, Transaction, TransactionDetails, TransferRequest};
use crate::services::db_operations::LedgerStore;

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    // tags kept joined, the way the real table stores them
    details: Vec<(i64, i64, String, String)>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn details_row(row: &(i64, i64, String, String)) -> TransactionDetails {
        TransactionDetails {
            id: row.0,
            transaction_id: row.1,
            description: row.2.clone(),
            tags: split_tags(&row.3),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn get_accounts(&self) -> StorageResult<Vec<Account>> {
        Ok(self.tables.lock().await.accounts.clone())
    }

    async fn create_account(&self, new_account: &NewAccount, account_number: i64) -> StorageResult<Account> {
        let mut tables = self.tables.lock().await;
        let account = Account {
            id: tables.next_id(),
            first_name: new_account.first_name.clone(),
            last_name: new_account.last_name.clone(),
            account_number,
            balance: 0,
            transactions: None,
            created_at: Utc::now(),
        };
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn get_account(&self, account_id: i64) -> StorageResult<Account> {
        let tables = self.tables.lock().await;
        tables
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("account", account_id))
    }

    async fn get_account_by_number(&self, account_number: i64) -> StorageResult<Account> {
        let tables = self.tables.lock().await;
        tables
            .accounts
            .iter()
            .find(|a| a.account_number == account_number)
            .cloned()
            .ok_or_else(|| StorageError::not_found_by("account", "number", account_number))
    }

    async fn delete_account(&self, account_id: i64) -> StorageResult<()> {
        let mut tables = self.tables.lock().await;
        let before = tables.accounts.len();
        tables.accounts.retain(|a| a.id != account_id);
        if tables.accounts.len() == before {
            return Err(StorageError::not_found("account", account_id));
        }
        Ok(())
    }

    async fn get_account_with_transactions(&self, account_id: i64) -> StorageResult<Account> {
        let mut account = self.get_account(account_id).await?;
        let tables = self.tables.lock().await;
        let transactions = tables
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        account.transactions = Some(transactions);
        Ok(account)
    }

    async fn transfer(&self, req: &TransferRequest) -> StorageResult<Vec<Transaction>> {
        let mut tables = self.tables.lock().await;

        if let Some(source) = tables.accounts.iter_mut().find(|a| a.id == req.account_id) {
            source.balance -= req.amount;
        }
        if let Some(recipient) = tables.accounts.iter_mut().find(|a| a.id == req.recipient_id) {
            recipient.balance += req.amount;
        }

        let mut legs = Vec::with_capacity(2);
        for account_id in [req.account_id, req.recipient_id] {
            let leg = Transaction {
                id: tables.next_id(),
                account_id,
                recipient_id: req.recipient_id,
                amount: req.amount,
                details: None,
                transaction_date: Utc::now(),
            };
            tables.transactions.push(leg.clone());
            legs.push(leg);
        }
        Ok(legs)
    }

    async fn transaction_exists(&self, transaction_id: i64) -> StorageResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.transactions.iter().any(|t| t.id == transaction_id))
    }

    async fn get_transaction_with_details(&self, transaction_id: i64) -> StorageResult<Transaction> {
        let tables = self.tables.lock().await;
        let mut transaction = tables
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("transaction", transaction_id))?;
        let details = tables
            .details
            .iter()
            .filter(|d| d.1 == transaction_id)
            .map(Tables::details_row)
            .collect();
        transaction.details = Some(details);
        Ok(transaction)
    }

    async fn create_transaction_details(
        &self,
        transaction_id: i64,
        description: &str,
        tags: &[String],
    ) -> StorageResult<TransactionDetails> {
        let mut tables = self.tables.lock().await;
        let row = (tables.next_id(), transaction_id, description.to_string(), join_tags(tags));
        let details = Tables::details_row(&row);
        tables.details.push(row);
        Ok(details)
    }

    async fn update_transaction_details(
        &self,
        transaction_id: i64,
        description: &str,
        tags: &[String],
    ) -> StorageResult<TransactionDetails> {
        let mut tables = self.tables.lock().await;
        let row = tables
            .details
            .iter_mut()
            .rev()
            .find(|d| d.1 == transaction_id)
            .ok_or_else(|| StorageError::not_found_by("transaction details", "transaction id", transaction_id))?;

        let mut details = Tables::details_row(row);
        details.merge(description, tags);
        row.2 = details.description.clone();
        row.3 = join_tags(&details.tags);
        Ok(details)
    }
}
