use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row, Transaction as PgTransaction};
use sqlx::postgres::{PgPoolOptions, PgRow};
use crate::config::AppConfig;
use crate::error::{StorageError, StorageResult};
use crate::models::accounts_models::{Account, NewAccount};
use crate::models::transaction_models::{join_tags, split_tags, Transaction, TransactionDetails, TransferRequest};

/// Everything the handlers need from persistence.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_accounts(&self) -> StorageResult<Vec<Account>>;

    /// Inserts the account with a zero balance and returns the stored row.
    async fn create_account(&self, new_account: &NewAccount, account_number: i64) -> StorageResult<Account>;

    async fn get_account(&self, account_id: i64) -> StorageResult<Account>;

    /// Account numbers are not unique; the oldest match wins.
    async fn get_account_by_number(&self, account_number: i64) -> StorageResult<Account>;

    async fn delete_account(&self, account_id: i64) -> StorageResult<()>;

    async fn get_account_with_transactions(&self, account_id: i64) -> StorageResult<Account>;

    /// Debits the source, credits the recipient and records both legs,
    /// source leg first. A missing account only skips its balance update.
    async fn transfer(&self, req: &TransferRequest) -> StorageResult<Vec<Transaction>>;

    async fn transaction_exists(&self, transaction_id: i64) -> StorageResult<bool>;

    async fn get_transaction_with_details(&self, transaction_id: i64) -> StorageResult<Transaction>;

    async fn create_transaction_details(
        &self,
        transaction_id: i64,
        description: &str,
        tags: &[String],
    ) -> StorageResult<TransactionDetails>;

    /// Merges into the latest details row of the transaction, see
    /// [`TransactionDetails::merge`].
    async fn update_transaction_details(
        &self,
        transaction_id: i64,
        description: &str,
        tags: &[String],
    ) -> StorageResult<TransactionDetails>;
}

pub struct DbOperations {
    pub(crate) connector: Pool<Postgres>
}

impl DbOperations {
    pub async fn new(config: &AppConfig) -> Result<DbOperations, sqlx::Error> {
        tracing::info!("connecting to postgres with max {} connections", config.max_connections) ;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        Ok(DbOperations {
            connector: pool
        })
    }

    /// Creates the three ledger tables if they are missing.
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id BIGSERIAL PRIMARY KEY,
                first_name VARCHAR(50) NOT NULL DEFAULT '',
                last_name VARCHAR(50) NOT NULL DEFAULT '',
                account_number BIGINT NOT NULL,
                balance BIGINT NOT NULL DEFAULT 0,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ).execute(&self.connector).await?;
        tracing::info!("accounts table ready") ;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id BIGSERIAL PRIMARY KEY,
                account_id BIGINT NOT NULL,
                recipient_id BIGINT NOT NULL,
                amount BIGINT NOT NULL,
                transaction_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#
        ).execute(&self.connector).await?;
        tracing::info!("transactions table ready") ;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transaction_details (
                id BIGSERIAL PRIMARY KEY,
                transaction_id BIGINT NOT NULL,
                description TEXT,
                tags TEXT
            )
            "#
        ).execute(&self.connector).await?;
        tracing::info!("transaction_details table ready") ;

        Ok(())
    }

    async fn fetch_account(&self, account_id: i64) -> StorageResult<Account> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, account_number, balance, created_at
            FROM accounts
            WHERE id = $1
            "#
        )
            .bind(account_id)
            .fetch_optional(&self.connector)
            .await?;

        match row {
            Some(r) => account_from_row(&r),
            None => Err(StorageError::not_found("account", account_id)),
        }
    }

    async fn fetch_transaction(&self, transaction_id: i64) -> StorageResult<Transaction> {
        let row = sqlx::query(
            "SELECT id, account_id, recipient_id, amount, transaction_date
             FROM transactions
             WHERE id = $1"
        )
            .bind(transaction_id)
            .fetch_optional(&self.connector)
            .await?;

        match row {
            Some(r) => transaction_from_row(&r),
            None => Err(StorageError::not_found("transaction", transaction_id)),
        }
    }

    async fn adjust_balance(
        tx: &mut PgTransaction<'_, Postgres>,
        account_id: i64,
        delta: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts
             SET balance = balance + $1
             WHERE id = $2"
        )
            .bind(delta)
            .bind(account_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn insert_transaction(
        tx: &mut PgTransaction<'_, Postgres>,
        account_id: i64,
        recipient_id: i64,
        amount: i64,
    ) -> StorageResult<Transaction> {
        let row = sqlx::query(
            "INSERT INTO transactions (account_id, recipient_id, amount, transaction_date)
             VALUES ($1, $2, $3, $4)
             RETURNING id, account_id, recipient_id, amount, transaction_date"
        )
            .bind(account_id)
            .bind(recipient_id)
            .bind(amount)
            .bind(Utc::now())
            .fetch_one(&mut **tx)
            .await?;

        transaction_from_row(&row)
    }
}

#[async_trait]
impl LedgerStore for DbOperations {
    async fn get_accounts(&self) -> StorageResult<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, account_number, balance, created_at
            FROM accounts
            ORDER BY id
            "#
        )
            .fetch_all(&self.connector)
            .await?;

        rows.iter().map(account_from_row).collect()
    }

    async fn create_account(&self, new_account: &NewAccount, account_number: i64) -> StorageResult<Account> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (first_name, last_name, account_number, balance, created_at)
            VALUES ($1, $2, $3, 0, $4)
            RETURNING id, first_name, last_name, account_number, balance, created_at
            "#
        )
            .bind(&new_account.first_name)
            .bind(&new_account.last_name)
            .bind(account_number)
            .bind(Utc::now())
            .fetch_one(&self.connector)
            .await;

        match result {
            Ok(row) => {
                let account = account_from_row(&row)?;
                tracing::info!("inserted account {} with number {}", account.id, account.account_number) ;
                Ok(account)
            },
            Err(err) => {
                tracing::error!("occurred while inserting a new account {}", err) ;
                Err(err.into())
            }
        }
    }

    async fn get_account(&self, account_id: i64) -> StorageResult<Account> {
        self.fetch_account(account_id).await
    }

    async fn get_account_by_number(&self, account_number: i64) -> StorageResult<Account> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, account_number, balance, created_at
            FROM accounts
            WHERE account_number = $1
            ORDER BY id
            LIMIT 1
            "#
        )
            .bind(account_number)
            .fetch_optional(&self.connector)
            .await?;

        match row {
            Some(r) => account_from_row(&r),
            None => Err(StorageError::not_found_by("account", "number", account_number)),
        }
    }

    async fn delete_account(&self, account_id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&self.connector)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("account", account_id));
        }
        Ok(())
    }

    async fn get_account_with_transactions(&self, account_id: i64) -> StorageResult<Account> {
        let mut account = self.fetch_account(account_id).await?;

        let rows = sqlx::query(
            "SELECT id, account_id, recipient_id, amount, transaction_date
             FROM transactions
             WHERE account_id = $1
             ORDER BY id"
        )
            .bind(account_id)
            .fetch_all(&self.connector)
            .await?;

        let transactions = rows
            .iter()
            .map(transaction_from_row)
            .collect::<StorageResult<Vec<_>>>()?;
        account.transactions = Some(transactions);
        Ok(account)
    }

    async fn transfer(&self, req: &TransferRequest) -> StorageResult<Vec<Transaction>> {
        let mut tx = self.connector.begin().await?;

        if Self::adjust_balance(&mut tx, req.account_id, -req.amount).await? == 0 {
            tracing::warn!("source account {} does not exist, balance left untouched", req.account_id) ;
        }
        if Self::adjust_balance(&mut tx, req.recipient_id, req.amount).await? == 0 {
            tracing::warn!("recipient account {} does not exist, balance left untouched", req.recipient_id) ;
        }

        let source_leg = Self::insert_transaction(&mut tx, req.account_id, req.recipient_id, req.amount).await?;
        let recipient_leg = Self::insert_transaction(&mut tx, req.recipient_id, req.recipient_id, req.amount).await?;

        tx.commit().await?;
        tracing::info!("recorded transfer legs {} and {}", source_leg.id, recipient_leg.id) ;

        Ok(vec![source_leg, recipient_leg])
    }

    async fn transaction_exists(&self, transaction_id: i64) -> StorageResult<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM transactions WHERE id = $1) AS found")
            .bind(transaction_id)
            .fetch_one(&self.connector)
            .await?;

        let found: bool = row.try_get("found")?;
        Ok(found)
    }

    async fn get_transaction_with_details(&self, transaction_id: i64) -> StorageResult<Transaction> {
        let mut transaction = self.fetch_transaction(transaction_id).await?;

        let rows = sqlx::query(
            "SELECT id, transaction_id, description, tags
             FROM transaction_details
             WHERE transaction_id = $1
             ORDER BY id"
        )
            .bind(transaction_id)
            .fetch_all(&self.connector)
            .await?;

        let details = rows
            .iter()
            .map(details_from_row)
            .collect::<StorageResult<Vec<_>>>()?;
        transaction.details = Some(details);
        Ok(transaction)
    }

    async fn create_transaction_details(
        &self,
        transaction_id: i64,
        description: &str,
        tags: &[String],
    ) -> StorageResult<TransactionDetails> {
        let row = sqlx::query(
            "INSERT INTO transaction_details (transaction_id, description, tags)
             VALUES ($1, $2, $3)
             RETURNING id, transaction_id, description, tags"
        )
            .bind(transaction_id)
            .bind(description)
            .bind(join_tags(tags))
            .fetch_one(&self.connector)
            .await?;

        details_from_row(&row)
    }

    async fn update_transaction_details(
        &self,
        transaction_id: i64,
        description: &str,
        tags: &[String],
    ) -> StorageResult<TransactionDetails> {
        let mut tx = self.connector.begin().await?;

        let row = sqlx::query(
            "SELECT id, transaction_id, description, tags
             FROM transaction_details
             WHERE transaction_id = $1
             ORDER BY id DESC
             LIMIT 1
             FOR UPDATE"
        )
            .bind(transaction_id)
            .fetch_optional(&mut *tx)
            .await?;

        let mut details = match row {
            Some(r) => details_from_row(&r)?,
            None => {
                tx.rollback().await.ok();
                return Err(StorageError::not_found_by("transaction details", "transaction id", transaction_id));
            }
        };

        details.merge(description, tags);

        sqlx::query(
            "UPDATE transaction_details
             SET description = $1,
                 tags = $2
             WHERE id = $3"
        )
            .bind(&details.description)
            .bind(join_tags(&details.tags))
            .bind(details.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(details)
    }
}

fn account_from_row(r: &PgRow) -> StorageResult<Account> {
    Ok(Account {
        id: r.try_get("id")?,
        first_name: r.try_get("first_name")?,
        last_name: r.try_get("last_name")?,
        account_number: r.try_get("account_number")?,
        balance: r.try_get("balance")?,
        transactions: None,
        created_at: r.try_get("created_at")?,
    })
}

fn transaction_from_row(r: &PgRow) -> StorageResult<Transaction> {
    Ok(Transaction {
        id: r.try_get("id")?,
        account_id: r.try_get("account_id")?,
        recipient_id: r.try_get("recipient_id")?,
        amount: r.try_get("amount")?,
        details: None,
        transaction_date: r.try_get("transaction_date")?,
    })
}

fn details_from_row(r: &PgRow) -> StorageResult<TransactionDetails> {
    let description: Option<String> = r.try_get("description")?;
    let tags: Option<String> = r.try_get("tags")?;
    Ok(TransactionDetails {
        id: r.try_get("id")?,
        transaction_id: r.try_get("transaction_id")?,
        description: description.unwrap_or_default(),
        tags: tags.as_deref().map(split_tags).unwrap_or_default(),
    })
}
