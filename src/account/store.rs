//! Account persistence over PostgreSQL
//!
//! Email uniqueness is enforced by the UNIQUE constraint: when two
//! registrations race on the same address, exactly one insert succeeds and
//! the loser surfaces as `EmailTaken`.

use super::model::{Account, AccountRole};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Account not found")]
    NotFound,

    #[error("An account with the given email address already exists")]
    EmailTaken,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = e {
            // 23505: unique_violation
            if db.code().as_deref() == Some("23505") {
                return StoreError::EmailTaken;
            }
        }
        StoreError::Database(e.to_string())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
    active_token: Option<Uuid>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            active_token: row.active_token,
            // The CHECK constraint keeps this total
            role: AccountRole::parse(&row.role).unwrap_or(AccountRole::Customer),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, email, password_hash, active_token, role, created_at, updated_at";

/// Account store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Synchronize the accounts table schema
    ///
    /// Run once at startup; the process must not serve requests if this
    /// fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT,
                active_token UUID,
                role TEXT NOT NULL DEFAULT 'customer'
                    CHECK (role IN ('admin', 'premium', 'customer', 'guest')),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new account
    pub async fn create(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password_hash, active_token, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.active_token)
        .bind(account.role.as_str())
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find account by email
    pub async fn find_by_email(&self, email: &str) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from).ok_or(StoreError::NotFound)
    }

    /// Find account by id
    pub async fn find_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from).ok_or(StoreError::NotFound)
    }

    /// Find account by its pending activation token
    pub async fn find_by_active_token(&self, active_token: Uuid) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM accounts WHERE active_token = $1"
        ))
        .bind(active_token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::from).ok_or(StoreError::NotFound)
    }

    /// Persist mutable fields of an existing account
    ///
    /// `updated_at` is bumped by the store; `id` and `created_at` are
    /// immutable.
    pub async fn save(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET email = $2, password_hash = $3, active_token = $4, role = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.active_token)
        .bind(account.role.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    /// Delete an account by id
    ///
    /// Deleting an already-removed account is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
