use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::ResetToken;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &PgRow) -> Result<Account, AuthError> {
        let username: String = row.try_get("username").map_err(database_error)?;
        let email: String = row.try_get("email").map_err(database_error)?;
        let phone_number: String = row.try_get("phone_number").map_err(database_error)?;
        let reset_token: Option<String> =
            row.try_get("reset_password_token").map_err(database_error)?;
        let reset_expiry: Option<DateTime<Utc>> =
            row.try_get("reset_password_expiry").map_err(database_error)?;

        Ok(Account {
            id: AccountId(row.try_get("id").map_err(database_error)?),
            username: Username::new(username)
                .map_err(|e| AuthError::DatabaseError(format!("Stored username invalid: {}", e)))?,
            email: EmailAddress::new(email)
                .map_err(|e| AuthError::DatabaseError(format!("Stored email invalid: {}", e)))?,
            phone_number: PhoneNumber::new(phone_number).map_err(|e| {
                AuthError::DatabaseError(format!("Stored phone number invalid: {}", e))
            })?,
            full_name: row.try_get("full_name").map_err(database_error)?,
            address: row.try_get("address").map_err(database_error)?,
            date_of_birth: row
                .try_get::<Option<NaiveDate>, _>("dob")
                .map_err(database_error)?,
            password_hash: row.try_get("password_hash").map_err(database_error)?,
            role: row.try_get("role").map_err(database_error)?,
            is_active: row.try_get("is_active").map_err(database_error)?,
            email_verified: row.try_get("email_verified").map_err(database_error)?,
            reset_token: reset_token
                .zip(reset_expiry)
                .map(|(token, expires_at)| ResetToken { token, expires_at }),
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

fn database_error(e: sqlx::Error) -> AuthError {
    AuthError::DatabaseError(e.to_string())
}

/// Map a unique violation to the conflict of the field whose constraint fired.
fn insert_error(e: sqlx::Error, account: &NewAccount) -> AuthError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("accounts_email_key") => {
                    return AuthError::EmailAlreadyExists(account.email.to_string())
                }
                Some("accounts_username_key") => {
                    return AuthError::UsernameAlreadyExists(account.username.to_string())
                }
                Some("accounts_phone_number_key") => {
                    return AuthError::PhoneNumberAlreadyExists(account.phone_number.to_string())
                }
                _ => {}
            }
        }
    }
    database_error(e)
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (username, email, phone_number, full_name, address, dob, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, email, phone_number, full_name, address, dob, password_hash, role,
                      reset_password_token, reset_password_expiry, email_verified, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.phone_number.as_str())
        .bind(&account.full_name)
        .bind(account.address.as_deref())
        .bind(account.date_of_birth)
        .bind(&account.password_hash)
        .bind(&account.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_error(e, &account))?;

        Self::row_to_account(&row)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, phone_number, full_name, address, dob, password_hash, role,
                   reset_password_token, reset_password_expiry, email_verified, is_active,
                   created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, phone_number, full_name, address, dob, password_hash, role,
                   reset_password_token, reset_password_expiry, email_verified, is_active,
                   created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, phone_number, full_name, address, dob, password_hash, role,
                   reset_password_token, reset_password_expiry, email_verified, is_active,
                   created_at, updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, phone_number, full_name, address, dob, password_hash, role,
                   reset_password_token, reset_password_expiry, email_verified, is_active,
                   created_at, updated_at
            FROM accounts
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AuthError> {
        // Usernames cannot contain '@', so at most one row matches.
        let row = sqlx::query(
            r#"
            SELECT id, username, email, phone_number, full_name, address, dob, password_hash, role,
                   reset_password_token, reset_password_expiry, email_verified, is_active,
                   created_at, updated_at
            FROM accounts
            WHERE email = $1 OR username = $1
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, phone_number, full_name, address, dob, password_hash, role,
                   reset_password_token, reset_password_expiry, email_verified, is_active,
                   created_at, updated_at
            FROM accounts
            WHERE reset_password_token = $1 AND reset_password_expiry > $2
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn update_password(&self, id: AccountId, password_hash: &str) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(id));
        }

        Ok(())
    }

    async fn save_reset_token(
        &self,
        id: AccountId,
        reset_token: &ResetToken,
    ) -> Result<(), AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET reset_password_token = $2, reset_password_expiry = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(&reset_token.token)
        .bind(reset_token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(id));
        }

        Ok(())
    }

    async fn reset_password(
        &self,
        id: AccountId,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET password_hash = $2,
                reset_password_token = NULL,
                reset_password_expiry = NULL,
                updated_at = NOW()
            WHERE id = $1 AND reset_password_token = $3 AND reset_password_expiry > $4
            "#,
        )
        .bind(id.0)
        .bind(password_hash)
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }
}
