use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewSession;
use crate::domain::account::models::Session;
use crate::domain::account::models::SessionId;
use crate::domain::account::ports::SessionRepository;

pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: &PgRow) -> Result<Session, AuthError> {
        Ok(Session {
            id: SessionId(row.try_get("id").map_err(database_error)?),
            account_id: AccountId(row.try_get("account_id").map_err(database_error)?),
            access_token: row.try_get("access_token").map_err(database_error)?,
            refresh_token: row.try_get("refresh_token").map_err(database_error)?,
            access_expires_at: row.try_get("access_expires_at").map_err(database_error)?,
            refresh_expires_at: row.try_get("refresh_expires_at").map_err(database_error)?,
            created_at: row.try_get("created_at").map_err(database_error)?,
            updated_at: row.try_get("updated_at").map_err(database_error)?,
        })
    }
}

fn database_error(e: sqlx::Error) -> AuthError {
    AuthError::DatabaseError(e.to_string())
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: NewSession) -> Result<Session, AuthError> {
        let row = sqlx::query(
            r#"
            INSERT INTO sessions (account_id, access_token, refresh_token, access_expires_at, refresh_expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, account_id, access_token, refresh_token, access_expires_at,
                      refresh_expires_at, created_at, updated_at
            "#,
        )
        .bind(session.account_id.0)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.access_expires_at)
        .bind(session.refresh_expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        Self::row_to_session(&row)
    }

    async fn replace_for_account(&self, session: NewSession) -> Result<Session, AuthError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Serializes concurrent logins of the same account.
        let locked = sqlx::query("SELECT id FROM accounts WHERE id = $1 FOR UPDATE")
            .bind(session.account_id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?;

        if locked.is_none() {
            return Err(AuthError::NotFound(session.account_id));
        }

        sqlx::query("DELETE FROM sessions WHERE account_id = $1")
            .bind(session.account_id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        let row = sqlx::query(
            r#"
            INSERT INTO sessions (account_id, access_token, refresh_token, access_expires_at, refresh_expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, account_id, access_token, refresh_token, access_expires_at,
                      refresh_expires_at, created_at, updated_at
            "#,
        )
        .bind(session.account_id.0)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.access_expires_at)
        .bind(session.refresh_expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(database_error)?;

        let created = Self::row_to_session(&row)?;
        tx.commit().await.map_err(database_error)?;

        Ok(created)
    }

    async fn find_latest_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Session>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, account_id, access_token, refresh_token, access_expires_at,
                   refresh_expires_at, created_at, updated_at
            FROM sessions
            WHERE account_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(account_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn rotate(
        &self,
        session: &Session,
        previous_refresh_token: &str,
    ) -> Result<bool, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET access_token = $2,
                refresh_token = $3,
                access_expires_at = $4,
                refresh_expires_at = $5,
                updated_at = $6
            WHERE id = $1 AND refresh_token = $7
            "#,
        )
        .bind(session.id.0)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.access_expires_at)
        .bind(session.refresh_expires_at)
        .bind(session.updated_at)
        .bind(previous_refresh_token)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_by_access_token(&self, access_token: &str) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE access_token = $1")
            .bind(access_token)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_by_account(&self, account_id: AccountId) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM sessions WHERE account_id = $1")
            .bind(account_id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
