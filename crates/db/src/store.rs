//! [`ToolStore`] implementation over a PostgreSQL pool.

use async_trait::async_trait;
use sqlx::PgPool;
use toolkit_core::tools::store::{PageWindow, StoreError, ToolStore};
use toolkit_core::tools::{NewTool, Tool, ToolFilter, ToolPatch};
use toolkit_core::types::DbId;

use crate::repositories::ToolRepo;

/// PostgreSQL-backed tool store. Cheap to clone (wraps the pool handle).
#[derive(Clone)]
pub struct PgToolStore {
    pool: PgPool,
}

impl PgToolStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolStore for PgToolStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(classify)
    }

    async fn list(
        &self,
        filter: &ToolFilter,
        window: PageWindow,
    ) -> Result<(Vec<Tool>, i64), StoreError> {
        let (rows, total) = ToolRepo::list(&self.pool, filter, window)
            .await
            .map_err(classify)?;
        let tools = rows
            .into_iter()
            .map(Tool::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((tools, total))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Tool>, StoreError> {
        ToolRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify)?
            .map(Tool::try_from)
            .transpose()
    }

    async fn insert(&self, input: &NewTool) -> Result<Tool, StoreError> {
        let row = ToolRepo::create(&self.pool, input)
            .await
            .map_err(classify)?;
        Tool::try_from(row)
    }

    async fn update(&self, id: DbId, patch: &ToolPatch) -> Result<Option<Tool>, StoreError> {
        ToolRepo::update(&self.pool, id, patch)
            .await
            .map_err(classify)?
            .map(Tool::try_from)
            .transpose()
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        ToolRepo::delete(&self.pool, id).await.map_err(classify)
    }

    async fn count(&self, filter: &ToolFilter) -> Result<i64, StoreError> {
        ToolRepo::count(&self.pool, filter).await.map_err(classify)
    }

    async fn count_categories(&self) -> Result<i64, StoreError> {
        ToolRepo::count_categories(&self.pool)
            .await
            .map_err(classify)
    }
}

/// Classify a sqlx error by SQLSTATE and driver error kind.
///
/// - `23505` (unique violation) and `23503` (foreign key violation) carry the
///   constraint name.
/// - Connection exceptions (class `08`), operator intervention (`57P*`),
///   too many connections (`53300`) and pool/IO failures are `Unavailable`.
/// - Everything else is `Other`.
pub fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some("23505") => StoreError::UniqueViolation { constraint },
                Some("23503") => StoreError::ForeignKeyViolation { constraint },
                Some(code) if code.starts_with("08") || code.starts_with("57P") || code == "53300" => {
                    StoreError::Unavailable(db_err.to_string())
                }
                _ => StoreError::Other(db_err.to_string()),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        other => StoreError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        assert_matches!(classify(sqlx::Error::PoolTimedOut), StoreError::Unavailable(_));
    }

    #[test]
    fn io_error_is_unavailable() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_matches!(classify(sqlx::Error::Io(io)), StoreError::Unavailable(_));
    }

    #[test]
    fn row_not_found_is_other() {
        assert_matches!(classify(sqlx::Error::RowNotFound), StoreError::Other(_));
    }
}
