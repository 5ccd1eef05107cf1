//! Repository for the `tools` table.

use sqlx::PgPool;
use toolkit_core::tools::store::PageWindow;
use toolkit_core::tools::{NewTool, ToolFilter, ToolPatch};
use toolkit_core::types::DbId;

use crate::models::tool::ToolRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, description_vi, url, category, status, \
    featured, image, created_by, created_at, updated_at";

/// Predicate shared by listing and counting. Binds `$1..$5`; a NULL bind
/// disables the corresponding condition.
const FILTER: &str = "($1::TEXT IS NULL OR category = $1) \
    AND ($2::TEXT IS NULL OR status = $2) \
    AND ($3::BOOLEAN IS NULL OR featured = $3) \
    AND ($4::TEXT IS NULL OR title ILIKE $4 ESCAPE '\\' OR description ILIKE $4 ESCAPE '\\') \
    AND ($5::UUID IS NULL OR created_by = $5)";

/// Bind values for [`FILTER`].
struct FilterBinds {
    category: Option<&'static str>,
    status: Option<&'static str>,
    featured: Option<bool>,
    pattern: Option<String>,
    created_by: Option<DbId>,
}

impl From<&ToolFilter> for FilterBinds {
    fn from(filter: &ToolFilter) -> Self {
        FilterBinds {
            category: filter.category.map(|c| c.as_str()),
            status: filter.status.map(|s| s.as_str()),
            featured: filter.featured,
            pattern: filter.search.as_deref().map(contains_pattern),
            created_by: filter.created_by,
        }
    }
}

/// Provides CRUD and aggregate operations for tools.
pub struct ToolRepo;

impl ToolRepo {
    /// Fetch one page and the total match count inside a single
    /// REPEATABLE READ transaction so both see the same snapshot.
    ///
    /// Ordered by `created_at DESC, id DESC`.
    pub async fn list(
        pool: &PgPool,
        filter: &ToolFilter,
        window: PageWindow,
    ) -> Result<(Vec<ToolRow>, i64), sqlx::Error> {
        let binds = FilterBinds::from(filter);
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tools WHERE {FILTER} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $6 OFFSET $7"
        );
        let rows = sqlx::query_as::<_, ToolRow>(&query)
            .bind(binds.category)
            .bind(binds.status)
            .bind(binds.featured)
            .bind(&binds.pattern)
            .bind(binds.created_by)
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&mut *tx)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM tools WHERE {FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(binds.category)
            .bind(binds.status)
            .bind(binds.featured)
            .bind(&binds.pattern)
            .bind(binds.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((rows, total))
    }

    /// Count rows matching `filter`.
    pub async fn count(pool: &PgPool, filter: &ToolFilter) -> Result<i64, sqlx::Error> {
        let binds = FilterBinds::from(filter);
        let query = format!("SELECT COUNT(*) FROM tools WHERE {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(binds.category)
            .bind(binds.status)
            .bind(binds.featured)
            .bind(&binds.pattern)
            .bind(binds.created_by)
            .fetch_one(pool)
            .await
    }

    /// Number of distinct categories currently in use.
    pub async fn count_categories(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT category) FROM tools")
            .fetch_one(pool)
            .await
    }

    /// Find a tool by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ToolRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tools WHERE id = $1");
        sqlx::query_as::<_, ToolRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new tool, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewTool) -> Result<ToolRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tools \
                (title, description, description_vi, url, category, status, featured, image, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ToolRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.description_vi)
            .bind(&input.url)
            .bind(input.category.as_str())
            .bind(input.status.as_str())
            .bind(input.featured)
            .bind(&input.image)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Update a tool. Only `Some` fields are applied; `updated_at` always
    /// moves forward.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &ToolPatch,
    ) -> Result<Option<ToolRow>, sqlx::Error> {
        let query = format!(
            "UPDATE tools SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                description_vi = CASE WHEN $4::BOOLEAN THEN $5::TEXT ELSE description_vi END, \
                url = COALESCE($6, url), \
                category = COALESCE($7, category), \
                status = COALESCE($8, status), \
                featured = COALESCE($9, featured), \
                image = CASE WHEN $10::BOOLEAN THEN $11::TEXT ELSE image END, \
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ToolRow>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.description_vi.is_some())
            .bind(patch.description_vi.clone().flatten())
            .bind(&patch.url)
            .bind(patch.category.map(|c| c.as_str()))
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.featured)
            .bind(patch.image.is_some())
            .bind(patch.image.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a tool by ID. Returns `true` if exactly one row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

/// Build an ILIKE pattern matching `term` anywhere, with `%`, `_` and `\`
/// in the term taken literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
