//! Row mapping for the `tools` table.

use sqlx::FromRow;
use toolkit_core::tools::store::StoreError;
use toolkit_core::tools::Tool;
use toolkit_core::types::{DbId, Timestamp};

/// A `tools` row as stored. `category` and `status` are VARCHAR columns
/// guarded by CHECK constraints and parsed into enums on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct ToolRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub description_vi: Option<String>,
    pub url: String,
    pub category: String,
    pub status: String,
    pub featured: bool,
    pub image: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ToolRow> for Tool {
    type Error = StoreError;

    fn try_from(row: ToolRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e| StoreError::Other(format!("tool {}: {e}", row.id)))?;
        let status = row
            .status
            .parse()
            .map_err(|e| StoreError::Other(format!("tool {}: {e}", row.id)))?;

        Ok(Tool {
            id: row.id,
            title: row.title,
            description: row.description,
            description_vi: row.description_vi,
            url: row.url,
            category,
            status,
            featured: row.featured,
            image: row.image,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
