//! Tool directory domain (entity, enums, filters, results).
//!
//! The submodules split the query/mutation core by concern:
//! - [`validation`]: pure input rules shared by every entry point
//! - [`store`]: the persistence seam ([`store::ToolStore`])
//! - [`service`]: listing, stats and mutations over a store
//! - [`memory`]: an in-process store used by tests and local tooling

pub mod memory;
pub mod service;
pub mod store;
pub mod validation;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Page size used when the caller does not pass `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Column width of `tools.title`.
pub const TITLE_MAX_LEN: u64 = 255;

/// Column width of `tools.url`.
pub const URL_MAX_LEN: u64 = 500;

/// Column width of `tools.image`.
pub const IMAGE_MAX_LEN: u64 = 500;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// A string that is not a member of one of the tool enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// The fixed set of directory categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCategory {
    DeveloperTools,
    DesignTools,
    ImageMediaTools,
    SeoAnalyticsTools,
    ProductivityUtilities,
    LearningReference,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 6] = [
        ToolCategory::DeveloperTools,
        ToolCategory::DesignTools,
        ToolCategory::ImageMediaTools,
        ToolCategory::SeoAnalyticsTools,
        ToolCategory::ProductivityUtilities,
        ToolCategory::LearningReference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolCategory::DeveloperTools => "developer-tools",
            ToolCategory::DesignTools => "design-tools",
            ToolCategory::ImageMediaTools => "image-media-tools",
            ToolCategory::SeoAnalyticsTools => "seo-analytics-tools",
            ToolCategory::ProductivityUtilities => "productivity-utilities",
            ToolCategory::LearningReference => "learning-reference",
        }
    }
}

impl FromStr for ToolCategory {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownValue {
                kind: "category",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a tool. Only `Active` tools are publicly visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

impl ToolStatus {
    pub const ALL: [ToolStatus; 3] = [ToolStatus::Active, ToolStatus::Pending, ToolStatus::Inactive];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolStatus::Active => "active",
            ToolStatus::Pending => "pending",
            ToolStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for ToolStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownValue {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A persisted directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub description_vi: Option<String>,
    pub url: String,
    pub category: ToolCategory,
    pub status: ToolStatus,
    pub featured: bool,
    pub image: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A validated, normalized insert payload.
///
/// Only [`validation::validate_create`] produces these, so every value
/// reaching a store has already passed the field rules.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTool {
    pub title: String,
    pub description: String,
    pub description_vi: Option<String>,
    pub url: String,
    pub category: ToolCategory,
    pub status: ToolStatus,
    pub featured: bool,
    pub image: Option<String>,
    pub created_by: Option<DbId>,
}

/// A validated partial update.
///
/// `None` leaves a column untouched. For the nullable columns the inner
/// option carries the new value, where `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_vi: Option<Option<String>>,
    pub url: Option<String>,
    pub category: Option<ToolCategory>,
    pub status: Option<ToolStatus>,
    pub featured: Option<bool>,
    pub image: Option<Option<String>>,
}

impl ToolPatch {
    /// A patch that only moves a tool to `status`.
    pub fn status(status: ToolStatus) -> Self {
        ToolPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ToolPatch::default()
    }

    /// Apply the patch to an in-memory record (timestamps are not touched).
    pub fn apply_to(&self, tool: &mut Tool) {
        if let Some(title) = &self.title {
            tool.title = title.clone();
        }
        if let Some(description) = &self.description {
            tool.description = description.clone();
        }
        if let Some(description_vi) = &self.description_vi {
            tool.description_vi = description_vi.clone();
        }
        if let Some(url) = &self.url {
            tool.url = url.clone();
        }
        if let Some(category) = self.category {
            tool.category = category;
        }
        if let Some(status) = self.status {
            tool.status = status;
        }
        if let Some(featured) = self.featured {
            tool.featured = featured;
        }
        if let Some(image) = &self.image {
            tool.image = image.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Which statuses a listing may return.
///
/// Defaults to active-only so public listings never leak pending or
/// inactive tools unless a caller asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Is(ToolStatus),
    Any,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::Is(ToolStatus::Active)
    }
}

/// Caller-facing listing request. Validated by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ListToolsParams {
    pub page: i64,
    pub limit: i64,
    pub category: Option<ToolCategory>,
    pub status: StatusFilter,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub created_by: Option<DbId>,
}

impl Default for ListToolsParams {
    fn default() -> Self {
        ListToolsParams {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            category: None,
            status: StatusFilter::default(),
            featured: None,
            search: None,
            created_by: None,
        }
    }
}

/// The predicate a store evaluates. All present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolFilter {
    pub category: Option<ToolCategory>,
    pub status: Option<ToolStatus>,
    pub featured: Option<bool>,
    /// Case-insensitive substring matched against title or description.
    pub search: Option<String>,
    pub created_by: Option<DbId>,
}

impl ToolFilter {
    pub fn with_status(status: ToolStatus) -> Self {
        ToolFilter {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Evaluate the predicate against one record.
    pub fn matches(&self, tool: &Tool) -> bool {
        if self.category.is_some_and(|c| c != tool.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != tool.status) {
            return false;
        }
        if self.featured.is_some_and(|f| f != tool.featured) {
            return false;
        }
        if self.created_by.is_some() && self.created_by != tool.created_by {
            return false;
        }
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                tool.title.to_lowercase().contains(&needle)
                    || tool.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// One page of a listing plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPage {
    pub items: Vec<Tool>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl ToolPage {
    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStats {
    pub total: i64,
    pub active: i64,
    pub pending: i64,
    pub inactive: i64,
    pub featured: i64,
    /// Number of distinct categories in use.
    pub categories: i64,
}

/// Outcome of a bulk mutation. Per-item failures are counted, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub succeeded: usize,
    pub failed: usize,
    pub failed_ids: Vec<String>,
}

impl BulkResult {
    pub fn record_failure(&mut self, id: impl Into<String>) {
        self.failed += 1;
        self.failed_ids.push(id.into());
    }
}
