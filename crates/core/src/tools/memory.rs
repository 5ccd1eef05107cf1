//! In-process [`ToolStore`] with the same constraints as the `tools` table.
//!
//! Enforces the `uq_tools_url` unique constraint and the `created_by`
//! foreign key against a registered set of user ids. Timestamps are strictly
//! increasing so `created_at DESC` ordering is deterministic.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use super::store::{PageWindow, StoreError, ToolStore};
use super::{NewTool, Tool, ToolFilter, ToolPatch};
use crate::types::{DbId, Timestamp};

const URL_CONSTRAINT: &str = "uq_tools_url";
const CREATED_BY_CONSTRAINT: &str = "fk_tools_created_by";

#[derive(Default)]
struct Inner {
    tools: Vec<Tool>,
    users: HashSet<DbId>,
    last_stamp: Option<Timestamp>,
    unavailable: bool,
}

impl Inner {
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("memory store marked unavailable".into()))
        } else {
            Ok(())
        }
    }

    fn next_stamp(&mut self) -> Timestamp {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn check_url_free(&self, url: &str, except: Option<DbId>) -> Result<(), StoreError> {
        let taken = self
            .tools
            .iter()
            .any(|t| t.url == url && Some(t.id) != except);
        if taken {
            Err(StoreError::UniqueViolation {
                constraint: URL_CONSTRAINT.into(),
            })
        } else {
            Ok(())
        }
    }
}

/// Thread-safe in-memory tool table.
#[derive(Default)]
pub struct MemoryToolStore {
    inner: RwLock<Inner>,
}

impl MemoryToolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user id that `created_by` may reference.
    pub async fn add_user(&self, id: DbId) {
        self.inner.write().await.users.insert(id);
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.inner.write().await.unavailable = unavailable;
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.tools.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ToolStore for MemoryToolStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.read().await.check_available()
    }

    async fn list(
        &self,
        filter: &ToolFilter,
        window: PageWindow,
    ) -> Result<(Vec<Tool>, i64), StoreError> {
        let inner = self.inner.read().await;
        inner.check_available()?;

        let mut matching: Vec<&Tool> = inner.tools.iter().filter(|t| filter.matches(t)).collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(window.offset.max(0) as usize)
            .take(window.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Tool>, StoreError> {
        let inner = self.inner.read().await;
        inner.check_available()?;
        Ok(inner.tools.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, input: &NewTool) -> Result<Tool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;
        inner.check_url_free(&input.url, None)?;
        if let Some(user) = input.created_by {
            if !inner.users.contains(&user) {
                return Err(StoreError::ForeignKeyViolation {
                    constraint: CREATED_BY_CONSTRAINT.into(),
                });
            }
        }

        let now = inner.next_stamp();
        let tool = Tool {
            id: DbId::new_v4(),
            title: input.title.clone(),
            description: input.description.clone(),
            description_vi: input.description_vi.clone(),
            url: input.url.clone(),
            category: input.category,
            status: input.status,
            featured: input.featured,
            image: input.image.clone(),
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        inner.tools.push(tool.clone());
        Ok(tool)
    }

    async fn update(&self, id: DbId, patch: &ToolPatch) -> Result<Option<Tool>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;
        if !inner.tools.iter().any(|t| t.id == id) {
            return Ok(None);
        }
        if let Some(url) = &patch.url {
            inner.check_url_free(url, Some(id))?;
        }

        let now = inner.next_stamp();
        let Some(tool) = inner.tools.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply_to(tool);
        tool.updated_at = now;
        Ok(Some(tool.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_available()?;
        let before = inner.tools.len();
        inner.tools.retain(|t| t.id != id);
        Ok(inner.tools.len() + 1 == before)
    }

    async fn count(&self, filter: &ToolFilter) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        inner.check_available()?;
        Ok(inner.tools.iter().filter(|t| filter.matches(t)).count() as i64)
    }

    async fn count_categories(&self) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        inner.check_available()?;
        let categories: HashSet<_> = inner.tools.iter().map(|t| t.category).collect();
        Ok(categories.len() as i64)
    }
}
