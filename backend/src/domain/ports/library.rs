//! Driving port for the resource libraries.
//!
//! Career resources, study resources, and tutorials share one storage shape
//! and differ only by [`LibraryKind`], so a single port serves all three.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::library::{LibraryItem, LibraryKind};

use super::{PersistenceError, matches_search};

/// Repository port for library items.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// List items of one kind, newest first, optionally filtered by search.
    async fn list(
        &self,
        kind: LibraryKind,
        search: Option<&str>,
    ) -> Result<Vec<LibraryItem>, PersistenceError>;

    /// Store a new item.
    async fn insert(&self, item: &LibraryItem) -> Result<(), PersistenceError>;

    /// Delete an item of the given kind. Returns `false` when absent.
    async fn delete(&self, kind: LibraryKind, id: Uuid) -> Result<bool, PersistenceError>;
}

/// In-memory library repository for tests and database-less deployments.
#[derive(Default)]
pub struct FixtureLibraryRepository {
    state: Mutex<Vec<LibraryItem>>,
}

impl FixtureLibraryRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<LibraryItem>>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::query("fixture state poisoned"))
    }
}

#[async_trait]
impl LibraryRepository for FixtureLibraryRepository {
    async fn list(
        &self,
        kind: LibraryKind,
        search: Option<&str>,
    ) -> Result<Vec<LibraryItem>, PersistenceError> {
        let mut items: Vec<LibraryItem> = self
            .lock()?
            .iter()
            .filter(|item| item.kind() == kind)
            .filter(|item| {
                matches_search(
                    &[item.title(), item.description(), item.category()],
                    search,
                )
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(items)
    }

    async fn insert(&self, item: &LibraryItem) -> Result<(), PersistenceError> {
        self.lock()?.push(item.clone());
        Ok(())
    }

    async fn delete(&self, kind: LibraryKind, id: Uuid) -> Result<bool, PersistenceError> {
        let mut items = self.lock()?;
        let before = items.len();
        items.retain(|item| !(item.kind() == kind && item.id() == id));
        Ok(items.len() < before)
    }
}
