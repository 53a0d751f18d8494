//! In-memory mapping tables.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{MappingKind, MappingRepository};

#[derive(Default)]
struct Tables {
    by_local: HashMap<(MappingKind, u64), String>,
    by_remote: HashMap<(MappingKind, String), u64>,
}

/// `MappingRepository` backed by two hash maps kept in lockstep.
#[derive(Default)]
pub struct InMemoryMappingRepository {
    tables: RwLock<Tables>,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mappings stored for `kind`.
    pub async fn count(&self, kind: MappingKind) -> usize {
        let tables = self.tables.read().await;
        tables.by_local.keys().filter(|(k, _)| *k == kind).count()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_local_id(
        &self,
        kind: MappingKind,
        remote_id: &str,
    ) -> Result<Option<u64>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.by_remote.get(&(kind, remote_id.to_string())).copied())
    }

    async fn find_remote_id(
        &self,
        kind: MappingKind,
        local_id: u64,
    ) -> Result<Option<String>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.by_local.get(&(kind, local_id)).cloned())
    }

    async fn save(
        &self,
        kind: MappingKind,
        local_id: u64,
        remote_id: &str,
    ) -> Result<(), DomainError> {
        if remote_id.is_empty() {
            return Err(DomainError::validation("remote_id", "Remote id cannot be empty"));
        }

        let mut tables = self.tables.write().await;
        let remote_key = (kind, remote_id.to_string());

        if let Some(owner) = tables.by_remote.get(&remote_key) {
            if *owner != local_id {
                return Err(DomainError::new(
                    ErrorCode::MappingConflict,
                    format!("{} {} is already mapped to {}", kind, remote_id, owner),
                ));
            }
        }

        if let Some(previous) = tables.by_local.insert((kind, local_id), remote_id.to_string()) {
            tables.by_remote.remove(&(kind, previous));
        }
        tables.by_remote.insert(remote_key, local_id);
        Ok(())
    }

    async fn delete(&self, kind: MappingKind, local_id: u64) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        match tables.by_local.remove(&(kind, local_id)) {
            Some(remote_id) => {
                tables.by_remote.remove(&(kind, remote_id));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
