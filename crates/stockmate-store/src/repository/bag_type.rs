//! # Bag Type Repository
//!
//! Bag types hold the tare weight subtracted from every gross reading.
//! Names are unique, compared case-insensitively.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use stockmate_core::{BagType, BagTypeForm, EntityKind};

use crate::error::{StoreError, StoreResult};
use crate::registry::CrudHandler;
use crate::repository::{decode, encode, encode_all};
use crate::store::SharedTables;

/// Repository for bag type operations.
#[derive(Debug, Clone)]
pub struct BagTypeRepository {
    tables: SharedTables,
}

impl BagTypeRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        BagTypeRepository { tables }
    }

    pub async fn list(&self) -> Vec<BagType> {
        self.tables.read().await.bag_types.clone()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<BagType> {
        self.tables.read().await.bag_type(id).cloned()
    }

    pub async fn create(&self, form: BagTypeForm) -> StoreResult<BagType> {
        form.validate()?;
        let name = form.name.trim().to_string();

        let mut tables = self.tables.write().await;
        if tables
            .bag_types
            .iter()
            .any(|b| b.name.eq_ignore_ascii_case(&name))
        {
            return Err(StoreError::duplicate("bag type name", name));
        }

        let now = Utc::now();
        let bag_type = BagType {
            id: Uuid::new_v4().to_string(),
            name,
            weight: form.weight,
            created_at: now,
            updated_at: now,
        };
        tables.bag_types.push(bag_type.clone());

        info!(id = %bag_type.id, name = %bag_type.name, weight = bag_type.weight, "Bag type created");
        Ok(bag_type)
    }

    /// Updates a bag type. Recorded entries keep their tare snapshot.
    pub async fn update(&self, id: &str, form: BagTypeForm) -> StoreResult<BagType> {
        form.validate()?;
        let name = form.name.trim().to_string();

        let mut tables = self.tables.write().await;
        if tables
            .bag_types
            .iter()
            .any(|b| b.id != id && b.name.eq_ignore_ascii_case(&name))
        {
            return Err(StoreError::duplicate("bag type name", name));
        }

        let bag_type = tables
            .bag_types
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::BagType, id))?;

        bag_type.name = name;
        bag_type.weight = form.weight;
        bag_type.updated_at = Utc::now();

        debug!(id = %bag_type.id, "Bag type updated");
        Ok(bag_type.clone())
    }

    /// Deletes a bag type unless material entries still reference it.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let count = tables
            .entries
            .iter()
            .filter(|e| e.bag_type_id == id)
            .count();
        if count > 0 {
            return Err(StoreError::StillReferenced {
                entity: EntityKind::BagType,
                id: id.to_string(),
                count,
            });
        }

        let before = tables.bag_types.len();
        tables.bag_types.retain(|b| b.id != id);
        if tables.bag_types.len() == before {
            return Err(StoreError::not_found(EntityKind::BagType, id));
        }

        info!(id = %id, "Bag type deleted");
        Ok(())
    }
}

#[async_trait]
impl CrudHandler for BagTypeRepository {
    fn kind(&self) -> EntityKind {
        EntityKind::BagType
    }

    async fn list(&self) -> StoreResult<Vec<Value>> {
        encode_all(&BagTypeRepository::list(self).await)
    }

    async fn create(&self, payload: Value) -> StoreResult<Value> {
        encode(&BagTypeRepository::create(self, decode(payload)?).await?)
    }

    async fn update(&self, id: &str, payload: Value) -> StoreResult<Value> {
        encode(&BagTypeRepository::update(self, id, decode(payload)?).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        BagTypeRepository::delete(self, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn form(name: &str, weight: f64) -> BagTypeForm {
        BagTypeForm {
            name: name.to_string(),
            weight,
        }
    }

    #[tokio::test]
    async fn test_zero_tare_is_allowed() {
        let store = Store::in_memory();
        let bag = store.bag_types().create(form("None", 0.0)).await.unwrap();
        assert_eq!(bag.weight, 0.0);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let store = Store::in_memory();
        let repo = store.bag_types();
        repo.create(form("Tray", 1.6)).await.unwrap();

        let err = repo.create(form("tray", 1.5)).await.unwrap_err();
        assert_eq!(err.to_string(), "Duplicate bag type name: 'tray' already exists");
    }

    #[tokio::test]
    async fn test_update_changes_tare() {
        let store = Store::in_memory();
        let repo = store.bag_types();
        let bag = repo.create(form("Sack Bag", 0.1)).await.unwrap();

        let updated = repo.update(&bag.id, form("Sack Bag", 0.15)).await.unwrap();
        assert_eq!(updated.weight, 0.15);
        assert_eq!(repo.get_by_id(&bag.id).await, Some(updated));
    }

    #[tokio::test]
    async fn test_negative_tare_rejected() {
        let store = Store::in_memory();
        let err = store
            .bag_types()
            .create(form("Broken", -0.1))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
