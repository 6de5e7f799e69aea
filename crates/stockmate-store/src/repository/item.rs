//! # Item Repository
//!
//! Items carry the standard weight per dozen the tolerance check compares
//! against. The code (e.g. `C001`) is unique, compared case-insensitively.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use stockmate_core::{EntityKind, Item, ItemForm};

use crate::error::{StoreError, StoreResult};
use crate::registry::CrudHandler;
use crate::repository::{decode, encode, encode_all};
use crate::store::SharedTables;

/// Repository for item operations.
///
/// ## Usage
/// ```rust,ignore
/// let item = store.items().create(ItemForm { code: "C001".into(), .. }).await?;
/// let all = store.items().list().await;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    tables: SharedTables,
}

impl ItemRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        ItemRepository { tables }
    }

    pub async fn list(&self) -> Vec<Item> {
        self.tables.read().await.items.clone()
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Some(Item)` - Item found
    /// * `None` - Item not found
    pub async fn get_by_id(&self, id: &str) -> Option<Item> {
        self.tables.read().await.item(id).cloned()
    }

    pub async fn get_by_code(&self, code: &str) -> Option<Item> {
        let code = code.trim();
        self.tables
            .read()
            .await
            .items
            .iter()
            .find(|i| i.code.eq_ignore_ascii_case(code))
            .cloned()
    }

    /// Creates an item.
    ///
    /// ## Errors
    /// * `StoreError::Validation` - Bad code, name or weight
    /// * `StoreError::Duplicate` - Code already used
    pub async fn create(&self, form: ItemForm) -> StoreResult<Item> {
        form.validate()?;
        let code = form.code.trim().to_string();

        let mut tables = self.tables.write().await;
        if tables.items.iter().any(|i| i.code.eq_ignore_ascii_case(&code)) {
            return Err(StoreError::duplicate("item code", code));
        }

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4().to_string(),
            code,
            name: form.name.trim().to_string(),
            standard_weight: form.standard_weight,
            created_at: now,
            updated_at: now,
        };
        tables.items.push(item.clone());

        info!(id = %item.id, code = %item.code, "Item created");
        Ok(item)
    }

    /// Updates an item.
    ///
    /// Existing material entries keep the code, name and standard weight
    /// they were weighed against.
    pub async fn update(&self, id: &str, form: ItemForm) -> StoreResult<Item> {
        form.validate()?;
        let code = form.code.trim().to_string();

        let mut tables = self.tables.write().await;
        if tables
            .items
            .iter()
            .any(|i| i.id != id && i.code.eq_ignore_ascii_case(&code))
        {
            return Err(StoreError::duplicate("item code", code));
        }

        let item = tables
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Item, id))?;

        item.code = code;
        item.name = form.name.trim().to_string();
        item.standard_weight = form.standard_weight;
        item.updated_at = Utc::now();

        debug!(id = %item.id, "Item updated");
        Ok(item.clone())
    }

    /// Deletes an item.
    ///
    /// ## Errors
    /// * `StoreError::StillReferenced` - Material entries use this item
    /// * `StoreError::NotFound` - No such item
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let count = tables.entries.iter().filter(|e| e.item_id == id).count();
        if count > 0 {
            return Err(StoreError::StillReferenced {
                entity: EntityKind::Item,
                id: id.to_string(),
                count,
            });
        }

        let before = tables.items.len();
        tables.items.retain(|i| i.id != id);
        if tables.items.len() == before {
            return Err(StoreError::not_found(EntityKind::Item, id));
        }

        info!(id = %id, "Item deleted");
        Ok(())
    }
}

#[async_trait]
impl CrudHandler for ItemRepository {
    fn kind(&self) -> EntityKind {
        EntityKind::Item
    }

    async fn list(&self) -> StoreResult<Vec<Value>> {
        encode_all(&ItemRepository::list(self).await)
    }

    async fn create(&self, payload: Value) -> StoreResult<Value> {
        encode(&ItemRepository::create(self, decode(payload)?).await?)
    }

    async fn update(&self, id: &str, payload: Value) -> StoreResult<Value> {
        encode(&ItemRepository::update(self, id, decode(payload)?).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        ItemRepository::delete(self, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use serde_json::json;
    use stockmate_core::ValidationError;

    fn form(code: &str, name: &str, weight: f64) -> ItemForm {
        ItemForm {
            code: code.to_string(),
            name: name.to_string(),
            standard_weight: weight,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = Store::in_memory();
        let repo = store.items();

        let item = repo.create(form(" C001 ", "Item A", 0.95)).await.unwrap();
        assert_eq!(item.code, "C001");
        assert!(Uuid::parse_str(&item.id).is_ok());

        assert_eq!(repo.get_by_id(&item.id).await, Some(item.clone()));
        assert_eq!(repo.get_by_code("c001").await, Some(item));
        assert_eq!(repo.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let store = Store::in_memory();
        let repo = store.items();
        repo.create(form("C001", "Item A", 0.95)).await.unwrap();

        let err = repo.create(form("c001", "Other", 1.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_own_code() {
        let store = Store::in_memory();
        let repo = store.items();
        let a = repo.create(form("C001", "Item A", 0.95)).await.unwrap();
        repo.create(form("C002", "Item B", 0.80)).await.unwrap();

        let updated = repo.update(&a.id, form("C001", "Item A+", 0.97)).await.unwrap();
        assert_eq!(updated.name, "Item A+");
        assert_eq!(updated.created_at, a.created_at);

        let err = repo.update(&a.id, form("C002", "Clash", 0.9)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_invalid_standard_weight() {
        let store = Store::in_memory();
        let err = store
            .items()
            .create(form("C009", "Bad", -0.5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let store = Store::in_memory();
        let err = store.items().delete("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_registry_round_trip() {
        let store = Store::in_memory();
        let created = store
            .registry()
            .create(
                EntityKind::Item,
                json!({ "code": "C003", "name": "Item C", "standardWeight": 0.9 }),
            )
            .await
            .unwrap();
        assert_eq!(created["code"], "C003");

        let listed = store.registry().list(EntityKind::Item).await.unwrap();
        assert_eq!(listed.len(), 1);

        let err = store
            .registry()
            .create(EntityKind::Item, json!({ "code": "C004" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPayload(_)));
    }
}
