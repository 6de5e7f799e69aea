//! # Polisher Repository

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use stockmate_core::{EntityKind, Polisher, PolisherForm};

use crate::error::{StoreError, StoreResult};
use crate::registry::CrudHandler;
use crate::repository::{decode, encode, encode_all};
use crate::store::SharedTables;

/// Repository for polisher operations.
#[derive(Debug, Clone)]
pub struct PolisherRepository {
    tables: SharedTables,
}

impl PolisherRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        PolisherRepository { tables }
    }

    pub async fn list(&self) -> Vec<Polisher> {
        self.tables.read().await.polishers.clone()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Polisher> {
        self.tables.read().await.polisher(id).cloned()
    }

    pub async fn create(&self, form: PolisherForm) -> StoreResult<Polisher> {
        form.validate()?;

        let now = Utc::now();
        let polisher = Polisher {
            id: Uuid::new_v4().to_string(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            contact_number: form.contact_number.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        self.tables.write().await.polishers.push(polisher.clone());

        info!(id = %polisher.id, name = %polisher.display_name(), "Polisher created");
        Ok(polisher)
    }

    /// Updates a polisher. Recorded entries keep the name they were weighed under.
    pub async fn update(&self, id: &str, form: PolisherForm) -> StoreResult<Polisher> {
        form.validate()?;

        let mut tables = self.tables.write().await;
        let polisher = tables
            .polishers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Polisher, id))?;

        polisher.first_name = form.first_name.trim().to_string();
        polisher.last_name = form.last_name.trim().to_string();
        polisher.contact_number = form.contact_number.trim().to_string();
        polisher.updated_at = Utc::now();

        debug!(id = %polisher.id, "Polisher updated");
        Ok(polisher.clone())
    }

    /// Deletes a polisher unless material entries are assigned to them.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let count = tables
            .entries
            .iter()
            .filter(|e| e.polisher_id == id)
            .count();
        if count > 0 {
            return Err(StoreError::StillReferenced {
                entity: EntityKind::Polisher,
                id: id.to_string(),
                count,
            });
        }

        let before = tables.polishers.len();
        tables.polishers.retain(|p| p.id != id);
        if tables.polishers.len() == before {
            return Err(StoreError::not_found(EntityKind::Polisher, id));
        }

        info!(id = %id, "Polisher deleted");
        Ok(())
    }
}

#[async_trait]
impl CrudHandler for PolisherRepository {
    fn kind(&self) -> EntityKind {
        EntityKind::Polisher
    }

    async fn list(&self) -> StoreResult<Vec<Value>> {
        encode_all(&PolisherRepository::list(self).await)
    }

    async fn create(&self, payload: Value) -> StoreResult<Value> {
        encode(&PolisherRepository::create(self, decode(payload)?).await?)
    }

    async fn update(&self, id: &str, payload: Value) -> StoreResult<Value> {
        encode(&PolisherRepository::update(self, id, decode(payload)?).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        PolisherRepository::delete(self, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
