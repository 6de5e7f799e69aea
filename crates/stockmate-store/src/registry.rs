//! # Handler Registry
//!
//! Maps each [`EntityKind`] to the handler that lists, creates, updates and
//! deletes it, so the management screens dispatch through one table instead
//! of matching on an entity-type string at every call site.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  registry.update(EntityKind::BagType, id, json)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HashMap<EntityKind, Arc<dyn CrudHandler>>                             │
//! │       │                                                                 │
//! │       ├── missing handler   → StoreError::HandlerMissing               │
//! │       ├── capability absent → StoreError::Unsupported                  │
//! │       ▼                                                                 │
//! │  BagTypeRepository::update(id, BagTypeForm)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payloads are `serde_json::Value` in the camelCase shape the forms send.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use stockmate_core::EntityKind;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Capabilities
// =============================================================================

/// Which operations a handler supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub list: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const FULL: Capabilities = Capabilities {
        list: true,
        create: true,
        update: true,
        delete: true,
    };

    /// Material entries: created only through the submission flow.
    pub const NO_CREATE: Capabilities = Capabilities {
        list: true,
        create: false,
        update: true,
        delete: true,
    };
}

// =============================================================================
// CRUD Handler
// =============================================================================

/// Generic CRUD over JSON payloads for one entity kind.
#[async_trait]
pub trait CrudHandler: Send + Sync + 'static {
    fn kind(&self) -> EntityKind;

    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    async fn list(&self) -> StoreResult<Vec<Value>>;

    async fn create(&self, _payload: Value) -> StoreResult<Value> {
        Err(StoreError::Unsupported {
            entity: self.kind(),
            operation: "create",
        })
    }

    async fn update(&self, id: &str, payload: Value) -> StoreResult<Value>;

    async fn delete(&self, id: &str) -> StoreResult<()>;
}

// =============================================================================
// Registry
// =============================================================================

/// The entity-kind to handler table, built once by `Store::new`.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EntityKind, Arc<dyn CrudHandler>>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort();
        f.debug_struct("HandlerRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        HandlerRegistry::default()
    }

    /// Registers a handler, replacing any previous one for the same kind.
    pub fn register(&mut self, handler: Arc<dyn CrudHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn get(&self, kind: EntityKind) -> Option<Arc<dyn CrudHandler>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn capabilities(&self, kind: EntityKind) -> Option<Capabilities> {
        self.handlers.get(&kind).map(|h| h.capabilities())
    }

    fn resolve(
        &self,
        kind: EntityKind,
        operation: &'static str,
        allowed: impl Fn(Capabilities) -> bool,
    ) -> StoreResult<&Arc<dyn CrudHandler>> {
        let handler = self
            .handlers
            .get(&kind)
            .ok_or(StoreError::HandlerMissing(kind))?;

        if !allowed(handler.capabilities()) {
            return Err(StoreError::Unsupported {
                entity: kind,
                operation,
            });
        }

        debug!(entity = %kind, operation, "Dispatching CRUD operation");
        Ok(handler)
    }

    pub async fn list(&self, kind: EntityKind) -> StoreResult<Vec<Value>> {
        self.resolve(kind, "list", |c| c.list)?.list().await
    }

    pub async fn create(&self, kind: EntityKind, payload: Value) -> StoreResult<Value> {
        self.resolve(kind, "create", |c| c.create)?
            .create(payload)
            .await
    }

    pub async fn update(&self, kind: EntityKind, id: &str, payload: Value) -> StoreResult<Value> {
        self.resolve(kind, "update", |c| c.update)?
            .update(id, payload)
            .await
    }

    pub async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<()> {
        self.resolve(kind, "delete", |c| c.delete)?.delete(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
