//! # Store Handle
//!
//! The shared tables and the handle that hands out repositories.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Store Lifecycle                                 │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::from_env() ← Tolerance %, report decimals                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::new(config) ← Validate config, build engine + registry         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │      Arc<RwLock<Tables>>                │                           │
//! │  │  items │ bag_types │ polishers │ entries│                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Every repository clones the Arc                                │
//! │       ▼                                                                 │
//! │  store.items()    store.entries()    store.registry()                  │
//! │  (many readers, one writer at a time)                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use stockmate_core::{
    BagType, EntityKind, EntryDraft, Item, MaterialEntry, Polisher, Submission, ToleranceEngine,
};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::registry::HandlerRegistry;
use crate::repository::bag_type::BagTypeRepository;
use crate::repository::entry::EntryRepository;
use crate::repository::item::ItemRepository;
use crate::repository::polisher::PolisherRepository;

// =============================================================================
// Tables
// =============================================================================

/// The four collections, in insertion order.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub items: Vec<Item>,
    pub bag_types: Vec<BagType>,
    pub polishers: Vec<Polisher>,
    pub entries: Vec<MaterialEntry>,
}

impl Tables {
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn bag_type(&self, id: &str) -> Option<&BagType> {
        self.bag_types.iter().find(|b| b.id == id)
    }

    pub fn polisher(&self, id: &str) -> Option<&Polisher> {
        self.polishers.iter().find(|p| p.id == id)
    }

    /// Builds a draft from master ids, snapshotting codes, names and weights
    /// from the masters as they are now.
    pub fn snapshot(
        &self,
        item_id: &str,
        bag_type_id: &str,
        polisher_id: &str,
        dozens: u32,
        gross_weight: f64,
    ) -> StoreResult<EntryDraft> {
        let item = self
            .item(item_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Item, item_id))?;
        let bag_type = self
            .bag_type(bag_type_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::BagType, bag_type_id))?;
        let polisher = self
            .polisher(polisher_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Polisher, polisher_id))?;

        Ok(EntryDraft::new(item, bag_type, polisher, dozens, gross_weight))
    }
}

pub(crate) type SharedTables = Arc<RwLock<Tables>>;

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cloning is cheap; every clone sees the same tables.
///
/// ## Usage
/// ```rust
/// use stockmate_store::{Store, StoreConfig};
///
/// let store = Store::new(StoreConfig::default()).unwrap();
/// assert_eq!(store.engine().tolerance().percentage(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    tables: SharedTables,
    config: StoreConfig,
    registry: Arc<HandlerRegistry>,
}

impl Store {
    /// Creates an empty store.
    ///
    /// ## What This Does
    /// 1. Validates the configuration (tolerance fraction in `[0, 1)`)
    /// 2. Creates the shared tables
    /// 3. Registers one CRUD handler per entity kind
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        info!(
            tolerance_pct = config.tolerance.percentage(),
            display_decimals = config.display_decimals,
            "Initializing store"
        );

        Ok(Self::assemble(config))
    }

    /// Creates a store with default configuration (2% tolerance).
    pub fn in_memory() -> Self {
        Self::assemble(StoreConfig::default())
    }

    fn assemble(config: StoreConfig) -> Self {
        let tables: SharedTables = Arc::new(RwLock::new(Tables::default()));

        let mut registry = HandlerRegistry::new();
        registry.register(Arc::new(ItemRepository::new(tables.clone())));
        registry.register(Arc::new(BagTypeRepository::new(tables.clone())));
        registry.register(Arc::new(PolisherRepository::new(tables.clone())));
        registry.register(Arc::new(EntryRepository::new(tables.clone(), config)));

        debug!(handlers = registry.len(), "Handler registry built");

        Store {
            tables,
            config,
            registry: Arc::new(registry),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The engine every submission and entry update uses.
    pub fn engine(&self) -> ToleranceEngine {
        ToleranceEngine::new(self.config.tolerance)
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.tables.clone())
    }

    pub fn bag_types(&self) -> BagTypeRepository {
        BagTypeRepository::new(self.tables.clone())
    }

    pub fn polishers(&self) -> PolisherRepository {
        PolisherRepository::new(self.tables.clone())
    }

    pub fn entries(&self) -> EntryRepository {
        EntryRepository::new(self.tables.clone(), self.config)
    }

    /// Generic CRUD dispatch for the management screens.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Builds a draft from master ids, snapshotting the current masters.
    ///
    /// ## Returns
    /// * `Err(StoreError::NotFound)` - One of the ids doesn't exist
    pub async fn draft(
        &self,
        item_id: &str,
        bag_type_id: &str,
        polisher_id: &str,
        dozens: u32,
        gross_weight: f64,
    ) -> StoreResult<EntryDraft> {
        self.tables
            .read()
            .await
            .snapshot(item_id, bag_type_id, polisher_id, dozens, gross_weight)
    }

    /// Starts a submission evaluated with this store's engine.
    pub fn new_submission(&self, draft: EntryDraft) -> Submission {
        Submission::new(draft, self.engine())
    }

    /// Checks the tables are reachable and every entity kind has a handler.
    pub async fn health_check(&self) -> bool {
        let _tables = self.tables.read().await;
        EntityKind::ALL
            .iter()
            .all(|kind| self.registry.get(*kind).is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockmate_core::{BagTypeForm, ItemForm, PolisherForm, ToleranceFraction};

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = Store::in_memory();
        assert!(store.health_check().await);
        assert!(store.entries().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_invalid_tolerance() {
        let config = StoreConfig::default().tolerance(ToleranceFraction::from_fraction(1.5));
        assert!(matches!(Store::new(config), Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn test_engine_follows_config() {
        let config = StoreConfig::default().tolerance(ToleranceFraction::from_percentage(5.0));
        let store = Store::new(config).unwrap();
        assert!((store.engine().tolerance().fraction() - 0.05).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_draft_snapshots_masters() {
        let store = Store::in_memory();
        let item = store
            .items()
            .create(ItemForm {
                code: "C002".to_string(),
                name: "Item B".to_string(),
                standard_weight: 0.8,
            })
            .await
            .unwrap();
        let bag = store
            .bag_types()
            .create(BagTypeForm {
                name: "Tray".to_string(),
                weight: 1.6,
            })
            .await
            .unwrap();
        let polisher = store
            .polishers()
            .create(PolisherForm {
                first_name: "Polisher".to_string(),
                last_name: "A".to_string(),
                contact_number: "0771234567".to_string(),
            })
            .await
            .unwrap();

        let draft = store
            .draft(&item.id, &bag.id, &polisher.id, 12, 11.2)
            .await
            .unwrap();
        assert_eq!(draft.item_code, "C002");
        assert_eq!(draft.bag_weight, 1.6);
        assert_eq!(draft.polisher_name, "Polisher A");

        let missing = store.draft("nope", &bag.id, &polisher.id, 12, 11.2).await;
        assert!(matches!(
            missing,
            Err(StoreError::NotFound {
                entity: EntityKind::Item,
                ..
            })
        ));
    }
}
