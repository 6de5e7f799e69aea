//! # stockmate-store: Storage Collaborator for StockMate
//!
//! Owns the authoritative list of material entries and the master data the
//! entry form picks from. Tolerance math and the submission gate live in
//! `stockmate-core`; this crate records what the gate lets through.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockMate Data Flow                              │
//! │                                                                         │
//! │  Entry form / management screens                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockmate-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │   Registry   │  │   │
//! │  │   │  (store.rs)   │    │ (item.rs ...) │    │(registry.rs) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ StoreConfig   │    │ ItemRepo      │    │ EntityKind → │  │   │
//! │  │   │ RwLock tables │◄───│ EntryRepo     │◄───│ CrudHandler  │  │   │
//! │  │   │ Engine        │    │ ...           │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stockmate-core (tolerance, submission, batch, report)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Runtime configuration (tolerance %, report decimals)
//! - [`store`] - The store handle and shared tables
//! - [`registry`] - Entity-kind to CRUD handler dispatch
//! - [`repository`] - Item, bag type, polisher and entry repositories
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockmate_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::from_env()?)?;
//!
//! let draft = store.draft(&item_id, &bag_id, &polisher_id, 12, 11.2).await?;
//! let mut submission = store.new_submission(draft);
//! if let SubmitOutcome::Committed(entry) = submission.submit()? {
//!     store.entries().record(&session, entry).await?;
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod registry;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use registry::{Capabilities, CrudHandler, HandlerRegistry};
pub use store::Store;

// Repository re-exports for convenience
pub use repository::bag_type::BagTypeRepository;
pub use repository::entry::{EntryRepository, EntryUpdate, ALL_POLISHERS};
pub use repository::item::ItemRepository;
pub use repository::polisher::PolisherRepository;
