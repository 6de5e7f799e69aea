//! # Repository Module
//!
//! Repository implementations over the shared in-memory tables.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Management screen / entry form                                        │
//! │       │                                                                 │
//! │       │  store.items().create(form)                                     │
//! │       ▼                                                                 │
//! │  ItemRepository                                                         │
//! │  ├── list(&self)                                                        │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── create(&self, form)    ← validate, unique code                     │
//! │  ├── update(&self, id, form)                                            │
//! │  └── delete(&self, id)      ← refused while entries reference it        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<RwLock<Tables>>                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every repository also implements [`crate::registry::CrudHandler`].
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Items and their standard weight
//! - [`bag_type::BagTypeRepository`] - Bag types and tare weights
//! - [`polisher::PolisherRepository`] - Polishers
//! - [`entry::EntryRepository`] - Material entries, summaries, reports

pub mod bag_type;
pub mod entry;
pub mod item;
pub mod polisher;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreResult;

/// Decodes a JSON form payload.
pub(crate) fn decode<T: DeserializeOwned>(payload: Value) -> StoreResult<T> {
    Ok(serde_json::from_value(payload)?)
}

/// Encodes a record for the registry.
pub(crate) fn encode<T: Serialize>(record: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(record)?)
}

/// Encodes a list of records for the registry.
pub(crate) fn encode_all<T: Serialize>(records: &[T]) -> StoreResult<Vec<Value>> {
    records.iter().map(encode).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Master data shared by the repository tests.

    use stockmate_core::{BagType, BagTypeForm, Item, ItemForm, Polisher, PolisherForm};

    use crate::store::Store;

    pub struct Masters {
        pub item: Item,
        pub bag_type: BagType,
        pub polisher: Polisher,
    }

    /// Item B (0.80 kg/dozen), Tray (1.6 kg), Polisher A.
    pub async fn seed(store: &Store) -> Masters {
        let item = store
            .items()
            .create(ItemForm {
                code: "C002".to_string(),
                name: "Item B".to_string(),
                standard_weight: 0.8,
            })
            .await
            .unwrap();
        let bag_type = store
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

        Masters {
            item,
            bag_type,
            polisher,
        }
    }
}
