//! # Domain Types
//!
//! Records shared between the core, the store and the frontend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    BagType      │   │    Polisher     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  code (C001)    │   │  name (Tray)    │   │  first/last     │       │
//! │  │  standard_weight│   │  weight (tare)  │   │  contact_number │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           │ snapshot            │ snapshot            │ snapshot        │
//! │           └─────────────────────┼─────────────────────┘                 │
//! │                                 ▼                                       │
//! │                     ┌───────────────────────┐                           │
//! │                     │    MaterialEntry      │                           │
//! │                     │  ───────────────────  │                           │
//! │                     │  dozens, gross        │                           │
//! │                     │  ToleranceResult      │                           │
//! │                     │  forced, created_by   │                           │
//! │                     └───────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A material entry copies the item code/name, bag name/weight and polisher
//! name at the time of weighing, so later master edits never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::submission::CommittedEntry;
use crate::tolerance::{ToleranceResult, Verdict, WeighingInput};

// =============================================================================
// Item
// =============================================================================

/// An inventory item that gets polished and weighed by the dozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code shown in the item picker (e.g., "C001").
    pub code: String,

    pub name: String,

    /// Reference weight of one dozen, kilograms.
    pub standard_weight: f64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Bag Type
// =============================================================================

/// A container type and its tare weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BagType {
    pub id: String,

    /// Display name (e.g., "Tray", "Plastic Bag").
    pub name: String,

    /// Tare weight in kilograms.
    pub weight: f64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Polisher
// =============================================================================

/// A worker that material entries are assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Polisher {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Polisher {
    /// Name shown in the polisher dropdown and on report headers.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// =============================================================================
// Material Entry
// =============================================================================

/// A recorded weighing. Owned by the storage collaborator.
///
/// Created once per committed submission, replaced wholesale on update,
/// removed by id on delete. Never mutated in place by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaterialEntry {
    pub id: String,

    pub item_id: String,
    /// Item code at time of weighing (frozen).
    pub item_code: String,
    /// Item name at time of weighing (frozen).
    pub item_name: String,
    /// Standard weight per dozen at time of weighing (frozen).
    pub standard_weight: f64,

    pub bag_type_id: String,
    pub bag_type_name: String,
    pub bag_weight: f64,

    pub polisher_id: String,
    pub polisher_name: String,

    pub dozens: u32,
    pub gross_weight: f64,

    pub net_weight: f64,
    pub expected_weight: f64,
    pub allowed_deviation: f64,
    pub difference: f64,
    pub verdict: Verdict,

    /// `gross_weight / dozens`
    pub product_avg_weight: f64,
    /// `product_avg_weight - standard_weight`
    pub tolerance_diff: f64,

    /// Whether the operator overrode an out-of-tolerance warning.
    pub forced: bool,

    /// User that recorded the entry.
    pub created_by: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl MaterialEntry {
    /// Builds the persisted record from a committed submission.
    ///
    /// Identity and timestamps come from the storage collaborator.
    pub fn from_committed(
        id: String,
        created_by: &Session,
        now: DateTime<Utc>,
        committed: &CommittedEntry,
    ) -> Self {
        Self::assemble(id, created_by.user_name.clone(), now, now, committed)
    }

    /// Replaces the weighing with a newly committed one.
    ///
    /// Keeps `id`, `created_by` and `created_at`; everything else, including
    /// the snapshots and the verdict, comes from `committed`.
    pub fn revise(&self, now: DateTime<Utc>, committed: &CommittedEntry) -> Self {
        Self::assemble(
            self.id.clone(),
            self.created_by.clone(),
            self.created_at,
            now,
            committed,
        )
    }

    fn assemble(
        id: String,
        created_by: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        committed: &CommittedEntry,
    ) -> Self {
        let draft = committed.draft();
        let result = committed.result();

        MaterialEntry {
            id,
            item_id: draft.item_id.clone(),
            item_code: draft.item_code.clone(),
            item_name: draft.item_name.clone(),
            standard_weight: draft.standard_weight_per_dozen,
            bag_type_id: draft.bag_type_id.clone(),
            bag_type_name: draft.bag_type_name.clone(),
            bag_weight: draft.bag_weight,
            polisher_id: draft.polisher_id.clone(),
            polisher_name: draft.polisher_name.clone(),
            dozens: draft.dozens,
            gross_weight: draft.gross_weight,
            net_weight: result.net_weight,
            expected_weight: result.expected_weight,
            allowed_deviation: result.allowed_deviation,
            difference: result.difference,
            verdict: result.verdict,
            product_avg_weight: committed.per_dozen().product_avg_weight,
            tolerance_diff: committed.per_dozen().tolerance_diff,
            forced: committed.forced(),
            created_by,
            created_at,
            updated_at,
        }
    }

    /// The raw reading this entry was evaluated from.
    pub fn weighing_input(&self) -> WeighingInput {
        WeighingInput {
            gross_weight: self.gross_weight,
            bag_weight: self.bag_weight,
            dozens: self.dozens,
            standard_weight_per_dozen: self.standard_weight,
        }
    }

    /// The tolerance figures stored on this entry.
    pub fn tolerance_result(&self) -> ToleranceResult {
        ToleranceResult {
            net_weight: self.net_weight,
            expected_weight: self.expected_weight,
            allowed_deviation: self.allowed_deviation,
            difference: self.difference,
            verdict: self.verdict,
        }
    }
}

// =============================================================================
// Entity Kind
// =============================================================================

/// Entity types managed through the CRUD screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Item,
    BagType,
    Polisher,
    MaterialEntry,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Item,
        EntityKind::BagType,
        EntityKind::Polisher,
        EntityKind::MaterialEntry,
    ];

    /// Human-readable name used in error messages.
    pub const fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Item => "Item",
            EntityKind::BagType => "Bag type",
            EntityKind::Polisher => "Polisher",
            EntityKind::MaterialEntry => "Material entry",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// =============================================================================
// Form Payloads
// =============================================================================

/// Create/update payload for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemForm {
    pub code: String,
    pub name: String,
    pub standard_weight: f64,
}

/// Create/update payload for a bag type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BagTypeForm {
    pub name: String,
    pub weight: f64,
}

/// Create/update payload for a polisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PolisherForm {
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
}

// =============================================================================
// Session
// =============================================================================

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// The signed-in user, passed explicitly to whatever needs it.
///
/// Tolerance evaluation never takes a session; only recording does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_name: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_name: impl Into<String>, role: Role) -> Self {
        Session {
            user_name: user_name.into(),
            role,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn polisher(first: &str, last: &str) -> Polisher {
        Polisher {
            id: "p-1".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            contact_number: "0771234567".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_polisher_display_name() {
        assert_eq!(polisher("Nimal", "Perera").display_name(), "Nimal Perera");
        assert_eq!(polisher("Kamal", "").display_name(), "Kamal");
    }

    #[test]
    fn test_entity_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::BagType).unwrap();
        assert_eq!(json, "\"bag_type\"");
        assert_eq!(EntityKind::MaterialEntry.to_string(), "Material entry");
    }

    #[test]
    fn test_forms_use_camel_case() {
        let form: ItemForm =
            serde_json::from_str(r#"{"code":"C001","name":"Item A","standardWeight":0.95}"#)
                .unwrap();
        assert_eq!(form.code, "C001");
        assert_eq!(form.standard_weight, 0.95);
    }

    #[test]
    fn test_role_default() {
        assert_eq!(Role::default(), Role::User);
    }
}
