//! # Material Entry Repository
//!
//! The authoritative list of recorded weighings.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Material Entry Lifecycle                             │
//! │                                                                         │
//! │  Submission (core)                                                      │
//! │       │ submit / confirm                                                │
//! │       ▼                                                                 │
//! │  CommittedEntry ──► record(session, committed)                          │
//! │                        │  • draft re-read from current masters          │
//! │                        │  • re-evaluated with the store's engine        │
//! │                        │  • override flag checked on that verdict       │
//! │                        │  • id (UUID v4) + timestamps assigned          │
//! │                        ▼                                                │
//! │                   MaterialEntry ──► list / summary / report             │
//! │                        │                                                │
//! │                        ├── replace(id, update)                          │
//! │                        │     same gate, ids + dozens + gross only       │
//! │                        │                                                │
//! │                        └── delete(id)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries are never created through the handler registry; the only way in
//! is a committed submission. Weights, snapshots and verdicts stored here
//! always come from the masters and the store's engine, never from the
//! caller.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use stockmate_core::batch::summarize;
use stockmate_core::report::MaterialReport;
use stockmate_core::{
    BatchSummary, CommittedEntry, CoreError, EntityKind, MaterialEntry, Session, SubmitOutcome,
    Submission, ToleranceEngine,
};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::registry::{Capabilities, CrudHandler};
use crate::repository::{decode, encode, encode_all};
use crate::store::{SharedTables, Tables};

/// Report header used when no polisher filter is applied.
pub const ALL_POLISHERS: &str = "All Polishers";

/// Update payload: the edited form fields plus the operator's answer to
/// the out-of-tolerance warning.
///
/// Only ids are accepted for the masters; codes, names and weights are
/// looked up when the update is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdate {
    pub item_id: String,
    pub bag_type_id: String,
    pub polisher_id: String,
    pub dozens: u32,
    pub gross_weight: f64,
    #[serde(default)]
    pub confirmed: bool,
}

/// Repository for material entries.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    tables: SharedTables,
    config: StoreConfig,
}

impl EntryRepository {
    pub(crate) fn new(tables: SharedTables, config: StoreConfig) -> Self {
        EntryRepository { tables, config }
    }

    fn engine(&self) -> ToleranceEngine {
        ToleranceEngine::new(self.config.tolerance)
    }

    /// Runs the submit gate on a draft built from the stored masters.
    ///
    /// An out-of-tolerance verdict passes only when `confirmed` is set.
    fn gate(&self, tables: &Tables, update: &EntryUpdate) -> StoreResult<CommittedEntry> {
        let draft = tables.snapshot(
            &update.item_id,
            &update.bag_type_id,
            &update.polisher_id,
            update.dozens,
            update.gross_weight,
        )?;

        let mut submission = Submission::new(draft, self.engine());
        let committed = match submission.submit()? {
            SubmitOutcome::Committed(committed) => committed,
            SubmitOutcome::NeedsConfirmation(result) => {
                if !update.confirmed {
                    return Err(CoreError::ConfirmationRequired {
                        verdict: result.verdict,
                    }
                    .into());
                }
                submission.confirm()?
            }
        };
        committed.ensure_confirmed()?;
        Ok(committed)
    }

    /// Records a committed submission.
    ///
    /// ## What This Does
    /// 1. Rebuilds the draft from the current item, bag type and polisher
    /// 2. Re-evaluates it with this store's engine
    /// 3. Refuses an out-of-tolerance verdict unless the submission was confirmed
    /// 4. Assigns a UUID and timestamps, stamps `created_by`
    ///
    /// The submission's own result only tells us whether the operator
    /// confirmed; the stored verdict is always the store's.
    ///
    /// ## Returns
    /// * `Ok(MaterialEntry)` - The stored record
    /// * `Err(StoreError::Core)` - Missing override flag, or invalid figures
    /// * `Err(StoreError::NotFound)` - A master was deleted meanwhile
    pub async fn record(
        &self,
        session: &Session,
        committed: CommittedEntry,
    ) -> StoreResult<MaterialEntry> {
        let draft = committed.draft();
        let request = EntryUpdate {
            item_id: draft.item_id.clone(),
            bag_type_id: draft.bag_type_id.clone(),
            polisher_id: draft.polisher_id.clone(),
            dozens: draft.dozens,
            gross_weight: draft.gross_weight,
            confirmed: committed.forced(),
        };

        let mut tables = self.tables.write().await;
        let committed = self.gate(&tables, &request)?;

        let entry = MaterialEntry::from_committed(
            Uuid::new_v4().to_string(),
            session,
            Utc::now(),
            &committed,
        );
        tables.entries.push(entry.clone());

        if entry.forced {
            warn!(
                id = %entry.id,
                item = %entry.item_code,
                verdict = entry.verdict.label(),
                difference = entry.difference,
                user = %entry.created_by,
                "Out-of-tolerance entry recorded by override"
            );
        } else {
            info!(
                id = %entry.id,
                item = %entry.item_code,
                net_weight = entry.net_weight,
                user = %entry.created_by,
                "Material entry recorded"
            );
        }

        Ok(entry)
    }

    /// All entries in recording order.
    pub async fn list(&self) -> Vec<MaterialEntry> {
        self.tables.read().await.entries.clone()
    }

    pub async fn list_by_polisher(&self, polisher_id: &str) -> Vec<MaterialEntry> {
        self.tables
            .read()
            .await
            .entries
            .iter()
            .filter(|e| e.polisher_id == polisher_id)
            .cloned()
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<MaterialEntry> {
        self.tables
            .read()
            .await
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// Replaces an entry wholesale.
    ///
    /// The edit goes through the same submit gate as a new entry, under the
    /// write lock: the draft is snapshotted from the current masters and
    /// evaluated with this store's engine, and an out-of-tolerance result
    /// needs `confirmed`. `id`, `created_by` and `created_at` are preserved.
    ///
    /// ## Errors
    /// * `StoreError::Core(ConfirmationRequired)` - Outside tolerance, not confirmed
    /// * `StoreError::Core(Validation)` - Bad dozens / weights
    /// * `StoreError::NotFound` - No such entry, or a master is missing
    pub async fn replace(&self, id: &str, update: EntryUpdate) -> StoreResult<MaterialEntry> {
        let mut tables = self.tables.write().await;
        if !tables.entries.iter().any(|e| e.id == id) {
            return Err(StoreError::not_found(EntityKind::MaterialEntry, id));
        }

        let committed = self.gate(&tables, &update)?;

        let slot = tables
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::MaterialEntry, id))?;

        *slot = slot.revise(Utc::now(), &committed);

        debug!(
            id = %slot.id,
            verdict = slot.verdict.label(),
            forced = slot.forced,
            "Material entry replaced"
        );
        Ok(slot.clone())
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let before = tables.entries.len();
        tables.entries.retain(|e| e.id != id);
        if tables.entries.len() == before {
            return Err(StoreError::not_found(EntityKind::MaterialEntry, id));
        }

        info!(id = %id, "Material entry deleted");
        Ok(())
    }

    /// Batch totals for all entries, or for one polisher.
    pub async fn summary(&self, polisher_id: Option<&str>) -> BatchSummary {
        let tables = self.tables.read().await;
        match polisher_id {
            Some(id) => {
                let entries: Vec<&MaterialEntry> = tables
                    .entries
                    .iter()
                    .filter(|e| e.polisher_id == id)
                    .collect();
                summarize(&entries)
            }
            None => summarize(&tables.entries),
        }
    }

    /// Builds the material report for one polisher, or for everyone.
    ///
    /// ## Errors
    /// * `StoreError::NotFound` - Unknown polisher id
    pub async fn report(
        &self,
        polisher_id: Option<&str>,
        generated_on: NaiveDate,
    ) -> StoreResult<MaterialReport> {
        let tables = self.tables.read().await;

        let (name, entries): (String, Vec<MaterialEntry>) = match polisher_id {
            Some(id) => {
                let polisher = tables
                    .polisher(id)
                    .ok_or_else(|| StoreError::not_found(EntityKind::Polisher, id))?;
                let entries = tables
                    .entries
                    .iter()
                    .filter(|e| e.polisher_id == id)
                    .cloned()
                    .collect();
                (polisher.display_name(), entries)
            }
            None => (ALL_POLISHERS.to_string(), tables.entries.clone()),
        };

        debug!(polisher = %name, rows = entries.len(), "Building material report");

        Ok(MaterialReport::build_with_decimals(
            &name,
            generated_on,
            &entries,
            self.config.display_decimals,
        ))
    }
}

#[async_trait]
impl CrudHandler for EntryRepository {
    fn kind(&self) -> EntityKind {
        EntityKind::MaterialEntry
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NO_CREATE
    }

    async fn list(&self) -> StoreResult<Vec<Value>> {
        encode_all(&EntryRepository::list(self).await)
    }

    async fn update(&self, id: &str, payload: Value) -> StoreResult<Value> {
        encode(&self.replace(id, decode(payload)?).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        EntryRepository::delete(self, id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{seed, Masters};
    use crate::store::Store;
    use serde_json::json;
    use stockmate_core::{EntryDraft, Role, ToleranceFraction, Verdict};

    fn session() -> Session {
        Session::new("admin", Role::Admin)
    }

    fn draft(m: &Masters, dozens: u32, gross: f64) -> EntryDraft {
        EntryDraft::new(&m.item, &m.bag_type, &m.polisher, dozens, gross)
    }

    fn update(m: &Masters, dozens: u32, gross: f64, confirmed: bool) -> EntryUpdate {
        EntryUpdate {
            item_id: m.item.id.clone(),
            bag_type_id: m.bag_type.id.clone(),
            polisher_id: m.polisher.id.clone(),
            dozens,
            gross_weight: gross,
            confirmed,
        }
    }

    /// Runs a submission to commit with the given engine, confirming when needed.
    fn commit_with(engine: ToleranceEngine, draft: EntryDraft) -> CommittedEntry {
        let mut submission = Submission::new(draft, engine);
        match submission.submit().unwrap() {
            SubmitOutcome::Committed(c) => c,
            SubmitOutcome::NeedsConfirmation(_) => submission.confirm().unwrap(),
        }
    }

    fn commit(store: &Store, draft: EntryDraft) -> CommittedEntry {
        commit_with(store.engine(), draft)
    }

    fn engine_at(percent: f64) -> ToleranceEngine {
        ToleranceEngine::new(ToleranceFraction::from_percentage(percent))
    }

    fn is_confirmation_required(err: &StoreError, expected: Verdict) -> bool {
        matches!(
            err,
            StoreError::Core(CoreError::ConfirmationRequired { verdict }) if *verdict == expected
        )
    }

    #[tokio::test]
    async fn test_record_within_tolerance() {
        let store = Store::in_memory();
        let m = seed(&store).await;

        // 12 dozen Item B in a Tray: expected 9.6, net 11.2 - 1.6 = 9.6
        let entry = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();

        assert_eq!(entry.verdict, Verdict::Within);
        assert!(!entry.forced);
        assert_eq!(entry.created_by, "admin");
        assert_eq!(entry.polisher_name, "Polisher A");
        assert!((entry.net_weight - 9.6).abs() < 1e-9);
        assert_eq!(store.entries().list().await, vec![entry]);
    }

    #[tokio::test]
    async fn test_record_confirmed_override() {
        let store = Store::in_memory();
        let m = seed(&store).await;

        // 14.0 - 1.6 = 12.4 against 9.6 expected
        let entry = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 14.0)))
            .await
            .unwrap();
        assert_eq!(entry.verdict, Verdict::Above);
        assert!(entry.forced);
    }

    #[tokio::test]
    async fn test_record_reevaluates_with_store_tolerance() {
        let store = Store::in_memory();
        let m = seed(&store).await;

        // Within a 50% band, but well above the store's 2%
        let loose = commit_with(engine_at(50.0), draft(&m, 12, 14.0));
        assert_eq!(loose.result().verdict, Verdict::Within);
        assert!(!loose.forced());

        let err = store
            .entries()
            .record(&session(), loose)
            .await
            .unwrap_err();
        assert!(is_confirmation_required(&err, Verdict::Above));
        assert!(store.entries().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_override_dropped_when_store_says_within() {
        let store = Store::in_memory();
        let m = seed(&store).await;

        // 9.7 net vs 9.6 expected: outside 0.1%, inside 2%
        let tight = commit_with(engine_at(0.1), draft(&m, 12, 11.3));
        assert!(tight.forced());

        let entry = store.entries().record(&session(), tight).await.unwrap();
        assert_eq!(entry.verdict, Verdict::Within);
        assert!(!entry.forced);
    }

    #[tokio::test]
    async fn test_record_uses_stored_tare_and_names() {
        let store = Store::in_memory();
        let m = seed(&store).await;

        // A tare of 4.4 would make 14.0 gross look like 9.6 net
        let mut forged = draft(&m, 12, 14.0);
        forged.bag_weight = 4.4;
        forged.item_name = "Something Else".to_string();
        let committed = commit(&store, forged);
        assert_eq!(committed.result().verdict, Verdict::Within);

        let err = store
            .entries()
            .record(&session(), committed.clone())
            .await
            .unwrap_err();
        assert!(is_confirmation_required(&err, Verdict::Above));

        // Confirmed against the real tare, the stored figures are the store's
        let mut overridden = draft(&m, 12, 14.0);
        overridden.item_name = "Something Else".to_string();
        let entry = store
            .entries()
            .record(&session(), commit(&store, overridden))
            .await
            .unwrap();
        assert_eq!(entry.bag_weight, 1.6);
        assert_eq!(entry.item_name, "Item B");
        assert_eq!(entry.verdict, Verdict::Above);
    }

    #[tokio::test]
    async fn test_record_requires_existing_masters() {
        let store = Store::in_memory();
        let m = seed(&store).await;
        let committed = commit(&store, draft(&m, 12, 11.2));

        store.polishers().delete(&m.polisher.id).await.unwrap();

        let err = store
            .entries()
            .record(&session(), committed)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: EntityKind::Polisher,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_referenced_masters_cannot_be_deleted() {
        let store = Store::in_memory();
        let m = seed(&store).await;
        let entry = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();

        let err = store.items().delete(&m.item.id).await.unwrap_err();
        assert!(matches!(err, StoreError::StillReferenced { count: 1, .. }));
        assert!(store.bag_types().delete(&m.bag_type.id).await.is_err());
        assert!(store.polishers().delete(&m.polisher.id).await.is_err());

        store.entries().delete(&entry.id).await.unwrap();
        store.items().delete(&m.item.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_reevaluates_and_keeps_identity() {
        let store = Store::in_memory();
        let m = seed(&store).await;
        let original = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();

        // now 8.0 net against 9.6 expected: below, needs confirmation
        let err = store
            .entries()
            .replace(&original.id, update(&m, 12, 9.6, false))
            .await
            .unwrap_err();
        assert!(is_confirmation_required(&err, Verdict::Below));

        let replaced = store
            .entries()
            .replace(&original.id, update(&m, 12, 9.6, true))
            .await
            .unwrap();
        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.created_at, original.created_at);
        assert_eq!(replaced.created_by, original.created_by);
        assert_eq!(replaced.verdict, Verdict::Below);
        assert!(replaced.forced);
        assert_eq!(store.entries().list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_replace_snapshots_current_masters() {
        let store = Store::in_memory();
        let m = seed(&store).await;
        let original = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();

        store
            .bag_types()
            .update(
                &m.bag_type.id,
                stockmate_core::BagTypeForm {
                    name: "Tray".to_string(),
                    weight: 1.7,
                },
            )
            .await
            .unwrap();

        // 11.3 - 1.7 = 9.6
        let replaced = store
            .entries()
            .replace(&original.id, update(&m, 12, 11.3, false))
            .await
            .unwrap();
        assert_eq!(replaced.bag_weight, 1.7);
        assert_eq!(replaced.verdict, Verdict::Within);
    }

    #[tokio::test]
    async fn test_replace_uses_store_tolerance() {
        let config = StoreConfig::default().tolerance(ToleranceFraction::from_percentage(20.0));
        let store = Store::new(config).unwrap();
        let m = seed(&store).await;
        let original = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();

        // 12.5 - 1.6 = 10.9 vs 9.6 expected: within a 20% band
        let replaced = store
            .entries()
            .replace(&original.id, update(&m, 12, 12.5, false))
            .await
            .unwrap();
        assert_eq!(replaced.verdict, Verdict::Within);
    }

    #[tokio::test]
    async fn test_replace_rejects_invalid_draft() {
        let store = Store::in_memory();
        let m = seed(&store).await;
        let original = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();

        let err = store
            .entries()
            .replace(&original.id, update(&m, 0, 11.2, true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        assert_eq!(store.entries().get_by_id(&original.id).await, Some(original));
    }

    #[tokio::test]
    async fn test_replace_unknown_entry() {
        let store = Store::in_memory();
        let m = seed(&store).await;

        let err = store
            .entries()
            .replace("missing", update(&m, 12, 11.2, false))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: EntityKind::MaterialEntry,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_summary_and_report() {
        let store = Store::in_memory();
        let m = seed(&store).await;
        let entries = store.entries();

        entries
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();
        entries
            .record(&session(), commit(&store, draft(&m, 6, 6.8)))
            .await
            .unwrap();

        let summary = entries.summary(None).await;
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_dozens, 18);
        assert_eq!(entries.summary(Some("nobody")).await, BatchSummary::default());
        assert_eq!(entries.summary(Some(&m.polisher.id)).await, summary);

        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let report = entries.report(Some(&m.polisher.id), date).await.unwrap();
        assert_eq!(report.polisher_name, "Polisher A");
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.footer_lines()[1], "Total Dozens: 18");

        let all = entries.report(None, date).await.unwrap();
        assert_eq!(all.polisher_name, ALL_POLISHERS);

        assert!(matches!(
            entries.report(Some("nobody"), date).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_registry_has_no_entry_create() {
        let store = Store::in_memory();
        let m = seed(&store).await;

        let err = store
            .registry()
            .create(EntityKind::MaterialEntry, json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Material entry does not support create");

        let entry = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();
        let payload = serde_json::to_value(update(&m, 12, 11.3, false)).unwrap();
        let updated = store
            .registry()
            .update(EntityKind::MaterialEntry, &entry.id, payload)
            .await
            .unwrap();
        assert_eq!(updated["verdict"], "within");
    }

    #[tokio::test]
    async fn test_registry_update_ignores_payload_tare() {
        let store = Store::in_memory();
        let m = seed(&store).await;
        let entry = store
            .entries()
            .record(&session(), commit(&store, draft(&m, 12, 11.2)))
            .await
            .unwrap();

        // Tray is 1.6 kg: 14.0 gross is 12.4 net, above 9.6 expected
        let payload = json!({
            "itemId": m.item.id,
            "bagTypeId": m.bag_type.id,
            "polisherId": m.polisher.id,
            "dozens": 12,
            "grossWeight": 14.0,
            "bagWeight": 4.4,
            "standardWeightPerDozen": 0.8,
            "itemName": "Something Else",
        });
        let err = store
            .registry()
            .update(EntityKind::MaterialEntry, &entry.id, payload.clone())
            .await
            .unwrap_err();
        assert!(is_confirmation_required(&err, Verdict::Above));
        assert_eq!(store.entries().get_by_id(&entry.id).await, Some(entry.clone()));

        let mut confirmed = payload;
        confirmed["confirmed"] = json!(true);
        let updated = store
            .registry()
            .update(EntityKind::MaterialEntry, &entry.id, confirmed)
            .await
            .unwrap();
        assert_eq!(updated["bagWeight"], 1.6);
        assert_eq!(updated["itemName"], "Item B");
        assert_eq!(updated["verdict"], "above");
        assert_eq!(updated["forced"], true);
    }
}
