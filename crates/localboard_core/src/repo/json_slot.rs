//! JSON collection persistence over one named slot.
//!
//! # Responsibility
//! - Load the persisted record collection at session start.
//! - Flush the full collection after every committed store mutation.
//!
//! # Invariants
//! - `load` never fails: absent, unreadable or non-array data is "no prior
//!   state" and yields an empty collection.
//! - `load` returns only valid records with unique ids.
//! - `save` issues exactly one slot write; failures are logged and swallowed.

use crate::model::record::Record;
use crate::repo::slot_repo::SlotRepository;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Persistence adapter bound to one slot key.
pub struct JsonSlot<S: SlotRepository> {
    repo: S,
    key: String,
}

impl<S: SlotRepository> JsonSlot<S> {
    pub fn new(repo: S, key: impl Into<String>) -> Self {
        Self {
            repo,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the collection stored in this slot.
    ///
    /// Items that fail to decode or validate are skipped one by one; a later
    /// duplicate of an already loaded id is skipped as well.
    pub fn load<R: Record>(&self) -> Vec<R> {
        let raw = match self.repo.read_slot(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(
                    "event=slot_load module=repo status=ok slot={} count=0 reason=absent",
                    self.key
                );
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=slot_load module=repo status=degraded slot={} error_code={} error={err}",
                    self.key,
                    err.error_code()
                );
                return Vec::new();
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!(
                    "event=slot_load module=repo status=degraded slot={} error_code=not_an_array",
                    self.key
                );
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=slot_load module=repo status=degraded slot={} error_code=invalid_json line={} column={}",
                    self.key,
                    err.line(),
                    err.column()
                );
                return Vec::new();
            }
        };

        let total = items.len();
        let mut seen = HashSet::with_capacity(total);
        let mut records = Vec::with_capacity(total);
        for item in items {
            let Ok(record) = serde_json::from_value::<R>(item) else {
                continue;
            };
            if record.validate().is_err() || !seen.insert(record.id().clone()) {
                continue;
            }
            records.push(record);
        }

        let skipped = total - records.len();
        if skipped > 0 {
            warn!(
                "event=slot_load module=repo status=partial slot={} count={} skipped={skipped}",
                self.key,
                records.len()
            );
        } else {
            info!(
                "event=slot_load module=repo status=ok slot={} count={}",
                self.key,
                records.len()
            );
        }
        records
    }

    /// Overwrites the slot with the full collection.
    ///
    /// Returns whether the write reached the medium.
    pub fn save<R: Serialize>(&self, records: &[R]) -> bool {
        let payload = match serde_json::to_string(records) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    "event=slot_save module=repo status=error slot={} error_code=serialize_failed error={err}",
                    self.key
                );
                return false;
            }
        };

        match self.repo.write_slot(&self.key, &payload) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=slot_save module=repo status=error slot={} error_code={} error={err}",
                    self.key,
                    err.error_code()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JsonSlot;
    use crate::model::application::{ApplicationStatus, JobApplication};
    use crate::repo::slot_repo::{MemorySlotRepository, SlotRepository};

    fn app(id: &str) -> JobApplication {
        JobApplication {
            id: id.to_string(),
            company: "Acme".to_string(),
            position: "Eng".to_string(),
            applied_date: "2024-01-01".to_string(),
            status: ApplicationStatus::Applied,
            notes: String::new(),
            created_at: Some(1),
            updated_at: None,
        }
    }

    #[test]
    fn load_degrades_to_empty_on_corrupt_or_foreign_shapes() {
        let repo = MemorySlotRepository::new();
        let slot = JsonSlot::new(repo.clone(), "apps");
        assert!(slot.load::<JobApplication>().is_empty());

        repo.write_slot("apps", "{not json").expect("write");
        assert!(slot.load::<JobApplication>().is_empty());

        repo.write_slot("apps", r#"{"apps": []}"#).expect("write");
        assert!(slot.load::<JobApplication>().is_empty());
    }

    #[test]
    fn load_skips_invalid_items_and_duplicate_ids() {
        let repo = MemorySlotRepository::new();
        let slot = JsonSlot::new(repo.clone(), "apps");
        let payload = serde_json::json!([
            app("a"),
            {"id": "b", "company": "", "position": "x", "appliedDate": "2024-01-01", "status": "Applied"},
            {"id": "c", "company": "C", "position": "x", "appliedDate": "2024-01-01", "status": "Bogus"},
            app("a"),
            42
        ]);
        repo.write_slot("apps", &payload.to_string()).expect("write");

        let loaded = slot.load::<JobApplication>();
        assert_eq!(loaded, vec![app("a")]);
    }

    #[test]
    fn save_then_load_round_trips() {
        let slot = JsonSlot::new(MemorySlotRepository::new(), "apps");
        assert!(slot.save(&[app("a"), app("b")]));
        assert_eq!(slot.load::<JobApplication>(), vec![app("a"), app("b")]);
    }
}
