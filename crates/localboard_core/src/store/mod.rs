//! Authoritative in-memory record collection for one session.
//!
//! # Responsibility
//! - Own the ordered record collection and its identity invariants.
//! - Write the full collection through to its slot after every commit.
//! - Notify subscribers with a store-changed event after every commit.
//!
//! # Invariants
//! - No two records share an id, after any operation.
//! - Every stored record passes `Record::validate()`.
//! - A failed operation leaves the collection and the slot untouched.
//! - `delete` persists even when nothing was removed.

use crate::clock::Clock;
use crate::model::record::{Record, RecordValidationError};
use crate::repo::json_slot::JsonSlot;
use crate::repo::slot_repo::SlotRepository;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(RecordValidationError),
    /// Target id is not in the store; callers treat this as a no-op.
    NotFound(String),
    /// A record with this id already exists.
    DuplicateId(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate record id: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Where `create` places new records. Only affects default display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Front,
    Back,
}

/// Committed change, delivered to subscribers after the slot flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent<Id> {
    Created(Id),
    Updated(Id),
    Removed(Id),
    Replaced { count: usize },
}

/// Result of a successful `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome<R> {
    /// Record was patched and kept.
    Updated(R),
    /// Patch left the record not retainable; it was removed.
    Removed(R),
}

impl<R> UpdateOutcome<R> {
    pub fn record(&self) -> &R {
        match self {
            Self::Updated(record) | Self::Removed(record) => record,
        }
    }

    pub fn into_record(self) -> R {
        match self {
            Self::Updated(record) | Self::Removed(record) => record,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }
}

type Listener<Id> = Box<dyn FnMut(&StoreEvent<Id>)>;

/// Session record store with write-through persistence.
pub struct RecordStore<R: Record, S: SlotRepository> {
    records: Vec<R>,
    slot: JsonSlot<S>,
    clock: Box<dyn Clock>,
    insert_at: InsertPosition,
    listeners: Vec<Listener<R::Id>>,
}

impl<R: Record, S: SlotRepository> RecordStore<R, S> {
    /// Builds the session store from whatever the slot currently holds.
    pub fn open(slot: JsonSlot<S>, clock: impl Clock + 'static, insert_at: InsertPosition) -> Self {
        let records = slot.load::<R>();
        info!(
            "event=store_open module=store status=ok slot={} count={}",
            slot.key(),
            records.len()
        );
        Self {
            records,
            slot,
            clock: Box::new(clock),
            insert_at,
            listeners: Vec::new(),
        }
    }

    /// Current time from the store clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Read-only snapshot in storage order.
    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Registers a store-changed listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent<R::Id>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Creates a record with a fresh identity and creation timestamp.
    ///
    /// # Errors
    /// - `Validation` when required fields are missing.
    /// - `DuplicateId` when the assigned id is already present.
    pub fn create(&mut self, fields: R::Fields) -> StoreResult<R> {
        let id = R::assign_id(&fields);
        if self.contains(&id) {
            return Err(StoreError::DuplicateId(id.to_string()));
        }

        let record = R::build(id, fields, self.now_ms());
        record.validate()?;

        match self.insert_at {
            InsertPosition::Front => self.records.insert(0, record.clone()),
            InsertPosition::Back => self.records.push(record.clone()),
        }
        info!(
            "event=record_create module=store status=ok id={} count={}",
            record.id(),
            self.records.len()
        );
        self.commit(StoreEvent::Created(record.id().clone()));
        Ok(record)
    }

    /// Merges `patch` onto the record with `id`.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent; nothing is persisted.
    /// - `Validation` when the patched record is invalid; nothing changes.
    pub fn update(&mut self, id: &R::Id, patch: R::Patch) -> StoreResult<UpdateOutcome<R>> {
        let Some(index) = self.position(id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };

        let mut next = self.records[index].clone();
        next.apply_patch(patch, self.now_ms());

        if !next.is_retained() {
            self.records.remove(index);
            info!(
                "event=record_update module=store status=ok id={id} outcome=removed count={}",
                self.records.len()
            );
            self.commit(StoreEvent::Removed(id.clone()));
            return Ok(UpdateOutcome::Removed(next));
        }

        next.validate()?;
        self.records[index] = next.clone();
        info!("event=record_update module=store status=ok id={id} outcome=updated");
        self.commit(StoreEvent::Updated(id.clone()));
        Ok(UpdateOutcome::Updated(next))
    }

    /// Removes the record with `id`; returns whether anything was removed.
    pub fn delete(&mut self, id: &R::Id) -> bool {
        let removed = match self.position(id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        };
        info!(
            "event=record_delete module=store status=ok id={id} removed={removed} count={}",
            self.records.len()
        );

        if removed {
            self.commit(StoreEvent::Removed(id.clone()));
        } else {
            self.slot.save(&self.records);
        }
        removed
    }

    /// Replaces the whole collection.
    ///
    /// # Errors
    /// - `Validation` or `DuplicateId` when any incoming record breaks a store
    ///   invariant; the current collection is kept.
    pub fn replace_all(&mut self, records: Vec<R>) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            record.validate()?;
            if !seen.insert(record.id().clone()) {
                warn!(
                    "event=store_replace module=store status=error error_code=duplicate_id id={}",
                    record.id()
                );
                return Err(StoreError::DuplicateId(record.id().to_string()));
            }
        }

        self.records = records;
        let count = self.records.len();
        info!("event=store_replace module=store status=ok count={count}");
        self.commit(StoreEvent::Replaced { count });
        Ok(())
    }

    fn position(&self, id: &R::Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn commit(&mut self, event: StoreEvent<R::Id>) {
        self.slot.save(&self.records);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
