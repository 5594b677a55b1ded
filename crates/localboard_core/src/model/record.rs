//! Shared record contracts.
//!
//! # Responsibility
//! - Describe what the store, projection pipeline and gateway need from a
//!   tracked entity, independent of the concrete app.
//!
//! # Invariants
//! - `Record::id` never changes after `Record::build`.
//! - `Record::apply_patch` must preserve `id` and `created_at`.
//! - Every category value is a member of `Category::ALL`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Closed enum used as the single filter/aggregate dimension of a record.
pub trait Category: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Every member, in display order.
    const ALL: &'static [Self];
    /// Member used when external data carries an unknown value.
    const DEFAULT: Self;

    /// Wire/display name of this member.
    fn as_str(self) -> &'static str;

    /// Exact, case-sensitive lookup by wire name.
    fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.as_str() == value)
    }
}

/// Validation failure for record field invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// A required text field is empty after trimming.
    MissingField(&'static str),
    /// Record identifier is blank.
    BlankId,
    /// Quantity must be at least one for a persisted line.
    NonPositiveQuantity,
    /// Date text is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::BlankId => write!(f, "record id must not be blank"),
            Self::NonPositiveQuantity => write!(f, "quantity must be greater than zero"),
            Self::InvalidDate(value) => {
                write!(f, "date `{value}` must use the YYYY-MM-DD format")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// Entity contract consumed by `RecordStore` and the projection pipeline.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned {
    /// Stable identity, unique within one store.
    type Id: Clone + Eq + Hash + Debug + Display;
    /// Input used to create a new record.
    type Fields;
    /// Partial update merged onto an existing record.
    type Patch;
    /// Closed category dimension.
    type Category: Category;

    fn id(&self) -> &Self::Id;

    /// Picks the identity for a record about to be created from `fields`.
    fn assign_id(fields: &Self::Fields) -> Self::Id;

    /// Builds a record with its creation timestamp set to `now_ms`.
    fn build(id: Self::Id, fields: Self::Fields, now_ms: i64) -> Self;

    /// Merges `patch` and stamps `updated_at = now_ms`.
    fn apply_patch(&mut self, patch: Self::Patch, now_ms: i64);

    fn created_at(&self) -> Option<i64>;

    fn category(&self) -> Self::Category;

    /// Fields matched by the free-text query.
    fn text_fields(&self) -> Vec<&str>;

    fn validate(&self) -> Result<(), RecordValidationError>;

    /// Whether the record may stay in the store after a patch.
    ///
    /// Records that are no longer retained are removed instead of persisted.
    fn is_retained(&self) -> bool {
        true
    }
}
