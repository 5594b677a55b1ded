//! Import document reader and sanitizer.
//!
//! # Responsibility
//! - Accept a bare record array or an object wrapping one.
//! - Coerce each item into a valid record, dropping what cannot be saved.
//!
//! # Invariants
//! - Items are sanitized independently; one bad item never fails the batch.
//! - Output ids are unique; repeated or missing ids get a fresh id.
//! - Only required-field presence checks trim; stored text is kept as sent.

use crate::model::application::{new_application_id, ApplicationStatus, JobApplication};
use crate::model::record::{Category, Record};
use crate::transfer::TransferFormat;
use log::{info, warn};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Import failure. The store must be left untouched on any variant.
#[derive(Debug)]
pub enum ImportError {
    /// Document is not JSON.
    InvalidJson(serde_json::Error),
    /// Document is JSON but neither an array nor the expected wrapper.
    InvalidFormat,
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "import document is not valid JSON: {err}"),
            Self::InvalidFormat => write!(
                f,
                "import document must be an array or an object wrapping one"
            ),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) => Some(err),
            Self::InvalidFormat => None,
        }
    }
}

/// Sanitized import ready for `replace_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport<R> {
    pub records: Vec<R>,
    /// Items skipped because they were not objects or lacked required fields.
    pub dropped: usize,
}

/// Coercion of loosely typed external items into records.
pub trait Sanitize: Record {
    /// Id carried by the item, when it has a usable one.
    fn import_id(item: &Map<String, Value>) -> Option<Self::Id>;

    fn fresh_id() -> Self::Id;

    /// Builds a record from `item` under `id`; `None` drops the item.
    fn sanitize(id: Self::Id, item: &Map<String, Value>, now_ms: i64) -> Option<Self>;
}

/// Parses and sanitizes an import document.
///
/// # Errors
/// - `InvalidJson` when `text` does not parse.
/// - `InvalidFormat` when the top level is neither an array nor an object
///   whose `format.wrapper_field` is an array.
pub fn import_records<R: Sanitize>(
    text: &str,
    format: &TransferFormat,
    now_ms: i64,
) -> Result<ImportReport<R>, ImportError> {
    let items = match read_items(text, format) {
        Ok(items) => items,
        Err(err) => {
            warn!("event=import_parse module=transfer status=error error={err}");
            return Err(err);
        }
    };

    let total = items.len();
    let mut seen: HashSet<R::Id> = HashSet::with_capacity(total);
    let mut records = Vec::with_capacity(total);
    for item in &items {
        let Value::Object(fields) = item else {
            continue;
        };

        let mut id = R::import_id(fields)
            .filter(|id| !seen.contains(id))
            .unwrap_or_else(R::fresh_id);
        while seen.contains(&id) {
            id = R::fresh_id();
        }

        if let Some(record) = R::sanitize(id.clone(), fields, now_ms) {
            seen.insert(id);
            records.push(record);
        }
    }

    let dropped = total - records.len();
    info!(
        "event=import_parse module=transfer status=ok count={} dropped={dropped}",
        records.len()
    );
    Ok(ImportReport { records, dropped })
}

fn read_items(text: &str, format: &TransferFormat) -> Result<Vec<Value>, ImportError> {
    match serde_json::from_str::<Value>(text).map_err(ImportError::InvalidJson)? {
        Value::Array(items) => Ok(items),
        Value::Object(mut document) => match document.remove(format.wrapper_field) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ImportError::InvalidFormat),
        },
        _ => Err(ImportError::InvalidFormat),
    }
}

impl Sanitize for JobApplication {
    fn import_id(item: &Map<String, Value>) -> Option<Self::Id> {
        let id = coerce_text(item.get("id"));
        (!id.trim().is_empty()).then_some(id)
    }

    fn fresh_id() -> Self::Id {
        new_application_id()
    }

    fn sanitize(id: Self::Id, item: &Map<String, Value>, now_ms: i64) -> Option<Self> {
        let status = match item.get("status") {
            Some(Value::String(value)) => ApplicationStatus::parse(value),
            _ => None,
        }
        .unwrap_or(ApplicationStatus::DEFAULT);

        let record = Self {
            id,
            company: coerce_text(item.get("company")).trim().to_string(),
            position: coerce_text(item.get("position")).trim().to_string(),
            applied_date: coerce_text(item.get("appliedDate")),
            status,
            notes: coerce_text(item.get("notes")),
            created_at: Some(coerce_timestamp(item.get("createdAt")).unwrap_or(now_ms)),
            updated_at: coerce_timestamp(item.get("updatedAt")),
        };
        record.validate().ok().map(|()| record)
    }
}

/// String coercion for loosely typed values.
///
/// Absent, `null`, `false`, `0` and containers become empty text.
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) if !is_zero(number) => number.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

/// Epoch-millisecond coercion; `None` for absent, zero or non-numeric input.
fn coerce_timestamp(value: Option<&Value>) -> Option<i64> {
    let number = match value? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number == 0.0 {
        return None;
    }
    Some(number as i64)
}

fn is_zero(number: &Number) -> bool {
    number.as_f64().is_some_and(|value| value == 0.0)
}
