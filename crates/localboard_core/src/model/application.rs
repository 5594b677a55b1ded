//! Job application domain model.
//!
//! # Responsibility
//! - Define the tracker record and its closed status enum.
//! - Provide create/patch inputs consumed by the record store.
//!
//! # Invariants
//! - `company`, `position` and `applied_date` are never empty when stored.
//! - Wire field names are camelCase (`appliedDate`, `createdAt`, ...).

use crate::model::record::{Category, Record, RecordValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for tracked applications.
///
/// Kept as plain text because imported documents may carry foreign ids.
pub type ApplicationId = String;

/// Hiring pipeline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interview,
    Accepted,
    Rejected,
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Category for ApplicationStatus {
    const ALL: &'static [Self] = &[
        Self::Applied,
        Self::Interview,
        Self::Accepted,
        Self::Rejected,
    ];
    const DEFAULT: Self = Self::Applied;

    fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

/// One tracked job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: ApplicationId,
    pub company: String,
    pub position: String,
    /// Calendar date as entered, `YYYY-MM-DD` for manual entry.
    pub applied_date: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: String,
    /// Unix epoch milliseconds. Default sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds of the last patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

/// Create input for a job application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFields {
    pub company: String,
    pub position: String,
    pub applied_date: String,
    pub status: ApplicationStatus,
    pub notes: String,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub applied_date: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub notes: Option<String>,
}

impl ApplicationPatch {
    /// Patch that only moves the application to another status.
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl From<ApplicationFields> for ApplicationPatch {
    fn from(fields: ApplicationFields) -> Self {
        Self {
            company: Some(fields.company),
            position: Some(fields.position),
            applied_date: Some(fields.applied_date),
            status: Some(fields.status),
            notes: Some(fields.notes),
        }
    }
}

/// Generates a fresh application id.
pub fn new_application_id() -> ApplicationId {
    Uuid::new_v4().to_string()
}

impl Record for JobApplication {
    type Id = ApplicationId;
    type Fields = ApplicationFields;
    type Patch = ApplicationPatch;
    type Category = ApplicationStatus;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn assign_id(_fields: &Self::Fields) -> Self::Id {
        new_application_id()
    }

    fn build(id: Self::Id, fields: Self::Fields, now_ms: i64) -> Self {
        Self {
            id,
            company: fields.company,
            position: fields.position,
            applied_date: fields.applied_date,
            status: fields.status,
            notes: fields.notes,
            created_at: Some(now_ms),
            updated_at: None,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch, now_ms: i64) {
        if let Some(company) = patch.company {
            self.company = company;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(applied_date) = patch.applied_date {
            self.applied_date = applied_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        self.updated_at = Some(now_ms);
    }

    fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    fn category(&self) -> Self::Category {
        self.status
    }

    fn text_fields(&self) -> Vec<&str> {
        vec![self.company.as_str(), self.position.as_str()]
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.trim().is_empty() {
            return Err(RecordValidationError::BlankId);
        }
        if self.company.trim().is_empty() {
            return Err(RecordValidationError::MissingField("company"));
        }
        if self.position.trim().is_empty() {
            return Err(RecordValidationError::MissingField("position"));
        }
        if self.applied_date.trim().is_empty() {
            return Err(RecordValidationError::MissingField("appliedDate"));
        }
        Ok(())
    }
}
