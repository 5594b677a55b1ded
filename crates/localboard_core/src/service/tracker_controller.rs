//! Job tracker mutation controller.
//!
//! # Responsibility
//! - Drive the Add/Edit state machine over a pending form buffer.
//! - Validate manual input before any store mutation.
//! - Gate irreversible actions behind a confirmation step.
//! - Emit transient notices and the post-update highlight.
//!
//! # Invariants
//! - A failed submit mutates nothing and keeps the form as typed.
//! - The controller is never left editing a record the store no longer has.
//! - Every successful mutation replaces the pending notice.

use crate::clock::{format_utc_date, parse_calendar_date, Clock};
use crate::config::TrackerConfig;
use crate::model::application::{
    ApplicationFields, ApplicationId, ApplicationPatch, ApplicationStatus, JobApplication,
};
use crate::model::record::RecordValidationError;
use crate::repo::json_slot::JsonSlot;
use crate::repo::slot_repo::SlotRepository;
use crate::search::projection::{category_counts, project, ViewQuery};
use crate::service::feedback::{Confirm, Deferred, Notice, NoticeKind};
use crate::store::{InsertPosition, RecordStore, StoreError};
use crate::transfer::{export_records, import_records, ExportError, ExportFile, ImportError};
use log::{error, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

// Shape check first: chrono alone accepts unpadded fields like `2024-1-5`.
static APPLIED_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

const DELETE_PROMPT: &str = "Delete this application?";
const CLEAR_ALL_PROMPT: &str = "Delete ALL applications? This cannot be undone.";

pub type TrackerStore<S> = RecordStore<JobApplication, S>;

/// Opens the tracker store from `config.records_key`.
///
/// New applications are inserted at the front.
pub fn open_tracker_store<S: SlotRepository>(
    repo: S,
    config: &TrackerConfig,
    clock: impl Clock + 'static,
) -> TrackerStore<S> {
    RecordStore::open(
        JsonSlot::new(repo, config.records_key.clone()),
        clock,
        InsertPosition::Front,
    )
}

/// Controller failure surfaced to the presentation layer.
#[derive(Debug)]
pub enum ControllerError {
    /// Required input missing or malformed; the form is retained.
    Validation(RecordValidationError),
    /// Target application no longer exists.
    NotFound(ApplicationId),
    Store(StoreError),
    Import(ImportError),
    Export(ExportError),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "application not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Editor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Add,
    Edit(ApplicationId),
}

/// Pending form input, edited freely by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub company: String,
    pub position: String,
    pub applied_date: String,
    pub status: ApplicationStatus,
    pub notes: String,
}

impl ApplicationForm {
    fn from_record(app: &JobApplication) -> Self {
        Self {
            company: app.company.clone(),
            position: app.position.clone(),
            applied_date: app.applied_date.clone(),
            status: app.status,
            notes: app.notes.clone(),
        }
    }

    // The applied date survives resets so consecutive entries keep it.
    fn reset_keep_date(&mut self) {
        self.company.clear();
        self.position.clear();
        self.notes.clear();
        self.status = ApplicationStatus::default();
    }

    /// Trims and validates the buffer into create input.
    fn to_fields(&self) -> Result<ApplicationFields, RecordValidationError> {
        let company = self.company.trim();
        let position = self.position.trim();
        let applied_date = self.applied_date.trim();

        if company.is_empty() {
            return Err(RecordValidationError::MissingField("company"));
        }
        if position.is_empty() {
            return Err(RecordValidationError::MissingField("position"));
        }
        if applied_date.is_empty() {
            return Err(RecordValidationError::MissingField("appliedDate"));
        }
        if !APPLIED_DATE_RE.is_match(applied_date) || parse_calendar_date(applied_date).is_none() {
            return Err(RecordValidationError::InvalidDate(applied_date.to_string()));
        }

        Ok(ApplicationFields {
            company: company.to_string(),
            position: position.to_string(),
            applied_date: applied_date.to_string(),
            status: self.status,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(JobApplication),
    Updated(JobApplication),
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// User declined the confirmation.
    Cancelled,
    /// Nothing to delete; no prompt was shown.
    NotFound,
}

/// Result of a clear-all request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { count: usize },
    Cancelled,
    AlreadyEmpty,
}

/// Add/Edit controller bound to one tracker store.
pub struct TrackerController<'s, S: SlotRepository> {
    store: &'s mut TrackerStore<S>,
    config: TrackerConfig,
    mode: EditorMode,
    form: ApplicationForm,
    notice: Deferred<Notice>,
    highlight: Deferred<ApplicationId>,
}

impl<'s, S: SlotRepository> TrackerController<'s, S> {
    /// Starts in Add mode with today's UTC date in the form.
    pub fn new(store: &'s mut TrackerStore<S>, config: TrackerConfig) -> Self {
        let form = ApplicationForm {
            applied_date: format_utc_date(store.now_ms()),
            ..ApplicationForm::default()
        };
        Self {
            store,
            config,
            mode: EditorMode::Add,
            form,
            notice: Deferred::new(),
            highlight: Deferred::new(),
        }
    }

    pub fn store(&self) -> &TrackerStore<S> {
        self.store
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ApplicationForm {
        &mut self.form
    }

    /// Whether `id` is the current edit target.
    pub fn is_editing(&self, id: &str) -> bool {
        matches!(&self.mode, EditorMode::Edit(target) if target == id)
    }

    /// Loads `id` into the form and switches to Edit mode.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent; mode and form are unchanged.
    pub fn start_edit(&mut self, id: &str) -> Result<(), ControllerError> {
        let Some(app) = self.store.get(&id.to_string()) else {
            return Err(ControllerError::NotFound(id.to_string()));
        };
        self.form = ApplicationForm::from_record(app);
        self.mode = EditorMode::Edit(id.to_string());
        Ok(())
    }

    /// Leaves Edit mode and clears the form, keeping the applied date.
    pub fn cancel_edit(&mut self) {
        self.mode = EditorMode::Add;
        self.form.reset_keep_date();
    }

    /// Validates the form and creates or updates depending on mode.
    ///
    /// # Errors
    /// - `Validation` when required input is missing; nothing is mutated.
    /// - `NotFound` when the edit target vanished; the editor returns to Add.
    pub fn submit(&mut self) -> Result<SubmitOutcome, ControllerError> {
        let fields = self.form.to_fields().map_err(ControllerError::Validation)?;

        match self.mode.clone() {
            EditorMode::Add => {
                let created = self.store.create(fields)?;
                self.form.reset_keep_date();
                self.notify(NoticeKind::Success, "Added");
                Ok(SubmitOutcome::Created(created))
            }
            EditorMode::Edit(id) => {
                let outcome = self.store.update(&id, ApplicationPatch::from(fields));
                if matches!(outcome, Err(StoreError::NotFound(_))) {
                    self.cancel_edit();
                }
                let updated = outcome?.into_record();

                let now = self.store.now_ms();
                self.highlight
                    .schedule(id, now, self.config.highlight_duration_ms);
                self.cancel_edit();
                self.notify(NoticeKind::Success, "Updated");
                Ok(SubmitOutcome::Updated(updated))
            }
        }
    }

    /// Deletes `id` after confirmation.
    ///
    /// Deleting the current edit target returns the editor to Add first.
    pub fn delete(&mut self, id: &str, confirm: &mut impl Confirm) -> DeleteOutcome {
        let id = id.to_string();
        if !self.store.contains(&id) {
            return DeleteOutcome::NotFound;
        }
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        if self.is_editing(&id) {
            self.cancel_edit();
        }
        if !self.store.delete(&id) {
            return DeleteOutcome::NotFound;
        }
        if matches!(self.highlight.current(self.store.now_ms()), Some(target) if *target == id) {
            self.highlight.cancel();
        }
        self.notify(NoticeKind::Danger, "Deleted");
        DeleteOutcome::Deleted
    }

    /// Removes every application after confirmation.
    pub fn clear_all(&mut self, confirm: &mut impl Confirm) -> ClearOutcome {
        if self.store.is_empty() {
            return ClearOutcome::AlreadyEmpty;
        }
        if !confirm.confirm(CLEAR_ALL_PROMPT) {
            return ClearOutcome::Cancelled;
        }

        let count = self.store.len();
        self.cancel_edit();
        self.highlight.cancel();
        // An empty collection cannot violate store invariants.
        if let Err(err) = self.store.replace_all(Vec::new()) {
            error!("event=clear_all module=service status=error error={err}");
            return ClearOutcome::Cancelled;
        }
        self.notify(NoticeKind::Danger, "All cleared");
        ClearOutcome::Cleared { count }
    }

    /// Replaces the store with the sanitized content of an import document.
    ///
    /// Returns the number of imported applications.
    ///
    /// # Errors
    /// - `Import` when the document is not JSON or has an unknown shape; the
    ///   store is untouched and a danger notice is shown.
    pub fn import(&mut self, text: &str) -> Result<usize, ControllerError> {
        let now = self.store.now_ms();
        let report = match import_records::<JobApplication>(text, &self.config.transfer, now) {
            Ok(report) => report,
            Err(err) => {
                self.notify(
                    NoticeKind::Danger,
                    "Import failed. Make sure the file is valid JSON.",
                );
                return Err(ControllerError::Import(err));
            }
        };

        let count = report.records.len();
        if let Err(err) = self.store.replace_all(report.records) {
            self.notify(
                NoticeKind::Danger,
                "Import failed. Make sure the file is valid JSON.",
            );
            return Err(ControllerError::Store(err));
        }

        let target_gone = matches!(&self.mode, EditorMode::Edit(id) if !self.store.contains(id));
        if target_gone {
            self.cancel_edit();
        }
        info!(
            "event=tracker_import module=service status=ok count={count} dropped={}",
            report.dropped
        );
        self.notify(NoticeKind::Success, format!("Imported {count} applications"));
        Ok(count)
    }

    /// Serializes every application into the export document.
    pub fn export(&mut self) -> Result<ExportFile, ControllerError> {
        let file = export_records(
            self.store.all(),
            &self.config.transfer,
            self.store.now_ms(),
        )
        .map_err(ControllerError::Export)?;
        self.notify(NoticeKind::Info, "Exported JSON");
        Ok(file)
    }

    /// Filtered, newest-first view of the store.
    pub fn projection(&self, query: &ViewQuery<ApplicationStatus>) -> Vec<JobApplication> {
        project(self.store.all(), query)
    }

    /// Per-status counts over every application, regardless of filters.
    pub fn stats(&self) -> BTreeMap<ApplicationStatus, usize> {
        category_counts(self.store.all())
    }

    /// Notice visible right now, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.current(self.store.now_ms())
    }

    /// Application highlighted after its last update, if still visible.
    pub fn highlighted(&self) -> Option<&ApplicationId> {
        self.highlight.current(self.store.now_ms())
    }

    /// Dismisses expired notice/highlight; returns whether anything changed.
    pub fn tick(&mut self) -> bool {
        let now = self.store.now_ms();
        let notice_expired = self.notice.tick(now).is_some();
        let highlight_expired = self.highlight.tick(now).is_some();
        notice_expired || highlight_expired
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let now = self.store.now_ms();
        self.notice.schedule(
            Notice::new(kind, message),
            now,
            self.config.notice_duration_ms,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::ApplicationForm;
    use crate::model::record::RecordValidationError;

    #[test]
    fn form_rejects_malformed_dates_and_trims_text() {
        let mut form = ApplicationForm {
            company: "  Acme ".to_string(),
            position: " Eng".to_string(),
            applied_date: "01/02/2024".to_string(),
            ..ApplicationForm::default()
        };
        assert_eq!(
            form.to_fields(),
            Err(RecordValidationError::InvalidDate("01/02/2024".to_string()))
        );

        form.applied_date = "2024-02-01".to_string();
        let fields = form.to_fields().expect("valid form");
        assert_eq!(fields.company, "Acme");
        assert_eq!(fields.position, "Eng");
    }
}
