use localboard_core::{
    open_tracker_store, ApplicationStatus, ClearOutcome, ControllerError, DeleteOutcome,
    EditorMode, ManualClock, MemorySlotRepository, NoticeKind, RecordValidationError,
    SlotRepository, SubmitOutcome, TrackerConfig, TrackerController, TrackerStore,
};

// 2024-02-02T00:00:00.000Z
const START_MS: i64 = 1_706_832_000_000;

fn setup() -> (TrackerStore<MemorySlotRepository>, MemorySlotRepository, ManualClock) {
    let repo = MemorySlotRepository::new();
    let clock = ManualClock::new(START_MS);
    let store = open_tracker_store(repo.clone(), &TrackerConfig::default(), clock.clone());
    (store, repo, clock)
}

fn fill(controller: &mut TrackerController<'_, MemorySlotRepository>, company: &str) {
    let form = controller.form_mut();
    form.company = company.to_string();
    form.position = "Engineer".to_string();
    form.applied_date = "2024-01-01".to_string();
}

fn accept(_prompt: &str) -> bool {
    true
}

fn decline(_prompt: &str) -> bool {
    false
}

#[test]
fn new_controller_starts_in_add_mode_with_today() {
    let (mut store, _, _) = setup();
    let controller = TrackerController::new(&mut store, TrackerConfig::default());

    assert_eq!(controller.mode(), &EditorMode::Add);
    assert_eq!(controller.form().applied_date, "2024-02-02");
    assert!(controller.notice().is_none());
}

#[test]
fn add_then_move_to_interview_updates_stats() {
    let (mut store, _, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    fill(&mut controller, "Acme");
    let SubmitOutcome::Created(created) = controller.submit().unwrap() else {
        panic!("add mode should create");
    };
    assert_eq!(created.status, ApplicationStatus::Applied);
    assert_eq!(controller.form().company, "");
    assert_eq!(controller.form().applied_date, "2024-01-01");

    controller.start_edit(&created.id).unwrap();
    controller.form_mut().status = ApplicationStatus::Interview;
    let SubmitOutcome::Updated(updated) = controller.submit().unwrap() else {
        panic!("edit mode should update");
    };

    assert_eq!(updated.id, created.id);
    assert_eq!(controller.mode(), &EditorMode::Add);
    let stats = controller.stats();
    assert_eq!(stats[&ApplicationStatus::Applied], 0);
    assert_eq!(stats[&ApplicationStatus::Interview], 1);
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn invalid_submit_keeps_form_and_store() {
    let (mut store, repo, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    controller.form_mut().company = "Acme".to_string();
    let err = controller.submit().unwrap_err();

    assert!(matches!(
        err,
        ControllerError::Validation(RecordValidationError::MissingField("position"))
    ));
    assert_eq!(controller.form().company, "Acme");
    assert!(controller.store().is_empty());
    assert!(controller.notice().is_none());
    assert_eq!(repo.read_slot("jobTrackerApps").unwrap(), None);
}

#[test]
fn malformed_date_is_rejected() {
    let (mut store, _, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    fill(&mut controller, "Acme");
    controller.form_mut().applied_date = "2024-13-01".to_string();

    assert!(matches!(
        controller.submit(),
        Err(ControllerError::Validation(RecordValidationError::InvalidDate(_)))
    ));
}

#[test]
fn update_highlights_record_until_deadline() {
    let (mut store, _, clock) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());
    fill(&mut controller, "Acme");
    let SubmitOutcome::Created(created) = controller.submit().unwrap() else {
        panic!("add mode should create");
    };

    controller.start_edit(&created.id).unwrap();
    controller.form_mut().notes = "called back".to_string();
    controller.submit().unwrap();
    assert_eq!(controller.highlighted(), Some(&created.id));

    clock.advance(899);
    assert_eq!(controller.highlighted(), Some(&created.id));
    clock.advance(1);
    assert_eq!(controller.highlighted(), None);
    assert!(controller.tick());
}

#[test]
fn newer_notice_replaces_pending_one_and_expires() {
    let (mut store, _, clock) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    fill(&mut controller, "Acme");
    controller.submit().unwrap();
    assert_eq!(controller.notice().map(|notice| notice.kind), Some(NoticeKind::Success));

    clock.advance(2_000);
    controller.export().unwrap();
    let notice = controller.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Info);
    assert_eq!(notice.message, "Exported JSON");

    clock.advance(2_199);
    assert!(controller.notice().is_some());
    clock.advance(1);
    assert!(controller.notice().is_none());
    assert!(controller.tick());
    assert!(!controller.tick());
}

#[test]
fn start_edit_of_unknown_id_keeps_add_mode() {
    let (mut store, _, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    assert!(matches!(
        controller.start_edit("ghost"),
        Err(ControllerError::NotFound(id)) if id == "ghost"
    ));
    assert_eq!(controller.mode(), &EditorMode::Add);
}

#[test]
fn cancel_edit_returns_to_add_and_keeps_date() {
    let (mut store, _, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());
    fill(&mut controller, "Acme");
    let SubmitOutcome::Created(created) = controller.submit().unwrap() else {
        panic!("add mode should create");
    };

    controller.start_edit(&created.id).unwrap();
    assert!(controller.is_editing(&created.id));
    assert_eq!(controller.form().company, "Acme");

    controller.cancel_edit();
    assert_eq!(controller.mode(), &EditorMode::Add);
    assert_eq!(controller.form().company, "");
    assert_eq!(controller.form().applied_date, "2024-01-01");
}

#[test]
fn delete_requires_confirmation_and_leaves_edit_mode() {
    let (mut store, _, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());
    fill(&mut controller, "Acme");
    let SubmitOutcome::Created(created) = controller.submit().unwrap() else {
        panic!("add mode should create");
    };
    controller.start_edit(&created.id).unwrap();

    assert_eq!(
        controller.delete(&created.id, &mut decline),
        DeleteOutcome::Cancelled
    );
    assert_eq!(controller.store().len(), 1);
    assert!(controller.is_editing(&created.id));

    let mut prompts = Vec::new();
    let mut record_prompt = |prompt: &str| {
        prompts.push(prompt.to_string());
        true
    };
    assert_eq!(
        controller.delete(&created.id, &mut record_prompt),
        DeleteOutcome::Deleted
    );
    assert_eq!(prompts.len(), 1);
    assert!(controller.store().is_empty());
    assert_eq!(controller.mode(), &EditorMode::Add);
    assert_eq!(controller.notice().map(|notice| notice.kind), Some(NoticeKind::Danger));
}

#[test]
fn delete_of_unknown_id_does_not_prompt() {
    let (mut store, _, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    let mut prompted = false;
    let mut confirm = |_: &str| {
        prompted = true;
        true
    };
    assert_eq!(controller.delete("ghost", &mut confirm), DeleteOutcome::NotFound);
    assert!(!prompted);
}

#[test]
fn clear_all_empties_store_after_confirmation() {
    let (mut store, repo, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    assert_eq!(controller.clear_all(&mut accept), ClearOutcome::AlreadyEmpty);

    fill(&mut controller, "Acme");
    controller.submit().unwrap();
    fill(&mut controller, "Beta");
    controller.submit().unwrap();

    assert_eq!(controller.clear_all(&mut decline), ClearOutcome::Cancelled);
    assert_eq!(controller.store().len(), 2);

    assert_eq!(
        controller.clear_all(&mut accept),
        ClearOutcome::Cleared { count: 2 }
    );
    assert!(controller.store().is_empty());
    assert_eq!(controller.notice().unwrap().message, "All cleared");
    assert_eq!(
        repo.read_slot("jobTrackerApps").unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn impossible_calendar_dates_are_rejected() {
    let (mut store, repo, _) = setup();
    let mut controller = TrackerController::new(&mut store, TrackerConfig::default());

    for date in ["2024-02-31", "2023-02-29", "2024-04-31", "2024-1-05"] {
        fill(&mut controller, "Acme");
        controller.form_mut().applied_date = date.to_string();
        assert!(
            matches!(
                controller.submit(),
                Err(ControllerError::Validation(RecordValidationError::InvalidDate(ref value)))
                    if value == date
            ),
            "{date} should be rejected"
        );
        assert_eq!(controller.form().applied_date, date);
    }
    assert!(controller.store().is_empty());
    assert_eq!(repo.read_slot("jobTrackerApps").unwrap(), None);

    controller.form_mut().applied_date = "2024-02-29".to_string();
    assert!(matches!(controller.submit(), Ok(SubmitOutcome::Created(_))));
}
