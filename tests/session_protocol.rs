mod common;

use common::{app_with, write_templates, MockCapture, MockInjector, SharedApp};
use screensearch::{
    ConfirmingInjector, InputAction, InputInjector, Locator, OutcomeStatus, Point, SearchSession,
    SessionConfig, TemplateLibrary,
};

fn session_with<I: InputInjector>(
    dir: &std::path::Path,
    app: &SharedApp,
    injector: I,
) -> SearchSession<MockCapture, I> {
    let locator = Locator::new(TemplateLibrary::new(dir), MockCapture(app.clone()));
    SearchSession::new(locator, injector, SessionConfig::default().without_delays())
}

#[test]
fn search_drives_form_and_counts_members() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let app = app_with(&[("800101-1000001", 3)]);
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    let outcome = session.search("800101-1000001");
    assert_eq!(outcome.status, OutcomeStatus::Success);
    assert_eq!(outcome.count, 3);
    assert_eq!(outcome.message, "Found 3 members");
    assert_eq!(
        app.borrow().actions,
        vec![
            "capture",
            "click:input",
            "hotkey:ctrl+a",
            "key:delete",
            "type:800101-1000001",
            "capture",
            "click:button",
            "capture",
        ]
    );
}

#[test]
fn previous_identifier_is_cleared_and_locations_reused() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let app = app_with(&[("a-1", 4), ("b-2", 1)]);
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    assert_eq!(session.search("a-1").count, 4);
    app.borrow_mut().actions.clear();

    let outcome = session.search("b-2");
    assert_eq!(outcome.count, 1);
    assert_eq!(app.borrow().field, "b-2");
    // input and button come from the location cache
    assert_eq!(
        app.borrow().actions.iter().filter(|a| *a == "capture").count(),
        1
    );

    let unknown = session.search("c-3");
    assert!(unknown.is_success());
    assert_eq!(unknown.count, 0);
}

#[test]
fn missing_button_template_becomes_error_outcome() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    std::fs::remove_file(dir.path().join("search_button.png")).unwrap();
    let app = app_with(&[("a-1", 2)]);
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    let outcome = session.search("a-1");
    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert_eq!(outcome.count, 0);
    assert!(outcome.message.starts_with("template not found"));
    assert!(outcome.message.contains("search_button.png"));
}

#[test]
fn missing_marker_template_counts_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    std::fs::remove_file(dir.path().join("checkbox.png")).unwrap();
    let app = app_with(&[("a-1", 2)]);
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    let outcome = session.search("a-1");
    assert!(outcome.is_success());
    assert_eq!(outcome.count, 0);
}

#[test]
fn injection_failure_becomes_error_outcome() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let app = app_with(&[("a-1", 2)]);
    app.borrow_mut().fail_typing = true;
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    let outcome = session.search("a-1");
    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert!(outcome.message.contains("keyboard unavailable"));
    assert!(!app.borrow().actions.contains(&"click:button".to_string()));
}

#[test]
fn refused_action_stops_the_search() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let app = app_with(&[("a-1", 2)]);
    let injector = ConfirmingInjector::new(MockInjector(app.clone()), |action: &InputAction| {
        !matches!(action, InputAction::Click(p) if p.x > 60)
    });
    let mut session = session_with(dir.path(), &app, injector);

    let outcome = session.search("a-1");
    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert!(outcome.message.contains("action refused"));
    assert_eq!(app.borrow().field, "a-1");
    assert_eq!(app.borrow().shown, None);
}

#[test]
fn empty_identifier_is_rejected_without_input() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let app = app_with(&[]);
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    let outcome = session.search("");
    assert_eq!(outcome.status, OutcomeStatus::Error);
    assert!(app.borrow().actions.is_empty());
}

#[test]
fn whitespace_identifier_is_typed_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let app = app_with(&[(" ", 1)]);
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    let outcome = session.search(" ");
    assert!(outcome.is_success());
    assert_eq!(outcome.count, 1);
    assert_eq!(app.borrow().field, " ");
}

#[test]
fn clicks_follow_a_window_away_from_desktop_origin() {
    let dir = tempfile::tempdir().unwrap();
    write_templates(dir.path());
    let app = app_with(&[("a-1", 3)]);
    app.borrow_mut().origin = Point::new(300, 200);
    let mut session = session_with(dir.path(), &app, MockInjector(app.clone()));

    let outcome = session.search("a-1");
    assert!(outcome.is_success());
    assert_eq!(outcome.count, 3);
    let actions = app.borrow().actions.clone();
    assert!(actions.contains(&"click:input".to_string()));
    assert!(actions.contains(&"click:button".to_string()));
}
