use std::time::Duration;

use super::*;
use crate::{
    error::TransportError,
    session::MemorySessionStore,
    test_support::{FailingSessionStore, FakeAuthService, RecordingAuthContext, RecordingNavigator},
};
use tokio::time::{timeout, Instant};

struct Harness {
    controller: LoginController,
    service: Arc<FakeAuthService>,
    sessions: Arc<MemorySessionStore>,
    navigator: Arc<RecordingNavigator>,
    routes: tokio::sync::mpsc::UnboundedReceiver<Route>,
    auth: Arc<RecordingAuthContext>,
}

fn harness(service: FakeAuthService) -> Harness {
    let service = Arc::new(service);
    let sessions = Arc::new(MemorySessionStore::new());
    let (navigator, routes) = RecordingNavigator::new();
    let auth = Arc::new(RecordingAuthContext::default());
    let controller = LoginController::new(
        service.clone(),
        sessions.clone(),
        navigator.clone(),
        auth.clone(),
    );
    Harness {
        controller,
        service,
        sessions,
        navigator,
        routes,
        auth,
    }
}

async fn fill(controller: &LoginController, username: &str, password: &str) {
    controller
        .set_field(Field::Username, username)
        .await
        .expect("username");
    controller
        .set_field(Field::Password, password)
        .await
        .expect("password");
}

#[tokio::test(start_paused = true)]
async fn successful_login_persists_session_and_navigates_home_after_delay() {
    let mut h = harness(FakeAuthService::accepting_login("tok123", "42"));
    fill(&h.controller, "alice", "Abcdef1!").await;

    let started = Instant::now();
    let outcome = h.controller.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Accepted {
            message: LOGIN_SUCCESS_MESSAGE.to_string()
        }
    );
    assert!(!h.controller.is_loading());

    assert_eq!(
        h.sessions.load_session().await.expect("load"),
        Some(SessionRecord::new("tok123", "42"))
    );
    let note = h.controller.notification();
    assert!(note.visible);
    assert_eq!(note.severity, Severity::Success);
    assert_eq!(note.message, LOGIN_SUCCESS_MESSAGE);

    assert!(
        timeout(Duration::from_millis(999), h.routes.recv())
            .await
            .is_err(),
        "navigation must wait for the handoff delay"
    );
    assert!(h.auth.users().is_empty());

    let route = h.routes.recv().await.expect("route");
    assert_eq!(route, Route::Home);
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert_eq!(h.auth.users(), vec!["alice".to_string()]);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.navigator.routes(), vec![Route::Home]);
    assert_eq!(h.auth.users().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn success_notification_auto_hides_after_three_seconds() {
    let h = harness(FakeAuthService::accepting_login("tok123", "42"));
    fill(&h.controller, "alice", "Abcdef1!").await;
    h.controller.submit().await;

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert!(h.controller.notification().visible);
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!h.controller.notification().visible);
}

#[tokio::test(start_paused = true)]
async fn rejected_login_shows_server_detail_and_stays_put() {
    let h = harness(FakeAuthService::rejecting_login(401, "Invalid credentials"));
    fill(&h.controller, "alice", "Abcdef1!").await;

    let outcome = h.controller.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            message: "Invalid credentials".to_string()
        }
    );

    let note = h.controller.notification();
    assert!(note.visible);
    assert_eq!(note.message, "Invalid credentials");
    assert_eq!(note.severity, Severity::Error);
    assert_eq!(h.sessions.load_session().await.expect("load"), None);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.navigator.routes().is_empty());
    assert!(h.auth.users().is_empty());
    assert!(!h.controller.is_loading());
}

#[tokio::test]
async fn rejection_without_text_detail_falls_back_to_generic_message() {
    let service = FakeAuthService::new().login_reply(Ok(LoginReply::Rejected {
        status: 422,
        body: shared::error::RejectionBody::default(),
    }));
    let h = harness(service);
    fill(&h.controller, "alice", "Abcdef1!").await;

    let outcome = h.controller.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn transport_failure_shows_generic_retry_message() {
    let service = FakeAuthService::new()
        .login_reply(Err(TransportError::Unreachable("connection refused".into())));
    let h = harness(service);
    fill(&h.controller, "alice", "Abcdef1!").await;

    let outcome = h.controller.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }
    );
    let note = h.controller.notification();
    assert_eq!(note.message, "An error occurred. Please try again.");
    assert_eq!(note.severity, Severity::Error);
    assert!(!h.controller.is_loading());
}

#[tokio::test(start_paused = true)]
async fn session_write_failure_is_reported_without_navigation() {
    let service = Arc::new(FakeAuthService::accepting_login("tok123", "42"));
    let (navigator, _routes) = RecordingNavigator::new();
    let controller = LoginController::new(
        service,
        Arc::new(FailingSessionStore),
        navigator.clone(),
        Arc::new(RecordingAuthContext::default()),
    );
    fill(&controller, "alice", "Abcdef1!").await;

    let outcome = controller.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
    assert!(!controller.is_loading());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(navigator.routes().is_empty());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_service() {
    let h = harness(FakeAuthService::accepting_login("tok123", "42"));
    fill(&h.controller, "   ", "abc").await;

    let outcome = h.controller.submit().await;
    let SubmitOutcome::Invalid(result) = &outcome else {
        panic!("expected validation failure, got {outcome:?}");
    };
    assert_eq!(result.error(Field::Username), Some("Username is required."));
    assert!(h.service.login_requests().is_empty());

    let form = h.controller.form().await;
    assert_eq!(form.error(Field::Username), Some("Username is required."));
    assert!(form.error(Field::Password).is_some());
    assert!(!h.controller.notification().visible);
    assert!(!h.controller.is_loading());
}

#[tokio::test]
async fn editing_after_failed_validation_clears_the_error() {
    let h = harness(FakeAuthService::accepting_login("tok123", "42"));
    h.controller.submit().await;
    assert!(h.controller.form().await.error(Field::Username).is_some());

    h.controller
        .set_field(Field::Username, "a")
        .await
        .expect("username");
    let form = h.controller.form().await;
    assert_eq!(form.error(Field::Username), None);
    assert!(form.error(Field::Password).is_some());
}

#[tokio::test(start_paused = true)]
async fn second_submit_while_in_flight_is_ignored() {
    let service = FakeAuthService::accepting_login("tok123", "42")
        .with_latency(Duration::from_millis(200));
    let h = harness(service);
    fill(&h.controller, "alice", "Abcdef1!").await;

    let (first, second) = tokio::join!(h.controller.submit(), async {
        tokio::task::yield_now().await;
        assert!(h.controller.is_loading());
        h.controller.submit().await
    });

    assert!(first.is_accepted());
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(h.service.login_requests().len(), 1);
    assert!(!h.controller.is_loading());
}

#[tokio::test(start_paused = true)]
async fn invalid_submit_while_in_flight_reports_field_errors() {
    let service = FakeAuthService::accepting_login("tok123", "42")
        .with_latency(Duration::from_millis(200));
    let h = harness(service);
    fill(&h.controller, "alice", "Abcdef1!").await;

    let (first, second) = tokio::join!(h.controller.submit(), async {
        tokio::task::yield_now().await;
        h.controller
            .set_field(Field::Username, "")
            .await
            .expect("username");
        h.controller.submit().await
    });

    assert!(first.is_accepted());
    let SubmitOutcome::Invalid(result) = &second else {
        panic!("expected validation failure, got {second:?}");
    };
    assert_eq!(result.error(Field::Username), Some("Username is required."));
    assert_eq!(h.service.login_requests().len(), 1);
    assert!(!h.controller.is_loading());
}

#[tokio::test]
async fn sends_only_username_and_password() {
    let h = harness(FakeAuthService::accepting_login("tok123", "42"));
    fill(&h.controller, "alice", "Abcdef1!").await;
    h.controller.submit().await;

    assert_eq!(
        h.service.login_requests(),
        vec![LoginRequest {
            username: "alice".into(),
            password: "Abcdef1!".into(),
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn unmount_during_request_suppresses_screen_updates_and_handoff() {
    let service = FakeAuthService::accepting_login("tok123", "42")
        .with_latency(Duration::from_millis(200));
    let h = harness(service);
    fill(&h.controller, "alice", "Abcdef1!").await;

    let (outcome, ()) = tokio::join!(h.controller.submit(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.controller.unmount();
    });

    assert!(outcome.is_accepted());
    assert!(!h.controller.notification().visible);
    assert_eq!(
        h.sessions.load_session().await.expect("load"),
        Some(SessionRecord::new("tok123", "42"))
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.navigator.routes().is_empty());
    assert!(h.auth.users().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unmount_after_success_cancels_pending_handoff() {
    let h = harness(FakeAuthService::accepting_login("tok123", "42"));
    fill(&h.controller, "alice", "Abcdef1!").await;
    h.controller.submit().await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    h.controller.unmount();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test]
async fn link_to_signup_navigates_immediately() {
    let h = harness(FakeAuthService::new());
    h.controller.go_to_signup();
    assert_eq!(h.navigator.routes(), vec![Route::Signup]);
}

#[tokio::test]
async fn dismissing_twice_is_harmless() {
    let h = harness(FakeAuthService::rejecting_login(401, "Invalid credentials"));
    fill(&h.controller, "alice", "Abcdef1!").await;
    h.controller.submit().await;

    h.controller.dismiss_notification();
    h.controller.dismiss_notification();
    let note = h.controller.notification();
    assert!(!note.visible);
    assert_eq!(note.message, "Invalid credentials");
}
