use std::{
    sync::{atomic::AtomicBool, atomic::Ordering, Arc},
    time::Duration,
};

use shared::{
    domain::{Field, Severity, SessionRecord},
    protocol::LoginRequest,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{FormError, SubmitError},
    form::FormState,
    navigation::{AuthContext, Navigator, Route, ScheduledHandoff},
    notification::{NotificationPolicy, NotificationState, NotificationSurface, LOGIN_AUTO_HIDE},
    screen::{BusyGuard, ScreenScope, SubmitOutcome, LOGIN_HANDOFF_DELAY},
    session::SessionStore,
    transport::{AuthService, LoginReply},
    validation::validate_login,
};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

pub struct LoginController {
    service: Arc<dyn AuthService>,
    sessions: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    auth: Arc<dyn AuthContext>,
    notifications: NotificationSurface,
    form: Mutex<FormState>,
    loading: AtomicBool,
    scope: ScreenScope,
    handoff_delay: Duration,
}

impl LoginController {
    pub fn new(
        service: Arc<dyn AuthService>,
        sessions: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        auth: Arc<dyn AuthContext>,
    ) -> Self {
        Self::new_with_settings(
            service,
            sessions,
            navigator,
            auth,
            LOGIN_HANDOFF_DELAY,
            NotificationPolicy::auto_hide_after(LOGIN_AUTO_HIDE),
        )
    }

    pub fn new_with_settings(
        service: Arc<dyn AuthService>,
        sessions: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        auth: Arc<dyn AuthContext>,
        handoff_delay: Duration,
        policy: NotificationPolicy,
    ) -> Self {
        Self {
            service,
            sessions,
            navigator,
            auth,
            notifications: NotificationSurface::new(policy),
            form: Mutex::new(FormState::login()),
            loading: AtomicBool::new(false),
            scope: ScreenScope::new(),
            handoff_delay,
        }
    }

    pub async fn set_field(&self, field: Field, value: impl Into<String>) -> Result<(), FormError> {
        self.form.lock().await.set_value(field, value)
    }

    pub async fn form(&self) -> FormState {
        self.form.lock().await.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn notification(&self) -> NotificationState {
        self.notifications.snapshot()
    }

    pub fn notifications(&self) -> &NotificationSurface {
        &self.notifications
    }

    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    pub fn go_to_signup(&self) {
        self.navigator.navigate(Route::Signup);
    }

    /// Cancels pending handoffs. Responses that arrive afterwards still
    /// persist the session but no longer touch this screen's state.
    pub fn unmount(&self) {
        self.scope.unmount();
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut form = self.form.lock().await;
            let result = validate_login(&form);
            form.apply_validation(&result);
            if !result.is_valid() {
                debug!(screen = "login", invalid = result.errors().len(), "validation failed");
                return SubmitOutcome::Invalid(result);
            }
            form.login_request()
        };

        let Some(_busy) = BusyGuard::acquire(&self.loading) else {
            debug!(screen = "login", "ignoring submit while a request is in flight");
            return SubmitOutcome::Busy;
        };

        info!(screen = "login", username = %request.username, "submitting credentials");
        match self.authenticate(&request).await {
            Ok(record) => {
                info!(screen = "login", user_id = %record.user_id, "login succeeded");
                self.notify(LOGIN_SUCCESS_MESSAGE, Severity::Success);
                self.schedule_handoff(request.username);
                SubmitOutcome::Accepted {
                    message: LOGIN_SUCCESS_MESSAGE.to_string(),
                }
            }
            Err(SubmitError::Rejected(message)) => {
                self.notify(message.clone(), Severity::Error);
                SubmitOutcome::Rejected { message }
            }
            Err(err) => {
                warn!(screen = "login", error = %err, "login attempt failed");
                self.notify(GENERIC_FAILURE_MESSAGE, Severity::Error);
                SubmitOutcome::Failed {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                }
            }
        }
    }

    async fn authenticate(&self, request: &LoginRequest) -> Result<SessionRecord, SubmitError> {
        match self.service.login(request).await? {
            LoginReply::Rejected { status, body } => {
                let message = body
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                info!(screen = "login", status, "credentials rejected");
                Err(SubmitError::Rejected(message))
            }
            LoginReply::Accepted(body) => {
                let record = SessionRecord::from(body);
                self.sessions
                    .store_session(&record)
                    .await
                    .map_err(SubmitError::Session)?;
                Ok(record)
            }
        }
    }

    fn notify(&self, message: impl Into<String>, severity: Severity) {
        if self.scope.is_mounted() {
            self.notifications.show(message, severity);
        } else {
            debug!(screen = "login", "screen unmounted; dropping notification");
        }
    }

    fn schedule_handoff(&self, username: String) {
        let navigator = Arc::clone(&self.navigator);
        let auth = Arc::clone(&self.auth);
        let handoff = ScheduledHandoff::spawn(self.handoff_delay, move || {
            auth.establish(&username);
            navigator.navigate(Route::Home);
        });
        self.scope.track(handoff);
    }
}

#[cfg(test)]
#[path = "tests/login_tests.rs"]
mod tests;
