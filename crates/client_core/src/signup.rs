use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Field, Severity},
    protocol::{SignupRequest, SignupResponse},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{FormError, SubmitError},
    form::FormState,
    login::GENERIC_FAILURE_MESSAGE,
    navigation::{Navigator, Route, ScheduledHandoff},
    notification::{NotificationPolicy, NotificationState, NotificationSurface},
    screen::{ScreenScope, SubmitOutcome, SIGNUP_HANDOFF_DELAY},
    transport::{AuthService, SignupReply},
    validation::validate_signup,
};

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Registration successful!";
pub const SIGNUP_REJECTED_MESSAGE: &str = "Failed to register. Please try again.";

pub struct SignupController {
    service: Arc<dyn AuthService>,
    navigator: Arc<dyn Navigator>,
    notifications: NotificationSurface,
    form: Mutex<FormState>,
    scope: ScreenScope,
    handoff_delay: Duration,
}

impl SignupController {
    pub fn new(service: Arc<dyn AuthService>, navigator: Arc<dyn Navigator>) -> Self {
        Self::new_with_settings(
            service,
            navigator,
            SIGNUP_HANDOFF_DELAY,
            NotificationPolicy::sticky(),
        )
    }

    pub fn new_with_settings(
        service: Arc<dyn AuthService>,
        navigator: Arc<dyn Navigator>,
        handoff_delay: Duration,
        policy: NotificationPolicy,
    ) -> Self {
        Self {
            service,
            navigator,
            notifications: NotificationSurface::new(policy),
            form: Mutex::new(FormState::signup()),
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

    pub fn notification(&self) -> NotificationState {
        self.notifications.snapshot()
    }

    pub fn notifications(&self) -> &NotificationSurface {
        &self.notifications
    }

    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    pub fn go_to_login(&self) {
        self.navigator.navigate(Route::Login);
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut form = self.form.lock().await;
            let result = validate_signup(&form);
            form.apply_validation(&result);
            if !result.is_valid() {
                debug!(screen = "signup", invalid = result.errors().len(), "validation failed");
                return SubmitOutcome::Invalid(result);
            }
            form.signup_request()
        };

        info!(screen = "signup", username = %request.username, "submitting registration");
        match self.register(&request).await {
            Ok(body) => {
                let message = body
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| SIGNUP_SUCCESS_MESSAGE.to_string());
                info!(screen = "signup", "registration accepted");
                self.notify(message.clone(), Severity::Success);
                self.schedule_handoff(request.email);
                SubmitOutcome::Accepted { message }
            }
            Err(SubmitError::Rejected(message)) => {
                self.notify(message.clone(), Severity::Error);
                SubmitOutcome::Rejected { message }
            }
            Err(err) => {
                warn!(screen = "signup", error = %err, "registration attempt failed");
                let mut message = err.to_string();
                if message.trim().is_empty() {
                    message = GENERIC_FAILURE_MESSAGE.to_string();
                }
                self.notify(message.clone(), Severity::Error);
                SubmitOutcome::Failed { message }
            }
        }
    }

    async fn register(&self, request: &SignupRequest) -> Result<SignupResponse, SubmitError> {
        match self.service.sign_up(request).await? {
            SignupReply::Accepted(body) => Ok(body),
            SignupReply::Rejected { status } => {
                info!(screen = "signup", status, "registration rejected");
                Err(SubmitError::Rejected(SIGNUP_REJECTED_MESSAGE.to_string()))
            }
        }
    }

    fn notify(&self, message: impl Into<String>, severity: Severity) {
        if self.scope.is_mounted() {
            self.notifications.show(message, severity);
        } else {
            debug!(screen = "signup", "screen unmounted; dropping notification");
        }
    }

    fn schedule_handoff(&self, email: String) {
        let navigator = Arc::clone(&self.navigator);
        let handoff = ScheduledHandoff::spawn(self.handoff_delay, move || {
            navigator.navigate(Route::VerifyOtp { email });
        });
        self.scope.track(handoff);
    }
}

#[cfg(test)]
#[path = "tests/signup_tests.rs"]
mod tests;
