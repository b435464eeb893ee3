use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::domain::Severity;
use tokio::sync::watch;
use tracing::debug;

pub const LOGIN_AUTO_HIDE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub visible: bool,
    pub message: String,
    pub severity: Severity,
}

impl NotificationState {
    /// Replaces whatever is showing. There is no queue.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.visible = true;
        self.message = message.into();
        self.severity = severity;
    }

    /// Hides without clearing the last content so a closing animation can
    /// still render it.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotificationPolicy {
    pub auto_hide: Option<Duration>,
}

impl NotificationPolicy {
    pub fn auto_hide_after(duration: Duration) -> Self {
        Self {
            auto_hide: Some(duration),
        }
    }

    pub fn sticky() -> Self {
        Self { auto_hide: None }
    }
}

// An auto-hide timer only dismisses the generation it was started for.
#[derive(Clone)]
pub struct NotificationSurface {
    inner: Arc<SurfaceInner>,
}

struct SurfaceInner {
    state: watch::Sender<NotificationState>,
    generation: AtomicU64,
    policy: NotificationPolicy,
}

impl NotificationSurface {
    pub fn new(policy: NotificationPolicy) -> Self {
        let (state, _) = watch::channel(NotificationState::default());
        Self {
            inner: Arc::new(SurfaceInner {
                state,
                generation: AtomicU64::new(0),
                policy,
            }),
        }
    }

    pub fn policy(&self) -> NotificationPolicy {
        self.inner.policy
    }

    pub fn snapshot(&self) -> NotificationState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.inner.state.subscribe()
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(%severity, generation, "showing notification");
        self.inner
            .state
            .send_modify(|state| state.show(message, severity));

        if let Some(after) = self.inner.policy.auto_hide {
            self.schedule_auto_hide(generation, after);
        }
    }

    pub fn dismiss(&self) {
        self.inner.state.send_if_modified(|state| {
            if !state.visible {
                return false;
            }
            state.dismiss();
            true
        });
    }

    fn schedule_auto_hide(&self, generation: u64, after: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no runtime available; notification stays until dismissed");
            return;
        };

        let surface = self.clone();
        runtime.spawn(async move {
            tokio::time::sleep(after).await;
            let inner = &surface.inner;
            inner.state.send_if_modified(|state| {
                if !state.visible || inner.generation.load(Ordering::SeqCst) != generation {
                    return false;
                }
                state.dismiss();
                true
            });
        });
    }
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
