use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::Duration,
};

use crate::{navigation::ScheduledHandoff, validation::ValidationResult};

pub const LOGIN_HANDOFF_DELAY: Duration = Duration::from_millis(1000);
pub const SIGNUP_HANDOFF_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTimings {
    pub login_handoff_delay: Duration,
    pub signup_handoff_delay: Duration,
}

impl Default for ScreenTimings {
    fn default() -> Self {
        Self {
            login_handoff_delay: LOGIN_HANDOFF_DELAY,
            signup_handoff_delay: SIGNUP_HANDOFF_DELAY,
        }
    }
}

pub(crate) struct ScreenScope {
    mounted: AtomicBool,
    handoffs: Mutex<Vec<ScheduledHandoff>>,
}

impl ScreenScope {
    pub(crate) fn new() -> Self {
        Self {
            mounted: AtomicBool::new(true),
            handoffs: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub(crate) fn track(&self, handoff: ScheduledHandoff) {
        let mut handoffs = self.handoffs.lock().unwrap_or_else(|e| e.into_inner());
        handoffs.retain(|h| !h.is_finished());
        if self.is_mounted() {
            handoffs.push(handoff);
        } else {
            handoff.cancel();
        }
    }

    pub(crate) fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        let handoffs = std::mem::take(&mut *self.handoffs.lock().unwrap_or_else(|e| e.into_inner()));
        for handoff in handoffs {
            handoff.cancel();
        }
    }
}

/// Holds the busy flag for the lifetime of one submission and clears it on
/// every exit path.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid(ValidationResult),
    /// Another submission from the same screen is still in flight.
    Busy,
    Rejected { message: String },
    Failed { message: String },
    Accepted { message: String },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}
