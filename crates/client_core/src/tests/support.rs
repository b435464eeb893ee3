use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    error::RejectionBody,
    protocol::{LoginRequest, LoginResponse, SignupRequest, SignupResponse},
};
use tokio::sync::mpsc;

use crate::{
    error::TransportError,
    navigation::{AuthContext, Navigator, Route},
    session::SessionStore,
    transport::{AuthService, LoginReply, SignupReply},
};

#[derive(Default)]
pub(crate) struct FakeAuthService {
    login_replies: Mutex<VecDeque<Result<LoginReply, TransportError>>>,
    signup_replies: Mutex<VecDeque<Result<SignupReply, TransportError>>>,
    login_requests: Mutex<Vec<LoginRequest>>,
    signup_requests: Mutex<Vec<SignupRequest>>,
    latency: Duration,
}

impl FakeAuthService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn login_reply(self, reply: Result<LoginReply, TransportError>) -> Self {
        self.login_replies.lock().expect("lock").push_back(reply);
        self
    }

    pub(crate) fn signup_reply(self, reply: Result<SignupReply, TransportError>) -> Self {
        self.signup_replies.lock().expect("lock").push_back(reply);
        self
    }

    pub(crate) fn accepting_login(access_token: &str, user_id: &str) -> Self {
        Self::new().login_reply(Ok(LoginReply::Accepted(LoginResponse {
            access_token: access_token.to_string(),
            user_id: user_id.to_string(),
        })))
    }

    pub(crate) fn rejecting_login(status: u16, detail: &str) -> Self {
        Self::new().login_reply(Ok(LoginReply::Rejected {
            status,
            body: RejectionBody::new(detail),
        }))
    }

    pub(crate) fn accepting_signup(message: Option<&str>) -> Self {
        Self::new().signup_reply(Ok(SignupReply::Accepted(SignupResponse {
            message: message.map(str::to_string),
        })))
    }

    pub(crate) fn login_requests(&self) -> Vec<LoginRequest> {
        self.login_requests.lock().expect("lock").clone()
    }

    pub(crate) fn signup_requests(&self) -> Vec<SignupRequest> {
        self.signup_requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl AuthService for FakeAuthService {
    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, TransportError> {
        self.login_requests.lock().expect("lock").push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut replies = self.login_replies.lock().expect("lock");
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or_else(|| Err(TransportError::Unreachable("no scripted reply".into())))
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<SignupReply, TransportError> {
        self.signup_requests.lock().expect("lock").push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let mut replies = self.signup_replies.lock().expect("lock");
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or_else(|| Err(TransportError::Unreachable("no scripted reply".into())))
    }
}

pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
    tx: mpsc::UnboundedSender<Route>,
}

impl RecordingNavigator {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                routes: Mutex::new(Vec::new()),
                tx,
            }),
            rx,
        )
    }

    pub(crate) fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().expect("lock").push(route.clone());
        let _ = self.tx.send(route);
    }
}

#[derive(Default)]
pub(crate) struct RecordingAuthContext {
    users: Mutex<Vec<String>>,
}

impl RecordingAuthContext {
    pub(crate) fn users(&self) -> Vec<String> {
        self.users.lock().expect("lock").clone()
    }
}

impl AuthContext for RecordingAuthContext {
    fn establish(&self, username: &str) {
        self.users.lock().expect("lock").push(username.to_string());
    }
}

pub(crate) struct FailingSessionStore;

#[async_trait]
impl SessionStore for FailingSessionStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("quota exceeded while writing {key}"))
    }
}
