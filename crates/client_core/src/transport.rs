use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    error::RejectionBody,
    protocol::{LoginRequest, LoginResponse, SignupRequest, SignupResponse, LOGIN_PATH, SIGN_UP_PATH},
};
use tracing::{debug, info};
use url::Url;

use crate::error::TransportError;

pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginReply {
    Accepted(LoginResponse),
    Rejected { status: u16, body: RejectionBody },
}

/// Signup failures carry no body; the service's explanation is never shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupReply {
    Accepted(SignupResponse),
    Rejected { status: u16 },
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, TransportError>;
    async fn sign_up(&self, request: &SignupRequest) -> Result<SignupReply, TransportError>;
}

pub struct HttpAuthService {
    http: Client,
    base_url: Url,
}

impl HttpAuthService {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|err| TransportError::InvalidUrl(format!("{}{path}: {err}", self.base_url)))
    }
}

/// Parses `raw` and makes sure it ends with `/` so relative joins append
/// instead of replacing the last segment.
pub fn normalize_base_url(raw: &str) -> Result<Url, TransportError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|err| TransportError::InvalidUrl(format!("{trimmed}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::InvalidUrl(format!(
            "{trimmed}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, request: &LoginRequest) -> Result<LoginReply, TransportError> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!(%url, "posting login request");
        let res = self.http.post(url).json(request).send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;

        if !status.is_success() {
            info!(status = status.as_u16(), "login rejected by auth service");
            let body: RejectionBody = serde_json::from_slice(&bytes)?;
            return Ok(LoginReply::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(LoginReply::Accepted(serde_json::from_slice(&bytes)?))
    }

    async fn sign_up(&self, request: &SignupRequest) -> Result<SignupReply, TransportError> {
        let url = self.endpoint(SIGN_UP_PATH)?;
        debug!(%url, "posting sign-up request");
        let res = self.http.post(url).json(request).send().await?;
        let status: StatusCode = res.status();

        if !status.is_success() {
            info!(status = status.as_u16(), "sign-up rejected by auth service");
            return Ok(SignupReply::Rejected {
                status: status.as_u16(),
            });
        }

        let bytes = res.bytes().await?;
        Ok(SignupReply::Accepted(serde_json::from_slice(&bytes)?))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
