use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use client_core::{
    notification::{NotificationPolicy, LOGIN_AUTO_HIDE},
    screen::{LOGIN_HANDOFF_DELAY, SIGNUP_HANDOFF_DELAY},
    transport::{normalize_base_url, DEFAULT_AUTH_BASE_URL},
    ScreenTimings,
};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "auth-client.toml";
const DEFAULT_SESSION_DATABASE_URL: &str = "sqlite://./data/session.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub session_database_url: String,
    pub login_handoff_delay: Duration,
    pub signup_handoff_delay: Duration,
    pub login_auto_hide: Option<Duration>,
    pub signup_auto_hide: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_AUTH_BASE_URL.into(),
            session_database_url: DEFAULT_SESSION_DATABASE_URL.into(),
            login_handoff_delay: LOGIN_HANDOFF_DELAY,
            signup_handoff_delay: SIGNUP_HANDOFF_DELAY,
            login_auto_hide: Some(LOGIN_AUTO_HIDE),
            signup_auto_hide: None,
        }
    }
}

impl Settings {
    pub fn timings(&self) -> ScreenTimings {
        ScreenTimings {
            login_handoff_delay: self.login_handoff_delay,
            signup_handoff_delay: self.signup_handoff_delay,
        }
    }

    pub fn login_policy(&self) -> NotificationPolicy {
        NotificationPolicy {
            auto_hide: self.login_auto_hide,
        }
    }

    pub fn signup_policy(&self) -> NotificationPolicy {
        NotificationPolicy {
            auto_hide: self.signup_auto_hide,
        }
    }

    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.api_base_url)
            .with_context(|| format!("api_base_url '{}' is not usable", self.api_base_url))?;
        if self.session_database_url.trim().is_empty() {
            anyhow::bail!("session_database_url must not be empty");
        }
        Ok(())
    }
}

/// Keys accepted in the TOML file. Durations are milliseconds; an auto-hide
/// of `0` disables auto-hide.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    session_database_url: Option<String>,
    login_handoff_delay_ms: Option<u64>,
    signup_handoff_delay_ms: Option<u64>,
    login_auto_hide_ms: Option<u64>,
    signup_auto_hide_ms: Option<u64>,
}

pub fn load_settings(path: &Path) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.session_database_url {
        settings.session_database_url = v;
    }
    if let Some(v) = file_cfg.login_handoff_delay_ms {
        settings.login_handoff_delay = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.signup_handoff_delay_ms {
        settings.signup_handoff_delay = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.login_auto_hide_ms {
        settings.login_auto_hide = auto_hide_from_ms(v);
    }
    if let Some(v) = file_cfg.signup_auto_hide_ms {
        settings.signup_auto_hide = auto_hide_from_ms(v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(v) = lookup("AUTH_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__SESSION_DATABASE_URL") {
        settings.session_database_url = v;
    }

    if let Some(v) = lookup("APP__LOGIN_HANDOFF_DELAY_MS") {
        settings.login_handoff_delay = Duration::from_millis(parse_ms("APP__LOGIN_HANDOFF_DELAY_MS", &v)?);
    }
    if let Some(v) = lookup("APP__SIGNUP_HANDOFF_DELAY_MS") {
        settings.signup_handoff_delay = Duration::from_millis(parse_ms("APP__SIGNUP_HANDOFF_DELAY_MS", &v)?);
    }
    if let Some(v) = lookup("APP__LOGIN_AUTO_HIDE_MS") {
        settings.login_auto_hide = auto_hide_from_ms(parse_ms("APP__LOGIN_AUTO_HIDE_MS", &v)?);
    }
    if let Some(v) = lookup("APP__SIGNUP_AUTO_HIDE_MS") {
        settings.signup_auto_hide = auto_hide_from_ms(parse_ms("APP__SIGNUP_AUTO_HIDE_MS", &v)?);
    }

    Ok(())
}

fn parse_ms(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("{key} must be a whole number of milliseconds, got '{raw}'"))
}

fn auto_hide_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
