use serde::{Deserialize, Serialize};
use serde_json::Value;

// `detail` is a list of objects for validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl RejectionBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// The detail text when the service sent a plain string.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(text)) => Some(text.as_str()),
            _ => None,
        }
    }
}
