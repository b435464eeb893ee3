pub mod error;
pub mod form;
pub mod login;
pub mod navigation;
pub mod notification;
pub mod screen;
pub mod session;
pub mod signup;
pub mod transport;
pub mod validation;

pub use error::{FormError, SubmitError, TransportError};
pub use form::FormState;
pub use login::LoginController;
pub use navigation::{AuthContext, Navigator, Route, ScheduledHandoff};
pub use notification::{NotificationPolicy, NotificationState, NotificationSurface};
pub use screen::{ScreenTimings, SubmitOutcome};
pub use session::{MemorySessionStore, SessionStore, SqliteSessionStore};
pub use signup::SignupController;
pub use transport::{AuthService, HttpAuthService, LoginReply, SignupReply};
pub use validation::{validate, ValidationResult};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
