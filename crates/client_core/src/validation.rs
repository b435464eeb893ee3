use std::collections::BTreeMap;

use shared::domain::{Field, FormKind};

use crate::form::FormState;

pub const PASSWORD_RULE_MESSAGE: &str = "Password must include a mix of a-z, A-Z, 0-9, special characters, and be at least 8 characters long.";
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email format.";
const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<Field, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    fn reject(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }
}

pub fn validate(form: &FormState) -> ValidationResult {
    match form.kind() {
        FormKind::Login => validate_login(form),
        FormKind::Signup => validate_signup(form),
    }
}

pub fn validate_login(form: &FormState) -> ValidationResult {
    let mut result = ValidationResult::default();

    if form.value(Field::Username).trim().is_empty() {
        result.reject(Field::Username, required_message(Field::Username, FormKind::Login));
    }

    let password = form.value(Field::Password);
    if password.trim().is_empty() {
        result.reject(Field::Password, required_message(Field::Password, FormKind::Login));
    } else if !is_strong_password(password) {
        result.reject(Field::Password, PASSWORD_RULE_MESSAGE);
    }

    result
}

pub fn validate_signup(form: &FormState) -> ValidationResult {
    let mut result = ValidationResult::default();

    for field in [Field::Username, Field::Firstname, Field::Lastname, Field::Phone] {
        if form.value(field).trim().is_empty() {
            result.reject(field, required_message(field, FormKind::Signup));
        }
    }

    let email = form.value(Field::Email);
    if email.trim().is_empty() {
        result.reject(Field::Email, required_message(Field::Email, FormKind::Signup));
    } else if !is_well_formed_email(email) {
        result.reject(Field::Email, INVALID_EMAIL_MESSAGE);
    }

    result
}

fn required_message(field: Field, kind: FormKind) -> String {
    format!("{} is required.", field.label(kind))
}

/// At least eight UTF-16 code units on a single line, with a lowercase
/// letter, an uppercase letter, a digit and something that is not an ASCII
/// letter or digit.
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().any(is_line_terminator) {
        return false;
    }

    password.encode_utf16().count() >= PASSWORD_MIN_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

/// `local@domain.tld` shape: one `@`, no whitespace, and a dot inside the
/// domain with something on both sides of it.
pub fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(is_form_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < domain.len())
}

// Unicode White_Space minus NEL, plus the byte order mark.
fn is_form_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
