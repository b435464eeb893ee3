use std::collections::BTreeMap;

use shared::{
    domain::{Field, FormKind},
    protocol::{LoginRequest, SignupRequest},
};

use crate::{error::FormError, validation::ValidationResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    kind: FormKind,
    values: BTreeMap<Field, String>,
    errors: BTreeMap<Field, Option<String>>,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        let fields = kind.fields();
        Self {
            kind,
            values: fields.iter().map(|f| (*f, String::new())).collect(),
            errors: fields.iter().map(|f| (*f, None)).collect(),
        }
    }

    pub fn login() -> Self {
        Self::new(FormKind::Login)
    }

    pub fn signup() -> Self {
        Self::new(FormKind::Signup)
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).and_then(|e| e.as_deref())
    }

    pub fn has_errors(&self) -> bool {
        self.errors.values().any(Option::is_some)
    }

    pub fn fields(&self) -> impl Iterator<Item = (Field, &str, Option<&str>)> + '_ {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str(), self.error(*field)))
    }

    /// Records a keystroke. The field's error is cleared right away; errors
    /// only come back on the next explicit validation.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) -> Result<(), FormError> {
        let Some(slot) = self.values.get_mut(&field) else {
            return Err(FormError::NotInForm {
                field,
                kind: self.kind,
            });
        };
        *slot = value.into();
        self.errors.insert(field, None);
        Ok(())
    }

    pub fn set_value_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = name.parse::<Field>()?;
        self.set_value(field, value)
    }

    pub fn apply_validation(&mut self, result: &ValidationResult) {
        for (field, slot) in self.errors.iter_mut() {
            *slot = result.error(*field).map(str::to_string);
        }
    }

    pub fn login_request(&self) -> LoginRequest {
        LoginRequest {
            username: self.value(Field::Username).to_string(),
            password: self.value(Field::Password).to_string(),
        }
    }

    pub fn signup_request(&self) -> SignupRequest {
        SignupRequest {
            firstname: self.value(Field::Firstname).to_string(),
            lastname: self.value(Field::Lastname).to_string(),
            username: self.value(Field::Username).to_string(),
            email: self.value(Field::Email).to_string(),
            phone: self.value(Field::Phone).to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
