use super::*;
use crate::validation::validate_login;

#[test]
fn new_form_has_empty_slot_for_every_field() {
    let form = FormState::signup();
    let fields: Vec<_> = form.fields().collect();
    assert_eq!(fields.len(), 5);
    assert!(fields.iter().all(|(_, value, error)| value.is_empty() && error.is_none()));
}

#[test]
fn editing_clears_that_fields_error_only() {
    let mut form = FormState::login();
    form.apply_validation(&validate_login(&form));
    assert!(form.error(Field::Username).is_some());
    assert!(form.error(Field::Password).is_some());

    form.set_value(Field::Username, "a").expect("set");
    assert_eq!(form.error(Field::Username), None);
    assert_eq!(form.error(Field::Password), Some("Password is required."));
}

#[test]
fn clearing_happens_even_when_new_value_is_still_invalid() {
    let mut form = FormState::login();
    form.apply_validation(&validate_login(&form));
    form.set_value(Field::Username, "   ").expect("set");
    assert_eq!(form.error(Field::Username), None);
}

#[test]
fn fields_outside_the_form_are_rejected() {
    let mut form = FormState::login();
    let err = form.set_value(Field::Email, "x@y.z").expect_err("not a login field");
    assert!(matches!(
        err,
        FormError::NotInForm {
            field: Field::Email,
            kind: FormKind::Login
        }
    ));
    assert!(matches!(
        form.set_value_by_name("nickname", "x"),
        Err(FormError::UnknownField(_))
    ));
    assert_eq!(form.value(Field::Email), "");
}

#[test]
fn apply_validation_replaces_previous_errors() {
    let mut form = FormState::login();
    form.apply_validation(&validate_login(&form));
    assert!(form.has_errors());

    form.set_value(Field::Username, "alice").expect("set");
    form.set_value(Field::Password, "Valid1Pass!").expect("set");
    form.apply_validation(&validate_login(&form));
    assert!(!form.has_errors());
}

#[test]
fn requests_carry_raw_values() {
    let mut form = FormState::login();
    form.set_value(Field::Username, " alice ").expect("set");
    form.set_value(Field::Password, "Valid1Pass!").expect("set");
    let request = form.login_request();
    assert_eq!(request.username, " alice ");
    assert_eq!(request.password, "Valid1Pass!");

    let mut form = FormState::signup();
    form.set_value(Field::Email, "user@example.com").expect("set");
    assert_eq!(form.signup_request().email, "user@example.com");
}
