use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    auth::dto::{LoginRequest, RegisterRequest},
    error::FieldError,
    users::model::Role,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Collects every violation, not just the first.
pub(crate) fn validate_register(payload: &RegisterRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if payload.name.trim().is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
    if payload.password.len() < 6 {
        errors.push(FieldError::new("password", "Password min 6"));
    }
    if Role::parse(&payload.role).is_none() {
        errors.push(FieldError::new("role", "Invalid role"));
    }
    errors
}

pub(crate) fn validate_login(payload: &LoginRequest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(&payload.email) {
        errors.push(FieldError::new("email", "Valid email is required"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        let payload = register("Alice", "alice@x.com", "secret1", "member");
        assert!(validate_register(&payload).is_empty());
    }

    #[test]
    fn collects_all_violations_at_once() {
        let payload = register("", "not-an-email", "ab", "gardener");
        let errors = validate_register(&payload);
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "email", "password", "role"]);
    }

    #[test]
    fn email_regex_rejects_obvious_garbage() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn login_requires_email_shape_and_password() {
        let payload = LoginRequest {
            email: "nope".into(),
            password: "".into(),
        };
        assert_eq!(validate_login(&payload).len(), 2);

        let ok = LoginRequest {
            email: "alice@x.com".into(),
            password: "pw".into(),
        };
        assert!(validate_login(&ok).is_empty());
    }
}
