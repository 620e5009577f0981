use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::RegisterRequest;
use crate::error::AuthError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\d{10}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// At least 8 characters containing a letter, a digit and one of `!@#$%^&*`.
pub(crate) fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

/// Checks registration input, failing on the first violated rule.
pub(crate) fn validate_registration(payload: &RegisterRequest) -> Result<(), AuthError> {
    if payload.name.is_empty() {
        return Err(AuthError::Validation {
            field: "name",
            reason: "Name is required",
        });
    }
    if payload.email.is_empty() {
        return Err(AuthError::Validation {
            field: "email",
            reason: "Email is required",
        });
    }
    if payload.password.is_empty() {
        return Err(AuthError::Validation {
            field: "password",
            reason: "Password is required",
        });
    }
    if payload.phone.is_empty() {
        return Err(AuthError::Validation {
            field: "phone",
            reason: "Phone is required",
        });
    }
    if !is_valid_email(&payload.email) {
        return Err(AuthError::Validation {
            field: "email",
            reason: "Invalid email format",
        });
    }
    if !is_valid_phone(&payload.phone) {
        return Err(AuthError::Validation {
            field: "phone",
            reason: "Phone number must be 10 digits",
        });
    }
    if !is_valid_password(&payload.password) {
        return Err(AuthError::Validation {
            field: "password",
            reason: "Password must be 8+ characters, include a number and special character",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("no-domain@"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("no-tld@host"));
    }

    #[test]
    fn phone_must_be_exactly_ten_digits() {
        assert!(is_valid_phone("1234567890"));
        assert!(!is_valid_phone("123456789"));
        assert!(!is_valid_phone("12345678901"));
        assert!(!is_valid_phone("12345678ab"));
        assert!(!is_valid_phone("123-456-78"));
    }

    #[test]
    fn password_policy_requires_length_letter_digit_symbol() {
        assert!(is_valid_password("Aa1!aaaa"));
        assert!(is_valid_password("s0mething@long"));
        assert!(!is_valid_password("Aa1!aaa")); // 7 chars
        assert!(!is_valid_password("aaaaaaa1")); // no symbol
        assert!(!is_valid_password("aaaaaaa!")); // no digit
        assert!(!is_valid_password("12345678!")); // no letter
    }

    #[test]
    fn registration_fails_fast_on_first_violation() {
        let payload = RegisterRequest {
            name: String::new(),
            email: "broken".into(),
            password: "short".into(),
            phone: "1".into(),
        };
        match validate_registration(&payload) {
            Err(AuthError::Validation { field, .. }) => assert_eq!(field, "name"),
            other => panic!("expected name violation, got {other:?}"),
        }
    }

    #[test]
    fn registration_accepts_valid_input() {
        let payload = RegisterRequest {
            name: "A".into(),
            email: "a@x.com".into(),
            password: "Aa1!aaaa".into(),
            phone: "1234567890".into(),
        };
        assert!(validate_registration(&payload).is_ok());
    }
}
