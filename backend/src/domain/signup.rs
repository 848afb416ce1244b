//! Sign-in and sign-up form validation.
//!
//! Validation is pure and synchronous: forms are checked field by field and
//! every invalid field is reported, so the caller can redisplay the form
//! with per-field messages. Successful validation returns normalised input
//! (trimmed name, lowercased email) and never consults a collaborator.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::member::{EmailAddress, PhoneNumber};

/// Minimum password length accepted at sign-in and sign-up.
const PASSWORD_MIN: usize = 6;
/// Bounds for the member's full name, in characters.
const FULL_NAME_MIN: usize = 2;
const FULL_NAME_MAX: usize = 100;

/// A single invalid form field and its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field key, matching the wire casing of the request body.
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Form validation failure listing every invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|e| e.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Raw sign-in form input.
#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Validated sign-in credentials.
#[derive(Debug, Clone)]
pub struct SignInCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Normalised email address used for the identity lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password as supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl SignInForm {
    /// Check the form and return validated credentials.
    pub fn validate(self) -> Result<SignInCredentials, ValidationFailure> {
        let mut errors = Vec::new();
        let email = check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);

        match (email, errors.is_empty()) {
            (Some(email), true) => Ok(SignInCredentials {
                email,
                password: Zeroizing::new(self.password),
            }),
            _ => Err(ValidationFailure { errors }),
        }
    }
}

/// Raw sign-up form input.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Validated and normalised sign-up application.
#[derive(Debug, Clone)]
pub struct SignUpApplication {
    full_name: String,
    email: EmailAddress,
    phone_number: PhoneNumber,
    password: Zeroizing<String>,
}

impl SignUpApplication {
    /// Trimmed full name of the applicant.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Validated local mobile number.
    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    /// Password as supplied by the applicant.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl SignUpForm {
    /// Check the form and return a normalised application.
    pub fn validate(self) -> Result<SignUpApplication, ValidationFailure> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        let name_length = full_name.chars().count();
        if name_length < FULL_NAME_MIN {
            errors.push(FieldError::new(
                "fullName",
                format!("name must be at least {FULL_NAME_MIN} characters"),
            ));
        } else if name_length > FULL_NAME_MAX {
            errors.push(FieldError::new(
                "fullName",
                format!("name must be at most {FULL_NAME_MAX} characters"),
            ));
        }

        let email = check_email(&self.email, &mut errors);

        let phone_number = match PhoneNumber::new(&self.phone) {
            Ok(phone) => Some(phone),
            Err(_) => {
                errors.push(FieldError::new(
                    "phone",
                    "invalid phone number (e.g., 0700123456)",
                ));
                None
            }
        };

        check_password(&self.password, &mut errors);

        match (email, phone_number, errors.is_empty()) {
            (Some(email), Some(phone_number), true) => Ok(SignUpApplication {
                full_name: full_name.to_owned(),
                email,
                phone_number,
                password: Zeroizing::new(self.password),
            }),
            _ => Err(ValidationFailure { errors }),
        }
    }
}

fn check_email(raw: &str, errors: &mut Vec<FieldError>) -> Option<EmailAddress> {
    match EmailAddress::new(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(FieldError::new("email", "invalid email address"));
            None
        }
    }
}

fn check_password(raw: &str, errors: &mut Vec<FieldError>) {
    if raw.chars().count() < PASSWORD_MIN {
        errors.push(FieldError::new(
            "password",
            format!("password must be at least {PASSWORD_MIN} characters"),
        ));
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn valid_sign_up() -> SignUpForm {
        SignUpForm {
            full_name: "Doreen Wasera".into(),
            email: "doreen@example.com".into(),
            phone: "0700123456".into(),
            password: "secret-phrase".into(),
        }
    }

    #[test]
    fn valid_sign_up_returns_normalised_application() {
        let mut form = valid_sign_up();
        form.full_name = "  Doreen Wasera  ".into();
        form.email = "Doreen@Example.COM".into();

        let application = form.validate().expect("valid form");
        assert_eq!(application.full_name(), "Doreen Wasera");
        assert_eq!(application.email().as_ref(), "doreen@example.com");
        assert_eq!(application.phone_number().as_ref(), "0700123456");
        assert_eq!(application.password(), "secret-phrase");
    }

    #[rstest]
    #[case::bad_email("email", |f: &mut SignUpForm| f.email = "not-an-address".into())]
    #[case::short_password("password", |f: &mut SignUpForm| f.password = "five5".into())]
    #[case::short_name("fullName", |f: &mut SignUpForm| f.full_name = "A".into())]
    #[case::long_name("fullName", |f: &mut SignUpForm| f.full_name = "x".repeat(101))]
    #[case::wrong_phone_prefix("phone", |f: &mut SignUpForm| f.phone = "0812345678".into())]
    #[case::short_phone("phone", |f: &mut SignUpForm| f.phone = "070012345".into())]
    fn single_bad_field_reports_exactly_that_field(
        #[case] field: &str,
        #[case] corrupt: fn(&mut SignUpForm),
    ) {
        let mut form = valid_sign_up();
        corrupt(&mut form);

        let failure = form.validate().expect_err("invalid form");
        assert_eq!(failure.errors.len(), 1, "one field should fail");
        assert_eq!(failure.errors[0].field, field);
    }

    #[test]
    fn multiple_bad_fields_are_all_reported() {
        let form = SignUpForm {
            full_name: "A".into(),
            email: "nope".into(),
            phone: "12345".into(),
            password: "short".into(),
        };
        let failure = form.validate().expect_err("invalid form");
        let fields: Vec<&str> = failure.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["fullName", "email", "phone", "password"]);
    }

    #[rstest]
    #[case("member@example.com", "secret", true)]
    #[case("member@example.com", "five5", false)]
    #[case("member-example.com", "secret", false)]
    fn sign_in_checks_email_and_password_length(
        #[case] email: &str,
        #[case] password: &str,
        #[case] valid: bool,
    ) {
        let form = SignInForm {
            email: email.into(),
            password: password.into(),
        };
        assert_eq!(form.validate().is_ok(), valid);
    }

    #[test]
    fn password_length_boundary_is_inclusive() {
        let form = SignInForm {
            email: "member@example.com".into(),
            password: "sixsix".into(),
        };
        assert!(form.validate().is_ok());
    }
}
