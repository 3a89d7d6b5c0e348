use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();
static PHONE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern is a valid regex")
    })
}

fn phone_pattern() -> &'static Regex {
    PHONE_PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is a valid regex"))
}

///Permissive structural check: one `@` and a trailing dot-extension group, not RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

///Exactly 10 ASCII digits, no separators, country code or leading `+`.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_pattern().is_match(phone)
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Email is required.")]
    EmailRequired,
    #[error("Phone number is required.")]
    PhoneRequired,
    #[error("Invalid email format.")]
    InvalidEmail,
    #[error("Phone number must be exactly 10 digits.")]
    InvalidPhone,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ContactForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

///Contact details that passed validation, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    email: String,
    phone: String,
    message: String,
}

impl ContactDetails {
    pub fn get_email(&self) -> &str {
        &self.email
    }
    pub fn get_phone(&self) -> &str {
        &self.phone
    }
    pub fn get_message(&self) -> &str {
        &self.message
    }
}

impl ContactForm {
    pub fn new(email: &str, phone: &str, message: &str) -> Self {
        Self {
            email: email.to_owned(),
            phone: phone.to_owned(),
            message: message.to_owned(),
        }
    }

    /// Collects every violation instead of stopping at the first one.
    ///
    /// Required checks come first (email, phone), followed by format checks
    /// in the same field order. An empty field is only reported as required,
    /// never also as malformed.
    pub fn validate(&self) -> Result<ContactDetails, Vec<FieldError>> {
        let email = self.email.trim();
        let phone = self.phone.trim();

        let mut errors: Vec<FieldError> = Vec::new();
        if email.is_empty() {
            errors.push(FieldError::EmailRequired);
        }
        if phone.is_empty() {
            errors.push(FieldError::PhoneRequired);
        }
        if !email.is_empty() && !is_valid_email(email) {
            errors.push(FieldError::InvalidEmail);
        }
        if !phone.is_empty() && !is_valid_phone(phone) {
            errors.push(FieldError::InvalidPhone);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ContactDetails {
            email: email.to_owned(),
            phone: phone.to_owned(),
            message: self.message.to_owned(),
        })
    }
}
