//! Signup Form Validation
//!
//! One schema shared by the browser form and the server handlers. Checks run
//! in a fixed order and only the first violation is reported.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 255;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// First schema violation found in a form
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Offending field (`name` or `email`)
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Raw form input as typed by the visitor
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
}

/// Trimmed, schema-conforming form values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidSignup {
    pub name: String,
    pub email: String,
}

impl SignupForm {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Both fields have non-whitespace content
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }

    /// Apply the schema; returns the first violation
    pub fn validate(&self) -> Result<ValidSignup, ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() {
            return Err(ValidationError::new("name", "Please enter your name"));
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(ValidationError::new(
                "name",
                format!("Name must be at most {NAME_MAX_CHARS} characters"),
            ));
        }
        if !is_valid_email(email) {
            return Err(ValidationError::new("email", "Please enter a valid email address"));
        }
        if email.chars().count() > EMAIL_MAX_CHARS {
            return Err(ValidationError::new(
                "email",
                format!("Email must be at most {EMAIL_MAX_CHARS} characters"),
            ));
        }

        Ok(ValidSignup {
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

/// Email syntax check (no leading dot, no consecutive dots, TLD of 2+ letters)
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}
