//! Request payloads and the records they become.

use email_address::{EmailAddress, Options};
use serde::Deserialize;
use serde_json::Value;

use crate::config::DEFAULT_CONTACT_SOURCE;
use crate::error::FieldError;
use crate::store::Document;

/// Payloads that carry rules beyond what their types express.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// A contact form submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Where the submission came from. Absent means [`DEFAULT_CONTACT_SOURCE`];
    /// an explicit `null` is kept.
    #[serde(default = "ContactMessage::default_source")]
    pub source: Option<String>,
}

impl ContactMessage {
    fn default_source() -> Option<String> {
        Some(DEFAULT_CONTACT_SOURCE.to_string())
    }

    /// Flatten into the record written to the contact collection.
    pub fn into_record(self) -> Document {
        let mut record = Document::new();
        record.insert("name".into(), Value::String(self.name));
        record.insert("email".into(), Value::String(self.email));
        record.insert("message".into(), Value::String(self.message));
        record.insert(
            "source".into(),
            self.source.map_or(Value::Null, Value::String),
        );
        record
    }
}

impl Validate for ContactMessage {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::new(
                "name",
                "string_too_short",
                "String should have at least 1 character",
            ));
        }
        if !is_plain_email(&self.email) {
            errors.push(FieldError::new(
                "email",
                "value_error",
                "value is not a valid email address",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A bare `local@domain.tld` address: no display name, no domain literal, and
/// a domain with at least one dot.
fn is_plain_email(raw: &str) -> bool {
    let options = Options::default()
        .without_display_text()
        .without_domain_literal()
        .with_required_tld();
    EmailAddress::parse_with_options(raw, options).is_ok()
}

/// Fixed record written by the connectivity probe.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatRecord;

impl HeartbeatRecord {
    pub fn into_record(self) -> Document {
        let mut record = Document::new();
        record.insert("ok".into(), Value::Bool(true));
        record
    }
}
