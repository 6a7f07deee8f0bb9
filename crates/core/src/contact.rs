//! Contact-form submission rules.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

/// Message forwarded to the support mailbox.
pub const CONTACT_TYPE_EMAIL: &str = "email";
/// Message kept for staff to read in the application.
pub const CONTACT_TYPE_INTERNAL: &str = "internal";

pub const VALID_CONTACT_TYPES: &[&str] = &[CONTACT_TYPE_EMAIL, CONTACT_TYPE_INTERNAL];

/// Mailbox that receives `email`-type contact messages.
pub const SUPPORT_MAILBOX: &str = "support@airwatch.com";

/// A public contact-form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactSubmission {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl ContactSubmission {
    /// Trim every field, then check that each is present and well-formed.
    /// The returned submission is what gets stored.
    pub fn checked(self) -> Result<Self, CoreError> {
        let submission = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            kind: self.kind.trim().to_string(),
        };
        submission.check()?;
        Ok(submission)
    }

    fn check(&self) -> Result<(), CoreError> {
        let fields = [&self.name, &self.email, &self.message, &self.kind];
        if fields.iter().any(|f| f.is_empty()) {
            return Err(CoreError::Validation("All fields are required".into()));
        }
        self.validate()?;
        if !VALID_CONTACT_TYPES.contains(&self.kind.as_str()) {
            return Err(CoreError::Validation(format!(
                "Unknown contact type: '{}'. Valid types: {}",
                self.kind,
                VALID_CONTACT_TYPES.join(", ")
            )));
        }
        Ok(())
    }

    /// Whether the message should also be relayed to [`SUPPORT_MAILBOX`].
    pub fn forwards_to_support(&self) -> bool {
        self.kind == CONTACT_TYPE_EMAIL
    }
}
