//! Contact message types and validation.

use serde::{Deserialize, Serialize};

use crate::error::{CommerceError, CommerceResult};
use crate::ids::MessageId;

/// A stored contact message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: String,
}

/// A message as submitted through the contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl NewContactMessage {
    /// Trim every field and check the required ones.
    ///
    /// Name, email and message are required; the subject may be empty.
    pub fn validated(self) -> CommerceResult<Self> {
        let trimmed = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        };

        for (field, value) in [
            ("name", &trimmed.name),
            ("email", &trimmed.email),
            ("message", &trimmed.message),
        ] {
            if value.is_empty() {
                return Err(CommerceError::InvalidContact(field));
            }
        }

        if !is_plausible_email(&trimmed.email) {
            return Err(CommerceError::InvalidEmail);
        }
        Ok(trimmed)
    }
}

/// Shape check only: `local@domain.tld`, no whitespace, one `@`.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, email: &str, body: &str) -> NewContactMessage {
        NewContactMessage {
            name: name.into(),
            email: email.into(),
            subject: "  Order question ".into(),
            message: body.into(),
        }
    }

    #[test]
    fn test_valid_message_is_trimmed() {
        let msg = message(" Ada ", " ada@example.com ", " Where is my parcel? ")
            .validated()
            .unwrap();
        assert_eq!(msg.name, "Ada");
        assert_eq!(msg.email, "ada@example.com");
        assert_eq!(msg.subject, "Order question");
        assert_eq!(msg.message, "Where is my parcel?");
    }

    #[test]
    fn test_required_fields() {
        assert!(matches!(
            message("", "ada@example.com", "Hi").validated(),
            Err(CommerceError::InvalidContact("name"))
        ));
        assert!(matches!(
            message("Ada", "  ", "Hi").validated(),
            Err(CommerceError::InvalidContact("email"))
        ));
        assert!(matches!(
            message("Ada", "ada@example.com", "").validated(),
            Err(CommerceError::InvalidContact("message"))
        ));
    }

    #[test]
    fn test_subject_is_optional() {
        let mut msg = message("Ada", "ada@example.com", "Hello");
        msg.subject = String::new();
        assert!(msg.validated().is_ok());
    }

    #[test]
    fn test_email_shape() {
        for ok in ["a@b.co", "first.last@shop.example.org"] {
            assert!(is_plausible_email(ok), "{ok}");
        }
        for bad in ["plain", "@example.com", "a@b", "a@b..com", "a@@b.com", "a b@c.com", "a@b.com."] {
            assert!(!is_plausible_email(bad), "{bad}");
        }
    }
}
