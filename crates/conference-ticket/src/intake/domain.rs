use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::serial::SerialCode;

/// Identifier attached to every accepted submission; strictly increasing per handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{:06}", self.0)
    }
}

/// A file handed over by the picker or a drop, with the metadata the host declared for it.
///
/// `declared_type` is whatever the host reported (browsers derive it from the extension) and may
/// be empty. The bytes are shared so a pending decode can hold them without copying.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub name: String,
    pub declared_type: String,
    bytes: Arc<[u8]>,
}

impl AvatarFile {
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for AvatarFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarFile")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}

/// Raw text typed into the form, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub github: String,
}

/// GitHub username stored without its leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GithubHandle(String);

impl GithubHandle {
    /// Trims the raw value and strips a single leading `@`. Empty input yields no handle.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let handle = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if handle.is_empty() {
            None
        } else {
            Some(Self(handle.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn display(&self) -> String {
        format!("@{}", self.0)
    }
}

/// The validated applicant assembled at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applicant {
    pub full_name: String,
    pub email: String,
    pub github_handle: Option<GithubHandle>,
    pub avatar: AvatarFile,
}

impl Applicant {
    pub fn serial(&self) -> SerialCode {
        SerialCode::for_applicant(&self.full_name, &self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Avatar,
}

/// Outcome of one field check during a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub field: FormField,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn passed(field: FormField) -> Self {
        Self {
            field,
            valid: true,
            message: None,
        }
    }

    pub fn failed(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Inline messages shown next to the name and email inputs.
///
/// Avatar problems are reported on the upload hint instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Avatar slot of an issued ticket; filled once the decode for that submission completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TicketAvatar {
    Pending,
    Ready { data_uri: String },
}

/// The ticket produced by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub submission: SubmissionId,
    pub display_name: String,
    pub email: String,
    pub github_handle: Option<GithubHandle>,
    pub serial: SerialCode,
    pub avatar: TicketAvatar,
}

impl Ticket {
    pub(crate) fn issue(submission: SubmissionId, applicant: &Applicant) -> Self {
        Self {
            submission,
            display_name: applicant.full_name.clone(),
            email: applicant.email.clone(),
            github_handle: applicant.github_handle.clone(),
            serial: applicant.serial(),
            avatar: TicketAvatar::Pending,
        }
    }

    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }

    pub fn view(&self) -> TicketView {
        TicketView {
            headline_name: self.display_name.clone(),
            headline_email: self.email.clone(),
            headline_email_href: self.mailto(),
            ticket_name: self.display_name.clone(),
            github_badge: self.github_handle.as_ref().map(GithubHandle::display),
            avatar_src: match &self.avatar {
                TicketAvatar::Pending => None,
                TicketAvatar::Ready { data_uri } => Some(data_uri.clone()),
            },
            serial: self.serial.to_string(),
        }
    }
}

/// Flattened fields the renderer writes into the ticket screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketView {
    pub headline_name: String,
    pub headline_email: String,
    pub headline_email_href: String,
    pub ticket_name: String,
    /// `None` hides the badge.
    pub github_badge: Option<String>,
    pub avatar_src: Option<String>,
    pub serial: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_handle_strips_one_leading_at() {
        assert_eq!(
            GithubHandle::parse("  @gracehopper ").map(|h| h.display()),
            Some("@gracehopper".to_string())
        );
        assert_eq!(
            GithubHandle::parse("gracehopper").map(|h| h.display()),
            Some("@gracehopper".to_string())
        );
        assert_eq!(
            GithubHandle::parse("@@double").map(|h| h.as_str().to_string()),
            Some("@double".to_string())
        );
    }

    #[test]
    fn github_handle_is_hidden_when_blank() {
        assert!(GithubHandle::parse("").is_none());
        assert!(GithubHandle::parse("   ").is_none());
        assert!(GithubHandle::parse(" @ ").is_none());
    }

    #[test]
    fn avatar_debug_omits_bytes() {
        let file = AvatarFile::new("me.png", "image/png", vec![0u8; 2048]);
        let rendered = format!("{file:?}");
        assert!(rendered.contains("size_bytes: 2048"));
        assert!(!rendered.contains("bytes: ["));
    }
}
