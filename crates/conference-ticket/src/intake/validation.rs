use std::sync::OnceLock;

use mime::Mime;
use regex::Regex;

use super::domain::{AvatarFile, FormField, FormInput, ValidationResult};

pub const DEFAULT_MAX_AVATAR_BYTES: u64 = 500 * 1024;

pub const NAME_REQUIRED: &str = "Full name is required.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Email format is invalid.";
pub const AVATAR_REQUIRED: &str = "Avatar image is required.";
pub const AVATAR_UNSUPPORTED_TYPE: &str = "Only JPG or PNG images are allowed.";

const ACCEPTED_TYPES: [Mime; 2] = [mime::IMAGE_JPEG, mime::IMAGE_PNG];

/// Why an avatar was refused. Variants are listed in reporting priority.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvatarRejection {
    #[error("no avatar file provided")]
    Missing,
    #[error("unsupported avatar type '{declared}'")]
    UnsupportedType { declared: String },
    #[error("avatar is {size_bytes} bytes, limit is {max_bytes}")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

/// Size limit and messaging for avatar uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarPolicy {
    max_bytes: u64,
}

impl AvatarPolicy {
    /// Zero is not a usable limit and falls back to the default.
    pub fn new(max_bytes: u64) -> Self {
        let max_bytes = if max_bytes == 0 {
            DEFAULT_MAX_AVATAR_BYTES
        } else {
            max_bytes
        };
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Missing beats type beats size; only the first failure is reported.
    pub fn check(&self, file: Option<&AvatarFile>) -> Result<(), AvatarRejection> {
        let file = file.ok_or(AvatarRejection::Missing)?;

        if !ACCEPTED_TYPES
            .iter()
            .any(|accepted| accepted.as_ref() == file.declared_type)
        {
            return Err(AvatarRejection::UnsupportedType {
                declared: file.declared_type.clone(),
            });
        }

        let size_bytes = file.size_bytes();
        if size_bytes > self.max_bytes {
            return Err(AvatarRejection::TooLarge {
                size_bytes,
                max_bytes: self.max_bytes,
            });
        }

        Ok(())
    }

    pub fn message(&self, rejection: &AvatarRejection) -> String {
        match rejection {
            AvatarRejection::Missing => AVATAR_REQUIRED.to_string(),
            AvatarRejection::UnsupportedType { .. } => AVATAR_UNSUPPORTED_TYPE.to_string(),
            AvatarRejection::TooLarge { .. } => format!(
                "File too large. Please upload a photo under {}.",
                self.limit_label()
            ),
        }
    }

    /// Instruction shown on the upload hint when nothing is wrong.
    pub fn default_hint(&self) -> String {
        format!(
            "Upload your photo (JPG or PNG, max size: {}).",
            self.limit_label()
        )
    }

    fn limit_label(&self) -> String {
        format!("{}KB", self.max_bytes / 1024)
    }
}

impl Default for AvatarPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AVATAR_BYTES)
    }
}

pub fn validate_name(raw: &str) -> bool {
    !raw.trim().is_empty()
}

/// Structural check only: `local@domain.tld` with no whitespace and a single `@`.
pub fn validate_email(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && email_pattern().is_match(trimmed)
}

pub fn validate_avatar(file: Option<&AvatarFile>) -> Result<(), AvatarRejection> {
    AvatarPolicy::default().check(file)
}

/// Validate the two text fields. Each is checked regardless of the other.
pub(crate) fn validate_text_fields(input: &FormInput) -> [ValidationResult; 2] {
    let name = if validate_name(&input.full_name) {
        ValidationResult::passed(FormField::Name)
    } else {
        ValidationResult::failed(FormField::Name, NAME_REQUIRED)
    };

    let email = if input.email.trim().is_empty() {
        ValidationResult::failed(FormField::Email, EMAIL_REQUIRED)
    } else if !validate_email(&input.email) {
        ValidationResult::failed(FormField::Email, EMAIL_INVALID)
    } else {
        ValidationResult::passed(FormField::Email)
    };

    [name, email]
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}
