//! Avatar upload payloads and stored references.

use std::fmt;

/// Maximum accepted avatar size in bytes (5 MiB, matching the upload form).
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Validation errors raised by [`AvatarUpload::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarValidationError {
    /// File name was missing or blank.
    EmptyFileName,
    /// Payload was empty.
    EmptyPayload,
    /// Payload exceeded [`MAX_AVATAR_BYTES`].
    TooLarge { max: usize },
}

impl fmt::Display for AvatarValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFileName => write!(f, "avatar file name must not be empty"),
            Self::EmptyPayload => write!(f, "avatar payload must not be empty"),
            Self::TooLarge { max } => write!(f, "avatar must be at most {max} bytes"),
        }
    }
}

impl std::error::Error for AvatarValidationError {}

/// In-memory avatar image supplied at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Validate and construct an upload payload.
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AvatarValidationError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(AvatarValidationError::EmptyFileName);
        }
        if bytes.is_empty() {
            return Err(AvatarValidationError::EmptyPayload);
        }
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(AvatarValidationError::TooLarge {
                max: MAX_AVATAR_BYTES,
            });
        }
        Ok(Self { file_name, bytes })
    }

    /// Original file name as supplied by the member.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// File extension of the original name, if any.
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

/// Public URL of a stored avatar object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Wrap a URL returned by the object store.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AvatarUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn accepts_payloads_up_to_the_limit() {
        let upload = AvatarUpload::new("me.png", vec![0_u8; MAX_AVATAR_BYTES]);
        assert!(upload.is_ok());
    }

    #[test]
    fn rejects_oversized_payloads() {
        let err = AvatarUpload::new("me.png", vec![0_u8; MAX_AVATAR_BYTES + 1])
            .expect_err("payload over the limit must fail");
        assert_eq!(
            err,
            AvatarValidationError::TooLarge {
                max: MAX_AVATAR_BYTES
            }
        );
    }

    #[test]
    fn rejects_blank_file_names_and_empty_payloads() {
        assert_eq!(
            AvatarUpload::new("  ", vec![1]),
            Err(AvatarValidationError::EmptyFileName)
        );
        assert_eq!(
            AvatarUpload::new("me.png", Vec::new()),
            Err(AvatarValidationError::EmptyPayload)
        );
    }

    #[test]
    fn extension_comes_from_the_last_dot() {
        let upload = AvatarUpload::new("holiday.photo.jpeg", vec![1]).expect("valid upload");
        assert_eq!(upload.extension(), Some("jpeg"));
        let bare = AvatarUpload::new("avatar", vec![1]).expect("valid upload");
        assert_eq!(bare.extension(), None);
    }
}
