//! Membership data model.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::domain::avatar::AvatarUrl;

/// Validation errors raised by member value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    /// Identifier was not a valid UUID.
    InvalidId,
    /// Email address failed the syntactic check.
    InvalidEmail,
    /// Phone number did not match the local mobile format.
    InvalidPhoneNumber,
    /// Status or role string was not a known value.
    UnknownVariant,
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "identifier must be a valid UUID"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::InvalidPhoneNumber => {
                write!(f, "phone number must match the local mobile format")
            }
            Self::UnknownVariant => write!(f, "value is not a recognised variant"),
        }
    }
}

impl std::error::Error for MemberValidationError {}

/// Stable user identity reference issued by the identity platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, MemberValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| MemberValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a profile record in the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Validate and construct a [`ProfileId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, MemberValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| MemberValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`ProfileId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Syntactic check only; deliverability is the identity platform's concern.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated, normalised email address.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and lowercased.
/// - Matches a pragmatic `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`], normalising case.
    pub fn new(email: impl AsRef<str>) -> Result<Self, MemberValidationError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if email_regex().is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(MemberValidationError::InvalidEmail)
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // Local mobile numbers: leading zero, second digit 1 or 7, ten digits total.
        let pattern = r"^0[17][0-9]{8}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Validated local mobile phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and construct a [`PhoneNumber`] from string input.
    pub fn new(phone: impl AsRef<str>) -> Result<Self, MemberValidationError> {
        let trimmed = phone.as_ref().trim();
        if phone_regex().is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(MemberValidationError::InvalidPhoneNumber)
        }
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Lifecycle state of a membership application.
///
/// Applications start `Pending` and move to `Approved` or `Rejected` through
/// an administrator review; both outcomes are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProfileStatus {
    /// Wire representation used by the document store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileStatus {
    type Err = MemberValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(MemberValidationError::UnknownVariant),
        }
    }
}

/// Named role held by a user identity.
///
/// `Member` is granted when an application is approved; `Admin` grants are
/// provisioned out-of-band and never issued by this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Wire representation used by the document store.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MemberValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(MemberValidationError::UnknownVariant),
        }
    }
}

/// Membership profile, one per registered user identity.
///
/// ## Invariants
/// - Exactly one profile exists per `user_id` (uniqueness enforced by the
///   document store).
/// - `status` starts `Pending` and is mutated only by an administrator
///   review.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub full_name: String,
    pub phone_number: PhoneNumber,
    pub email: EmailAddress,
    pub avatar_url: Option<AvatarUrl>,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new membership profile.
///
/// The document store assigns the record identifier and creation timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub user_id: UserId,
    pub full_name: String,
    pub phone_number: PhoneNumber,
    pub email: EmailAddress,
    pub avatar_url: Option<AvatarUrl>,
    pub status: ProfileStatus,
}
