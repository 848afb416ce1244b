//! Domain primitives, workflow services, and ports.
//!
//! Purpose: define strongly typed entities for the membership and
//! contribution workflows and keep them free of HTTP or wire concerns.
//! Invariants and serialisation contracts are documented on each type.
//!
//! Public surface:
//! - Error / ErrorCode - transport-agnostic error payload.
//! - Profile, ProfileStatus, Role - membership aggregate.
//! - Contribution, ContributionStatus, PaymentMethod - contribution records.
//! - SignInForm / SignUpForm - pure form validation.
//! - MembershipService / ContributionService - driving-port implementations.

pub mod avatar;
pub mod contribution;
pub mod contribution_service;
pub mod error;
pub mod member;
pub mod membership_service;
pub mod ports;
pub mod signup;

pub use self::avatar::{AvatarUpload, AvatarUrl, AvatarValidationError, MAX_AVATAR_BYTES};
pub use self::contribution::{
    Contribution, ContributionStatus, MINIMUM_CONTRIBUTION, NewContribution, PaymentMethod,
    total_completed,
};
pub use self::contribution_service::ContributionService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::member::{
    EmailAddress, MemberValidationError, NewProfile, PhoneNumber, Profile, ProfileId,
    ProfileStatus, Role, UserId,
};
pub use self::membership_service::MembershipService;
pub use self::signup::{
    FieldError, SignInCredentials, SignInForm, SignUpApplication, SignUpForm, ValidationFailure,
};

/// Convenient result alias for workflow operations.
pub type ApiResult<T> = Result<T, Error>;
