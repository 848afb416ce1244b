//! Reqwest-backed adapter for the external backend platform.
//!
//! The platform exposes three HTTP surfaces this service consumes: an
//! identity API (`auth/v1`), a PostgREST-style document store (`rest/v1`)
//! over the `profiles`, `contributions`, and `user_roles` collections, and
//! object storage (`storage/v1`) holding the `avatars` bucket. These
//! adapters own transport details only: request shaping, status mapping,
//! and row decoding into domain types.

mod client;
mod documents;
mod dto;
mod identity;
mod storage;

pub use client::PlatformClient;
pub use documents::{
    PlatformContributionRepository, PlatformProfileRepository, PlatformRoleRepository,
};
pub use identity::PlatformIdentityProvider;
pub use storage::PlatformAvatarStore;
