//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, ProfileId, ProfileStatus, UserId, ValidationFailure};

/// Map a form validation failure to an invalid-request error listing every
/// failing field, so the client can redisplay the form with messages.
pub(crate) fn validation_error(failure: ValidationFailure) -> Error {
    let fields: Vec<_> = failure
        .errors
        .iter()
        .map(|field_error| {
            json!({
                "field": field_error.field,
                "message": field_error.message,
            })
        })
        .collect();
    Error::invalid_request("validation failed").with_details(json!({ "fields": fields }))
}

pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| {
        Error::invalid_request("userId must be a valid UUID")
            .with_details(json!({ "field": "userId", "value": value }))
    })
}

pub(crate) fn parse_profile_id(value: &str) -> Result<ProfileId, Error> {
    ProfileId::new(value).map_err(|_| {
        Error::invalid_request("profileId must be a valid UUID")
            .with_details(json!({ "field": "profileId", "value": value }))
    })
}

/// Parse the admin list filter: a concrete status, or `all`/absent for no
/// filter.
pub(crate) fn parse_status_filter(value: Option<&str>) -> Result<Option<ProfileStatus>, Error> {
    match value {
        None | Some("all") => Ok(None),
        Some(raw) => raw.parse::<ProfileStatus>().map(Some).map_err(|_| {
            Error::invalid_request("status must be pending, approved, rejected, or all")
                .with_details(json!({ "field": "status", "value": raw }))
        }),
    }
}
