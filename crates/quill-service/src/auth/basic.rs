//! HTTP Basic credentials for the admin API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quill_core::config::BasicAuthConfig;

use crate::auth::password::verify_password;
use crate::error::{ServiceError, ServiceResult};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// ## Summary
/// Parses an `Authorization` header value of the form `Basic base64(user:pass)`.
///
/// ## Errors
/// Returns `NotAuthenticated` if the scheme is not Basic, the payload is not
/// valid base64/UTF-8, or the colon separator is missing.
pub fn parse_basic_header(header: &str) -> ServiceResult<Credentials> {
    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(ServiceError::NotAuthenticated)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(ServiceError::NotAuthenticated);
    }

    let decoded = STANDARD.decode(encoded.trim()).map_err(|e| {
        tracing::trace!(error = %e, "Basic credentials are not base64");
        ServiceError::NotAuthenticated
    })?;
    let decoded = String::from_utf8(decoded).map_err(|e| {
        tracing::trace!(error = %e, "Basic credentials are not UTF-8");
        ServiceError::NotAuthenticated
    })?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(ServiceError::NotAuthenticated)?;

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// ## Summary
/// Checks a Basic `Authorization` header against the configured admin user
/// and returns the authenticated username.
///
/// ## Errors
/// Returns `NotAuthenticated` for a malformed header, an unknown user or a
/// wrong password, and `InvalidConfiguration` if the stored hash is invalid.
#[tracing::instrument(skip_all)]
pub fn authenticate_basic(config: &BasicAuthConfig, header: &str) -> ServiceResult<String> {
    let credentials = parse_basic_header(header)?;

    if credentials.username != config.username {
        tracing::debug!(username = %credentials.username, "Unknown admin user");
        return Err(ServiceError::NotAuthenticated);
    }

    verify_password(&credentials.password, &config.password_hash)?;

    tracing::debug!(username = %credentials.username, "Admin authenticated");
    Ok(credentials.username)
}
