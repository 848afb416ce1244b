//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use crate::outbound::platform::PlatformClient;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) platform: Option<PlatformClient>,
    pub(crate) email_redirect: Option<String>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            platform: None,
            email_redirect: None,
        }
    }

    /// Attach a platform client for the outbound adapters.
    ///
    /// When absent, the server falls back to the in-memory adapter, which
    /// keeps local development and tests free of external dependencies.
    #[must_use]
    pub fn with_platform(mut self, platform: PlatformClient) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Address that identity verification emails link back to.
    #[must_use]
    pub fn with_email_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.email_redirect = Some(redirect.into());
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
