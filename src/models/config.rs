//! Configuration model loaded from external sources.

use serde::Deserialize;

/// Basic configuration shared across handlers.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Signs cookies and verifies identity tokens; at least 64 bytes.
    pub secret: String,
    pub auth_service_url: String,
}

impl ServerConfig {
    /// Sign-in page of the external auth service.
    pub fn signin_url(&self) -> String {
        format!("{}/auth/signin", self.auth_service_url.trim_end_matches('/'))
    }
}
