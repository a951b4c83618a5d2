use anyhow::Result;
use std::net::SocketAddr;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Where the browser is sent after a successful login
    pub login_redirect_url: String,

    /// Where the browser is sent after a failed login
    pub login_redirect_url_failure: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let login_redirect_url =
            std::env::var("LOGIN_REDIRECT_URL").unwrap_or_else(|_| "/".to_string());

        let login_redirect_url_failure =
            std::env::var("LOGIN_REDIRECT_URL_FAILURE").unwrap_or_else(|_| "/".to_string());

        Ok(ServerConfig {
            bind_address,
            login_redirect_url,
            login_redirect_url_failure,
        })
    }
}
