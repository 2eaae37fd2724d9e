use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_REQUEST_TIMEOUT: u64 = 120;

/// Server settings read from `SITESPEC_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Upper bound on a whole request, analysis included.
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr = lookup("SITESPEC_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("SITESPEC_ADDR is not a socket address: {}", addr))?;

        let request_timeout = match lookup("SITESPEC_REQUEST_TIMEOUT") {
            Some(secs) => secs
                .trim()
                .parse()
                .with_context(|| format!("SITESPEC_REQUEST_TIMEOUT is not a number of seconds: {}", secs))?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self { addr, request_timeout: Duration::from_secs(request_timeout) })
    }
}
