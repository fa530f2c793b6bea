//! Outbound HTTP seam for metadata lookups.

use crate::config::MetadataConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::time::timeout;

const USER_AGENT: &str = concat!("library_core/", env!("CARGO_PKG_VERSION"));

/// Raw lookup response: status code plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: u16,
    pub body: String,
}

impl LookupResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport failure. Absorbed by the resolver, never returned to callers.
#[derive(Debug)]
pub enum LookupError {
    /// Client could not be constructed.
    Client(String),
    /// Connect, timeout or body read failure.
    Transport(String),
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(message) => write!(f, "lookup client setup failed: {message}"),
            Self::Transport(message) => write!(f, "lookup request failed: {message}"),
        }
    }
}

impl Error for LookupError {}

/// Issues one GET request and returns the raw response.
pub trait LookupTransport: Send + Sync {
    fn get(&self, url: &str) -> Result<LookupResponse, LookupError>;
}

/// `reqwest` transport with a connect budget and a per-read budget.
///
/// Requests run on a private single-worker runtime so callers stay
/// synchronous. Each body read gets its own `read_timeout`, so a slow but
/// steady response is never cut off by a whole-request deadline.
pub struct HttpLookupTransport {
    runtime: Runtime,
    client: reqwest::Client,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl HttpLookupTransport {
    /// Builds a client from the configured timeouts.
    pub fn new(config: &MetadataConfig) -> Result<Self, LookupError> {
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
        let read_timeout = Duration::from_millis(config.read_timeout_ms);
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| LookupError::Client(err.to_string()))?;
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("metadata-lookup")
            .enable_all()
            .build()
            .map_err(|err| LookupError::Client(err.to_string()))?;
        Ok(Self {
            runtime,
            client,
            connect_timeout,
            read_timeout,
        })
    }

    async fn fetch(&self, url: &str) -> Result<LookupResponse, LookupError> {
        // Status line and headers are the first read after connecting.
        let mut response = timeout(
            self.connect_timeout + self.read_timeout,
            self.client.get(url).send(),
        )
        .await
        .map_err(|_| LookupError::Transport("timed out waiting for response".to_string()))?
        .map_err(|err| LookupError::Transport(err.to_string()))?;
        let status = response.status().as_u16();

        let mut body = Vec::new();
        loop {
            let chunk = timeout(self.read_timeout, response.chunk())
                .await
                .map_err(|_| LookupError::Transport("timed out reading body".to_string()))?
                .map_err(|err| LookupError::Transport(err.to_string()))?;
            match chunk {
                Some(bytes) => body.extend_from_slice(&bytes),
                None => break,
            }
        }

        Ok(LookupResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

impl LookupTransport for HttpLookupTransport {
    fn get(&self, url: &str) -> Result<LookupResponse, LookupError> {
        self.runtime.block_on(self.fetch(url))
    }
}
