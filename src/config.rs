//! Configuration options for the Ouvidoria client

use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Storage key under which the session is persisted by default
pub const DEFAULT_SESSION_KEY: &str = "@ouvidoria_movel:session";

/// Default staleness window for cached queries (1 minute)
pub const DEFAULT_STALE_TIME_SECS: u64 = 60;

/// Default number of retries for a failed query
pub const DEFAULT_QUERY_RETRY: u32 = 1;

/// Default max number of cached query results
pub const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Configuration options for the Ouvidoria client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout, `None` keeps the transport defaults
    pub request_timeout: Option<Duration>,

    /// The key the session is persisted under
    pub session_key: String,

    /// How long a cached query result stays fresh
    pub stale_time: Duration,

    /// How many times a failed query is retried
    pub retry: u32,

    /// Max number of cached query results
    pub cache_capacity: u64,

    /// The User-Agent sent with every request
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: None,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            stale_time: Duration::from_secs(DEFAULT_STALE_TIME_SECS),
            retry: DEFAULT_QUERY_RETRY,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            user_agent: concat!("ouvidoria-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientOptions {
    /// Build options from `OUVIDORIA_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, Error> {
        let mut options = Self::default();

        if let Some(secs) = env_parse::<u64>("OUVIDORIA_REQUEST_TIMEOUT_SECS")? {
            options.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Ok(key) = std::env::var("OUVIDORIA_SESSION_KEY") {
            options.session_key = key;
        }
        if let Some(secs) = env_parse::<u64>("OUVIDORIA_STALE_TIME_SECS")? {
            options.stale_time = Duration::from_secs(secs);
        }
        if let Some(retry) = env_parse::<u32>("OUVIDORIA_QUERY_RETRY")? {
            options.retry = retry;
        }
        if let Some(capacity) = env_parse::<u64>("OUVIDORIA_CACHE_CAPACITY")? {
            options.cache_capacity = capacity;
        }

        Ok(options)
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the session storage key
    pub fn with_session_key(mut self, value: &str) -> Self {
        self.session_key = value.to_string();
        self
    }

    /// Set the staleness window for cached queries
    pub fn with_stale_time(mut self, value: Duration) -> Self {
        self.stale_time = value;
        self
    }

    /// Set the number of retries for failed queries
    pub fn with_retry(mut self, value: u32) -> Self {
        self.retry = value;
        self
    }

    /// Set the max number of cached query results
    pub fn with_cache_capacity(mut self, value: u64) -> Self {
        self.cache_capacity = value;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, value: &str) -> Self {
        self.user_agent = value.to_string();
        self
    }
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, Error> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(None),
    }
}
