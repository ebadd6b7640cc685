//! HTTP client abstraction for making requests to the Ouvidoria API

use std::sync::{Arc, RwLock};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientOptions;
use crate::error::Error;

/// Name of the header carrying the session token
pub const TOKEN_HEADER: &str = "token";

/// Hook invoked for every response that reports an invalid session
///
/// The default implementation only logs. Install a custom one with
/// [`ApiClient::with_interceptor`] to react to expired tokens.
pub trait ResponseInterceptor: Send + Sync {
    /// Called with the status (401 or 403) and the request path
    fn on_auth_failure(&self, status: StatusCode, path: &str);
}

/// Interceptor that logs authentication failures and does nothing else
#[derive(Debug, Default)]
pub struct LoggingInterceptor;

impl ResponseInterceptor for LoggingInterceptor {
    fn on_auth_failure(&self, status: StatusCode, path: &str) {
        warn!(status = status.as_u16(), path, "API rejected the session");
    }
}

/// Shared handle to the Ouvidoria API
///
/// Cloning is cheap and every clone sees the same session token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
    interceptor: Arc<dyn ResponseInterceptor>,
}

impl ApiClient {
    /// Create a new ApiClient for the given base URL
    pub fn new(base_url: &str, options: &ClientOptions) -> Result<Self, Error> {
        Self::with_interceptor(base_url, options, Arc::new(LoggingInterceptor))
    }

    /// Create a new ApiClient with a custom response interceptor
    pub fn with_interceptor(
        base_url: &str,
        options: &ClientOptions,
        interceptor: Arc<dyn ResponseInterceptor>,
    ) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(options.user_agent.clone());
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url,
                token: RwLock::new(None),
                interceptor,
            }),
        })
    }

    /// The normalized base URL
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an API path against the base URL
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// The token currently attached to outgoing requests
    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Attach (or with `None`, stop attaching) a session token to outgoing requests
    pub fn set_token(&self, token: Option<String>) {
        let mut current = self
            .inner
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = token;
    }

    /// Stop attaching a session token
    pub fn clear_token(&self) {
        self.set_token(None);
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::POST)
    }

    /// Create a PUT request
    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::DELETE)
    }

    fn notify_auth_failure(&self, path: &str, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.inner.interceptor.on_auth_failure(status, path);
        }
    }

    async fn intercept(&self, path: &str, response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        self.notify_auth_failure(path, status);

        let text = response.text().await?;
        debug!(status = status.as_u16(), path, "request failed");
        Err(Error::from_response(status.as_u16(), &text))
    }
}

/// Helper for building and executing a single API request
pub struct FetchBuilder<'a> {
    api: &'a ApiClient,
    path: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(api: &'a ApiClient, path: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            api,
            path: path.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request, invalid names or values are ignored
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add query parameters to the request
    pub fn query<K: AsRef<str>, V: AsRef<str>>(mut self, params: &[(K, V)]) -> Self {
        self.query_params.extend(
            params
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = self.api.url(&self.path)?;
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = self.headers.clone();
        if !headers.contains_key(TOKEN_HEADER) {
            if let Some(token) = self.api.token() {
                let value = HeaderValue::from_str(&token)
                    .map_err(|_| Error::auth("session token is not a valid header value"))?;
                headers.insert(TOKEN_HEADER, value);
            }
        }

        let mut req = self
            .api
            .inner
            .client
            .request(self.method.clone(), url)
            .headers(headers);
        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }
        Ok(req)
    }

    async fn send(&self) -> Result<Response, Error> {
        let req = self.build()?;
        debug!(method = %self.method, path = %self.path, "sending request");
        let response = req.send().await?;
        self.api.intercept(&self.path, response).await
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request and discard the response body
    pub async fn execute_empty(&self) -> Result<(), Error> {
        self.send().await?;
        Ok(())
    }

    /// Execute the request and return the raw response, whatever its status
    ///
    /// 401 and 403 responses still reach the [`ResponseInterceptor`].
    pub async fn execute_raw(&self) -> Result<Response, Error> {
        let req = self.build()?;
        debug!(method = %self.method, path = %self.path, "sending request");
        let response = req.send().await?;
        self.api.notify_auth_failure(&self.path, response.status());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_its_path_prefix() {
        let api = ApiClient::new("https://ouvidoria.example.gov.br/api", &ClientOptions::default())
            .unwrap();
        assert_eq!(
            api.url("/usuarios/7").unwrap().as_str(),
            "https://ouvidoria.example.gov.br/api/usuarios/7"
        );
        assert_eq!(
            api.url("ocorrencias/search").unwrap().as_str(),
            "https://ouvidoria.example.gov.br/api/ocorrencias/search"
        );
    }

    #[test]
    fn token_is_shared_between_clones() {
        let api = ApiClient::new("http://localhost:3333", &ClientOptions::default()).unwrap();
        let clone = api.clone();

        api.set_token(Some("abc".to_string()));
        assert_eq!(clone.token().as_deref(), Some("abc"));

        clone.clear_token();
        assert!(api.token().is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::new("not a url", &ClientOptions::default());
        assert!(matches!(result, Err(Error::Url(_))));
    }
}
