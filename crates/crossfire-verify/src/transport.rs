//! Network probes used by the verification categories.
//!
//! Every check goes through [`Transport`], so the categories can be
//! exercised against a scripted transport in tests and against the real
//! clusters through [`NetworkTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;

use crate::error::{ProbeError, ProbeResult};

/// Port used when an endpoint carries none.
pub const DEFAULT_PORT: u16 = 80;

/// Status and body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for a 200 response.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    /// Returns [`ProbeError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> ProbeResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ProbeError::decode(e.to_string()))
    }
}

/// Network operations the verification suite performs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens (and immediately closes) a TCP connection to `host:port`.
    async fn tcp_connect(&self, host: &str, port: u16, timeout: Duration) -> ProbeResult<()>;

    /// Issues a GET request.
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> ProbeResult<HttpResponse>;

    /// Issues a POST request with a url-encoded form body.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> ProbeResult<HttpResponse>;
}

/// Splits an endpoint into host and port, defaulting the port to 80.
///
/// Accepts `host`, `host:port` and bracketed IPv6 forms.
///
/// # Errors
/// Returns [`ProbeError::InvalidEndpoint`] if the endpoint has no host.
pub fn split_host_port(endpoint: &str) -> ProbeResult<(String, u16)> {
    let url = Url::parse(&format!("http://{endpoint}"))
        .map_err(|e| ProbeError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ProbeError::InvalidEndpoint(endpoint.to_string()))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    Ok((host.to_string(), url.port().unwrap_or(DEFAULT_PORT)))
}

/// Builds `base` with a single url-encoded query parameter.
///
/// # Errors
/// Returns [`ProbeError::InvalidEndpoint`] if `base` is not a valid URL.
pub fn with_query(base: &str, key: &str, value: &str) -> ProbeResult<String> {
    Url::parse_with_params(base, &[(key, value)])
        .map(String::from)
        .map_err(|e| ProbeError::InvalidEndpoint(format!("{base}: {e}")))
}

/// [`Transport`] backed by `reqwest` and tokio sockets.
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    client: reqwest::Client,
}

impl NetworkTransport {
    /// Creates a transport with a shared connection pool.
    ///
    /// Redirects are not followed so that access-control checks see the
    /// status the endpoint actually returns.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> ProbeResult<HttpResponse> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(&e, timeout))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(&e, timeout))?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: &reqwest::Error, timeout: Duration) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout(timeout)
    } else if err.is_connect() {
        ProbeError::Connect(err.to_string())
    } else if err.is_builder() {
        ProbeError::InvalidEndpoint(err.to_string())
    } else if err.is_decode() {
        ProbeError::decode(err.to_string())
    } else {
        ProbeError::Http(err.to_string())
    }
}

#[async_trait]
impl Transport for NetworkTransport {
    async fn tcp_connect(&self, host: &str, port: u16, timeout: Duration) -> ProbeResult<()> {
        match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(ProbeError::Connect(format!("{host}:{port}: {e}"))),
            Err(_) => Err(ProbeError::Timeout(timeout)),
        }
    }

    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> ProbeResult<HttpResponse> {
        let mut request = self.client.get(url);
        if let Some(agent) = user_agent {
            request = request.header(reqwest::header::USER_AGENT, agent);
        }
        self.send(request, timeout).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        timeout: Duration,
    ) -> ProbeResult<HttpResponse> {
        self.send(self.client.post(url).form(form), timeout).await
    }
}
