//! Single-transmission transport
//!
//! [`Transport`] sends one fully-built request and hands back the raw
//! response. [`ReqwestTransport`] is the production implementation: one
//! pooled `reqwest::Client` per dashboard client, a connect timeout and a
//! per-read transmit timeout, and a redirect policy that can keep the `Authorization` header
//! when a redirect crosses hosts.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::http::error::TransportError;
use crate::http::request::Verb;
use crate::http::timeout::TimeoutConfig;
use crate::{Error, Result};

/// A request ready to go on the wire
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub verb: Verb,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// A response exactly as received. Header lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Add a header; invalid names or values are skipped
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (name.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    async fn read(response: reqwest::Response) -> std::result::Result<Self, TransportError> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self {
            status,
            headers,
            body,
        })
    }
}

/// Sends one request. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: OutgoingRequest,
    ) -> impl Future<Output = std::result::Result<RawResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn send(
        &self,
        request: OutgoingRequest,
    ) -> impl Future<Output = std::result::Result<RawResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// How redirects are followed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectPolicy {
    /// Maximum redirects per transmission; zero means never follow
    pub max_redirects: usize,
    /// Re-send the `Authorization` header even when a redirect changes host
    pub preserve_auth: bool,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            max_redirects: 10,
            preserve_auth: true,
        }
    }
}

impl RedirectPolicy {
    fn client_policy(&self) -> Policy {
        if self.max_redirects == 0 || self.preserve_auth {
            // Followed manually in `ReqwestTransport::send`
            Policy::none()
        } else {
            Policy::limited(self.max_redirects)
        }
    }

    fn follows_manually(&self) -> bool {
        self.preserve_auth && self.max_redirects > 0
    }
}

/// Production transport backed by a pooled `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    redirect: RedirectPolicy,
}

impl ReqwestTransport {
    pub fn new(timeouts: &TimeoutConfig, redirect: &RedirectPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect())
            .read_timeout(timeouts.transmit())
            .redirect(redirect.client_policy())
            .build()
            .map_err(|e| Error::HttpRequest {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            redirect: redirect.clone(),
        })
    }

    async fn dispatch(
        &self,
        verb: Verb,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> std::result::Result<reqwest::Response, TransportError> {
        let mut builder = self
            .client
            .request(verb.to_method(), url.clone())
            .headers(headers.clone());

        if let Some(body) = body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: OutgoingRequest) -> std::result::Result<RawResponse, TransportError> {
        let mut url =
            Url::parse(&request.url).map_err(|e| TransportError::InvalidUrl(format!("{}: {}", request.url, e)))?;
        let mut verb = request.verb;
        let mut body = request.body;
        let mut hops = 0usize;

        loop {
            let response = self
                .dispatch(verb, &url, &request.headers, body.as_ref())
                .await?;

            if !(self.redirect.follows_manually() && response.status().is_redirection()) {
                return RawResponse::read(response).await;
            }

            let Some(location) = response.headers().get(LOCATION) else {
                return RawResponse::read(response).await;
            };

            if hops == self.redirect.max_redirects {
                return Err(TransportError::Redirect(format!(
                    "more than {} redirects from {}",
                    self.redirect.max_redirects, request.url
                )));
            }

            let location = location
                .to_str()
                .map_err(|e| TransportError::Redirect(format!("unreadable Location header: {}", e)))?;
            url = url
                .join(location)
                .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", location, e)))?;

            // 303, and 301/302 after a POST, continue as a bodiless GET
            let status = response.status().as_u16();
            if status == 303 || (matches!(status, 301 | 302) && verb == Verb::Post) {
                verb = Verb::Get;
                body = None;
            }
            hops += 1;
        }
    }
}
