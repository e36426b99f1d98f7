//! One bounded transmission
//!
//! [`RequestExecutor`] builds the wire request (URL, merged headers, body)
//! and hands it to the transport. It refuses to transmit once the attempt
//! counter is past the retry bound; looping and sleeping live in
//! [`DashboardClient`](super::DashboardClient).

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::http::auth::AuthHandler;
use crate::http::error::TransportError;
use crate::http::observer::RequestObserver;
use crate::http::rate_limit::RetryState;
use crate::http::request::ApiRequest;
use crate::http::transport::{OutgoingRequest, RawResponse, Transport};

/// Why [`RequestExecutor::execute`] produced no response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("retry bound exceeded at attempt {attempt} (max {max})")]
    RetriesExhausted { attempt: u32, max: u32 },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub struct RequestExecutor<T> {
    transport: T,
    base_url: String,
    auth: Arc<dyn AuthHandler>,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T, base_url: impl Into<String>, auth: Arc<dyn AuthHandler>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            auth,
        }
    }

    /// Transmit `request` once, as attempt `state.attempt()`
    pub async fn execute(
        &self,
        request: &ApiRequest,
        state: RetryState,
        observer: &dyn RequestObserver,
    ) -> Result<RawResponse, ExecuteError> {
        if state.exhausted() {
            return Err(ExecuteError::RetriesExhausted {
                attempt: state.attempt(),
                max: state.max_attempts(),
            });
        }

        let outgoing = OutgoingRequest {
            verb: request.verb(),
            url: request.url(&self.base_url),
            headers: self.headers(request)?,
            body: request.transmitted_body().cloned(),
        };

        observer.request_sent(outgoing.verb, &outgoing.url, state.attempt());
        let response = self.transport.send(outgoing).await?;
        observer.response_received(response.status);
        Ok(response)
    }

    /// Default headers, then auth, then the caller's headers on top
    fn headers(&self, request: &ApiRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        self.auth
            .apply_auth(&mut headers)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        for (name, value) in request.headers() {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidRequest(format!("header name {:?}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidRequest(format!("header {}: {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::auth::{ApiKey, BearerAuth};
    use crate::http::observer::SilentObserver;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        sent: Mutex<Vec<OutgoingRequest>>,
    }

    impl Transport for Capture {
        async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
            self.sent.lock().unwrap().push(request);
            Ok(RawResponse::new(200).with_body("[]"))
        }
    }

    fn executor() -> RequestExecutor<Arc<Capture>> {
        let auth = Arc::new(BearerAuth::new(ApiKey::new("secret").unwrap()));
        RequestExecutor::new(Arc::new(Capture::default()), "https://api.test/api/v1/", auth)
    }

    #[tokio::test]
    async fn test_builds_url_and_auth_header() {
        let executor = executor();
        let request = ApiRequest::get("/organizations").with_query("perPage", "3");
        executor
            .execute(&request, RetryState::new(3), &SilentObserver)
            .await
            .unwrap();

        let sent = executor.transport.sent.lock().unwrap();
        assert_eq!(sent[0].url, "https://api.test/api/v1/organizations?perPage=3");
        assert_eq!(sent[0].headers["authorization"], "Bearer secret");
        assert_eq!(sent[0].headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_caller_headers_overwrite_defaults() {
        let executor = executor();
        let request = ApiRequest::get("/x")
            .with_header("Authorization", "Bearer other")
            .with_header("Accept", "text/csv");
        executor
            .execute(&request, RetryState::new(3), &SilentObserver)
            .await
            .unwrap();

        let sent = executor.transport.sent.lock().unwrap();
        assert_eq!(sent[0].headers["authorization"], "Bearer other");
        assert_eq!(sent[0].headers["accept"], "text/csv");
        assert_eq!(sent[0].headers.get_all("authorization").iter().count(), 1);
    }

    #[tokio::test]
    async fn test_body_only_for_post_and_put() {
        let executor = executor();
        let body = json!({"name": "HQ"});
        for request in [
            ApiRequest::get("/x").with_body(body.clone()),
            ApiRequest::delete("/x").with_body(body.clone()),
            ApiRequest::post("/x").with_body(body.clone()),
            ApiRequest::put("/x").with_body(body.clone()),
        ] {
            executor
                .execute(&request, RetryState::new(3), &SilentObserver)
                .await
                .unwrap();
        }

        let sent = executor.transport.sent.lock().unwrap();
        let bodies: Vec<bool> = sent.iter().map(|r| r.body.is_some()).collect();
        assert_eq!(bodies, vec![false, false, true, true]);
    }

    #[tokio::test]
    async fn test_exhausted_state_does_not_transmit() {
        let executor = executor();
        let result = executor
            .execute(&ApiRequest::get("/x"), RetryState::new(3).at(4), &SilentObserver)
            .await;

        assert_eq!(result.unwrap_err(), ExecuteError::RetriesExhausted { attempt: 4, max: 3 });
        assert!(executor.transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_caller_header_is_rejected() {
        let executor = executor();
        let request = ApiRequest::get("/x").with_header("bad header", "v");
        let result = executor
            .execute(&request, RetryState::new(3), &SilentObserver)
            .await;

        assert!(matches!(
            result,
            Err(ExecuteError::Transport(TransportError::InvalidRequest(_)))
        ));
        assert!(executor.transport.sent.lock().unwrap().is_empty());
    }
}
