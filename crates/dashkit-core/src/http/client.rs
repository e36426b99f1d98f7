//! Dashboard client orchestrating executor, gate, classifier and pagination
//!
//! One call is a sequential loop: transmit, wait out any 429, classify, then
//! follow `rel="next"` links with a fresh retry budget per page. Every outcome
//! is folded into an [`ApiResult`]; nothing on this path returns `Err`.

use std::sync::Arc;

use url::Url;

use crate::config::ClientConfig;
use crate::http::auth::{ApiKey, AuthHandler, BearerAuth};
use crate::http::classifier::classify;
use crate::http::error::FailureKind;
use crate::http::executor::{ExecuteError, RequestExecutor};
use crate::http::observer::{RequestObserver, TracingObserver};
use crate::http::pagination::{continuation_path, next_link, PageCollector, PaginationPolicy};
use crate::http::rate_limit::{RateLimitGate, RetryDecision, RetryState};
use crate::http::request::ApiRequest;
use crate::http::result::ApiResult;
use crate::http::transport::{ReqwestTransport, Transport};
use crate::Result;

/// A classified page and its continuation link, if any
struct Page {
    result: ApiResult,
    next: Option<String>,
}

/// Async client for the dashboard API.
///
/// Holds one pooled transport, reused across attempts, pages and calls.
/// Dropping the future returned by [`request`](Self::request) cancels the
/// call, including any pending backoff.
pub struct DashboardClient<T = ReqwestTransport> {
    executor: RequestExecutor<T>,
    gate: RateLimitGate,
    base_url: Url,
    pagination: PaginationPolicy,
    observer: Arc<dyn RequestObserver>,
}

impl DashboardClient<ReqwestTransport> {
    /// Create a client using the production transport
    pub fn new(config: &ClientConfig, api_key: ApiKey) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config.timeouts, &config.redirect)?;
        Self::with_transport(config, Arc::new(BearerAuth::new(api_key)), transport)
    }
}

impl<T: Transport> DashboardClient<T> {
    pub fn with_transport(config: &ClientConfig, auth: Arc<dyn AuthHandler>, transport: T) -> Result<Self> {
        config.validate()?;
        auth.validate_credentials()?;
        let base_url = config.parsed_base_url()?;

        Ok(Self {
            executor: RequestExecutor::new(transport, config.base_url.clone(), auth),
            gate: RateLimitGate::new(config.retry.clone()),
            base_url,
            pagination: config.pagination,
            observer: Arc::new(TracingObserver::new(config.verbose)),
        })
    }

    /// Replace the default tracing observer
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Run one logical call: retries, classification and pagination
    pub async fn request(&self, request: &ApiRequest) -> ApiResult {
        self.request_at_attempt(request, 0).await
    }

    /// As [`request`](Self::request), with the first page starting at
    /// `attempt`. An attempt past the retry bound fails without transmitting.
    pub async fn request_at_attempt(&self, request: &ApiRequest, attempt: u32) -> ApiResult {
        let state = self.gate.policy().start().at(attempt);
        let Ok(mut page) = self.fetch_page(request, state).await else {
            return ApiResult::failure();
        };

        if !page.result.success {
            return page.result;
        }

        let mut collector = PageCollector::new(self.pagination);
        loop {
            collector.push(page.result.body.take());

            let Some(link) = page.next.take() else {
                return collector.finish(page.result);
            };

            let Some(path) = continuation_path(&link, &self.base_url) else {
                self.observer.failed(
                    FailureKind::Pagination,
                    &format!("next link {} is outside {}", link, self.base_url),
                );
                return collector.fail(None);
            };

            self.observer.next_page(&link);
            let continuation = request.continuation(path);
            match self.fetch_page(&continuation, self.gate.policy().start()).await {
                Ok(next) if next.result.success => page = next,
                Ok(next) => {
                    self.observer.failed(
                        FailureKind::Pagination,
                        &format!("page {} was not successful", collector.pages() + 1),
                    );
                    return collector.fail(next.result.errors);
                }
                Err(_) => {
                    self.observer.failed(
                        FailureKind::Pagination,
                        &format!("page {} could not be fetched", collector.pages() + 1),
                    );
                    return collector.fail(None);
                }
            }
        }
    }

    /// `GET path` with no extra headers, query or body
    pub async fn get(&self, path: impl Into<String>) -> ApiResult {
        self.request(&ApiRequest::get(path)).await
    }

    /// Transmit one page until it is not rate limited or the budget is spent
    async fn fetch_page(&self, request: &ApiRequest, mut state: RetryState) -> std::result::Result<Page, FailureKind> {
        let observer = self.observer.as_ref();

        loop {
            let response = match self.executor.execute(request, state, observer).await {
                Ok(response) => response,
                Err(ExecuteError::RetriesExhausted { attempt, max }) => {
                    observer.failed(
                        FailureKind::RateLimitExceeded,
                        &format!("attempt {} exceeds the bound of {}", attempt, max),
                    );
                    return Err(FailureKind::RateLimitExceeded);
                }
                Err(ExecuteError::Transport(e)) => {
                    observer.failed(FailureKind::Transport, &e.to_string());
                    return Err(FailureKind::Transport);
                }
            };

            match self.gate.inspect(&response, state) {
                RetryDecision::Proceed => {
                    let result = classify(&response);
                    if let Some(errors) = &result.errors {
                        observer.payload_errors(errors);
                    }
                    return Ok(Page {
                        result,
                        next: next_link(&response.headers),
                    });
                }
                RetryDecision::Retry { delay, next } => {
                    observer.rate_limited(next.attempt(), delay);
                    tokio::time::sleep(delay).await;
                    state = next;
                }
                RetryDecision::Exhausted => {
                    observer.failed(
                        FailureKind::RateLimitExceeded,
                        &format!("still rate limited after {} retries", state.max_attempts()),
                    );
                    return Err(FailureKind::RateLimitExceeded);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_defaults() {
        let client = DashboardClient::new(&ClientConfig::default(), ApiKey::new("k").unwrap()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.meraki.com/api/v1");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = ClientConfig::default().with_base_url("::nope::");
        assert!(DashboardClient::new(&config, ApiKey::new("k").unwrap()).is_err());
    }
}
