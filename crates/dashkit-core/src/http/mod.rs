//! HTTP request core for the dashboard API
//!
//! This module provides:
//! - Request description and URL/query encoding
//! - Bearer authentication
//! - A single-transmission transport with timeouts and redirect handling
//! - Rate-limit retry on 429 with `Retry-After`
//! - Response classification into [`ApiResult`]
//! - `Link` header pagination with page merging

pub mod auth;
pub mod classifier;
pub mod client;
pub mod error;
pub mod executor;
pub mod observer;
pub mod pagination;
pub mod rate_limit;
pub mod request;
pub mod result;
pub mod timeout;
pub mod transport;

pub use auth::{ApiKey, AuthHandler, BearerAuth, API_KEY_ENV_VAR};
pub use classifier::classify;
pub use client::DashboardClient;
pub use error::{FailureKind, TransportError};
pub use executor::{ExecuteError, RequestExecutor};
pub use observer::{RequestObserver, SilentObserver, TracingObserver};
pub use pagination::{PageCollector, PaginationPolicy};
pub use rate_limit::{RateLimitGate, RetryDecision, RetryPolicy, RetryState};
pub use request::{ApiRequest, QueryValue, Verb};
pub use result::ApiResult;
pub use timeout::TimeoutConfig;
pub use transport::{OutgoingRequest, RawResponse, RedirectPolicy, ReqwestTransport, Transport};
