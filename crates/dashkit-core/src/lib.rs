//! Dashkit Core - resilient request core for the Meraki Dashboard API
//!
//! Every call goes through one pipeline that authenticates with a bearer
//! token, waits out `429` rate limiting, classifies the response and follows
//! `Link` header pagination, merging pages into a single result.
//!
//! # Main Components
//!
//! - **Client**: [`DashboardClient`] runs a call end to end and always
//!   returns an [`ApiResult`]
//! - **Rate limiting**: [`http::RateLimitGate`] honors `Retry-After`
//! - **Pagination**: [`http::PageCollector`] appends array pages
//! - **Errors**: [`Error`] covers setup failures only
//!
//! # Example
//!
//! ```no_run
//! use dashkit_core::{ApiKey, ApiRequest, ClientConfig, DashboardClient};
//!
//! async fn example() -> dashkit_core::Result<()> {
//!     let client = DashboardClient::new(&ClientConfig::default(), ApiKey::resolve(None)?)?;
//!     let result = client
//!         .request(&ApiRequest::get("/organizations").with_query("perPage", "100"))
//!         .await;
//!     if result.success {
//!         println!("{}", result.body.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod config;
pub mod error;
pub mod http;

// Re-export main types for convenience
pub use api::{Organization, SelectError};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use http::{
    ApiKey, ApiRequest, ApiResult, DashboardClient, FailureKind, PaginationPolicy, QueryValue, RequestObserver,
    RetryPolicy, SilentObserver, TracingObserver, Verb,
};
