//! Shared test support utilities for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use dashkit_core::http::{
    ApiKey, BearerAuth, FailureKind, OutgoingRequest, RawResponse, Transport, TransportError,
};
use dashkit_core::{ClientConfig, DashboardClient, RequestObserver, RetryPolicy, Verb};

pub const TEST_KEY: &str = "test-api-key";

/// Transport that replays a fixed script of responses and records requests
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    sent: Mutex<Vec<OutgoingRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Result<RawResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<OutgoingRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
    }
}

/// Events captured from the client
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Sent(Verb, String, u32),
    Received(u16),
    RateLimited(u32, Duration),
    PayloadErrors(Value),
    NextPage(String),
    Failed(FailureKind),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<FailureKind> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Failed(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl RequestObserver for RecordingObserver {
    fn request_sent(&self, verb: Verb, url: &str, attempt: u32) {
        self.push(Event::Sent(verb, url.to_string(), attempt));
    }

    fn response_received(&self, status: u16) {
        self.push(Event::Received(status));
    }

    fn rate_limited(&self, attempt: u32, wait: Duration) {
        self.push(Event::RateLimited(attempt, wait));
    }

    fn payload_errors(&self, errors: &Value) {
        self.push(Event::PayloadErrors(errors.clone()));
    }

    fn next_page(&self, url: &str) {
        self.push(Event::NextPage(url.to_string()));
    }

    fn failed(&self, kind: FailureKind, _detail: &str) {
        self.push(Event::Failed(kind));
    }
}

pub const SCRIPTED_BASE: &str = "https://api.test/api/v1";

pub fn scripted_config() -> ClientConfig {
    ClientConfig::default().with_base_url(SCRIPTED_BASE)
}

/// Client over a scripted transport, with a recording observer attached
pub fn scripted_client(
    config: &ClientConfig,
    transport: &Arc<ScriptedTransport>,
) -> (DashboardClient<Arc<ScriptedTransport>>, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let auth = Arc::new(BearerAuth::new(ApiKey::new(TEST_KEY).unwrap()));
    let client = DashboardClient::with_transport(config, auth, Arc::clone(transport))
        .unwrap()
        .with_observer(observer.clone());
    (client, observer)
}

/// Real reqwest client pointed at `base_url`, retrying without delay
pub fn live_client(base_url: &str, max_retries: u32) -> DashboardClient {
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_retry(RetryPolicy::new(max_retries).with_default_wait(0));
    DashboardClient::new(&config, ApiKey::new(TEST_KEY).unwrap()).unwrap()
}

pub fn json_response(status: u16, body: &str) -> Result<RawResponse, TransportError> {
    Ok(RawResponse::new(status)
        .with_header("content-type", "application/json")
        .with_body(body))
}

pub fn throttled(retry_after: Option<&str>) -> Result<RawResponse, TransportError> {
    let response = RawResponse::new(429);
    Ok(match retry_after {
        Some(value) => response.with_header("Retry-After", value),
        None => response,
    })
}
