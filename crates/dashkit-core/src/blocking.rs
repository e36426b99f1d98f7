//! Blocking facade over [`DashboardClient`]
//!
//! Each call blocks the calling thread for its whole duration, backoff
//! sleeps included. Must not be used from inside an async runtime.

use tokio::runtime::{Builder, Runtime};

use crate::api;
use crate::config::ClientConfig;
use crate::http::{ApiKey, ApiRequest, ApiResult, DashboardClient, ReqwestTransport, Transport};
use crate::{Error, Result};

pub struct BlockingClient<T = ReqwestTransport> {
    runtime: Runtime,
    client: DashboardClient<T>,
}

impl BlockingClient<ReqwestTransport> {
    pub fn new(config: &ClientConfig, api_key: ApiKey) -> Result<Self> {
        Self::from_client(DashboardClient::new(config, api_key)?)
    }
}

impl<T: Transport> BlockingClient<T> {
    /// Wrap an existing async client
    pub fn from_client(client: DashboardClient<T>) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Unsupported {
                message: format!("Failed to create runtime: {}", e),
                feature: Some("blocking".to_string()),
            })?;

        Ok(Self { runtime, client })
    }

    pub fn request(&self, request: &ApiRequest) -> ApiResult {
        self.runtime.block_on(self.client.request(request))
    }

    pub fn get(&self, path: impl Into<String>) -> ApiResult {
        self.runtime.block_on(self.client.get(path))
    }

    pub fn get_organizations(&self) -> ApiResult {
        self.runtime.block_on(api::get_organizations(&self.client))
    }

    pub fn get_organization_openapi_spec(&self, organization_id: &str) -> ApiResult {
        self.runtime
            .block_on(api::get_organization_openapi_spec(&self.client, organization_id))
    }
}
