//! Organization endpoints used to discover a dashboard's OpenAPI document

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{ApiResult, DashboardClient, Transport};

/// An organization as listed by `GET /organizations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// Why no organization could be selected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("Organization name required: the API key can access {0} organizations")]
    NameRequired(usize),

    #[error("No matching organizations for '{0}'")]
    NoMatch(String),

    #[error("Malformed organization list: {0}")]
    Malformed(String),
}

/// `GET /organizations`
pub async fn get_organizations<T: Transport>(client: &DashboardClient<T>) -> ApiResult {
    client.get("/organizations").await
}

/// `GET /organizations/{id}/openapiSpec`
pub async fn get_organization_openapi_spec<T: Transport>(client: &DashboardClient<T>, organization_id: &str) -> ApiResult {
    client
        .get(format!("/organizations/{}/openapiSpec", organization_id))
        .await
}

/// Pick an organization from a `GET /organizations` body.
///
/// With a `name`, the first organization whose name matches exactly wins.
/// Without one, the key must see exactly one organization.
pub fn select_organization(organizations: &Value, name: Option<&str>) -> Result<Organization, SelectError> {
    let mut organizations: Vec<Organization> = serde_json::from_value(organizations.clone())
        .map_err(|e| SelectError::Malformed(e.to_string()))?;

    match name {
        Some(name) => organizations
            .into_iter()
            .find(|org| org.name == name)
            .ok_or_else(|| SelectError::NoMatch(name.to_string())),
        None => match organizations.len() {
            0 => Err(SelectError::NoMatch(String::new())),
            1 => Ok(organizations.swap_remove(0)),
            n => Err(SelectError::NameRequired(n)),
        },
    }
}
