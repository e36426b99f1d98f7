//! Orgs command handler

use std::io::Write;

use dashkit_core::api::get_organizations;
use dashkit_core::http::Transport;
use dashkit_core::DashboardClient;
use tracing::info;

use super::write_value;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};

/// Print the organizations visible to the API key
pub async fn handle_orgs<T: Transport>(
    client: &DashboardClient<T>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let result = get_organizations(client).await;

    match result.body {
        Some(body) if result.success => {
            info!(count = ?body.as_array().map(Vec::len), "Fetched organizations");
            write_value(out, &body, format)
        }
        _ => Err(Error::Api {
            message: "Unable to fetch organizations for that API key".to_string(),
            errors: result.errors,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::client;
    use mockito::Server;

    #[tokio::test]
    async fn test_prints_organizations() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/organizations")
            .with_status(200)
            .with_body(r#"[{"id": "1", "name": "Lab"}]"#)
            .create_async()
            .await;

        let mut out = Vec::new();
        handle_orgs(&client(&server.url()), OutputFormat::Json, &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "[{\"id\":\"1\",\"name\":\"Lab\"}]\n");
    }

    #[tokio::test]
    async fn test_unauthorized_key() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/organizations")
            .with_status(401)
            .with_body(r#"{"errors": ["Invalid API key"]}"#)
            .create_async()
            .await;

        let mut out = Vec::new();
        let result = handle_orgs(&client(&server.url()), OutputFormat::Json, &mut out).await;

        match result {
            Err(Error::Api { errors, .. }) => {
                assert_eq!(errors, Some(serde_json::json!(["Invalid API key"])));
            }
            other => panic!("expected API error, got {:?}", other),
        }
        assert!(out.is_empty());
    }
}
