//! Openapi command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use dashkit_core::api::{get_organization_openapi_spec, get_organizations, select_organization};
use dashkit_core::http::Transport;
use dashkit_core::DashboardClient;
use tracing::info;

use crate::cli::OpenapiArgs;
use crate::error::{Error, Result};

/// `dashkit_openapi_<YYYY-MM-DD_HH.MM.SS>.json`
pub fn default_output_file(now: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("dashkit_openapi_{}.json", now.format("%Y-%m-%d_%H.%M.%S")))
}

/// Select an organization and save its OpenAPI document
pub async fn handle_openapi<T: Transport>(
    client: &DashboardClient<T>,
    args: OpenapiArgs,
    out: &mut impl Write,
) -> Result<PathBuf> {
    let organizations = get_organizations(client).await;
    let Some(list) = organizations.body.filter(|_| organizations.success) else {
        return Err(Error::Api {
            message: "Unable to fetch organizations for that API key".to_string(),
            errors: organizations.errors,
        });
    };

    let organization = select_organization(&list, args.org.as_deref())?;
    info!(id = %organization.id, name = %organization.name, "Selected organization");

    let document = get_organization_openapi_spec(client, &organization.id).await;
    let Some(document_body) = document.body.filter(|_| document.success) else {
        return Err(Error::Api {
            message: format!(
                "Unable to fetch the OpenAPI document for organization '{}'",
                organization.name
            ),
            errors: document.errors,
        });
    };

    let path = args
        .file
        .unwrap_or_else(|| default_output_file(Local::now().naive_local()));
    write_document(&path, &document_body)?;

    writeln!(
        out,
        "Wrote OpenAPI document for '{}' to {}",
        organization.name,
        path.display()
    )?;
    Ok(path)
}

fn write_document(path: &Path, document: &serde_json::Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(document)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::client;
    use chrono::NaiveDate;
    use mockito::Server;
    use serde_json::json;

    #[test]
    fn test_default_output_file_name() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(
            default_output_file(now),
            PathBuf::from("dashkit_openapi_2024-03-09_14.05.07.json")
        );
    }

    #[tokio::test]
    async fn test_writes_selected_organization_document() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/organizations")
            .with_status(200)
            .with_body(r#"[{"id": "1", "name": "Lab"}, {"id": "2", "name": "Production"}]"#)
            .create_async()
            .await;
        let document = server
            .mock("GET", "/api/v1/organizations/2/openapiSpec")
            .with_status(200)
            .with_body(r#"{"swagger": "2.0", "paths": {"/organizations": {}}}"#)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("spec.json");
        let args = OpenapiArgs {
            org: Some("Production".to_string()),
            file: Some(target.clone()),
        };

        let mut out = Vec::new();
        let written = handle_openapi(&client(&server.url()), args, &mut out).await.unwrap();

        assert_eq!(written, target);
        let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(saved["swagger"], json!("2.0"));
        assert!(String::from_utf8(out).unwrap().contains("'Production'"));
        document.assert_async().await;
    }

    #[tokio::test]
    async fn test_name_required_for_several_organizations() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/organizations")
            .with_status(200)
            .with_body(r#"[{"id": "1", "name": "Lab"}, {"id": "2", "name": "Production"}]"#)
            .create_async()
            .await;

        let args = OpenapiArgs { org: None, file: None };
        let result = handle_openapi(&client(&server.url()), args, &mut Vec::new()).await;

        assert!(matches!(
            result,
            Err(Error::Select(dashkit_core::SelectError::NameRequired(2)))
        ));
    }

    #[tokio::test]
    async fn test_no_matching_organization() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/organizations")
            .with_status(200)
            .with_body(r#"[{"id": "1", "name": "Lab"}]"#)
            .create_async()
            .await;

        let args = OpenapiArgs {
            org: Some("Staging".to_string()),
            file: None,
        };
        let result = handle_openapi(&client(&server.url()), args, &mut Vec::new()).await;

        assert!(matches!(
            result,
            Err(Error::Select(dashkit_core::SelectError::NoMatch(_)))
        ));
    }
}
