//! Request command handler

use std::collections::BTreeMap;
use std::io::Write;

use dashkit_core::http::Transport;
use dashkit_core::{ApiRequest, DashboardClient, QueryValue, Verb};
use tracing::debug;

use super::write_value;
use crate::cli::{OutputFormat, RequestArgs};
use crate::error::{Error, Result};

/// Turn command-line arguments into an API request.
///
/// A query name given more than once becomes an array parameter.
pub fn build_request(args: &RequestArgs) -> Result<ApiRequest> {
    let verb: Verb = args
        .verb
        .parse()
        .map_err(|_| Error::invalid_args(format!("unsupported verb '{}'", args.verb)))?;

    let mut query: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (name, value) in &args.query {
        query.entry(name.as_str()).or_default().push(value.clone());
    }

    let mut request = ApiRequest::new(verb, args.path.clone()).with_headers(args.headers.iter().cloned());
    for (name, mut values) in query {
        let value = if values.len() == 1 {
            QueryValue::One(values.remove(0))
        } else {
            QueryValue::Many(values)
        };
        request = request.with_query(name, value);
    }

    if let Some(body) = &args.body {
        let body = serde_json::from_str(body)
            .map_err(|e| Error::invalid_args(format!("--body is not valid JSON: {}", e)))?;
        request = request.with_body(body);
    }

    Ok(request)
}

/// Run one call and print the full result; returns the call's `success`
pub async fn handle_request<T: Transport>(
    client: &DashboardClient<T>,
    args: &RequestArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<bool> {
    let request = build_request(args)?;
    debug!(verb = %request.verb(), path = request.path(), "Running request");

    let result = client.request(&request).await;
    write_value(out, &result, format)?;
    Ok(result.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn args(verb: &str, path: &str) -> RequestArgs {
        RequestArgs {
            verb: verb.to_string(),
            path: path.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            keep_partial: false,
        }
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_repeated_query_becomes_array() {
        let mut args = args("get", "/organizations/1/devices");
        args.query = vec![pair("serials[]", "A"), pair("perPage", "5"), pair("serials[]", "B")];

        let request = build_request(&args).unwrap();
        assert_eq!(request.verb(), Verb::Get);
        assert_eq!(
            request.query().get("serials[]"),
            Some(&QueryValue::Many(vec!["A".to_string(), "B".to_string()]))
        );
        assert_eq!(request.query().get("perPage"), Some(&QueryValue::One("5".to_string())));
    }

    #[test]
    fn test_invalid_verb_and_body() {
        assert!(matches!(build_request(&args("PATCH", "/x")), Err(Error::InvalidArgs(_))));

        let mut bad_body = args("post", "/x");
        bad_body.body = Some("{not json".to_string());
        assert!(matches!(build_request(&bad_body), Err(Error::InvalidArgs(_))));
    }

    #[tokio::test]
    async fn test_prints_result_and_reports_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v1/networks/N_1")
            .match_header("x-trace", "t1")
            .match_body(Matcher::Json(json!({"name": "Renamed"})))
            .with_status(200)
            .with_body(r#"{"id": "N_1", "name": "Renamed"}"#)
            .create_async()
            .await;

        let mut args = args("PUT", "/networks/N_1");
        args.headers = vec![pair("X-Trace", "t1")];
        args.body = Some(r#"{"name": "Renamed"}"#.to_string());

        let mut out = Vec::new();
        let success = handle_request(&client(&server.url()), &args, OutputFormat::Json, &mut out)
            .await
            .unwrap();

        assert!(success);
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            printed,
            json!({"success": true, "errors": null, "body": {"id": "N_1", "name": "Renamed"}})
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsuccessful_call_is_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", "/api/v1/networks/N_404")
            .with_status(404)
            .create_async()
            .await;

        let mut out = Vec::new();
        let success = handle_request(
            &client(&server.url()),
            &args("delete", "/networks/N_404"),
            OutputFormat::Json,
            &mut out,
        )
        .await
        .unwrap();

        assert!(!success);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"success\":false,\"errors\":null,\"body\":null}\n"
        );
    }
}
