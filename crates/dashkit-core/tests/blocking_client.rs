#![cfg(feature = "blocking")]

mod test_support;

use mockito::Server;
use serde_json::json;

use dashkit_core::blocking::BlockingClient;
use dashkit_core::{ApiKey, ClientConfig};
use test_support::TEST_KEY;

#[test]
fn test_blocking_get_organizations() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/v1/organizations")
        .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
        .with_status(200)
        .with_body(r#"[{"id": "1", "name": "Lab"}]"#)
        .create();

    let config = ClientConfig::default().with_base_url(format!("{}/api/v1", server.url()));
    let client = BlockingClient::new(&config, ApiKey::new(TEST_KEY).unwrap()).unwrap();
    let result = client.get_organizations();

    assert!(result.success);
    assert_eq!(result.body, Some(json!([{"id": "1", "name": "Lab"}])));
    mock.assert();
}
