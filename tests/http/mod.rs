use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mafrepo::config::context::build_context;
use mafrepo::config::schema::load_config_from_string;
use mafrepo::frontend::http::run_server;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tracing::warn;

use crate::{
    assert_mapped_records, get_addr, make_mock_mafrepo, memory_catalog_config, SAMPLE_ID,
};

const ENDPOINT: &str = "plugins/MafRepoProcedureAnalyzer/requestSimpleVariants";

// Start the HTTP frontend in the background, configured through env overrides the
// way a deployment would be
async fn start_http_server(config_str: &str) -> SocketAddr {
    let addr = get_addr().await;

    let env_vars = HashMap::from([
        (
            "MAFREPO__FRONTEND__HTTP__BIND_HOST".to_string(),
            addr.ip().to_string(),
        ),
        (
            "MAFREPO__FRONTEND__HTTP__BIND_PORT".to_string(),
            addr.port().to_string(),
        ),
    ]);
    let config = load_config_from_string(config_str, false, Some(env_vars)).unwrap();
    let http = config.frontend.http.clone().expect("HTTP frontend configured");
    let context = build_context(&config).await.unwrap();

    tokio::task::spawn(run_server(
        Arc::clone(&context.analyzer),
        http,
        std::future::pending(),
    ));

    addr
}

async fn post_plugin_method(client: &Client, addr: SocketAddr, body: Value) -> Response {
    let uri = format!("http://{addr}/{ENDPOINT}");

    // The server may still be binding
    let max_retries = 5;
    let mut retries = 0;
    let mut delay = Duration::from_millis(50);
    loop {
        match client
            .post(&uri)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
        {
            Ok(resp) => return resp,
            Err(err) if retries < max_retries => {
                warn!(
                    "Request attempt {}/{} to the HTTP frontend failed: {}",
                    retries + 1,
                    max_retries,
                    err
                );
                tokio::time::sleep(delay).await;
                retries += 1;
                delay *= 2;
            }
            Err(err) => panic!("HTTP frontend not reachable at {uri}: {err}"),
        }
    }
}

async fn response_json(resp: Response) -> Value {
    serde_json::from_slice(&resp.bytes().await.unwrap()).unwrap()
}

#[tokio::test]
async fn test_http_server_request_simple_variants() {
    let mock_server = make_mock_mafrepo().await;
    let addr =
        start_http_server(&memory_catalog_config(&format!("{}/api", mock_server.uri())))
            .await;
    let client = Client::new();

    let resp = post_plugin_method(&client, addr, json!({ "sampleId": SAMPLE_ID })).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = response_json(resp).await;
    assert_eq!(body["status"]["code"], 1);
    assert_mapped_records(&body["result"]);

    // Unknown sample: the MAF repository answers 404
    let resp = post_plugin_method(&client, addr, json!({ "sampleId": "X9999-99" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response_json(resp).await["status"]["code"], 0);

    let resp = post_plugin_method(&client, addr, json!({ "sampleId": null })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response_json(resp).await,
        json!({"status": {"code": 0, "message": "No SampleID given!"}})
    );
}

#[tokio::test]
async fn test_http_server_without_mafrepo_url() {
    let addr = start_http_server(
        r#"
[catalog]
type = "memory"
"#,
    )
    .await;

    let resp =
        post_plugin_method(&Client::new(), addr, json!({ "sampleId": SAMPLE_ID })).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response_json(resp).await,
        json!({"status": {"code": 0, "message": "Einstellung 'mafrepo_url' nicht vorhanden"}})
    );
}
