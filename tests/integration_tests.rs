//! Integration tests using mock HTTP servers
//!
//! Tests the full end-to-end flow: CLI arguments → config resolution →
//! router poll → sensor API submission

use clap::Parser;
use hl12n::cli::{Cli, Runner};
use hl12n::{config, Error};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_traffic_meter(server: &MockServer, daily: u64, monthly: u64) {
    Mock::given(method("GET"))
        .and(path("/api/traffic_meter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": daily,
            "monthly": monthly
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_sensor_values(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/sensor_values/traffic"))
        .and(header("Authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {"id": 17},
            "monthly": {"id": 18}
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// One-Shot Mode
// ============================================================================

#[tokio::test]
async fn test_run_once_polls_then_reports() {
    let router_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_traffic_meter(&router_server, 5_000_000_000, 150_000_000_000).await;
    mount_sensor_values(&api_server, "secret-token").await;

    let router_url = router_server.uri();
    let api_url = api_server.uri();
    let cli = Cli::try_parse_from([
        "hl12n",
        "run_once",
        "--router_url",
        router_url.as_str(),
        "--output_timezone",
        "UTC",
        "--api_url",
        api_url.as_str(),
        "--api_token",
        "secret-token",
    ])
    .unwrap();

    Runner::new(cli).run().await.unwrap();

    // Counters pass through to the API unchanged, with a zoned timestamp
    let requests = api_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["daily"], json!(5_000_000_000u64));
    assert_eq!(body["monthly"], json!(150_000_000_000u64));
    assert_eq!(body.as_object().unwrap().len(), 3);

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert!(timestamp.ends_with("+00:00"), "got {timestamp}");
    assert!(!timestamp.contains('.'), "got {timestamp}");
}

#[tokio::test]
async fn test_run_once_router_failure_skips_report() {
    let router_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/traffic_meter"))
        .respond_with(ResponseTemplate::new(500).set_body_string("meter offline"))
        .expect(1)
        .mount(&router_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api_server)
        .await;

    let router_url = router_server.uri();
    let api_url = api_server.uri();
    let cli = Cli::try_parse_from([
        "hl12n",
        "run_once",
        "--router_url",
        router_url.as_str(),
        "--output_timezone",
        "UTC",
        "--api_url",
        api_url.as_str(),
        "--api_token",
        "secret-token",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_run_once_report_failure_surfaces() {
    let router_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_traffic_meter(&router_server, 1_000_000_000, 2_000_000_000).await;

    Mock::given(method("POST"))
        .and(path("/api/sensor_values/traffic"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&api_server)
        .await;

    let router_url = router_server.uri();
    let api_url = api_server.uri();
    let cli = Cli::try_parse_from([
        "hl12n",
        "run_once",
        "--router_url",
        router_url.as_str(),
        "--output_timezone",
        "UTC",
        "--api_url",
        api_url.as_str(),
        "--api_token",
        "wrong-token",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
}

// ============================================================================
// Configuration Layering
// ============================================================================

#[tokio::test]
async fn test_flag_overrides_env_file() {
    let flag_router = MockServer::start().await;
    let file_router = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_traffic_meter(&flag_router, 1_000_000_000, 2_000_000_000).await;
    mount_sensor_values(&api_server, "file-token").await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&file_router)
        .await;

    let mut env_file = NamedTempFile::new().unwrap();
    writeln!(env_file, "HL12N_ROUTER_URL={}", file_router.uri()).unwrap();
    writeln!(env_file, "HL12N_OUTPUT_TIMEZONE=UTC").unwrap();
    writeln!(env_file, "HL12N_API_URL={}", api_server.uri()).unwrap();
    writeln!(env_file, "HL12N_API_TOKEN=file-token").unwrap();

    let env_path = env_file.path().to_str().unwrap().to_string();
    let flag_url = flag_router.uri();
    let cli = Cli::try_parse_from([
        "hl12n",
        "--env_file",
        env_path.as_str(),
        "run_once",
        "--router_url",
        flag_url.as_str(),
    ])
    .unwrap();

    Runner::new(cli).run().await.unwrap();
}

#[test]
fn test_env_file_supplies_full_config() {
    temp_env::with_vars(
        [
            (config::ENV_ROUTER_URL, None::<&str>),
            (config::ENV_OUTPUT_TIMEZONE, None),
            (config::ENV_OUTPUT_INTERVAL, None),
            (config::ENV_API_URL, None),
            (config::ENV_API_TOKEN, None),
            (config::ENV_TIMEOUT, None),
            (config::ENV_FILE, None),
        ],
        || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let router_server = MockServer::start().await;
                let api_server = MockServer::start().await;

                mount_traffic_meter(&router_server, 3_000_000_000, 9_000_000_000).await;
                mount_sensor_values(&api_server, "file-token").await;

                let mut env_file = NamedTempFile::new().unwrap();
                writeln!(env_file, "HL12N_ROUTER_URL={}", router_server.uri()).unwrap();
                writeln!(env_file, "HL12N_OUTPUT_TIMEZONE=UTC").unwrap();
                writeln!(env_file, "HL12N_API_URL={}", api_server.uri()).unwrap();
                writeln!(env_file, "HL12N_API_TOKEN=file-token").unwrap();
                writeln!(env_file, "HL12N_TIMEOUT=2.5").unwrap();

                let env_path = env_file.path().to_str().unwrap().to_string();
                let cli =
                    Cli::try_parse_from(["hl12n", "--env_file", env_path.as_str(), "run_once"])
                        .unwrap();

                Runner::new(cli).run().await.unwrap();
            });
        },
    );
}

#[test]
fn test_missing_token_makes_no_requests() {
    temp_env::with_vars(
        [
            (config::ENV_ROUTER_URL, None::<&str>),
            (config::ENV_OUTPUT_TIMEZONE, None),
            (config::ENV_OUTPUT_INTERVAL, None),
            (config::ENV_API_URL, None),
            (config::ENV_API_TOKEN, None),
            (config::ENV_TIMEOUT, None),
            (config::ENV_FILE, None),
        ],
        || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let router_server = MockServer::start().await;
                let api_server = MockServer::start().await;

                Mock::given(method("GET"))
                    .respond_with(ResponseTemplate::new(200))
                    .expect(0)
                    .mount(&router_server)
                    .await;
                Mock::given(method("POST"))
                    .respond_with(ResponseTemplate::new(200))
                    .expect(0)
                    .mount(&api_server)
                    .await;

                let router_url = router_server.uri();
                let api_url = api_server.uri();
                let cli = Cli::try_parse_from([
                    "hl12n",
                    "run_once",
                    "--router_url",
                    router_url.as_str(),
                    "--output_timezone",
                    "UTC",
                    "--api_url",
                    api_url.as_str(),
                ])
                .unwrap();

                let err = Runner::new(cli).run().await.unwrap_err();
                assert!(matches!(
                    err,
                    Error::MissingConfigField { ref field } if field == config::ENV_API_TOKEN
                ));
            });
        },
    );
}

#[tokio::test]
async fn test_invalid_interval_rejected_before_any_request() {
    let cli = Cli::try_parse_from([
        "hl12n",
        "run",
        "--router_url",
        "http://192.168.1.1",
        "--output_timezone",
        "UTC",
        "--output_interval",
        "soon",
        "--api_url",
        "https://api.example.com",
        "--api_token",
        "secret",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidConfigValue { ref field, .. } if field == config::ENV_OUTPUT_INTERVAL
    ));
}

#[tokio::test]
async fn test_unknown_timezone_rejected_before_any_request() {
    let cli = Cli::try_parse_from([
        "hl12n",
        "run_once",
        "--router_url",
        "http://192.168.1.1",
        "--output_timezone",
        "Mars/Olympus",
        "--api_url",
        "https://api.example.com",
        "--api_token",
        "secret",
    ])
    .unwrap();

    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownTimezone { ref name } if name == "Mars/Olympus"
    ));
}

// ============================================================================
// Continuous Mode
// ============================================================================

#[tokio::test]
async fn test_run_reports_every_interval() {
    let router_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/traffic_meter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": 1_000_000_000u64,
            "monthly": 2_000_000_000u64
        })))
        .expect(2..)
        .mount(&router_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/sensor_values/traffic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {"id": 1},
            "monthly": {"id": 2}
        })))
        .expect(2..)
        .mount(&api_server)
        .await;

    let router_url = router_server.uri();
    let api_url = api_server.uri();
    let cli = Cli::try_parse_from([
        "hl12n",
        "run",
        "--router_url",
        router_url.as_str(),
        "--output_timezone",
        "UTC",
        "--output_interval",
        "1",
        "--api_url",
        api_url.as_str(),
        "--api_token",
        "secret-token",
    ])
    .unwrap();

    let handle = tokio::spawn(async move { Runner::new(cli).run().await });
    tokio::time::sleep(Duration::from_millis(3500)).await;
    handle.abort();
    let _ = handle.await;
}

#[tokio::test]
async fn test_run_executes_one_cycle_per_interval() {
    let router_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    // Both mounts expect exactly one request: with a 2-second interval,
    // the 1-second due checks must produce a single cycle before the
    // cutoff rather than one cycle per check
    mount_traffic_meter(&router_server, 1_000_000_000, 2_000_000_000).await;
    mount_sensor_values(&api_server, "secret-token").await;

    let router_url = router_server.uri();
    let api_url = api_server.uri();
    let cli = Cli::try_parse_from([
        "hl12n",
        "run",
        "--router_url",
        router_url.as_str(),
        "--output_timezone",
        "UTC",
        "--output_interval",
        "2",
        "--api_url",
        api_url.as_str(),
        "--api_token",
        "secret-token",
    ])
    .unwrap();

    let handle = tokio::spawn(async move { Runner::new(cli).run().await });
    tokio::time::sleep(Duration::from_millis(3200)).await;
    handle.abort();
    let _ = handle.await;
}

#[tokio::test]
async fn test_run_stops_when_a_cycle_fails() {
    let router_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/traffic_meter"))
        .respond_with(ResponseTemplate::new(500).set_body_string("meter offline"))
        .expect(1)
        .mount(&router_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api_server)
        .await;

    let router_url = router_server.uri();
    let api_url = api_server.uri();
    let cli = Cli::try_parse_from([
        "hl12n",
        "run",
        "--router_url",
        router_url.as_str(),
        "--output_timezone",
        "UTC",
        "--output_interval",
        "1",
        "--api_url",
        api_url.as_str(),
        "--api_token",
        "secret-token",
    ])
    .unwrap();

    let start = Instant::now();
    let result = tokio::time::timeout(Duration::from_secs(5), Runner::new(cli).run()).await;
    let err = result
        .expect("run mode should exit after a failed cycle")
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    // The first cycle only fires after one full interval
    assert!(start.elapsed() >= Duration::from_millis(900));
}
