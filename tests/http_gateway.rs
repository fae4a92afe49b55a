// Tests for `HttpGateway` against a wiremock server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use panel_shell::{Gateway, GatewayError, HttpGateway, Mode, ShellConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HttpGateway) {
    let server = MockServer::start().await;
    let config = ShellConfig::builder()
        .api_url(server.uri())
        .push_url("ws://127.0.0.1:9/push")
        .build();
    let gateway = HttpGateway::new(&config).unwrap();
    (server, gateway)
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_open_session_probes_api_root() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    gateway.open_session().await.unwrap();
}

#[tokio::test]
async fn test_bulk_load_decodes_snapshot() {
    let (server, gateway) = setup().await;

    let body = json!({
        "panel": { "model": "Gateway 2", "firmware": "4.2.1", "serial": "SN-0042" },
        "areas": [
            {
                "id": "1",
                "name": "Home",
                "mode": "PART_SET_A",
                "zones": [
                    { "id": "1", "name": "Front Door", "status": "CLOSED" },
                    { "id": "2", "name": "Kitchen", "status": "OPEN" }
                ]
            },
            { "id": "2", "name": "Garage" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let snapshot = gateway.bulk_load().await.unwrap();

    assert_eq!(snapshot.panel.serial, "SN-0042");
    assert_eq!(snapshot.areas.len(), 2);
    assert_eq!(snapshot.areas[0].mode, Mode::PartSetA);
    assert_eq!(snapshot.areas[0].zones[1].status.as_str(), "OPEN");
    assert_eq!(snapshot.areas[1].mode, Mode::Unset);
    assert!(snapshot.areas[1].zones.is_empty());
}

#[tokio::test]
async fn test_change_mode_posts_wire_mode() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/areas/1/mode"))
        .and(body_json(json!({"mode": "FULL_SET"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    gateway.change_mode("1", Mode::FullSet).await.unwrap();
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_change_mode_conflict_is_rejection() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .and(path("/areas/2/mode"))
        .respond_with(ResponseTemplate::new(409).set_body_string("zone 3 open"))
        .mount(&server)
        .await;

    let err = gateway.change_mode("2", Mode::PartSetB).await.unwrap_err();
    match err {
        GatewayError::Rejected { reason } => assert_eq!(reason, "zone 3 open"),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bulk_load_server_error() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/state"))
        .respond_with(ResponseTemplate::new(503).set_body_string("panel offline"))
        .mount(&server)
        .await;

    let err = gateway.bulk_load().await.unwrap_err();
    assert!(
        matches!(err, GatewayError::Status { status: 503, ref body } if body == "panel offline"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_bulk_load_bad_body_is_decode_error() {
    let (server, gateway) = setup().await;

    Mock::given(method("GET"))
        .and(path("/state"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = gateway.bulk_load().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode { .. }), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_calls_after_close_fail_locally() {
    let (server, gateway) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    gateway.close_session().await.unwrap();
    let err = gateway.change_mode("1", Mode::Unset).await.unwrap_err();
    assert!(matches!(err, GatewayError::SessionClosed));
}
