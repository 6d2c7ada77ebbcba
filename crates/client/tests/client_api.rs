//! Exercises [`NotificationClient`] against an in-process server.

use std::net::SocketAddr;

use chrono::NaiveDate;
use euit_api::config::ServerConfig;
use euit_api::router::build_app_router;
use euit_api::state::AppState;
use euit_client::{ClientConfig, ClientError, NotificationClient};
use euit_core::notification::{GradeUpdate, MakeupClass, TrainingScore};
use euit_events::Outbound;
use serde_json::json;

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        heartbeat_interval_secs: 15,
        client_timeout_secs: 30,
        send_timeout_ms: 1000,
        outbound_buffer: 16,
    }
}

async fn spawn_server() -> (AppState, SocketAddr) {
    let config = test_config();
    let state = AppState::new(config.clone());
    let app = build_app_router(state.clone(), &config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, addr)
}

fn client_for(addr: SocketAddr) -> NotificationClient {
    NotificationClient::new(ClientConfig::new(format!("http://{addr}"))).unwrap()
}

fn grade_update(total: f64) -> GradeUpdate {
    GradeUpdate {
        ma_mon_hoc: "IT001".into(),
        ten_mon_hoc: "Nhập môn CNTT".into(),
        ma_lop_hoc_phan: "IT001.P11".into(),
        diem_qua_trinh: None,
        diem_giua_ky: None,
        diem_cuoi_ky: None,
        diem_tong_ket: Some(total),
        diem_chu: None,
        hoc_ky: "1".into(),
        nam_hoc: "2024-2025".into(),
    }
}

#[tokio::test]
async fn grade_update_is_published_and_delivered() {
    let (state, addr) = spawn_server().await;
    let (conn, mut rx) = state.hub.connect().await;
    state.hub.subscribe(conn, "23520001").await.unwrap();
    rx.recv().await.unwrap();

    let response = client_for(addr)
        .notify_grade_update("23520001", &grade_update(8.5))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.kind, "ket_qua_hoc_tap");
    assert_eq!(response.delivered, 1);
    match rx.recv().await {
        Some(Outbound::Text(text)) => assert!(text.contains("ReceiveKetQuaHocTap")),
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn makeup_class_dates_survive_the_round_trip() {
    let (_state, addr) = spawn_server().await;

    let response = client_for(addr)
        .notify_makeup_class(
            "A",
            &MakeupClass {
                ma_lop_hoc_phan: "IT002.P12".into(),
                ten_mon_hoc: "OOP".into(),
                ngay_bu: NaiveDate::from_ymd_opt(2025, 1, 15)
                    .unwrap()
                    .and_hms_opt(7, 30, 0)
                    .unwrap(),
                tiet_bat_dau: "1".into(),
                tiet_ket_thuc: "3".into(),
                phong_hoc: "B1.22".into(),
                ghi_chu: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(response.kind, "bao_bu");
    assert_eq!(response.delivered, 0);
}

#[tokio::test]
async fn validation_failure_surfaces_as_status_error() {
    let (_state, addr) = spawn_server().await;

    let error = client_for(addr)
        .notify_training_score(
            "A",
            &TrainingScore {
                hoc_ky: "HK1".into(),
                nam_hoc: "2024-2025".into(),
                diem_ren_luyen: 120,
                xep_loai: "Xuất sắc".into(),
            },
        )
        .await
        .unwrap_err();

    match error {
        ClientError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("VALIDATION_ERROR"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn batch_and_broadcast_report_counts() {
    let (state, addr) = spawn_server().await;
    let (conn, mut rx) = state.hub.connect().await;
    state.hub.subscribe(conn, "A").await.unwrap();
    rx.recv().await.unwrap();
    let client = client_for(addr);

    let batch = client
        .notify_batch(vec!["A".into(), "B".into()], "ReceiveLichThi", json!({"phong": "C101"}))
        .await
        .unwrap();
    assert_eq!(batch.count, 2);
    assert_eq!(batch.delivered, 1);

    let broadcast = client.broadcast("Bảo trì", "22h", None).await.unwrap();
    assert_eq!(broadcast.kind, "broadcast");
    assert_eq!(broadcast.delivered, 1);
}

#[tokio::test]
async fn is_online_reflects_registry() {
    let (state, addr) = spawn_server().await;
    let client = client_for(addr);

    assert!(!client.is_online("A").await.unwrap());

    let (conn, _rx) = state.hub.connect().await;
    state.hub.subscribe(conn, "A").await.unwrap();
    assert!(client.is_online("A").await.unwrap());

    state.hub.disconnect(conn).await;
    assert!(!client.is_online("A").await.unwrap());
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = client_for(addr).is_online("A").await.unwrap_err();

    assert!(matches!(error, ClientError::Http(_)));
}

#[tokio::test]
async fn reserved_characters_in_subscriber_id_stay_in_one_segment() {
    let (state, addr) = spawn_server().await;
    let client = client_for(addr);
    let (conn, _rx) = state.hub.connect().await;
    state.hub.subscribe(conn, "K17/CNTT?x#1").await.unwrap();

    assert!(client.is_online("K17/CNTT?x#1").await.unwrap());
    assert!(!client.is_online("K17").await.unwrap());

    let response = client
        .notify_grade_update("K17/CNTT?x#1", &grade_update(7.0))
        .await
        .unwrap();
    assert_eq!(response.subscriber_id, "K17/CNTT?x#1");
    assert_eq!(response.delivered, 1);
}
