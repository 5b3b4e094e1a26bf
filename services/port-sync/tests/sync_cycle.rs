//! End-to-end reconcile cycles against a fake qBittorrent WebUI
//!
//! The WebUI is an axum router on an ephemeral port; container logs are
//! canned text behind the `LogSource` seam.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Form, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use portsync_daemon::docker::LogSource;
use portsync_daemon::error::Result;
use portsync_daemon::sync::{SyncOutcome, SyncService};
use portsync_qbit::{Credentials, QbitClient};

/// Canned log text standing in for the VPN container
struct StaticLogs(String);

#[async_trait]
impl LogSource for StaticLogs {
    async fn tail(&self, _lines: usize) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Default)]
struct WebUiState {
    listen_port: u16,
    logins: u32,
    set_calls: u32,
}

type Shared = Arc<Mutex<WebUiState>>;

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    state.lock().unwrap().logins += 1;

    if form.username == "admin" && form.password == "adminadmin" {
        (
            [(header::SET_COOKIE, "SID=deadbeef; HttpOnly; path=/")],
            "Ok.",
        )
            .into_response()
    } else {
        "Fails.".into_response()
    }
}

async fn preferences(State(state): State<Shared>) -> Response {
    let state = state.lock().unwrap();
    Json(serde_json::json!({
        "listen_port": state.listen_port,
        "upnp": true,
        "random_port": false
    }))
    .into_response()
}

#[derive(Deserialize)]
struct SetPreferencesForm {
    json: String,
}

async fn set_preferences(
    State(state): State<Shared>,
    Form(form): Form<SetPreferencesForm>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.set_calls += 1;

    let value: serde_json::Value = serde_json::from_str(&form.json).unwrap();
    if let Some(port) = value.get("listen_port").and_then(|p| p.as_u64()) {
        state.listen_port = port as u16;
    }

    ().into_response()
}

async fn spawn_webui(state: Shared) -> SocketAddr {
    let router = Router::new()
        .route("/api/v2/auth/login", post(login))
        .route("/api/v2/app/preferences", get(preferences))
        .route("/api/v2/app/setPreferences", post(set_preferences))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn service_for(addr: SocketAddr, password: &str, logs: &str) -> SyncService<StaticLogs> {
    let qbit = QbitClient::new(
        format!("http://{}", addr),
        Credentials::new("admin", password),
        Duration::from_secs(5),
    )
    .unwrap();

    SyncService::new(qbit, StaticLogs(logs.to_string()), 50)
}

const ANNOUNCED: &str = "Initialization Sequence Completed\nForwarded port is: 51413\n";
const QUIET: &str = "Initialization Sequence Completed\n";

#[tokio::test]
async fn pushes_diverged_port() {
    let state = Shared::default();
    state.lock().unwrap().listen_port = 6881;
    let addr = spawn_webui(state.clone()).await;

    let mut service = service_for(addr, "adminadmin", ANNOUNCED);
    let outcome = service.sync_once().await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Updated {
            previous: 6881,
            port: 51413
        }
    );
    assert_eq!(service.last_port(), Some(51413));

    let state = state.lock().unwrap();
    assert_eq!(state.listen_port, 51413);
    assert_eq!(state.logins, 1);
    assert_eq!(state.set_calls, 1);
}

#[tokio::test]
async fn second_cycle_short_circuits_without_webui_traffic() {
    let state = Shared::default();
    state.lock().unwrap().listen_port = 6881;
    let addr = spawn_webui(state.clone()).await;

    let mut service = service_for(addr, "adminadmin", ANNOUNCED);
    service.sync_once().await.unwrap();
    let outcome = service.sync_once().await.unwrap();

    assert_eq!(outcome, SyncOutcome::Unchanged(51413));

    let state = state.lock().unwrap();
    assert_eq!(state.logins, 1);
    assert_eq!(state.set_calls, 1);
}

#[tokio::test]
async fn no_announcement_means_no_webui_traffic() {
    let state = Shared::default();
    let addr = spawn_webui(state.clone()).await;

    let mut service = service_for(addr, "adminadmin", QUIET);
    let outcome = service.sync_once().await.unwrap();

    assert_eq!(outcome, SyncOutcome::NoForwardedPort);
    assert_eq!(service.last_port(), None);
    assert_eq!(state.lock().unwrap().logins, 0);
}

#[tokio::test]
async fn matching_remote_port_is_left_alone() {
    let state = Shared::default();
    state.lock().unwrap().listen_port = 51413;
    let addr = spawn_webui(state.clone()).await;

    let mut service = service_for(addr, "adminadmin", ANNOUNCED);
    let outcome = service.sync_once().await.unwrap();

    assert_eq!(outcome, SyncOutcome::AlreadyCorrect(51413));
    assert_eq!(service.last_port(), Some(51413));
    assert_eq!(state.lock().unwrap().set_calls, 0);

    // The confirmed port is remembered, so the next cycle stays local
    let outcome = service.sync_once().await.unwrap();
    assert_eq!(outcome, SyncOutcome::Unchanged(51413));
}

#[tokio::test]
async fn failed_login_aborts_cycle_without_advancing_state() {
    let state = Shared::default();
    state.lock().unwrap().listen_port = 6881;
    let addr = spawn_webui(state.clone()).await;

    let mut service = service_for(addr, "wrong-password", ANNOUNCED);
    let result = service.sync_once().await;

    assert!(result.is_err());
    assert_eq!(service.last_port(), None);

    let state = state.lock().unwrap();
    assert_eq!(state.set_calls, 0);
    assert_eq!(state.listen_port, 6881);
}

#[tokio::test]
async fn reassigned_port_is_pushed_again() {
    let state = Shared::default();
    state.lock().unwrap().listen_port = 6881;
    let addr = spawn_webui(state.clone()).await;

    let mut service = service_for(addr, "adminadmin", ANNOUNCED);
    service.sync_once().await.unwrap();

    // The VPN hands out a new port: swap the canned logs underneath
    let mut service = SyncService::new(
        QbitClient::new(
            format!("http://{}", addr),
            Credentials::new("admin", "adminadmin"),
            Duration::from_secs(5),
        )
        .unwrap(),
        StaticLogs(format!("{}Forwarded port is: 52000\n", ANNOUNCED)),
        50,
    );
    let outcome = service.sync_once().await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::Updated {
            previous: 51413,
            port: 52000
        }
    );
    assert_eq!(state.lock().unwrap().listen_port, 52000);
}
