//! End-to-end: run the real binary against in-process stand-ins for
//! Cloudflare and the Datadog intake and check exit status and output.
//!
//! - missing / malformed configuration exits non-zero before any request
//! - a rejected or unreachable intake still exits 0 and prints the error
//! - `--dry-run` prints the payload and never contacts the intake

use std::net::SocketAddr;
use std::process::Output;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::process::Command;

#[derive(Clone)]
struct Upstream {
    intake_status: StatusCode,
    listing_fails: bool,
    cloudflare_hits: Arc<AtomicUsize>,
    intake_hits: Arc<AtomicUsize>,
}

async fn zones(State(up): State<Upstream>) -> Json<Value> {
    up.cloudflare_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "success": true, "errors": [], "messages": [],
        "result": [{"id": "zone-9", "name": "example.com"}]
    }))
}

async fn custom_hostnames(State(up): State<Upstream>) -> (StatusCode, Json<Value>) {
    up.cloudflare_hits.fetch_add(1, Ordering::SeqCst);
    if up.listing_fails {
        return (
            StatusCode::OK,
            Json(json!({
                "success": false,
                "errors": [{"code": 1407, "message": "Custom hostnames are not available"}],
                "messages": [], "result": null
            })),
        );
    }
    (StatusCode::OK, Json(json!({
        "success": true, "errors": [], "messages": [],
        "result": [{"id": "h", "hostname": "a.customer.io"}],
        "result_info": {"page": 1, "per_page": 1, "count": 1, "total_count": 3, "total_pages": 3}
    })))
}

async fn series(State(up): State<Upstream>) -> StatusCode {
    up.intake_hits.fetch_add(1, Ordering::SeqCst);
    up.intake_status
}

async fn start_upstream(intake_status: StatusCode) -> (SocketAddr, Upstream) {
    start_upstream_with(intake_status, false).await
}

async fn start_upstream_with(
    intake_status: StatusCode,
    listing_fails: bool,
) -> (SocketAddr, Upstream) {
    let up = Upstream {
        intake_status,
        listing_fails,
        cloudflare_hits: Arc::new(AtomicUsize::new(0)),
        intake_hits: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route("/client/v4/zones", get(zones))
        .route("/client/v4/zones/:zone_id/custom_hostnames", get(custom_hostnames))
        .route("/api/v1/series", post(series))
        .with_state(up.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, up)
}

fn base_env(addr: SocketAddr) -> Vec<(&'static str, String)> {
    vec![
        ("CF_API_KEY", "cf-key".into()),
        ("CF_LOGIN", "ops@example.com".into()),
        ("CF_ZONE", "example.com".into()),
        ("CF_CH_QUOTA", "10".into()),
        ("DD_API_KEY", "dd-key".into()),
        ("CF_API_URL", format!("http://{addr}/client/v4")),
        ("DD_API_URL", format!("http://{addr}/api/v1")),
    ]
}

async fn run_bin(env: &[(&'static str, String)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cf-hostname-quota"))
        .env_clear()
        .envs(env.iter().map(|(k, v)| (*k, v.as_str())))
        .args(args)
        .output()
        .await
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[tokio::test]
async fn each_missing_variable_exits_non_zero_without_network() {
    let (addr, up) = start_upstream(StatusCode::ACCEPTED).await;

    for missing in ["CF_API_KEY", "CF_LOGIN", "CF_ZONE", "CF_CH_QUOTA", "DD_API_KEY"] {
        let env: Vec<_> = base_env(addr)
            .into_iter()
            .filter(|(k, _)| *k != missing)
            .collect();
        let out = run_bin(&env, &[]).await;

        assert!(!out.status.success(), "{missing} missing should fail");
        assert!(
            stderr(&out).contains(&format!("{missing} should be defined")),
            "stderr for {missing}: {}",
            stderr(&out)
        );
    }

    assert_eq!(up.cloudflare_hits.load(Ordering::SeqCst), 0);
    assert_eq!(up.intake_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_numeric_quota_exits_non_zero_without_network() {
    let (addr, up) = start_upstream(StatusCode::ACCEPTED).await;
    let mut env = base_env(addr);
    for (k, v) in env.iter_mut() {
        if *k == "CF_CH_QUOTA" {
            *v = "lots".into();
        }
    }

    let out = run_bin(&env, &[]).await;
    assert!(!out.status.success());
    assert!(stderr(&out).contains("CF_CH_QUOTA must be an integer"));
    assert_eq!(up.cloudflare_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn accepted_submission_exits_zero_quietly() {
    let (addr, up) = start_upstream(StatusCode::ACCEPTED).await;

    let out = run_bin(&base_env(addr), &[]).await;
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty(), "stdout: {}", stdout(&out));
    assert_eq!(up.cloudflare_hits.load(Ordering::SeqCst), 2);
    assert_eq!(up.intake_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_submission_still_exits_zero() {
    let (addr, up) = start_upstream(StatusCode::INTERNAL_SERVER_ERROR).await;

    let out = run_bin(&base_env(addr), &[]).await;
    assert!(out.status.success());
    assert!(stdout(&out).contains("Datadog API Error : 500"));
    assert_eq!(up.intake_hits.load(Ordering::SeqCst), 1);
    // One warning for the failed submission, nothing more.
    assert_eq!(stderr(&out).matches("WARN").count(), 1, "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("series submission failed"));
}

#[tokio::test]
async fn unreachable_intake_still_exits_zero() {
    let (addr, _up) = start_upstream(StatusCode::ACCEPTED).await;
    let closed = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);

    let mut env = base_env(addr);
    for (k, v) in env.iter_mut() {
        if *k == "DD_API_URL" {
            *v = format!("http://{closed_addr}/api/v1");
        }
    }

    let out = run_bin(&env, &[]).await;
    assert!(out.status.success());
    assert!(stdout(&out).contains("HTTP Request Error : "));
}

#[tokio::test]
async fn unknown_zone_exits_non_zero() {
    let (addr, up) = start_upstream(StatusCode::ACCEPTED).await;
    let mut env = base_env(addr);
    for (k, v) in env.iter_mut() {
        if *k == "CF_API_URL" {
            // Nothing is routed here, so zone lookup gets a 404.
            *v = format!("http://{addr}/elsewhere");
        }
    }

    let out = run_bin(&env, &[]).await;
    assert!(!out.status.success());
    assert!(stderr(&out).contains("fetching custom hostname usage for example.com"));
    assert_eq!(up.intake_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn listing_failure_exits_non_zero_and_submits_nothing() {
    let (addr, up) = start_upstream_with(StatusCode::ACCEPTED, true).await;

    let out = run_bin(&base_env(addr), &[]).await;
    assert!(!out.status.success());
    assert!(stderr(&out).contains("1407"), "stderr: {}", stderr(&out));
    assert_eq!(up.cloudflare_hits.load(Ordering::SeqCst), 2);
    assert_eq!(up.intake_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dry_run_prints_payload_and_skips_intake() {
    let (addr, up) = start_upstream(StatusCode::ACCEPTED).await;

    let out = run_bin(&base_env(addr), &["--dry-run"]).await;
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(up.intake_hits.load(Ordering::SeqCst), 0);

    let payload: Value = serde_json::from_str(stdout(&out).trim()).unwrap();
    let series = payload["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["metric"], "custom.cloudflare.custom_hostname");
    assert_eq!(series[0]["points"][0][1], 3);
    assert_eq!(series[1]["metric"], "custom.cloudflare.custom_hostname_quota");
    assert_eq!(series[1]["points"][0][1], 10);
    assert_eq!(series[0]["points"][0][0], series[1]["points"][0][0]);
    assert_eq!(series[0]["tags"][0], "cf_domain:example.com");
}
