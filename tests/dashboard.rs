//! Dashboard HTTP integration tests.
//!
//! Starts the axum router over a temporary store and exercises it with reqwest.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use viewtrack::config::{Settings, StorageSettings};
use viewtrack::dashboard::{router, DashboardState};
use viewtrack::db::{Database, VideoStatistics};

fn settings(dir: &tempfile::TempDir) -> Settings {
    Settings {
        storage: StorageSettings {
            path: dir.path().join("youtube_stats.db").to_string_lossy().into_owned(),
        },
        ..Settings::default()
    }
}

async fn seed(settings: &Settings, rows: &[(u32, i64, i64, i64)]) {
    let db = Database::new(&settings.storage);
    db.migrate().await.unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    for &(hour, views, likes, comments) in rows {
        db.insert_snapshot(
            day.and_hms_opt(hour, 0, 0).unwrap(),
            VideoStatistics {
                views,
                likes,
                comments,
            },
        )
        .await
        .unwrap();
    }
}

/// Bind to port 0 and return the base URL.
async fn start_server(settings: &Settings) -> String {
    let app = router(Arc::new(DashboardState::new(settings)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_check() {
    let dir = tempfile::tempdir().unwrap();
    let base = start_server(&settings(&dir)).await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn missing_store_renders_empty_state() {
    let dir = tempfile::tempdir().unwrap();
    let base = start_server(&settings(&dir)).await;

    let resp = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let page = resp.text().await.unwrap();
    assert!(page.contains("The collector may not have run yet"));
    assert!(page.contains("There is no data to show yet"));

    let history: Value = reqwest::get(format!("{base}/api/history"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["rows"].as_array().unwrap().len(), 0);
    assert!(history["notices"]
        .as_array()
        .unwrap()
        .iter()
        .any(|n| n["level"] == "info"));

    let insights: Value = reqwest::get(format!("{base}/api/insights"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(insights, serde_json::json!([]));
}

#[tokio::test]
async fn insights_endpoint_derives_series() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir);
    seed(&settings, &[(1, 100, 0, 5), (2, 150, 10, 5), (3, 400, 20, 4)]).await;
    let base = start_server(&settings).await;

    let insights: Value = reqwest::get(format!("{base}/api/insights"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rows = insights.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    let deltas: Vec<i64> = rows
        .iter()
        .map(|r| r["views_per_hour"].as_i64().unwrap())
        .collect();
    assert_eq!(deltas, vec![0, 50, 250]);

    assert_eq!(rows[0]["engagement_rate"].as_f64(), Some(0.0));
    assert!(rows[0]["discussion_ratio"].is_null());
    assert_eq!(rows[2]["engagement_rate"].as_f64(), Some(5.0));
    assert_eq!(rows[2]["discussion_ratio"].as_f64(), Some(0.2));
}

#[tokio::test]
async fn page_shows_latest_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir);
    seed(&settings, &[(1, 1_000, 40, 3), (2, 2_345_678, 91_011, 1_213)]).await;
    let base = start_server(&settings).await;

    let page = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("2,345,678"));
    assert!(page.contains("91,011"));
    assert!(page.contains("1,213"));
    assert_eq!(page.matches("<svg").count(), 3);
}
