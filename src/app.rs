use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::chart::{self, ChartOptions};
use crate::downloader;
use crate::record::{Genre, UserRecord};
use crate::recommend::recommend;
use crate::stats::{self, Summary};
use crate::store::RecordStore;

pub struct AppState {
    store: Arc<dyn RecordStore>,
}

#[derive(Deserialize)]
struct GreetRequest {
    #[serde(default)]
    name: String,
}

#[derive(Serialize)]
struct GreetResponse {
    greeting: String,
}

#[derive(Deserialize)]
struct RecommendQuery {
    genre: String,
}

#[derive(Deserialize)]
struct SubmitForm {
    name: String,
    age: u8,
    favorite_genre: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    status: String,
    message: Option<String>,
}

#[derive(Serialize)]
struct RecordsResponse {
    records: Vec<UserRecord>,
    warning: Option<String>,
}

#[derive(Serialize)]
struct StatsResponse {
    #[serde(flatten)]
    summary: Summary,
    warning: Option<String>,
}

/// Build the application router around an injected record store.
pub fn router(store: Arc<dyn RecordStore>) -> Router {
    let app_state = Arc::new(AppState { store });

    Router::new()
        .route("/", get(serve_landing))
        .route("/recommender", get(serve_recommender))
        .route("/records", get(serve_records))
        .route("/api/greet", post(greet))
        .route("/api/chart.png", get(chart_png))
        .route("/api/recommend", get(recommend_titles))
        .route("/api/records", post(submit_record).get(list_records))
        .route("/api/stats", get(get_stats))
        .route("/api/export", get(export_csv))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state)
}

/// Run the web application
///
/// Binds the listener and serves requests until the process exits. The
/// store handle is constructed by the caller and shared across requests;
/// each request is one full request/response cycle with no client state on
/// the server.
pub async fn run(
    bind_addr: &str,
    store: Arc<dyn RecordStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(store);

    let listener = TcpListener::bind(bind_addr).await?;
    info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/landing.html"))
}

async fn serve_recommender() -> Html<&'static str> {
    Html(include_str!("./static/recommender.html"))
}

async fn serve_records() -> Html<&'static str> {
    Html(include_str!("./static/records.html"))
}

async fn greet(Json(payload): Json<GreetRequest>) -> Json<GreetResponse> {
    let name = payload.name.trim();
    let name = if name.is_empty() { "there" } else { name };

    Json(GreetResponse {
        greeting: format!("Hello, {}! 👋", name),
    })
}

async fn chart_png() -> impl IntoResponse {
    let series = chart::sample_series(chart::SERIES_LEN);

    match chart::render_line_chart(&series, &ChartOptions::default()) {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .header(header::CACHE_CONTROL, "no-store")
            .body(axum::body::Body::from(png))
            .unwrap(),
        Err(e) => {
            error!("chart rendering failed: {}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_string(&SubmitResponse {
                        status: "error".to_string(),
                        message: Some(e.to_string()),
                    })
                    .unwrap(),
                ))
                .unwrap()
        }
    }
}

async fn recommend_titles(Query(params): Query<RecommendQuery>) -> impl IntoResponse {
    let movies = recommend(&params.genre);

    Json(serde_json::json!({
        "genre": params.genre,
        "movies": movies,
    }))
}

async fn submit_record(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubmitForm>,
) -> impl IntoResponse {
    let name = form.name.trim();
    if name.is_empty() {
        return Json(SubmitResponse {
            status: "error".to_string(),
            message: Some("name cannot be empty".to_string()),
        });
    }

    if !(1..=120).contains(&form.age) {
        return Json(SubmitResponse {
            status: "error".to_string(),
            message: Some("age must be between 1 and 120".to_string()),
        });
    }

    let genre = match Genre::parse(form.favorite_genre.trim()) {
        Some(genre) => genre,
        None => {
            return Json(SubmitResponse {
                status: "error".to_string(),
                message: Some(format!("unknown genre: {}", form.favorite_genre)),
            });
        }
    };

    let record = UserRecord::new(name, form.age, genre);

    // A failed append is lost with one warning; the page keeps working
    match state.store.append(&record).await {
        Ok(()) => Json(SubmitResponse {
            status: "ok".to_string(),
            message: None,
        }),
        Err(e) => {
            error!("append failed: {}", e);
            Json(SubmitResponse {
                status: "error".to_string(),
                message: Some(format!("could not save your entry: {}", e)),
            })
        }
    }
}

async fn list_records(State(state): State<Arc<AppState>>) -> Json<RecordsResponse> {
    // Best effort: a failed read degrades to an empty table plus a warning
    match state.store.load_all().await {
        Ok(records) => Json(RecordsResponse {
            records,
            warning: None,
        }),
        Err(e) => {
            warn!("record load failed: {}", e);
            Json(RecordsResponse {
                records: Vec::new(),
                warning: Some(format!("showing an empty table: {}", e)),
            })
        }
    }
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    match state.store.load_all().await {
        Ok(records) => Json(StatsResponse {
            summary: stats::summarize(&records),
            warning: None,
        }),
        Err(e) => {
            warn!("record load failed: {}", e);
            Json(StatsResponse {
                summary: stats::summarize(&[]),
                warning: Some(format!("statistics unavailable: {}", e)),
            })
        }
    }
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let records = match state.store.load_all().await {
        Ok(records) => records,
        Err(e) => {
            warn!("record load failed: {}", e);
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_string(&SubmitResponse {
                        status: "error".to_string(),
                        message: Some(e.to_string()),
                    })
                    .unwrap(),
                ))
                .unwrap();
        }
    };

    let csv = downloader::to_csv(&records);
    let filename = downloader::export_filename(Utc::now().date_naive());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(axum::body::Body::from(csv))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use async_trait::async_trait;

    /// Store double whose reads and writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn append(&self, _record: &UserRecord) -> Result<(), StoreError> {
            Err(StoreError::Write("stub transport failure".to_string()))
        }

        async fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
            Err(StoreError::Read("stub transport failure".to_string()))
        }
    }

    async fn spawn_app(store: Arc<dyn RecordStore>) -> String {
        let app = router(store);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn submitted_record_shows_up_everywhere() {
        let base = spawn_app(Arc::new(MemoryStore::new())).await;
        let client = reqwest::Client::new();

        let before: serde_json::Value = client
            .get(format!("{}/api/stats", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(before["total"], 0);

        let submit: serde_json::Value = client
            .post(format!("{}/api/records", base))
            .form(&[
                ("name", "Ada"),
                ("age", "30"),
                ("favorite_genre", "Sci-Fi"),
            ])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(submit["status"], "ok");

        let records: serde_json::Value = client
            .get(format!("{}/api/records", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(records["records"].as_array().unwrap().len(), 1);
        assert_eq!(records["records"][0]["name"], "Ada");
        assert_eq!(records["records"][0]["age"], 30);
        assert_eq!(records["records"][0]["favorite_genre"], "Sci-Fi");

        let after: serde_json::Value = client
            .get(format!("{}/api/stats", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(after["total"], 1);
        assert_eq!(after["average_age"], 30.0);

        let recommendation: serde_json::Value = client
            .get(format!("{}/api/recommend?genre=Sci-Fi", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            recommendation["movies"],
            serde_json::json!(["Inception", "The Matrix", "Interstellar", "Blade Runner 2049"])
        );
    }

    #[tokio::test]
    async fn invalid_submissions_are_rejected_inline() {
        let base = spawn_app(Arc::new(MemoryStore::new())).await;
        let client = reqwest::Client::new();

        for bad_form in [
            [("name", "   "), ("age", "30"), ("favorite_genre", "Sci-Fi")],
            [("name", "Ada"), ("age", "0"), ("favorite_genre", "Sci-Fi")],
            [("name", "Ada"), ("age", "30"), ("favorite_genre", "Horror")],
        ] {
            let response: serde_json::Value = client
                .post(format!("{}/api/records", base))
                .form(&bad_form)
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            assert_eq!(response["status"], "error", "form {:?}", bad_form);
        }

        let records: serde_json::Value = client
            .get(format!("{}/api/records", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(records["records"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn broken_store_degrades_to_empty_view() {
        let base = spawn_app(Arc::new(BrokenStore)).await;
        let client = reqwest::Client::new();

        let records: serde_json::Value = client
            .get(format!("{}/api/records", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(records["records"].as_array().unwrap().is_empty());
        assert!(records["warning"].as_str().unwrap().contains("empty table"));

        let submit: serde_json::Value = client
            .post(format!("{}/api/records", base))
            .form(&[
                ("name", "Ada"),
                ("age", "30"),
                ("favorite_genre", "Sci-Fi"),
            ])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(submit["status"], "error");

        // The rest of the page still works
        let greeting: serde_json::Value = client
            .post(format!("{}/api/greet", base))
            .json(&serde_json::json!({ "name": "" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(greeting["greeting"], "Hello, there! 👋");
    }

    #[tokio::test]
    async fn csv_export_matches_store_contents() {
        let store = Arc::new(MemoryStore::new());
        store
            .append(&UserRecord::new("Ada", 30, Genre::SciFi))
            .await
            .unwrap();
        store
            .append(&UserRecord::new("Grace", 40, Genre::Comedy))
            .await
            .unwrap();

        let base = spawn_app(store).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("{}/api/export", base))
            .send()
            .await
            .unwrap();

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("user_records_"));
        assert!(disposition.ends_with(".csv\""));

        let body = response.text().await.unwrap();
        assert_eq!(body.lines().count(), 3);
        assert!(body.starts_with("timestamp,name,age,favorite_genre\n"));
        assert!(body.contains("Ada"));
        assert!(body.contains("Grace"));
    }

    #[tokio::test]
    async fn pages_are_served() {
        let base = spawn_app(Arc::new(MemoryStore::new())).await;
        let client = reqwest::Client::new();

        for path in ["/", "/recommender", "/records"] {
            let response = client.get(format!("{}{}", base, path)).send().await.unwrap();
            assert!(response.status().is_success(), "page {} failed", path);
            assert!(response.text().await.unwrap().contains("<html"));
        }
    }
}
