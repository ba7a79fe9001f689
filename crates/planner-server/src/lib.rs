//! HTTP server for the study planner.
//!
//! Mounts the REST API under `/api`, optionally serves a built frontend from
//! a static directory, and applies request tracing and CORS.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  http::{HeaderValue, Method, header},
  routing::get,
};
use planner_core::store::PlannerStore;
use planner_store_json::DataPaths;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PLANNER_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  /// Directory holding the collection files.
  pub data_dir:      PathBuf,
  /// Defaults to `<data_dir>/backups`.
  pub backup_dir:    Option<PathBuf>,
  /// Browser origin allowed to call the API with credentials. Defaults to
  /// the development frontend; an empty string disables CORS.
  pub client_origin: Option<String>,
  /// Built frontend served for any path outside `/api`.
  pub static_dir:    Option<PathBuf>,
}

pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:3000";

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_owned(),
      port:          3001,
      data_dir:      PathBuf::from("data"),
      backup_dir:    None,
      client_origin: Some(DEFAULT_CLIENT_ORIGIN.to_owned()),
      static_dir:    None,
    }
  }
}

impl ServerConfig {
  pub fn data_paths(&self) -> DataPaths {
    let paths = DataPaths::new(&self.data_dir);
    match &self.backup_dir {
      Some(dir) => paths.with_backup_dir(dir),
      None => paths,
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  fn cors(&self) -> Result<Option<CorsLayer>, Error> {
    let Some(origin) = self.client_origin.as_deref().filter(|o| !o.is_empty()) else {
      return Ok(None);
    };
    let origin = HeaderValue::from_str(origin).map_err(|source| Error::InvalidOrigin {
      origin: origin.to_owned(),
      source,
    })?;
    Ok(Some(
      CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
          Method::GET,
          Method::POST,
          Method::PUT,
          Method::DELETE,
          Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true),
    ))
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid client origin {origin:?}: {source}")]
  InvalidOrigin {
    origin: String,
    #[source]
    source: axum::http::header::InvalidHeaderValue,
  },
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Result<Router, Error>
where
  S: PlannerStore + 'static,
{
  let app = Router::new().nest("/api", planner_api::api_router(store));

  let app = match &config.static_dir {
    Some(dir) => app.fallback_service(ServeDir::new(dir)),
    None => app.route("/", get(root)),
  };

  let app = match config.cors()? {
    Some(cors) => app.layer(cors),
    None => app,
  };

  Ok(app.layer(TraceLayer::new_for_http()))
}

async fn root() -> Json<Value> { Json(json!({ "message": "Study Planner API is running!" })) }

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use planner_store_json::JsonStore;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  async fn app_with(config: impl FnOnce(&mut ServerConfig)) -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = ServerConfig {
      data_dir: dir.path().join("data"),
      ..Default::default()
    };
    config(&mut cfg);
    let store = JsonStore::open(cfg.data_paths()).await.unwrap();
    (dir, router(Arc::new(store), &cfg).unwrap())
  }

  async fn app() -> (TempDir, Router) { app_with(|_| {}).await }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let res = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn cs101() -> Value {
    json!({
      "name": "Introduction to Computer Science",
      "code": "CS101",
      "instructor": "Dr. Smith",
      "semester": "Fall",
      "year": 2024
    })
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_ok() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
  }

  #[tokio::test]
  async fn root_answers_without_static_dir() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
  }

  // ── Courses ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_course_then_fetch_it() {
    let (_dir, app) = app().await;
    let (status, created) = send(&app, "POST", "/api/courses", Some(cs101())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["color"], "#3B82F6");

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/courses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
  }

  #[tokio::test]
  async fn duplicate_course_is_conflict() {
    let (_dir, app) = app().await;
    send(&app, "POST", "/api/courses", Some(cs101())).await;
    let (status, body) = send(&app, "POST", "/api/courses", Some(cs101())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
      body["error"],
      "course with code CS101 already exists for Fall 2024"
    );
  }

  #[tokio::test]
  async fn invalid_course_is_bad_request() {
    let (_dir, app) = app().await;
    let mut course = cs101();
    course["year"] = json!(1999);
    let (status, body) = send(&app, "POST", "/api/courses", Some(course)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("year"));

    let (status, body) = send(&app, "POST", "/api/courses", Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn missing_course_is_not_found() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/api/courses/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "PUT", "/api/courses/nope", Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn course_with_assignments_cannot_be_deleted() {
    let (_dir, app) = app().await;
    let (_, course) = send(&app, "POST", "/api/courses", Some(cs101())).await;
    let course_id = course["id"].as_str().unwrap();

    let (status, assignment) = send(
      &app,
      "POST",
      "/api/assignments",
      Some(json!({ "title": "HW1", "courseId": course_id, "dueDate": "2024-12-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["status"], "pending");
    assert_eq!(assignment["priority"], "medium");

    let course_uri = format!("/api/courses/{course_id}");
    let (status, _) = send(&app, "DELETE", &course_uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let assignment_uri = format!("/api/assignments/{}", assignment["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &assignment_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &course_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &course_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn course_meta_lists_distinct_values() {
    let (_dir, app) = app().await;
    send(&app, "POST", "/api/courses", Some(cs101())).await;
    let mut spring = cs101();
    spring["semester"] = json!("Spring");
    spring["year"] = json!(2025);
    send(&app, "POST", "/api/courses", Some(spring)).await;

    let (_, semesters) = send(&app, "GET", "/api/courses/meta/semesters", None).await;
    assert_eq!(semesters, json!(["Spring", "Fall"]));
    let (_, years) = send(&app, "GET", "/api/courses/meta/years", None).await;
    assert_eq!(years, json!([2025, 2024]));

    let (_, fall) = send(&app, "GET", "/api/courses?semester=Fall", None).await;
    assert_eq!(fall.as_array().unwrap().len(), 1);
  }

  // ── Assignments ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn assignment_filters_come_from_query() {
    let (_dir, app) = app().await;
    for (title, due, status) in [
      ("Essay", "2024-12-01", "pending"),
      ("Lab", "2024-12-10", "completed"),
    ] {
      send(
        &app,
        "POST",
        "/api/assignments",
        Some(json!({ "title": title, "courseId": "c1", "dueDate": due, "status": status })),
      )
      .await;
    }

    let (status, list) = send(&app, "GET", "/api/assignments?status=completed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["title"], "Lab");
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, list) = send(
      &app,
      "GET",
      "/api/assignments?startDate=2024-11-30&endDate=2024-12-02",
      None,
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Essay");

    let (_, overdue) = send(&app, "GET", "/api/assignments/overdue", None).await;
    assert_eq!(overdue.as_array().unwrap().len(), 1);
    assert_eq!(overdue[0]["title"], "Essay");
  }

  #[tokio::test]
  async fn malformed_query_values_are_bad_requests() {
    let (_dir, app) = app().await;
    let (status, body) = send(&app, "GET", "/api/assignments?startDate=soon", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/assignments?status=someday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Notes ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn notes_by_tag_and_assignment() {
    let (_dir, app) = app().await;
    send(
      &app,
      "POST",
      "/api/notes",
      Some(json!({
        "title": "Trees",
        "content": "Binary trees",
        "assignmentId": "a1",
        "tags": ["trees", "algorithms"]
      })),
    )
    .await;
    send(
      &app,
      "POST",
      "/api/notes",
      Some(json!({ "title": "SQL", "content": "Joins", "tags": ["database"] })),
    )
    .await;

    let (_, tags) = send(&app, "GET", "/api/notes/tags", None).await;
    assert_eq!(tags, json!(["algorithms", "database", "trees"]));

    let (_, tagged) = send(&app, "GET", "/api/notes?tags=database,%20missing", None).await;
    assert_eq!(tagged.as_array().unwrap().len(), 1);
    assert_eq!(tagged[0]["title"], "SQL");

    let (_, attached) = send(&app, "GET", "/api/notes/assignment/a1", None).await;
    assert_eq!(attached.as_array().unwrap().len(), 1);
    assert_eq!(attached[0]["title"], "Trees");
  }

  #[tokio::test]
  async fn note_update_and_delete() {
    let (_dir, app) = app().await;
    let (_, note) = send(
      &app,
      "POST",
      "/api/notes",
      Some(json!({ "title": "Draft", "content": "..." })),
    )
    .await;
    let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "title": "Final" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["content"], "...");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Dashboard ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dashboard_summarises_store() {
    let (_dir, app) = app().await;
    let (_, course) = send(&app, "POST", "/api/courses", Some(cs101())).await;
    send(
      &app,
      "POST",
      "/api/assignments",
      Some(json!({
        "title": "Old",
        "courseId": course["id"],
        "dueDate": "2020-01-01",
        "status": "completed"
      })),
    )
    .await;

    let (status, dash) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["stats"]["totalCourses"], 1);
    assert_eq!(dash["stats"]["completionRate"], 100);
    assert_eq!(dash["courseProgress"][0]["percentage"], 100);
  }

  // ── Layers ──────────────────────────────────────────────────────────────────

  async fn get_with_origin(app: Router, origin: &str) -> axum::response::Response {
    let req = Request::builder()
      .uri("/api/health")
      .header(header::ORIGIN, origin)
      .body(Body::empty())
      .unwrap();
    app.oneshot(req).await.unwrap()
  }

  #[tokio::test]
  async fn cors_defaults_to_dev_frontend_with_credentials() {
    let (_dir, app) = app().await;
    let res = get_with_origin(app, DEFAULT_CLIENT_ORIGIN).await;
    assert_eq!(
      res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
      DEFAULT_CLIENT_ORIGIN
    );
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
  }

  #[tokio::test]
  async fn cors_allows_configured_origin() {
    let (_dir, app) =
      app_with(|cfg| cfg.client_origin = Some("https://planner.example".into())).await;
    let res = get_with_origin(app, "https://planner.example").await;
    assert_eq!(
      res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
      "https://planner.example"
    );
  }

  #[tokio::test]
  async fn empty_origin_disables_cors() {
    let (_dir, app) = app_with(|cfg| cfg.client_origin = Some(String::new())).await;
    let res = get_with_origin(app, DEFAULT_CLIENT_ORIGIN).await;
    assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
  }

  #[tokio::test]
  async fn invalid_origin_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig {
      data_dir: dir.path().to_path_buf(),
      client_origin: Some("bad\norigin".into()),
      ..Default::default()
    };
    let store = JsonStore::open(cfg.data_paths()).await.unwrap();
    assert!(matches!(
      router(Arc::new(store), &cfg),
      Err(Error::InvalidOrigin { .. })
    ));
  }

  #[tokio::test]
  async fn static_dir_serves_frontend() {
    let web = tempfile::tempdir().unwrap();
    std::fs::write(web.path().join("index.html"), "<h1>planner</h1>").unwrap();
    let root = web.path().to_path_buf();
    let (_dir, app) = app_with(|cfg| cfg.static_dir = Some(root)).await;

    let req = Request::builder()
      .uri("/index.html")
      .body(Body::empty())
      .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
      .await
      .unwrap();
    assert_eq!(&bytes[..], b"<h1>planner</h1>");

    // The API still wins over the fallback.
    let (status, _) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
  }
}
