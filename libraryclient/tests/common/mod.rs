#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use libraryclient::{Client, ClientConfig};

pub const ENTITY_ID: &str = "5c9b6f3e2a1d4b0012ab34cd";
pub const COLLECTION_ID: &str = "5c9b6f3e2a1d4b0012ab34ce";
pub const CONTAINER_ID: &str = "5c9b6f3e2a1d4b0012ab34cf";
pub const IMAGE_ID: &str = "5c9b6f3e2a1d4b0012ab34d0";
pub const NEW_ID: &str = "5c9b6f3e2a1d4b0012ab34ff";

/// One request as the stub registry saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
pub struct StubRegistry {
    requests: Mutex<Vec<Recorded>>,
    tags: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl StubRegistry {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn tags_of(&self, container: &str) -> HashMap<String, String> {
        self.tags.lock().unwrap().get(container).cloned().unwrap_or_default()
    }

    pub fn seed_tag(&self, container: &str, tag: &str, image: &str) {
        self.tags
            .lock()
            .unwrap()
            .entry(container.to_string())
            .or_default()
            .insert(tag.to_string(), image.to_string());
    }
}

pub struct TestServer {
    pub handle: JoinHandle<()>,
    pub port: u16,
    pub stub: Arc<StubRegistry>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn client(&self) -> Client {
        Client::new(&ClientConfig::new(self.url())).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// Start the stub registry on a random available port
pub async fn start_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let stub = Arc::new(StubRegistry::default());

    let mut app = Router::new()
        .route("/v1/tags/{container}", get(get_tags).post(set_tag))
        .route("/v1/search", get(search));

    for kind in ["entities", "collections", "containers", "images"] {
        app = app
            .route(
                &format!("/v1/{}", kind),
                post(
                    move |State(stub): State<Arc<StubRegistry>>, Json(body): Json<Value>| {
                        create_record(kind, stub, body)
                    },
                ),
            )
            .route(
                &format!("/v1/{}/{{*reference}}", kind),
                get(
                    move |State(stub): State<Arc<StubRegistry>>, Path(reference): Path<String>| {
                        get_record(kind, stub, reference)
                    },
                ),
            );
    }

    let app = app
        .layer(middleware::from_fn_with_state(Arc::clone(&stub), record))
        .with_state(Arc::clone(&stub));

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer { handle, port, stub }
}

// Remember every request before routing it
async fn record(State(stub): State<Arc<StubRegistry>>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    stub.requests.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        body: serde_json::from_slice(&bytes).ok(),
        authorization: parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({"error": {"code": status.as_u16(), "message": message}})),
    )
        .into_response()
}

async fn get_record(kind: &'static str, _stub: Arc<StubRegistry>, reference: String) -> Response {
    match reference.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "forbidden" => error_body(StatusCode::FORBIDDEN, "not yours"),
        "gateway" => (StatusCode::BAD_GATEWAY, "upstream went away").into_response(),
        "garbled" => (StatusCode::OK, "{\"data\": ").into_response(),
        _ => {
            let mut data = json!({
                "id": ENTITY_ID,
                "description": "stored",
                "createdBy": "alice",
                "createdAt": "2019-03-27T12:00:00Z",
            });
            match kind {
                "images" => {
                    data["hash"] = json!(format!("sha256.{}", "ab".repeat(32)));
                    data["container"] = json!(CONTAINER_ID);
                }
                "containers" => {
                    data["name"] = json!(&reference);
                    data["collection"] = json!(COLLECTION_ID);
                    data["imageTags"] = json!({"latest": IMAGE_ID});
                }
                "collections" => {
                    data["name"] = json!(&reference);
                    data["entity"] = json!(ENTITY_ID);
                }
                _ => data["name"] = json!(&reference),
            }
            Json(json!({ "data": data })).into_response()
        }
    }
}

// Echo the record back with a fresh id. Collections answer 200, the rest 201.
async fn create_record(kind: &'static str, _stub: Arc<StubRegistry>, mut body: Value) -> Response {
    match body.get("name").and_then(Value::as_str) {
        Some("duplicate") => return error_body(StatusCode::CONFLICT, "name already taken"),
        Some("silent") => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => {}
    }

    body["id"] = json!(NEW_ID);
    let status = if kind == "collections" {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, Json(json!({ "data": body }))).into_response()
}

async fn get_tags(State(stub): State<Arc<StubRegistry>>, Path(container): Path<String>) -> Response {
    if container == "forbidden" {
        return error_body(StatusCode::FORBIDDEN, "not yours");
    }
    if container == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "data": stub.tags_of(&container) })).into_response()
}

async fn set_tag(
    State(stub): State<Arc<StubRegistry>>,
    Path(container): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let tag = body["Tag"].as_str().unwrap_or_default().to_string();
    let image = body["ImageID"].as_str().unwrap_or_default().to_string();

    if tag == "rejected" {
        return error_body(StatusCode::BAD_REQUEST, "invalid tag name");
    }
    if tag == "created" {
        // only 200 is acceptable for tag updates
        return StatusCode::CREATED.into_response();
    }

    stub.seed_tag(&container, &tag, &image);
    Json(json!({ "data": null })).into_response()
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    let value = params.get("value").cloned().unwrap_or_default();
    match value.as_str() {
        "nothing" => StatusCode::NOT_FOUND.into_response(),
        "quiet" => Json(json!({"data": {}})).into_response(),
        _ => Json(json!({
            "data": {
                "entity": [{"id": ENTITY_ID, "name": value}],
                "container": [{"id": CONTAINER_ID, "name": value, "collection": COLLECTION_ID}],
                "image": [],
            }
        }))
        .into_response(),
    }
}
