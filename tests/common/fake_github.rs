//! In-process stand-in for the GitHub REST and OAuth endpoints
//!
//! Repository names steer failures:
//! - `missing`  → 404 on every repository call
//! - `conflict` → 409 on content writes
//! - `invalid`  → 422 on pull requests

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const LOGIN: &str = "octocat";

/// One request received by the fake
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub struct FakeGitHub {
    addr: String,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeGitHub {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        let fake = Self {
            addr,
            calls: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new().fallback(handle).with_state(fake.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        fake
    }

    pub fn url(&self) -> String {
        self.addr.clone()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The single call matching `method` and `path`
    pub fn call(&self, method: Method, path: &str) -> RecordedCall {
        let matching: Vec<_> = self
            .calls()
            .into_iter()
            .filter(|call| call.method == method && call.path == path)
            .collect();
        assert_eq!(
            matching.len(),
            1,
            "expected exactly one {method} {path}, got {:?}",
            self.calls()
        );
        matching.into_iter().next().unwrap()
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Not Found", "documentation_url": "https://docs.github.com"})),
    )
        .into_response()
}

fn repository(name: &str, description: Value) -> Value {
    json!({
        "id": 1296269,
        "name": name,
        "full_name": format!("{LOGIN}/{name}"),
        "description": description,
        "private": false,
        "html_url": format!("https://github.com/{LOGIN}/{name}"),
        "default_branch": "main"
    })
}

async fn handle(
    State(fake): State<FakeGitHub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();
    fake.calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (Method::POST, ["login", "oauth", "access_token"]) => {
            if body["code"] == "good-code" && body["client_secret"] == "test-client-secret" {
                Json(json!({
                    "access_token": super::EXCHANGED_TOKEN,
                    "token_type": "bearer",
                    "scope": "repo"
                }))
                .into_response()
            } else {
                Json(json!({
                    "error": "bad_verification_code",
                    "error_description": "The code passed is incorrect or expired."
                }))
                .into_response()
            }
        }
        (Method::GET, ["user"]) => Json(json!({"login": LOGIN, "id": 1})).into_response(),
        (Method::GET, ["user", "repos"]) => Json(json!([
            repository("alpha", json!("first")),
            repository("beta", Value::Null),
            repository("gamma", json!("third")),
        ]))
        .into_response(),
        (Method::POST, ["user", "repos"]) => {
            let name = body["name"].as_str().unwrap_or_default();
            let mut repo = repository(name, body["description"].clone());
            repo["private"] = body["private"].clone();
            (StatusCode::CREATED, Json(repo)).into_response()
        }
        (_, ["repos", _, "missing", ..]) => not_found(),
        (Method::GET, ["repos", _, repo]) => Json(repository(repo, json!("a repo"))).into_response(),
        (Method::GET, ["repos", _, _, "git", "ref", "heads", branch @ ..]) => {
            let branch = branch.join("/");
            if branch == "absent" {
                return not_found();
            }
            Json(json!({
                "ref": format!("refs/heads/{branch}"),
                "node_id": "REF_node",
                "object": {"sha": format!("sha-of-{branch}"), "type": "commit"}
            }))
            .into_response()
        }
        (Method::POST, ["repos", _, _, "git", "refs"]) => (
            StatusCode::CREATED,
            Json(json!({
                "ref": body["ref"].clone(),
                "node_id": "REF_created",
                "object": {"sha": body["sha"].clone(), "type": "commit"}
            })),
        )
            .into_response(),
        (Method::POST, ["repos", _, "invalid", "pulls"]) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "Validation Failed"})),
        )
            .into_response(),
        (Method::POST, ["repos", _, _, "pulls"]) => (
            StatusCode::CREATED,
            Json(json!({
                "number": 7,
                "title": body["title"].clone(),
                "state": "open",
                "html_url": "https://github.com/octocat/demo/pull/7",
                "head": {"ref": body["head"].clone()},
                "base": {"ref": body["base"].clone()}
            })),
        )
            .into_response(),
        (Method::PUT, ["repos", _, "conflict", "contents", ..]) => (
            StatusCode::CONFLICT,
            Json(json!({"message": "sha wasn't supplied"})),
        )
            .into_response(),
        (Method::PUT, ["repos", _, _, "contents", file @ ..]) => (
            StatusCode::CREATED,
            Json(json!({
                "content": {"path": file.join("/"), "sha": "blob-sha"},
                "commit": {"sha": "commit-sha", "message": body["message"].clone()}
            })),
        )
            .into_response(),
        _ => not_found(),
    }
}
