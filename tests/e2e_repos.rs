//! E2E tests for the repository endpoints

mod common;

use common::{SESSION_TOKEN, TestServer};
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn test_list_repos_projects_upstream_in_order() {
    let server = TestServer::new().await;

    let response = server.get_authed("/github/listRepo").await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!([
            {"name": "alpha", "fullName": "octocat/alpha", "description": "first"},
            {"name": "beta", "fullName": "octocat/beta", "description": ""},
            {"name": "gamma", "fullName": "octocat/gamma", "description": "third"},
        ])
    );

    let call = server.github.call(Method::GET, "/user/repos");
    assert_eq!(
        call.authorization.as_deref(),
        Some(format!("Bearer {SESSION_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_create_repo_forwards_name() {
    let server = TestServer::new().await;

    let response = server
        .post_authed("/github/createRepo", json!({"repoName": "demo"}))
        .await;

    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains(r#""name":"demo""#), "unexpected body: {text}");

    let call = server.github.call(Method::POST, "/user/repos");
    assert_eq!(call.body["name"], "demo");
    assert_eq!(call.body["private"], false);
    assert!(call.body.get("description").is_none());
}

#[tokio::test]
async fn test_create_repo_forwards_visibility_and_description() {
    let server = TestServer::new().await;

    let response = server
        .post_authed(
            "/github/createRepo",
            json!({"repoName": "secret", "private": true, "description": "hidden"}),
        )
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["full_name"], "octocat/secret");
    assert_eq!(body["private"], true);
    assert_eq!(body["html_url"], "https://github.com/octocat/secret");
}

#[tokio::test]
async fn test_create_repo_without_name_is_rejected() {
    let server = TestServer::new().await;

    let response = server
        .post_authed("/github/createRepo", json!({"private": true}))
        .await;

    assert_eq!(response.status(), 400);
    assert!(server.github.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/github/createRepo"))
        .header("Cookie", server.session_cookie())
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(server.github.calls().is_empty());
}

#[tokio::test]
async fn test_get_repo_requires_name() {
    let server = TestServer::new().await;

    for path in ["/github/getRepo", "/github/getRepo?name="] {
        let response = server.get_authed(path).await;
        assert_eq!(response.status(), 400, "{path}");
    }

    assert!(server.github.calls().is_empty());
}

#[tokio::test]
async fn test_get_repo_looks_up_caller_then_repo() {
    let server = TestServer::new().await;

    let response = server.get_authed("/github/getRepo?name=demo").await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["full_name"], "octocat/demo");
    assert_eq!(body["default_branch"], "main");

    let paths: Vec<String> = server.github.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, ["/user", "/repos/octocat/demo"]);
}

#[tokio::test]
async fn test_get_repo_not_found() {
    let server = TestServer::new().await;

    let response = server.get_authed("/github/getRepo?name=missing").await;

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Repo not found");
}

#[tokio::test]
async fn test_body_without_json_content_type_is_unsupported() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/github/createRepo"))
        .header("Cookie", server.session_cookie())
        .body(r#"{"repoName":"demo"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 415);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(server.github.calls().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = TestServer::with_config(|config| config.server.max_body_bytes = 64).await;
    let description = "x".repeat(1024);

    let response = server
        .post_authed(
            "/github/createRepo",
            json!({"repoName": "demo", "description": description}),
        )
        .await;

    assert_eq!(response.status(), 413);
    assert!(server.github.calls().is_empty());
}
