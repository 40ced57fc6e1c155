//! End-to-end tests for the client against a local mockito server

use fetchit::http::{
    Client, ContentType, FormValue, HttpError, Payload, ReqwestBackend, RequestConfig, StaticToken,
};
use fetchit::{error::AppError, handle_request, session::Session, RequestArgs};
use http::Method;
use mockito::Matcher;
use serde_json::json;

fn client() -> Client<ReqwestBackend> {
    Client::new(ReqwestBackend).with_credentials(StaticToken::new("ambient"))
}

#[tokio::test]
async fn test_get_sends_token_and_json_content_type() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/items")
        .match_header("token", "ambient")
        .match_header("content-type", ContentType::JSON)
        .match_body(Matcher::Exact(String::new()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 1, "name": "widget"}]"#)
        .create_async()
        .await;

    let url = format!("{}/api/items", server.url());
    let payload = client().get(&url).await.expect("GET should succeed");
    let items = payload.as_json().expect("JSON payload");
    assert_eq!(items[0]["name"], "widget");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_sends_form_encoded_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/items")
        .match_header("content-type", ContentType::FORM)
        .match_body(Matcher::Exact("a=1&b[c]=2".to_string()))
        .with_status(201)
        .with_header("content-type", "text/plain")
        .with_body("created")
        .create_async()
        .await;

    let url = format!("{}/api/items", server.url());
    let config = RequestConfig::new()
        .method(Method::POST)
        .body(json!({"a": 1, "b": {"c": 2}}));
    let payload = client().send(&url, config).await.expect("POST should succeed");
    assert_eq!(payload.as_text(), Some("created"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_patch_forwards_caller_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PATCH", "/api/items/1")
        .match_header("x-requested-with", "XMLHttpRequest")
        .match_header("token", "explicit")
        .match_header("content-type", ContentType::JSON)
        .match_body(Matcher::Exact("name=renamed".to_string()))
        .with_status(204)
        .create_async()
        .await;

    let url = format!("{}/api/items/1", server.url());
    let config = RequestConfig::new()
        .method(Method::PATCH)
        .header("X-Requested-With", "XMLHttpRequest")
        .token("explicit")
        .body(json!({"name": "renamed"}));
    let payload = client().send(&url, config).await.expect("PATCH should succeed");
    assert_eq!(payload, Payload::Text(String::new()));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_rejects_with_decoded_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/items/9")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "not found"}"#)
        .create_async()
        .await;

    let url = format!("{}/api/items/9", server.url());
    let err = client().get(&url).await.expect_err("404 should reject");
    assert_eq!(
        err,
        HttpError::Rejected {
            status: 404,
            payload: Payload::Json(json!({"message": "not found"})),
        }
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_rejects_with_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/items/1")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let url = format!("{}/api/items/1", server.url());
    let config = RequestConfig::new().method(Method::DELETE);
    let err = client().send(&url, config).await.expect_err("500 should reject");
    assert_eq!(
        err.into_payload(),
        Some(Payload::Text("Internal Server Error".to_string()))
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_multipart_and_video_responses() {
    let mut server = mockito::Server::new_async().await;
    let form = server
        .mock("GET", "/form")
        .with_status(200)
        .with_header("content-type", "multipart/form-data; boundary=sep")
        .with_body(concat!(
            "--sep\r\n",
            "Content-Disposition: form-data; name=\"field\"\r\n",
            "\r\n",
            "value with --sep inside\r\n",
            "--sep--\r\n",
        ))
        .create_async()
        .await;
    let video = server
        .mock("GET", "/clip")
        .with_status(200)
        .with_header("content-type", "video/mp4")
        .with_body([0u8, 0, 0, 24, 102, 116, 121, 112])
        .create_async()
        .await;

    let payload = client()
        .get(&format!("{}/form", server.url()))
        .await
        .expect("form should decode");
    let Payload::Form(data) = payload else {
        panic!("expected form payload, got {payload:?}");
    };
    assert_eq!(
        data.get("field"),
        Some(&FormValue::Text("value with --sep inside".to_string()))
    );

    let payload = client()
        .get(&format!("{}/clip", server.url()))
        .await
        .expect("blob should decode");
    let Payload::Blob(blob) = payload else {
        panic!("expected blob payload, got {payload:?}");
    };
    assert_eq!(blob.data, vec![0u8, 0, 0, 24, 102, 116, 121, 112]);
    assert_eq!(blob.content_type.as_deref(), Some("video/mp4"));

    form.assert_async().await;
    video.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let err = client()
        .get("http://127.0.0.1:1/nothing")
        .await
        .expect_err("connection should fail");
    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_handle_request_uses_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/v1/items/3")
        .match_header("token", "session-token")
        .match_body(Matcher::Exact("price=9".to_string()))
        .with_status(409)
        .with_header("content-type", "text/plain")
        .with_body("conflict")
        .create_async()
        .await;

    let session = Session {
        token: Some("session-token".to_string()),
        base_url: Some(format!("{}/v1", server.url())),
    };
    let client = Client::new(ReqwestBackend).with_credentials(session.clone());
    let args = RequestArgs {
        url: "/items/3".to_string(),
        params: vec!["price=9".to_string()],
        ..Default::default()
    };

    let err = handle_request(&client, Method::PUT, &args, &session)
        .await
        .expect_err("409 should reject");
    assert!(matches!(err, AppError::Rejected { status: 409 }));

    mock.assert_async().await;
}
