//! Tests for HttpDispatcher.

use super::*;
use crate::config::ClientSettings;
use mockito::Matcher;
use serde::Deserialize;
use serde_json::json;

fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig::new(ClientSettings {
        base_url: Some(base_url.to_string()),
        client_id: Some("id".to_string()),
        client_secret: Some("secret".to_string()),
        connect_timeout_ms: Some(1000),
        read_timeout_ms: Some(2000),
        ..ClientSettings::default()
    })
    .unwrap()
}

fn dispatcher_for(server: &mockito::ServerGuard) -> HttpDispatcher {
    HttpDispatcher::new(config_for(&server.url())).unwrap()
}

#[test]
fn join_url_normalises_single_slash() {
    assert_eq!(join_url("https://api.test", "/v1/x"), "https://api.test/v1/x");
    assert_eq!(join_url("https://api.test/", "/v1/x"), "https://api.test/v1/x");
    assert_eq!(join_url("https://api.test", "v1/x"), "https://api.test/v1/x");
    assert_eq!(join_url("https://api.test/", ""), "https://api.test");
}

#[test]
fn query_values_flatten_lists_into_repeated_keys() {
    let params = query_params([
        ("ages", QueryValue::from(vec!["4", "5"])),
        ("display", QueryValue::from(10)),
        ("exact", QueryValue::from(true)),
    ]);

    assert_eq!(
        flatten_query(&params),
        vec![
            ("ages".to_string(), "4".to_string()),
            ("ages".to_string(), "5".to_string()),
            ("display".to_string(), "10".to_string()),
            ("exact".to_string(), "true".to_string()),
        ]
    );
}

#[test]
fn redacts_credential_headers_in_logs() {
    let redacted = redact_headers(&headers([
        ("X-Naver-Client-Secret", "s3cr3t"),
        ("X-Naver-Client-Id", "visible"),
    ]));

    assert!(redacted.contains(&("X-Naver-Client-Secret".to_string(), "***".to_string())));
    assert!(redacted.contains(&("X-Naver-Client-Id".to_string(), "visible".to_string())));
}

#[test]
fn get_hits_base_url_plus_path_with_json_content_type() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/search/blog.json")
        .match_header("content-type", JSON_CONTENT_TYPE)
        .with_status(200)
        .with_header("content-type", "application/json;charset=UTF-8")
        .with_body(r#"{"total": 3}"#)
        .create();

    let response = dispatcher_for(&server).get("/v1/search/blog.json").unwrap();

    mock.assert();
    assert_eq!(response.status(), 200);
    assert!(response.is_success());
    assert_eq!(response.content_type(), Some("application/json;charset=UTF-8"));
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["total"], 3);
}

#[test]
fn get_with_query_encodes_parameters() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/search/news.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "경제".into()),
            Matcher::UrlEncoded("display".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body("{}")
        .create();

    let params = query_params([
        ("query", QueryValue::from("경제")),
        ("display", QueryValue::from(10)),
    ]);
    let response = dispatcher_for(&server)
        .get_with_query("/v1/search/news.json", &params)
        .unwrap();

    mock.assert();
    assert_eq!(response.status(), 200);
}

#[test]
fn post_sends_serialized_json_body() {
    #[derive(Serialize)]
    struct Payload<'a> {
        #[serde(rename = "timeUnit")]
        time_unit: &'a str,
    }

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/v1/datalab/search")
        .match_header("content-type", JSON_CONTENT_TYPE)
        .match_body(Matcher::Json(json!({"timeUnit": "month"})))
        .with_status(200)
        .with_body(r#"{"timeUnit": "month"}"#)
        .create();

    let response = dispatcher_for(&server)
        .post("/v1/datalab/search", &Payload { time_unit: "month" })
        .unwrap();

    mock.assert();
    assert_eq!(response.status(), 200);
}

#[test]
fn put_and_delete_use_their_verbs() {
    let mut server = mockito::Server::new();
    let put = server
        .mock("PUT", "/v1/items/7")
        .match_body(Matcher::Json(json!({"name": "renamed"})))
        .with_status(204)
        .create();
    let delete = server.mock("DELETE", "/v1/items/7").with_status(204).create();

    let dispatcher = dispatcher_for(&server);
    let put_response = dispatcher.put("/v1/items/7", &json!({"name": "renamed"})).unwrap();
    let delete_response = dispatcher.delete("/v1/items/7").unwrap();

    put.assert();
    delete.assert();
    assert_eq!(put_response.status(), 204);
    assert_eq!(delete_response.status(), 204);
    assert!(delete_response.bytes().is_empty());
}

#[test]
fn client_errors_are_returned_as_responses() {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(rename = "errorMessage")]
        error_message: String,
        #[serde(rename = "errorCode")]
        error_code: String,
    }

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/search/blog.json")
        .with_status(400)
        .with_body(r#"{"errorMessage": "Incorrect query request (잘못된 쿼리요청입니다.)", "errorCode": "SE01"}"#)
        .create();

    let response = dispatcher_for(&server).get("/v1/search/blog.json").unwrap();

    mock.assert();
    assert_eq!(response.status(), 400);
    assert!(!response.is_success());
    let body: ErrorBody = response.json().unwrap();
    assert_eq!(body.error_code, "SE01");
    assert!(body.error_message.contains("Incorrect query"));
}

#[test]
fn server_errors_are_returned_as_responses() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/v1/datalab/search").with_status(500).create();

    let response = dispatcher_for(&server)
        .post("/v1/datalab/search", &json!({}))
        .unwrap();

    mock.assert();
    assert_eq!(response.status(), 500);
}

#[test]
fn call_headers_override_template_and_do_not_leak() {
    let mut server = mockito::Server::new();
    let with_headers = server
        .mock("GET", "/v1/first")
        .match_header("x-trace-id", "abc")
        .match_header("accept", "text/plain")
        .with_status(200)
        .create();
    let without_headers = server
        .mock("GET", "/v1/second")
        .match_header("x-trace-id", Matcher::Missing)
        .match_header("accept", JSON_CONTENT_TYPE)
        .with_status(200)
        .create();

    let dispatcher = dispatcher_for(&server);
    dispatcher
        .get_with_headers(
            "/v1/first",
            &headers([("X-Trace-Id", "abc"), ("Accept", "text/plain")]),
        )
        .unwrap();
    dispatcher.get("/v1/second").unwrap();

    with_headers.assert();
    without_headers.assert();
}

#[test]
fn get_with_headers_and_query_sends_both() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/search/book.json")
        .match_header("x-naver-client-id", "id")
        .match_query(Matcher::UrlEncoded("query".into(), "rust".into()))
        .with_status(200)
        .create();

    dispatcher_for(&server)
        .get_with_headers_and_query(
            "/v1/search/book.json",
            &headers([("X-Naver-Client-Id", "id")]),
            &query_params([("query", "rust")]),
        )
        .unwrap();

    mock.assert();
}

#[test]
fn invalid_header_name_is_rejected_before_sending() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/v1/x").expect(0).create();

    let err = dispatcher_for(&server)
        .get_with_headers("/v1/x", &headers([("bad header", "v")]))
        .unwrap_err();

    mock.assert();
    assert!(matches!(err, ClientError::InvalidHeader(_)));
}

#[test]
fn connection_refused_is_transport_error() {
    let dispatcher = HttpDispatcher::new(config_for("http://127.0.0.1:1")).unwrap();

    let err = dispatcher.get("/v1/search/blog.json").unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.kind(), "transport");
}

#[test]
fn undecodable_body_is_json_error() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/text")
        .with_status(200)
        .with_body("not json")
        .create();

    let response = dispatcher_for(&server).get("/v1/text").unwrap();

    assert_eq!(response.text(), "not json");
    assert!(matches!(
        response.json::<serde_json::Value>(),
        Err(ClientError::Json(_))
    ));
}

#[test]
fn dispatcher_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpDispatcher>();
}

#[test]
fn read_timeout_bounds_the_whole_exchange() {
    use std::io::Write;

    let mut server = mockito::Server::new();
    server
        .mock("GET", "/v1/slow")
        .with_status(200)
        .with_chunked_body(|w| {
            w.write_all(b"{\"partial\":")?;
            std::thread::sleep(std::time::Duration::from_millis(800));
            w.write_all(b"true}")
        })
        .create();

    let config = ClientConfig::new(ClientSettings {
        base_url: Some(server.url()),
        client_id: Some("id".to_string()),
        client_secret: Some("secret".to_string()),
        read_timeout_ms: Some(200),
        ..ClientSettings::default()
    })
    .unwrap();

    let err = HttpDispatcher::new(config)
        .unwrap()
        .get("/v1/slow")
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}
