use minihttpd::http::response::{Body, Response, ResponseBuilder, StatusCode, StatusTable};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::OK.as_u16(), 200);
    assert_eq!(StatusCode::CREATED.as_u16(), 201);
    assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), 500);
}

#[test]
fn test_status_table_reason_phrases() {
    let table = StatusTable::standard();

    assert_eq!(table.reason_phrase(StatusCode::OK), Some("OK"));
    assert_eq!(table.reason_phrase(StatusCode::CREATED), Some("Created"));
    assert_eq!(table.reason_phrase(StatusCode::NOT_FOUND), Some("Not Found"));
    assert_eq!(
        table.reason_phrase(StatusCode::INTERNAL_SERVER_ERROR),
        Some("Internal Server Error")
    );
    assert_eq!(table.reason_phrase(StatusCode(204)), None);
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::OK, "HTTP/1.1")
        .text("Hello, World!")
        .build();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.version(), "HTTP/1.1");
    assert_eq!(response.body(), &Body::Text("Hello, World!".to_string()));
}

#[test]
fn test_response_builder_header_order_is_stable() {
    let response = ResponseBuilder::new(StatusCode::OK, "HTTP/1.1")
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .header("Content-Type", "application/json")
        .build();

    let names: Vec<&str> = response.headers().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["Content-Type", "X-Custom"]);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
}

#[test]
fn test_response_builder_ignores_content_length() {
    let response = ResponseBuilder::new(StatusCode::OK, "HTTP/1.1")
        .header("Content-Length", "999")
        .header("content-length", "1")
        .text("test")
        .build();

    assert!(response.headers().is_empty());
}

#[test]
fn test_raw_body_wins_over_text() {
    let response = ResponseBuilder::new(StatusCode::OK, "HTTP/1.1")
        .text("plain")
        .raw(vec![1, 2, 3])
        .build();

    assert_eq!(response.body(), &Body::Raw(vec![1, 2, 3]));
}

#[test]
fn test_empty_raw_body_falls_back_to_text() {
    let response = ResponseBuilder::new(StatusCode::OK, "HTTP/1.1")
        .text("plain")
        .raw(Vec::new())
        .build();

    assert_eq!(response.body(), &Body::Text("plain".to_string()));
}

#[test]
fn test_empty_text_is_no_body() {
    let response = ResponseBuilder::new(StatusCode::OK, "HTTP/1.1").text("").build();

    assert!(response.body().is_empty());
}

#[test]
fn test_into_builder_round_trip() {
    let original = Response::text_plain("HTTP/1.1", "abc");
    let rebuilt = original.clone().into_builder().build();

    assert_eq!(original, rebuilt);
}

#[test]
fn test_convenience_constructors() {
    let not_found = Response::not_found("HTTP/1.0");
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    assert_eq!(not_found.version(), "HTTP/1.0");
    assert!(not_found.body().is_empty());

    let error = Response::internal_error("HTTP/1.1");
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let text = Response::text_plain("HTTP/1.1", "hi");
    assert_eq!(text.header("Content-Type"), Some("text/plain"));
}
