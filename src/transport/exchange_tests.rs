//! Tests for HTTP request/response types.

use super::{HttpRequest, HttpResponse};

fn test_url() -> url::Url {
    url::Url::parse("https://example.com/api/logs").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn post_creates_empty_post_request() {
        let req = HttpRequest::post(test_url());

        assert_eq!(req.method, http::Method::POST);
        assert_eq!(req.url, test_url());
        assert!(req.headers.is_empty());
        assert!(req.body.is_empty());
    }

    #[test]
    fn with_body_sets_body_and_length() {
        let req = HttpRequest::post(test_url()).with_body(b"{\"a\":1}".to_vec());

        assert_eq!(req.body, b"{\"a\":1}".to_vec());
        assert_eq!(req.content_length(), 7);
    }

    #[test]
    fn with_header_replaces_existing_value() {
        let req = HttpRequest::post(test_url())
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(
            req.headers
                .get_all(http::header::CONTENT_TYPE)
                .iter()
                .count(),
            1
        );
        assert_eq!(
            req.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn content_length_counts_bytes_not_chars() {
        let req = HttpRequest::post(test_url()).with_body("hällo".as_bytes().to_vec());
        assert_eq!(req.content_length(), 6);
    }
}

mod http_response {
    use super::*;

    #[test]
    fn ok_and_accepted_are_accepted() {
        assert!(HttpResponse::with_status(http::StatusCode::OK).is_accepted());
        assert!(HttpResponse::with_status(http::StatusCode::ACCEPTED).is_accepted());
    }

    #[test]
    fn other_statuses_are_not_accepted() {
        for status in [
            http::StatusCode::CREATED,
            http::StatusCode::NO_CONTENT,
            http::StatusCode::BAD_REQUEST,
            http::StatusCode::FORBIDDEN,
            http::StatusCode::INTERNAL_SERVER_ERROR,
            http::StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert!(
                !HttpResponse::with_status(status).is_accepted(),
                "{status} must not be accepted"
            );
        }
    }

    #[test]
    fn body_text_returns_utf8() {
        let resp = HttpResponse::new(
            http::StatusCode::FORBIDDEN,
            http::HeaderMap::new(),
            b"InvalidAuthorization".to_vec(),
        );
        assert_eq!(resp.body_text(), Some("InvalidAuthorization"));
    }

    #[test]
    fn body_text_rejects_invalid_utf8() {
        let resp = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![0xff, 0xfe],
        );
        assert!(resp.body_text().is_none());
    }

    #[test]
    fn dump_includes_status_headers_and_body() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::HeaderName::from_static("x-ms-request-id"),
            http::HeaderValue::from_static("abc"),
        );
        let resp = HttpResponse::new(
            http::StatusCode::FORBIDDEN,
            headers,
            b"{\"Error\":\"InvalidAuthorization\"}".to_vec(),
        );

        let dump = resp.dump();

        assert!(dump.starts_with("403 Forbidden\r\n"));
        assert!(dump.contains("x-ms-request-id: abc\r\n"));
        assert!(dump.ends_with("{\"Error\":\"InvalidAuthorization\"}"));
    }
}
