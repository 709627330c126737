//! Bounded-Retry GET

use crate::AcquisitionError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Whether a status warrants another attempt against the same endpoint.
/// 404 is included: the upstream service intermittently 404s windows that
/// have not been published yet.
pub(crate) fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::NOT_FOUND
        || status.is_server_error()
}

/// Exponential backoff: `base * 2^attempt`, capped to keep the total wait
/// bounded even with a misconfigured attempt count.
pub(crate) fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(1u64 << attempt.min(10)))
}

/// Issue a GET with bounded retries and require a JSON array in return.
///
/// Transport errors and retryable statuses back off and retry up to
/// `max_attempts`; any other status, a non-JSON content type, or a non-array
/// body fails the endpoint immediately.
pub(crate) async fn get_json_array(
    client: &Client,
    url: &str,
    max_attempts: u32,
    backoff_base_ms: u64,
) -> Result<Vec<Value>, AcquisitionError> {
    let mut attempt = 0u32;
    let response = loop {
        match client.get(url).send().await {
            Ok(response) if response.status().is_success() => break response,
            Ok(response) => {
                let status = response.status();
                if !is_retryable(status) || attempt + 1 >= max_attempts {
                    return Err(AcquisitionError::Status(status));
                }
                warn!("GET {} returned {} (attempt {})", url, status, attempt + 1);
            }
            Err(e) => {
                if attempt + 1 >= max_attempts {
                    return Err(AcquisitionError::Http(e));
                }
                warn!("GET {} failed: {} (attempt {})", url, e, attempt + 1);
            }
        }

        attempt += 1;
        tokio::time::sleep(backoff_delay(backoff_base_ms, attempt)).await;
    };

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let is_json = content_type
        .as_deref()
        .map(|ct| ct.contains("json"))
        .unwrap_or(false);
    if !is_json {
        return Err(AcquisitionError::NotJson(content_type));
    }

    let body = response.text().await?;
    let value: Value = serde_json::from_str(&body)?;
    match value {
        Value::Array(items) => {
            debug!("GET {} yielded {} entries", url, items.len());
            Ok(items)
        }
        _ => Err(AcquisitionError::NotASequence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::NOT_FOUND));
        assert!(is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(500, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(500, 3), Duration::from_millis(4000));
    }

    #[test]
    fn test_backoff_is_capped() {
        // A huge attempt count must not overflow the shift.
        let capped = backoff_delay(500, 60);
        assert_eq!(capped, backoff_delay(500, 10));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_errors_out() {
        let client = Client::new();
        // Nothing listens on port 9; fails without consuming the retry budget slowly.
        let result = get_json_array(&client, "http://127.0.0.1:9/data", 1, 1).await;
        assert!(result.is_err());
    }

    fn canned_response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serve one canned response per listed string, one connection each.
    async fn serve_canned(responses: Vec<String>) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/data", listener.local_addr().unwrap());
        tokio::spawn(async move {
            for response in responses {
                if let Ok((mut socket, _)) = listener.accept().await {
                    let mut request = [0u8; 1024];
                    let _ = socket.read(&mut request).await;
                    let _ = socket.write_all(response.as_bytes()).await;
                }
            }
        });
        url
    }

    #[tokio::test]
    async fn test_non_json_content_type_fails_fast() {
        let url = serve_canned(vec![canned_response(
            "200 OK",
            "text/html",
            "<html>maintenance page</html>",
        )])
        .await;

        let result = get_json_array(&Client::new(), &url, 3, 1).await;
        match result {
            Err(AcquisitionError::NotJson(Some(ct))) => assert!(ct.contains("text/html")),
            other => panic!("expected NotJson, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_json_object_body_is_rejected() {
        let url = serve_canned(vec![canned_response(
            "200 OK",
            "application/json",
            r#"{"error":"wrapped payload"}"#,
        )])
        .await;

        let result = get_json_array(&Client::new(), &url, 3, 1).await;
        assert!(matches!(result, Err(AcquisitionError::NotASequence)));
    }

    #[tokio::test]
    async fn test_retryable_status_recovers_on_next_attempt() {
        let url = serve_canned(vec![
            canned_response("503 Service Unavailable", "text/plain", "try later"),
            canned_response(
                "200 OK",
                "application/json",
                r#"[{"timestamp":"2026-02-01T00:00:00Z","x":120.0,"y":30.0,"z":400.0}]"#,
            ),
        ])
        .await;

        let items = get_json_array(&Client::new(), &url, 3, 1).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["timestamp"], "2026-02-01T00:00:00Z");
    }
}
