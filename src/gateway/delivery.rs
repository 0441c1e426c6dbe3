/*
 * Submits the checked selection to a backend site for archiving and
 * delivery. The backend exposes `POST {endpoint}/zip-and-send-lark` taking
 * a `SubmitRequest` body and answering a `SubmitReceipt` with a download
 * locator, or its error envelope on failure.
 */
use crate::gateway::types::{BackendError, DeliveryError, SubmitReceipt, SubmitRequest};

use std::time::Duration;

pub type Result<T> = std::result::Result<T, DeliveryError>;

pub trait DeliveryGatewayOperations: Send + Sync {
    fn submit(&self, endpoint: &str, request: &SubmitRequest) -> Result<SubmitReceipt>;
}

pub struct HttpDeliveryGateway {
    client: reqwest::blocking::Client,
}

impl HttpDeliveryGateway {
    /*
     * `timeout` bounds the whole request. Archiving a large selection is
     * done server-side before the response, so this is configured much
     * higher than the listing timeout.
     */
    pub fn new(timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(HttpDeliveryGateway { client })
    }
}

impl DeliveryGatewayOperations for HttpDeliveryGateway {
    fn submit(&self, endpoint: &str, request: &SubmitRequest) -> Result<SubmitReceipt> {
        let url = format!("{endpoint}/zip-and-send-lark");
        log::debug!(
            "DeliveryGateway: POST {url} with {} selected ids.",
            request.selected.len()
        );
        let response = self.client.post(&url).json(request).send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<BackendError>(&body) {
                return Err(DeliveryError::Backend(envelope.error));
            }
            return Err(DeliveryError::Http(status.as_u16()));
        }

        if let Ok(envelope) = serde_json::from_str::<BackendError>(&body) {
            return Err(DeliveryError::Backend(envelope.error));
        }
        let receipt: SubmitReceipt = serde_json::from_str(&body)
            .map_err(|e| DeliveryError::Backend(format!("Unreadable submission response: {e}")))?;
        log::info!(
            "DeliveryGateway: Submission accepted, download at '{}'.",
            receipt.download_url
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn serve_once(status_line: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 2048];
            // Read headers, then the announced body length.
            let header_end = loop {
                let n = stream.read(&mut chunk).unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                if n == 0 {
                    break buf.len();
                }
            };
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let content_length: usize = headers
                .lines()
                .find_map(|line| {
                    line.to_ascii_lowercase()
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse().unwrap_or(0))
                })
                .unwrap_or(0);
            while buf.len() < header_end + content_length {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&buf[header_end..]).to_string()
        });
        (endpoint, handle)
    }

    fn sample_request() -> SubmitRequest {
        SubmitRequest {
            selected: vec![r"\\srv\share\plans".to_string(), r"\\srv\share\a.dxf".to_string()],
            root_path: r"\\srv\share".to_string(),
        }
    }

    #[test]
    fn test_submit_posts_body_and_parses_receipt() {
        let (endpoint, server) =
            serve_once("HTTP/1.1 200 OK", r#"{"downloadUrl":"http://dl/42"}"#);
        let gateway = HttpDeliveryGateway::new(Duration::from_secs(5)).unwrap();

        let receipt = gateway.submit(&endpoint, &sample_request()).unwrap();
        assert_eq!(receipt.download_url, "http://dl/42");

        let body = server.join().unwrap();
        let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent["rootPath"], r"\\srv\share");
        assert_eq!(sent["selected"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_backend_envelope_on_failure_status() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"error":"zip failed: disk full"}"#,
        );
        let gateway = HttpDeliveryGateway::new(Duration::from_secs(5)).unwrap();

        let err = gateway.submit(&endpoint, &sample_request()).unwrap_err();
        assert_eq!(err.to_string(), "zip failed: disk full");
        server.join().unwrap();
    }

    #[test]
    fn test_success_status_with_error_envelope_is_failure() {
        let (endpoint, server) =
            serve_once("HTTP/1.1 200 OK", r#"{"error":"nothing to archive"}"#);
        let gateway = HttpDeliveryGateway::new(Duration::from_secs(5)).unwrap();

        let err = gateway.submit(&endpoint, &sample_request()).unwrap_err();
        assert_eq!(err.to_string(), "nothing to archive");
        server.join().unwrap();
    }
}
