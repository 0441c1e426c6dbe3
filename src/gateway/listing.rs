/*
 * Fetches directory listings from a backend site. The backend exposes
 * `GET {endpoint}/list-folder?path=<id>` answering either a JSON array of
 * entries or its error envelope (which it may send with a 200 status).
 *
 * It uses a trait-based approach (`ListingGatewayOperations`) so the
 * application logic can be tested against canned listings without a
 * network; `HttpListingGateway` is the production implementation.
 */
use crate::core::DirEntry;
use crate::gateway::types::{BackendError, ListingError};

use std::time::Duration;

pub type Result<T> = std::result::Result<T, ListingError>;

pub trait ListingGatewayOperations: Send + Sync {
    fn list_children(&self, endpoint: &str, path: &str) -> Result<Vec<DirEntry>>;
}

pub struct HttpListingGateway {
    client: reqwest::blocking::Client,
}

impl HttpListingGateway {
    pub fn new(timeout: Duration) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(HttpListingGateway { client })
    }
}

impl ListingGatewayOperations for HttpListingGateway {
    fn list_children(&self, endpoint: &str, path: &str) -> Result<Vec<DirEntry>> {
        let url = format!("{endpoint}/list-folder");
        log::debug!("ListingGateway: GET {url} for path '{path}'.");
        let response = self.client.get(&url).query(&[("path", path)]).send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            if let Ok(envelope) = serde_json::from_str::<BackendError>(&body) {
                return Err(ListingError::Backend(envelope.error));
            }
            return Err(ListingError::Http(status.as_u16()));
        }

        // The backend reports failures in-band with a 200 and its error
        // envelope, so the envelope is checked before the entry array.
        if let Ok(envelope) = serde_json::from_str::<BackendError>(&body) {
            return Err(ListingError::Backend(envelope.error));
        }
        let entries: Vec<DirEntry> = serde_json::from_str(&body)
            .map_err(|e| ListingError::Backend(format!("Unreadable listing response: {e}")))?;
        log::trace!(
            "ListingGateway: Received {} entries for path '{path}'.",
            entries.len()
        );
        Ok(entries)
    }
}
