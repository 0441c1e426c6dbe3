/*
 * Wire-level types shared by the HTTP gateways: request and response bodies
 * for the two backend endpoints, and the error enums the gateway traits
 * return. Backend-reported messages are carried through verbatim so the
 * application layer can show them unaltered.
 */
use serde::{Deserialize, Serialize};

/*
 * Body of a submission request. The backend zips the files and folders
 * named by `selected` (paths relative to nothing, they are full ids) and
 * delivers the archive, answering with a download locator.
 */
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubmitRequest {
    pub selected: Vec<String>,
    #[serde(rename = "rootPath")]
    pub root_path: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SubmitReceipt {
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}

// Error envelope the backend uses on both endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendError {
    pub error: String,
}

#[derive(Debug)]
pub enum ListingError {
    // The backend answered with its error envelope; the message is verbatim.
    Backend(String),
    // Non-success status with no parsable error envelope.
    Http(u16),
    Network(reqwest::Error),
}

impl From<reqwest::Error> for ListingError {
    fn from(err: reqwest::Error) -> Self {
        ListingError::Network(err)
    }
}

impl std::fmt::Display for ListingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingError::Backend(msg) => write!(f, "{msg}"),
            ListingError::Http(status) => write!(f, "Listing request failed with HTTP {status}"),
            ListingError::Network(e) => write!(f, "Listing request failed: {e}"),
        }
    }
}

impl std::error::Error for ListingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingError::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl ListingError {
    /* The backend's own message, when it sent one. */
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ListingError::Backend(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum DeliveryError {
    Backend(String),
    Http(u16),
    Network(reqwest::Error),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Network(err)
    }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Backend(msg) => write!(f, "{msg}"),
            DeliveryError::Http(status) => {
                write!(f, "Submission request failed with HTTP {status}")
            }
            DeliveryError::Network(e) => write!(f, "Submission request failed: {e}"),
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeliveryError::Network(e) => Some(e),
            _ => None,
        }
    }
}
