/*
 * HTTP access to the backend sites. The two gateway traits
 * (`ListingGatewayOperations`, `DeliveryGatewayOperations`) abstract the
 * wire so application logic and tests never touch reqwest directly, and
 * `GatewayExecutor` runs the network commands off the event loop thread.
 */
pub mod delivery;
pub mod executor;
pub mod listing;
pub mod types;

pub use delivery::{DeliveryGatewayOperations, HttpDeliveryGateway};
pub use executor::GatewayExecutor;
pub use listing::{HttpListingGateway, ListingGatewayOperations};
pub use types::{BackendError, DeliveryError, ListingError, SubmitReceipt, SubmitRequest};
