/*
 * Executes the network-bound commands emitted by the application logic.
 * Each network command runs on its own worker thread so the event loop is
 * never blocked on the backend; the outcome comes back as an `AppEvent`
 * posted on the shared channel. Commands the executor does not own are
 * handed back to the caller untouched.
 */
use crate::app_logic::{AppEvent, Command};
use crate::gateway::delivery::DeliveryGatewayOperations;
use crate::gateway::listing::ListingGatewayOperations;
use crate::gateway::types::SubmitRequest;

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

pub struct GatewayExecutor {
    listing: Arc<dyn ListingGatewayOperations>,
    delivery: Arc<dyn DeliveryGatewayOperations>,
    events: Sender<AppEvent>,
}

impl GatewayExecutor {
    pub fn new(
        listing: Arc<dyn ListingGatewayOperations>,
        delivery: Arc<dyn DeliveryGatewayOperations>,
        events: Sender<AppEvent>,
    ) -> Self {
        GatewayExecutor {
            listing,
            delivery,
            events,
        }
    }

    /*
     * Takes ownership of network commands, returning `Err(command)` for
     * anything else so the host loop can handle presentation commands
     * itself.
     */
    pub fn try_execute(&self, command: Command) -> Result<(), Command> {
        match command {
            Command::FetchListing {
                epoch,
                node_id,
                endpoint,
            } => {
                let listing = Arc::clone(&self.listing);
                let events = self.events.clone();
                thread::spawn(move || {
                    let result = listing.list_children(&endpoint, &node_id);
                    if let Err(e) = events.send(AppEvent::ListingLoaded {
                        epoch,
                        node_id,
                        result,
                    }) {
                        log::warn!("GatewayExecutor: Event loop gone, dropping listing: {e}");
                    }
                });
                Ok(())
            }
            Command::SubmitSelection {
                endpoint,
                selected_ids,
                root_path,
            } => {
                let delivery = Arc::clone(&self.delivery);
                let events = self.events.clone();
                thread::spawn(move || {
                    let request = SubmitRequest {
                        selected: selected_ids,
                        root_path,
                    };
                    let result = delivery.submit(&endpoint, &request);
                    if let Err(e) = events.send(AppEvent::SubmissionCompleted { result }) {
                        log::warn!("GatewayExecutor: Event loop gone, dropping receipt: {e}");
                    }
                });
                Ok(())
            }
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DirEntry;
    use crate::gateway::delivery;
    use crate::gateway::listing;
    use crate::gateway::types::{DeliveryError, ListingError, SubmitReceipt};
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::time::Duration;

    struct MockListingGateway {
        result: Mutex<Option<listing::Result<Vec<DirEntry>>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockListingGateway {
        fn returning(result: listing::Result<Vec<DirEntry>>) -> Arc<Self> {
            Arc::new(MockListingGateway {
                result: Mutex::new(Some(result)),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl ListingGatewayOperations for MockListingGateway {
        fn list_children(&self, endpoint: &str, path: &str) -> listing::Result<Vec<DirEntry>> {
            self.calls
                .lock()
                .unwrap()
                .push((endpoint.to_string(), path.to_string()));
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(ListingError::Http(0)))
        }
    }

    struct MockDeliveryGateway {
        result: Mutex<Option<delivery::Result<SubmitReceipt>>>,
        requests: Mutex<Vec<SubmitRequest>>,
    }

    impl MockDeliveryGateway {
        fn returning(result: delivery::Result<SubmitReceipt>) -> Arc<Self> {
            Arc::new(MockDeliveryGateway {
                result: Mutex::new(Some(result)),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl DeliveryGatewayOperations for MockDeliveryGateway {
        fn submit(
            &self,
            _endpoint: &str,
            request: &SubmitRequest,
        ) -> delivery::Result<SubmitReceipt> {
            self.requests.lock().unwrap().push(request.clone());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(DeliveryError::Http(0)))
        }
    }

    fn executor_with(
        listing: Arc<MockListingGateway>,
        delivery: Arc<MockDeliveryGateway>,
    ) -> (GatewayExecutor, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        (GatewayExecutor::new(listing, delivery, tx), rx)
    }

    #[test]
    fn test_fetch_listing_posts_loaded_event() {
        let listing = MockListingGateway::returning(Ok(vec![DirEntry {
            name: "plans".to_string(),
            is_dir: true,
        }]));
        let delivery = MockDeliveryGateway::returning(Err(DeliveryError::Http(0)));
        let (executor, rx) = executor_with(Arc::clone(&listing), delivery);

        executor
            .try_execute(Command::FetchListing {
                epoch: 3,
                node_id: r"\\srv\share".to_string(),
                endpoint: "http://site".to_string(),
            })
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            AppEvent::ListingLoaded {
                epoch,
                node_id,
                result,
            } => {
                assert_eq!(epoch, 3);
                assert_eq!(node_id, r"\\srv\share");
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            listing.calls.lock().unwrap()[0],
            ("http://site".to_string(), r"\\srv\share".to_string())
        );
    }

    #[test]
    fn test_submit_selection_posts_completion_event() {
        let listing = MockListingGateway::returning(Ok(Vec::new()));
        let delivery = MockDeliveryGateway::returning(Ok(SubmitReceipt {
            download_url: "http://dl/9".to_string(),
        }));
        let (executor, rx) = executor_with(listing, Arc::clone(&delivery));

        executor
            .try_execute(Command::SubmitSelection {
                endpoint: "http://site".to_string(),
                selected_ids: vec![r"\\srv\share\a.tif".to_string()],
                root_path: r"\\srv\share".to_string(),
            })
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            AppEvent::SubmissionCompleted { result } => {
                assert_eq!(result.unwrap().download_url, "http://dl/9");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        let requests = delivery.requests.lock().unwrap();
        assert_eq!(requests[0].root_path, r"\\srv\share");
    }

    #[test]
    fn test_presentation_commands_are_handed_back() {
        let listing = MockListingGateway::returning(Ok(Vec::new()));
        let delivery = MockDeliveryGateway::returning(Err(DeliveryError::Http(0)));
        let (executor, _rx) = executor_with(listing, delivery);

        let command = Command::SetInteractionEnabled { enabled: true };
        match executor.try_execute(command) {
            Err(Command::SetInteractionEnabled { enabled }) => assert!(enabled),
            other => panic!("expected command back, got {other:?}"),
        }
    }
}
