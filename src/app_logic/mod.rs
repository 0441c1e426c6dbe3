/*
 * The application logic layer: event and command types plus the
 * `BrowserLogic` handler that drives the session, selection and
 * submission state machines.
 */
pub mod handler;
pub mod types;


pub use handler::{APP_NAME, BrowserLogic};
pub use types::{AppEvent, Command};
