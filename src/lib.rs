// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules into one interactive query.
//
// Module responsibilities:
// - `endpoints`: the registry of RobotEvents endpoints and URL template
//   resolution.
// - `models`: static team and season lookup tables.
// - `api`: the blocking HTTP client that performs the GET requests.
// - `render`: turns a JSON response into a panel, a table or CSV.
// - `ui`: the prompt flow that gathers parameters and drives the rest.
// - `error`, `logger`: shared error type and tracing setup.
pub mod api;
pub mod endpoints;
pub mod error;
pub mod logger;
pub mod models;
pub mod render;
pub mod ui;

pub use api::{Request, RobotEventsClient};
pub use endpoints::{lookup, Endpoint};
pub use error::{Error, Result};
