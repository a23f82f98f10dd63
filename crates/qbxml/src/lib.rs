//! `vendorsync-qbxml` — QuickBooks vendor directory over qbXML.
//!
//! Builds `VendorQueryRq` / `VendorAddRq` documents, interprets the
//! responses, and runs each exchange inside a scoped request-processor
//! session.

pub mod error;
pub mod gateway;
pub mod http;
pub mod request;
pub mod response;
pub mod session;
pub mod xml;

pub use error::GatewayError;
pub use gateway::{GatewayOptions, QbxmlGateway, DEFAULT_APP_NAME};
pub use http::HttpRelayProcessor;
pub use session::{exchange, RequestProcessor, Session};
