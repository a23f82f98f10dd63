use std::fmt;

use vendorsync_recon::SyncError;

#[derive(Debug)]
pub enum GatewayError {
    /// Could not open, begin, or end a request-processor session.
    Session(String),
    /// The request/response exchange itself failed.
    Transport(String),
    /// Response is not well-formed qbXML.
    Parse(String),
    /// Response carried a fatal status code.
    Status { code: i64, message: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(msg) => write!(f, "session error: {msg}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Parse(msg) => write!(f, "malformed qbXML response: {msg}"),
            Self::Status { code, message } => write!(f, "QuickBooks error {code}: {message}"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for SyncError {
    fn from(err: GatewayError) -> Self {
        SyncError::Gateway(err.to_string())
    }
}
