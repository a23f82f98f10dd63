//! HTTP relay transport.
//!
//! Talks to a qbXML relay running next to QuickBooks:
//!
//! | Call              | Request                                   | Response            |
//! |-------------------|-------------------------------------------|---------------------|
//! | `begin_session`   | `POST {base}/sessions` (JSON)             | `{"ticket": "..."}` |
//! | `process_request` | `POST {base}/sessions/{ticket}/requests`  | qbXML body          |
//! | `end_session`     | `DELETE {base}/sessions/{ticket}`         | any 2xx             |
//!
//! `open_connection` builds the HTTP client; `close_connection` drops it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GatewayError;
use crate::session::RequestProcessor;

const USER_AGENT: &str = concat!("vsync/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 30;
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct BeginSessionRequest<'a> {
    app_name: &'a str,
    company_file: &'a str,
    /// qbFileOpenDoNotCare
    mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct BeginSessionResponse {
    ticket: String,
}

pub struct HttpRelayProcessor {
    base: Url,
    app_name: String,
    client: Option<reqwest::blocking::Client>,
}

impl HttpRelayProcessor {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| GatewayError::Session(format!("invalid relay URL '{base_url}': {e}")))?;
        // Url::join replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            app_name: String::new(),
            client: None,
        })
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, GatewayError> {
        self.client
            .as_ref()
            .ok_or_else(|| GatewayError::Session("connection is not open".into()))
    }

    /// Base URL extended by `segments`, each percent-encoded as one path
    /// segment, so a ticket can never reach another endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::Session(format!("relay URL '{}' cannot take a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn check_status(
        resp: reqwest::blocking::Response,
        what: &str,
        to_error: fn(String) -> GatewayError,
    ) -> Result<reqwest::blocking::Response, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let mut body = resp.text().unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        Err(to_error(format!("{what} failed ({}): {}", status.as_u16(), body.trim())))
    }
}

impl RequestProcessor for HttpRelayProcessor {
    fn open_connection(&mut self, app_name: &str) -> Result<(), GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Session(format!("cannot build HTTP client: {e}")))?;
        self.app_name = app_name.to_string();
        self.client = Some(client);
        Ok(())
    }

    fn begin_session(&mut self, company_file: &str) -> Result<String, GatewayError> {
        let url = self.endpoint(&["sessions"])?;
        let body = BeginSessionRequest {
            app_name: &self.app_name,
            company_file,
            mode: "dont_care",
        };
        let resp = self
            .client()?
            .post(url)
            .json(&body)
            .send()
            .map_err(|e| GatewayError::Session(format!("relay unreachable: {e}")))?;
        let resp = Self::check_status(resp, "begin session", GatewayError::Session)?;
        let parsed: BeginSessionResponse = resp
            .json()
            .map_err(|e| GatewayError::Session(format!("invalid begin-session response: {e}")))?;
        Ok(parsed.ticket)
    }

    fn process_request(&mut self, ticket: &str, qbxml: &str) -> Result<String, GatewayError> {
        let url = self.endpoint(&["sessions", ticket, "requests"])?;
        let resp = self
            .client()?
            .post(url)
            .header("Content-Type", "application/xml")
            .body(qbxml.to_string())
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let resp = Self::check_status(resp, "process request", GatewayError::Transport)?;
        resp.text().map_err(|e| GatewayError::Transport(e.to_string()))
    }

    fn end_session(&mut self, ticket: &str) -> Result<(), GatewayError> {
        let url = self.endpoint(&["sessions", ticket])?;
        let resp = self
            .client()?
            .delete(url)
            .send()
            .map_err(|e| GatewayError::Session(e.to_string()))?;
        Self::check_status(resp, "end session", GatewayError::Session)?;
        Ok(())
    }

    fn close_connection(&mut self) -> Result<(), GatewayError> {
        self.client = None;
        Ok(())
    }
}
