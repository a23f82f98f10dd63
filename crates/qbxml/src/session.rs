//! Request-processor sessions.
//!
//! A session is opened for exactly one request/response exchange and is
//! always ended and closed again, including when the exchange fails.

use crate::error::GatewayError;

/// The connection/session protocol spoken by a qbXML request processor.
pub trait RequestProcessor {
    fn open_connection(&mut self, app_name: &str) -> Result<(), GatewayError>;

    /// Begin a session against `company_file` (empty = the open company).
    /// Returns the session ticket.
    fn begin_session(&mut self, company_file: &str) -> Result<String, GatewayError>;

    fn process_request(&mut self, ticket: &str, qbxml: &str) -> Result<String, GatewayError>;

    fn end_session(&mut self, ticket: &str) -> Result<(), GatewayError>;

    fn close_connection(&mut self) -> Result<(), GatewayError>;
}

/// Scoped session. Dropping it ends the session and closes the connection.
pub struct Session<'p, P: RequestProcessor + ?Sized> {
    processor: &'p mut P,
    ticket: String,
}

impl<'p, P: RequestProcessor + ?Sized> Session<'p, P> {
    pub fn open(processor: &'p mut P, app_name: &str, company_file: &str) -> Result<Self, GatewayError> {
        processor.open_connection(app_name)?;
        match processor.begin_session(company_file) {
            Ok(ticket) => Ok(Self { processor, ticket }),
            Err(e) => {
                if let Err(close_err) = processor.close_connection() {
                    log::warn!("closing connection after failed session start: {close_err}");
                }
                Err(e)
            }
        }
    }

    pub fn process(&mut self, qbxml: &str) -> Result<String, GatewayError> {
        self.processor.process_request(&self.ticket, qbxml)
    }
}

impl<P: RequestProcessor + ?Sized> Drop for Session<'_, P> {
    fn drop(&mut self) {
        if let Err(e) = self.processor.end_session(&self.ticket) {
            log::warn!("ending QuickBooks session: {e}");
        }
        if let Err(e) = self.processor.close_connection() {
            log::warn!("closing QuickBooks connection: {e}");
        }
    }
}

/// Open a session, send one request, and release the session.
pub fn exchange<P: RequestProcessor + ?Sized>(
    processor: &mut P,
    app_name: &str,
    company_file: &str,
    qbxml: &str,
) -> Result<String, GatewayError> {
    let mut session = Session::open(processor, app_name, company_file)?;
    log::debug!("qbXML sent:\n{qbxml}");
    let response = session.process(qbxml)?;
    log::debug!("qbXML response:\n{response}");
    Ok(response)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every protocol call and replays canned responses.
    #[derive(Default)]
    pub(crate) struct ScriptedProcessor {
        pub calls: Vec<String>,
        pub responses: Vec<Result<String, String>>,
        pub fail_begin: bool,
    }

    impl ScriptedProcessor {
        pub fn replying(responses: Vec<Result<String, String>>) -> Self {
            Self {
                responses,
                ..Self::default()
            }
        }
    }

    impl RequestProcessor for ScriptedProcessor {
        fn open_connection(&mut self, app_name: &str) -> Result<(), GatewayError> {
            self.calls.push(format!("open:{app_name}"));
            Ok(())
        }

        fn begin_session(&mut self, company_file: &str) -> Result<String, GatewayError> {
            self.calls.push(format!("begin:{company_file}"));
            if self.fail_begin {
                return Err(GatewayError::Session("company file not open".into()));
            }
            Ok("T1".into())
        }

        fn process_request(&mut self, ticket: &str, qbxml: &str) -> Result<String, GatewayError> {
            self.calls.push(format!("process:{ticket}"));
            self.calls.push(qbxml.to_string());
            if self.responses.is_empty() {
                return Err(GatewayError::Transport("no scripted response".into()));
            }
            self.responses.remove(0).map_err(GatewayError::Transport)
        }

        fn end_session(&mut self, ticket: &str) -> Result<(), GatewayError> {
            self.calls.push(format!("end:{ticket}"));
            Ok(())
        }

        fn close_connection(&mut self) -> Result<(), GatewayError> {
            self.calls.push("close".into());
            Ok(())
        }
    }

    fn protocol_calls(p: &ScriptedProcessor) -> Vec<&str> {
        p.calls
            .iter()
            .map(String::as_str)
            .filter(|c| !c.starts_with('<'))
            .collect()
    }

    #[test]
    fn exchange_releases_session() {
        let mut p = ScriptedProcessor::replying(vec![Ok("<QBXML/>".into())]);
        let resp = exchange(&mut p, "Vendor Sync", "", "<QBXML/>").unwrap();
        assert_eq!(resp, "<QBXML/>");
        assert_eq!(
            protocol_calls(&p),
            ["open:Vendor Sync", "begin:", "process:T1", "end:T1", "close"]
        );
    }

    #[test]
    fn session_released_when_request_fails() {
        let mut p = ScriptedProcessor::replying(vec![Err("pipe broken".into())]);
        let err = exchange(&mut p, "Vendor Sync", "c.qbw", "<QBXML/>").unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
        assert_eq!(
            protocol_calls(&p),
            ["open:Vendor Sync", "begin:c.qbw", "process:T1", "end:T1", "close"]
        );
    }

    #[test]
    fn connection_closed_when_begin_fails() {
        let mut p = ScriptedProcessor {
            fail_begin: true,
            ..ScriptedProcessor::default()
        };
        let err = exchange(&mut p, "Vendor Sync", "", "<QBXML/>").unwrap_err();
        assert!(matches!(err, GatewayError::Session(_)));
        assert_eq!(protocol_calls(&p), ["open:Vendor Sync", "begin:", "close"]);
    }
}
