use std::cell::RefCell;

use vendorsync_recon::{SubmitOutcome, SyncError, VendorDirectory, VendorRecord};

use crate::request::{self, DEFAULT_QBXML_VERSION};
use crate::response;
use crate::session::{exchange, RequestProcessor};

pub const DEFAULT_APP_NAME: &str = "Vendor Sync";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOptions {
    /// Application name presented when opening the connection.
    pub app_name: String,
    pub qbxml_version: String,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.into(),
            qbxml_version: DEFAULT_QBXML_VERSION.into(),
        }
    }
}

/// [`VendorDirectory`] backed by qbXML over a [`RequestProcessor`].
///
/// Each call opens its own session. Submissions go to the company file of
/// the most recent `fetch`, or the currently open company if none.
pub struct QbxmlGateway<P> {
    processor: RefCell<P>,
    options: GatewayOptions,
    company_file: RefCell<String>,
}

impl<P: RequestProcessor> QbxmlGateway<P> {
    pub fn new(processor: P, options: GatewayOptions) -> Self {
        Self {
            processor: RefCell::new(processor),
            options,
            company_file: RefCell::new(String::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_processor(self) -> P {
        self.processor.into_inner()
    }

    fn send(&self, company_file: &str, qbxml: &str) -> Result<String, SyncError> {
        let mut processor = self.processor.borrow_mut();
        Ok(exchange(&mut *processor, &self.options.app_name, company_file, qbxml)?)
    }
}

impl<P: RequestProcessor> VendorDirectory for QbxmlGateway<P> {
    fn fetch(&self, selector: &str) -> Result<Vec<VendorRecord>, SyncError> {
        *self.company_file.borrow_mut() = selector.to_string();
        let raw = self.send(selector, &request::vendor_query(&self.options.qbxml_version))?;
        Ok(response::vendors_from_query(&raw)?)
    }

    fn submit_batch(&self, records: &[VendorRecord]) -> Result<Vec<SubmitOutcome>, SyncError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let company_file = self.company_file.borrow().clone();
        let qbxml = request::vendor_add_batch(&self.options.qbxml_version, records);
        let raw = self.send(&company_file, &qbxml)?;
        Ok(response::outcomes_from_add(&raw, records)?)
    }
}
