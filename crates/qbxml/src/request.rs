//! qbXML request documents.

use quick_xml::escape::escape;
use vendorsync_recon::VendorRecord;

pub const DEFAULT_QBXML_VERSION: &str = "13.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    StopOnError,
    ContinueOnError,
}

impl OnError {
    fn as_str(self) -> &'static str {
        match self {
            Self::StopOnError => "stopOnError",
            Self::ContinueOnError => "continueOnError",
        }
    }
}

fn envelope(version: &str, on_error: OnError, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n\
         <?qbxml version=\"{version}\"?>\n\
         <QBXML>\n  \
         <QBXMLMsgsRq onError=\"{}\">\n\
         {body}\n  \
         </QBXMLMsgsRq>\n\
         </QBXML>",
        on_error.as_str(),
    )
}

/// Query every vendor in the company file.
pub fn vendor_query(version: &str) -> String {
    envelope(version, OnError::StopOnError, "    <VendorQueryRq/>")
}

/// One `VendorAddRq` per record, keyed by `requestID` = record id.
///
/// Uses `continueOnError` so one rejected vendor does not stop the rest.
pub fn vendor_add_batch(version: &str, records: &[VendorRecord]) -> String {
    let body = records
        .iter()
        .map(|record| {
            let id = escape(record.record_id());
            let name = escape(record.name());
            format!(
                "    <VendorAddRq requestID=\"{id}\">\n      \
                 <VendorAdd>\n        \
                 <Name>{name}</Name>\n        \
                 <IsActive>true</IsActive>\n        \
                 <Fax>{id}</Fax>\n      \
                 </VendorAdd>\n    \
                 </VendorAddRq>"
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    envelope(version, OnError::ContinueOnError, &body)
}
