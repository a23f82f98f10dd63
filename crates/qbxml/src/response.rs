//! qbXML response interpretation.

use vendorsync_recon::{SubmitOutcome, SubmitStatus, VendorRecord};

use crate::error::GatewayError;
use crate::xml::{self, Element};

pub const STATUS_OK: i64 = 0;
/// Query matched nothing.
pub const STATUS_NO_MATCH: i64 = 1;
/// The name of the list element is already in use.
pub const STATUS_ALREADY_EXISTS: i64 = 3100;

/// Status of a single response element. Unparseable codes read as 0.
fn status_of(element: &Element) -> (i64, String) {
    let code = element
        .attr("statusCode")
        .and_then(|c| c.trim().parse().ok())
        .unwrap_or(STATUS_OK);
    let message = element.attr("statusMessage").unwrap_or("").to_string();
    (code, message)
}

/// Parse a response and reject it unless its first status is 0, 1 or 3100.
pub fn parse_checked(raw: &str) -> Result<Element, GatewayError> {
    let root = xml::parse(raw)?;
    let status_el = root.find_with_attr("statusCode").ok_or_else(|| {
        GatewayError::Parse("QuickBooks response missing status information".into())
    })?;
    let (code, message) = status_of(status_el);
    if !matches!(code, STATUS_OK | STATUS_NO_MATCH | STATUS_ALREADY_EXISTS) {
        return Err(GatewayError::Status { code, message });
    }
    Ok(root)
}

/// Vendors from a `VendorQueryRs`.
///
/// The identifier is the vendor's fax number, falling back to an additional
/// contact named "Fax". Vendors without a name or an identifier are skipped.
pub fn vendors_from_query(raw: &str) -> Result<Vec<VendorRecord>, GatewayError> {
    let root = parse_checked(raw)?;
    let mut vendors = Vec::new();

    for vend in root.descendants_named("VendorRet") {
        let name = vend.child_text("Name");
        let mut fax = vend.child_text("Fax");
        if fax.is_empty() {
            fax = vend
                .children_named("AdditionalContactRef")
                .filter(|acr| acr.child_text("ContactName").eq_ignore_ascii_case("fax"))
                .map(|acr| acr.child_text("ContactValue"))
                .find(|v| !v.is_empty())
                .unwrap_or("");
        }

        if name.is_empty() || fax.is_empty() {
            log::debug!("skipping remote vendor without name or fax (name={name:?}, fax={fax:?})");
            continue;
        }
        vendors.push(VendorRecord::remote(fax, name));
    }

    Ok(vendors)
}

/// Per-record outcomes from a batch of `VendorAddRs`, in `records` order.
///
/// Only a response without any status information fails the whole batch;
/// individual error codes become [`SubmitStatus::Failed`].
pub fn outcomes_from_add(
    raw: &str,
    records: &[VendorRecord],
) -> Result<Vec<SubmitOutcome>, GatewayError> {
    let root = xml::parse(raw)?;
    let responses = root.descendants_named("VendorAddRs");
    if responses.is_empty() && root.find_with_attr("statusCode").is_none() {
        return Err(GatewayError::Parse(
            "QuickBooks response missing status information".into(),
        ));
    }

    let outcomes = records
        .iter()
        .map(|record| {
            let status = match responses
                .iter()
                .find(|rs| rs.attr("requestID") == Some(record.record_id()))
            {
                Some(rs) => match status_of(rs) {
                    (STATUS_OK, _) => SubmitStatus::Created,
                    (STATUS_ALREADY_EXISTS, message) => SubmitStatus::AlreadyExists { message },
                    (code, message) => SubmitStatus::Failed {
                        reason: format!("{code}: {message}"),
                    },
                },
                None => SubmitStatus::Failed {
                    reason: "no response".into(),
                },
            };
            SubmitOutcome::new(record.record_id(), status)
        })
        .collect();

    Ok(outcomes)
}
