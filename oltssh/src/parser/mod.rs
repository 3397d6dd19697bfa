//! Parsers that turn OLT screen text into records.
//!
//! Two strategies are used. The autofind listing is a sequence of
//! rule-delimited blocks whose lines come in a fixed order, so it is matched
//! line by line against the expected labels. Single-record reports (optical
//! info, general info) are scanned for `Label : value` lines regardless of
//! their order.
//!
//! Every parser runs [`check_failure`] before looking at the structure.

use std::str::FromStr;

use indexmap::IndexMap;
use log::warn;

use crate::error::ParseError;

mod autofind;
mod current_config;
mod general;
mod ont_add;
mod optical;
mod service_port;

pub use autofind::{UnmanagedOnt, parse_autofind};
pub use current_config::{OntRecord, parse_current_config};
pub use general::{GeneralInfo, GeneralInfoLookup, parse_general_info};
pub use ont_add::parse_ont_id;
pub use optical::{OpticalInfo, parse_optical_info};
pub use service_port::{ServicePort, parse_service_ports};

/// Prefix of a line reporting a rejected command.
pub const FAILURE_MARKER: &str = "Failure: ";

/// `ont add` with a serial that is already registered.
pub const DUPLICATE_SERIAL: &str = "SN already exists";

/// `service-port vlan` naming a VLAN the OLT does not have.
pub const VLAN_NOT_FOUND: &str = "VLAN does not exist";

/// Configuration already present. Matched case-insensitively.
pub const REPEATED_CONFIGURATION: &str = "repeated configuration";

/// Lookup of an unknown ONT.
pub const ONT_NOT_FOUND: &str = "The required ONT does not exist";

/// Malformed argument, e.g. a serial number of the wrong shape.
pub const PARAMETER_ERROR: &str = "Parameter error";

/// Service-port listing for an ONT that has none.
pub const NO_SERVICE_PORT: &str = "No service virtual port can be operated";

/// Minimum number of dashes for a line to count as a horizontal rule.
const RULE_MIN_LEN: usize = 20;

/// Fail with [`ParseError::Rejected`] on the first line containing
/// `Failure: `. The message is what follows the marker, trimmed.
pub fn check_failure(text: &str) -> Result<(), ParseError> {
    for line in text.lines() {
        if let Some(pos) = line.find(FAILURE_MARKER) {
            let message = line[pos + FAILURE_MARKER.len()..].trim().to_string();
            warn!("device reported failure: {}", message);
            return Err(ParseError::Rejected { message });
        }
    }
    Ok(())
}

/// Case-insensitive substring test for phrases whose capitalisation varies
/// between firmware releases.
pub(crate) fn contains_ignore_case(text: &str, phrase: &str) -> bool {
    text.to_ascii_lowercase()
        .contains(&phrase.to_ascii_lowercase())
}

/// Whether a line is a horizontal rule (`-----...`).
pub(crate) fn is_rule(line: &str) -> bool {
    let line = line.trim();
    line.len() >= RULE_MIN_LEN && line.bytes().all(|b| b == b'-')
}

/// Split `Label   : value` at the first colon into the trimmed label and
/// the trimmed value.
pub(crate) fn split_label(line: &str) -> Option<(&str, &str)> {
    let (label, value) = line.split_once(':')?;
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    Some((label, value.trim()))
}

/// Values picked out of a report by [`scan_labels`], keyed by label.
#[derive(Debug, Default)]
pub(crate) struct Fields {
    values: IndexMap<&'static str, String>,
}

impl Fields {
    pub(crate) fn optional(&self, label: &'static str) -> Option<String> {
        self.values.get(label).cloned()
    }

    pub(crate) fn required(&self, label: &'static str) -> Result<String, ParseError> {
        self.optional(label)
            .ok_or(ParseError::MissingField { field: label })
    }

    pub(crate) fn required_number<T: FromStr>(&self, label: &'static str) -> Result<T, ParseError> {
        let value = self.required(label)?;
        value.parse().map_err(|_| ParseError::InvalidNumber {
            field: label,
            value,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

/// Scan `text` for lines whose label is one of `labels`.
///
/// The first occurrence of a label wins; lines with unknown labels are
/// ignored. A label listed in `continued` also takes the unlabelled lines
/// that follow it, appended without separator, until the next known label
/// or a horizontal rule.
pub(crate) fn scan_labels(text: &str, labels: &[&'static str], continued: &[&'static str]) -> Fields {
    let mut fields = Fields::default();
    let mut open: Option<&'static str> = None;

    for line in text.lines() {
        if is_rule(line) {
            open = None;
            continue;
        }

        let known = split_label(line)
            .and_then(|(label, value)| labels.iter().find(|l| **l == label).map(|l| (*l, value)));

        match known {
            Some((label, value)) => {
                open = None;
                if fields.values.contains_key(label) {
                    continue;
                }
                fields.values.insert(label, value.to_string());
                if continued.contains(&label) {
                    open = Some(label);
                }
            }
            None => {
                if let Some(label) = open
                    && let Some(value) = fields.values.get_mut(label)
                {
                    // The device wraps long values at a fixed column, often
                    // mid-word, so the pieces are joined as they are.
                    value.push_str(line.trim());
                }
            }
        }
    }

    fields
}
