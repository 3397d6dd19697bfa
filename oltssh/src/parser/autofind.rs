//! `display ont autofind all`: ONTs seen on the fibre but not provisioned.

use serde::{Deserialize, Serialize};

use super::{check_failure, is_rule, split_label};
use crate::channel::patterns::PAGINATION_MARKER;
use crate::error::ParseError;
use crate::ont::{FrameSlotPort, bare_serial};

/// Labels of one autofind block, in the order the device prints them.
pub(crate) const AUTOFIND_LABELS: [&str; 12] = [
    "Number",
    "F/S/P",
    "Ont SN",
    "Password",
    "Loid",
    "Checkcode",
    "VendorID",
    "Ont Version",
    "Ont SoftwareVersion",
    "Ont EquipmentID",
    "Ont Customized Info",
    "Ont autofind time",
];

/// An ONT discovered by autofind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmanagedOnt {
    pub number: u32,
    pub fsp: FrameSlotPort,
    /// Serial as printed, e.g. `48575443A1B2C3D4 (HWTC-A1B2C3D4)`.
    pub ont_sn: String,
    pub password: String,
    pub loid: String,
    pub checkcode: String,
    pub vendor_id: String,
    pub version: String,
    pub software_version: String,
    pub equipment_id: String,
    pub customized_info: String,
    pub autofind_time: String,
}

impl UnmanagedOnt {
    /// The serial without the vendor hint, as `ont add` expects it.
    pub fn serial_number(&self) -> &str {
        bare_serial(&self.ont_sn)
    }
}

/// Parse the autofind listing into one record per block.
///
/// Blocks shorter than a full record are skipped; a complete block whose
/// lines are out of order is an error.
pub fn parse_autofind(text: &str) -> Result<Vec<UnmanagedOnt>, ParseError> {
    check_failure(text)?;

    let mut sections: Vec<Vec<&str>> = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines() {
        if is_rule(line) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(Vec::new());
            continue;
        }

        // Text before the first rule is the command echo
        let Some(lines) = current.as_mut() else {
            continue;
        };

        let line = line.trim();
        if line.is_empty() || line.contains(PAGINATION_MARKER) {
            continue;
        }
        lines.push(line);
    }
    if let Some(done) = current {
        sections.push(done);
    }

    sections
        .iter()
        .filter(|lines| lines.len() >= AUTOFIND_LABELS.len())
        .map(|lines| parse_section(lines))
        .collect()
}

fn parse_section(lines: &[&str]) -> Result<UnmanagedOnt, ParseError> {
    let mut values = [""; AUTOFIND_LABELS.len()];
    for (slot, (expected, line)) in values.iter_mut().zip(AUTOFIND_LABELS.iter().zip(lines)) {
        match split_label(line) {
            Some((label, value)) if label == *expected => *slot = value,
            _ => {
                return Err(ParseError::UnexpectedLine {
                    expected: *expected,
                    line: line.to_string(),
                });
            }
        }
    }

    let number = values[0].parse().map_err(|_| ParseError::InvalidNumber {
        field: AUTOFIND_LABELS[0],
        value: values[0].to_string(),
    })?;

    Ok(UnmanagedOnt {
        number,
        fsp: values[1].parse()?,
        ont_sn: values[2].to_string(),
        password: values[3].to_string(),
        loid: values[4].to_string(),
        checkcode: values[5].to_string(),
        vendor_id: values[6].to_string(),
        version: values[7].to_string(),
        software_version: values[8].to_string(),
        equipment_id: values[9].to_string(),
        customized_info: values[10].to_string(),
        autofind_time: values[11].to_string(),
    })
}
