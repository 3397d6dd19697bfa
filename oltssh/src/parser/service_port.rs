//! `display service-port port F/S/P ont O`: service ports bound to an ONT.

use serde::{Deserialize, Serialize};

use super::{NO_SERVICE_PORT, check_failure};
use crate::error::ParseError;

/// One row of the service-port table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePort {
    pub index: u32,
    pub vlan: u32,
}

/// Parse the service-port table. Rows are the lines starting with a digit;
/// the first two columns are the service-port index and the VLAN.
pub fn parse_service_ports(text: &str) -> Result<Vec<ServicePort>, ParseError> {
    if text.contains(NO_SERVICE_PORT) {
        return Ok(Vec::new());
    }
    check_failure(text)?;

    let mut ports = Vec::new();
    for line in text.lines().map(str::trim) {
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let mut columns = line.split_whitespace();
        let (Some(index), Some(vlan)) = (columns.next(), columns.next()) else {
            return Err(ParseError::UnexpectedLine {
                expected: "INDEX VLAN",
                line: line.to_string(),
            });
        };

        ports.push(ServicePort {
            index: number("INDEX", index)?,
            vlan: number("VLAN", vlan)?,
        });
    }

    Ok(ports)
}

fn number(field: &'static str, value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
