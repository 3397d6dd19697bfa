//! `display current-configuration ont F/S/P O`: provisioning of one ONT.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ont::OntIdentity;

static SERIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"ont add \d+ \d+ sn-auth "?([0-9A-Za-z]+)"?"#).expect("Invalid regex pattern")
});

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"desc (?:"([^"]*)"|(\S+))"#).expect("Invalid regex pattern"));

static SERVICE_PORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"service-port (\d+) vlan (\d+)").expect("Invalid regex pattern"));

/// A provisioned ONT as recorded in the running configuration.
///
/// Each field is picked out independently and is `None` when the
/// configuration does not mention it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntRecord {
    pub identity: OntIdentity,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub service_port: Option<u32>,
    pub vlan: Option<u32>,
}

/// Extract the ONT record from the configuration dump.
///
/// Failure detection is left to the caller; this only looks for the
/// `ont add` and `service-port` lines.
pub fn parse_current_config(identity: OntIdentity, text: &str) -> OntRecord {
    let serial_number = SERIAL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let description = DESCRIPTION_RE
        .captures(text)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string());

    let binding = SERVICE_PORT_RE.captures(text);
    let service_port = binding
        .as_ref()
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());
    let vlan = binding
        .as_ref()
        .and_then(|c| c.get(2))
        .and_then(|m| m.as_str().parse().ok());

    OntRecord {
        identity,
        serial_number,
        description,
        service_port,
        vlan,
    }
}
