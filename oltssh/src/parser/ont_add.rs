//! `ont add`: the index the OLT assigned to a new ONT.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

static ONT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ONTID\s*:\s*(\d+)").expect("Invalid regex pattern"));

/// Extract the `ONTID :<n>` marker of a successful `ont add`.
pub fn parse_ont_id(text: &str) -> Result<u32, ParseError> {
    let digits = ONT_ID_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(ParseError::MissingField { field: "ONTID" })?
        .as_str();

    digits.parse().map_err(|_| ParseError::InvalidNumber {
        field: "ONTID",
        value: digits.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ont_id() {
        let text = "ont add 3 sn-auth 48575443A1B2C3D4 omci ont-lineprofile-id 60 ont-srvprofile-id 35 desc client-42\r\n  Number of ONTs that can be added: 1, success: 1\r\n  PortID :3, ONTID :7\r\n\r\nMA5683T(config-if-gpon-0/1)#";
        assert_eq!(parse_ont_id(text), Ok(7));
        assert_eq!(parse_ont_id("ONTID : 12"), Ok(12));
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            parse_ont_id("ont add 3 sn-auth X\r\nMA5683T(config-if-gpon-0/1)#"),
            Err(ParseError::MissingField { field: "ONTID" })
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            parse_ont_id("ONTID :99999999999"),
            Err(ParseError::InvalidNumber {
                field: "ONTID",
                value: "99999999999".into()
            })
        );
    }
}
