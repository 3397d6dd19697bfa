//! Addressing of ONTs on the OLT.
//!
//! An ONT is addressed by frame/slot/port plus the index it was registered
//! under on that port. Device reports print the first three compactly as
//! `F/S/P` (e.g. `0/1/3`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::platform::LineCard;

/// A PON port address in `F/S/P` notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSlotPort {
    pub frame: u32,
    pub slot: u32,
    pub port: u32,
}

impl FrameSlotPort {
    pub fn new(frame: u32, slot: u32, port: u32) -> Self {
        Self { frame, slot, port }
    }

    /// The line card this port belongs to.
    pub fn line_card(&self) -> LineCard {
        LineCard::new(self.frame, self.slot)
    }
}

impl FromStr for FrameSlotPort {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidAddress(s.to_string());

        let mut parts = s.trim().split('/').map(|p| p.trim().parse::<u32>());
        let (Some(Ok(frame)), Some(Ok(slot)), Some(Ok(port)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self { frame, slot, port })
    }
}

impl fmt::Display for FrameSlotPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.frame, self.slot, self.port)
    }
}

/// Full address of a registered ONT: frame, slot, port and ONT index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OntIdentity {
    pub frame: u32,
    pub slot: u32,
    pub port: u32,
    pub ont_id: u32,
}

impl OntIdentity {
    pub fn new(frame: u32, slot: u32, port: u32, ont_id: u32) -> Self {
        Self {
            frame,
            slot,
            port,
            ont_id,
        }
    }

    /// Build an identity from a decomposed `F/S/P` and an ONT index.
    pub fn from_fsp(fsp: FrameSlotPort, ont_id: u32) -> Self {
        Self::new(fsp.frame, fsp.slot, fsp.port, ont_id)
    }

    pub fn fsp(&self) -> FrameSlotPort {
        FrameSlotPort::new(self.frame, self.slot, self.port)
    }
}

impl fmt::Display for OntIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ont {}", self.fsp(), self.ont_id)
    }
}

/// The bare serial number: the first whitespace-separated token.
///
/// Autofind reports print the serial followed by a vendor hint, as in
/// `48575443A1B2C3D4 (HWTC-A1B2C3D4)`; commands only accept the first part.
pub fn bare_serial(serial: &str) -> &str {
    serial.split_whitespace().next().unwrap_or("")
}
