//! CLI privilege levels of the OLT.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A privilege level of the OLT command line.
///
/// Levels are strictly ordered and the device only moves between adjacent
/// levels: `enable` climbs from the user prompt to privileged mode, `config`
/// to global configuration, `interface gpon F/S` into a line card, and each
/// `quit` drops back one step.
///
/// ```text
/// ┌────────────────┐ enable ┌────────────┐ config ┌──────────────┐ interface gpon ┌──────────────────────┐
/// │ Unauthenticated├───────►│ Privileged ├───────►│ GlobalConfig ├───────────────►│ InterfaceConfig(F/S) │
/// │      H>        │        │     H#     │        │  H(config)#  │                │ H(config-if-gpon-F/S)#│
/// └────────────────┘◄───────┴────────────┘◄───────┴──────────────┘◄───────────────┴──────────────────────┘
///                    quit+y          quit                   quit
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PrivilegeLevel {
    /// User mode right after login (`>` prompt).
    Unauthenticated = 0,
    /// Privileged EXEC mode (`#` prompt).
    Privileged = 1,
    /// Global configuration mode (`(config)#` prompt).
    GlobalConfig = 2,
    /// GPON interface configuration for one line card.
    InterfaceConfig = 3,
}

impl PrivilegeLevel {
    /// Numeric level, 0 through 3.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The level one step above this one.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Unauthenticated => Some(Self::Privileged),
            Self::Privileged => Some(Self::GlobalConfig),
            Self::GlobalConfig => Some(Self::InterfaceConfig),
            Self::InterfaceConfig => None,
        }
    }

    /// The level one step below this one.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Unauthenticated => None,
            Self::Privileged => Some(Self::Unauthenticated),
            Self::GlobalConfig => Some(Self::Privileged),
            Self::InterfaceConfig => Some(Self::GlobalConfig),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Privileged => "privileged",
            Self::GlobalConfig => "global-config",
            Self::InterfaceConfig => "interface-config",
        }
    }
}

impl fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}

/// Frame/slot address of a line card, selected by `interface gpon F/S`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCard {
    pub frame: u32,
    pub slot: u32,
}

impl LineCard {
    pub fn new(frame: u32, slot: u32) -> Self {
        Self { frame, slot }
    }
}

impl fmt::Display for LineCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.frame, self.slot)
    }
}
