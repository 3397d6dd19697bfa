//! Platform definitions for OLT models.
//!
//! This module defines the model-specific parts of a session: prompt
//! banners, privilege levels and the provisioning profile baked into
//! commands.

mod definition;
mod privilege_level;
pub mod vendors;

pub use definition::{NativeVlanTemplate, OltPlatform, ServicePortTemplate};
pub use privilege_level::{LineCard, PrivilegeLevel};
