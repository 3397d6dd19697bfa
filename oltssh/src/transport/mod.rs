//! SSH transport layer wrapping russh.
//!
//! This module dials the OLT (directly or through a jump host),
//! authenticates, and opens the interactive shell the driver talks to.

pub mod config;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::{SshStream, SshTransport};
