//! # oltssh
//!
//! Async SSH CLI driver for provisioning ONTs on GPON OLTs.
//!
//! The OLT has no machine-readable management API, so oltssh drives its
//! interactive command line: it writes a command, reads until the prompt of
//! the expected CLI mode appears, and turns the screen text into typed
//! records.
//!
//! ## Features
//!
//! - Async SSH connections via russh, optionally through a jump host
//! - Prompt-synchronised reader that answers pagination and drops escape
//!   sequences
//! - CLI mode tracking (user, privileged, global config, interface) with
//!   local guards on every operation
//! - ONT registration, deletion, native VLAN and service-port provisioning
//! - Parsers for autofind, optical, general-info and service-port reports
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oltssh::SessionBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), oltssh::Error> {
//!     let mut session = SessionBuilder::new("10.10.0.2")
//!         .username("admin")
//!         .password("secret")
//!         .enter_config_mode(true)
//!         .connect()
//!         .await?;
//!
//!     for ont in session.list_unmanaged_onts().await? {
//!         println!("{} on {}", ont.serial_number(), ont.fsp);
//!     }
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! Any `AsyncRead + AsyncWrite` stream positioned at the user-mode prompt
//! can carry a session, see [`OltSession::new`].

pub mod channel;
pub mod driver;
pub mod error;
pub mod ont;
pub mod parser;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use driver::{
    InteractiveBuilder, InteractiveEvent, InteractiveResult, OltSession, Response, SessionBuilder,
    SessionContext,
};
pub use error::{Error, Result};
pub use ont::{FrameSlotPort, OntIdentity};
pub use parser::{GeneralInfo, OntRecord, OpticalInfo, ServicePort, UnmanagedOnt};
pub use platform::{LineCard, OltPlatform, PrivilegeLevel};
pub use transport::{AuthMethod, HostKeyVerification, SshConfig};
