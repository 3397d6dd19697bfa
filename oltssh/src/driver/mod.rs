//! High-level driver for OLT interaction.
//!
//! [`OltSession`] sends commands, tracks the CLI mode the device is in and
//! exposes one method per provisioning operation. Operations check the mode
//! locally before anything is written, then classify the device's answer
//! into the error taxonomy before parsing it.

mod builder;
mod interactive;
mod ont;
mod privilege;
pub(crate) mod response;
mod service_port;
mod session;

pub use builder::SessionBuilder;
pub use interactive::{
    InteractiveBuilder, InteractiveBuilderWithInput, InteractiveEvent, InteractiveResult,
    InteractiveStep,
};
pub use privilege::SessionContext;
pub use response::Response;
pub use session::OltSession;
