//! Error types for oltssh.

use std::io;
use thiserror::Error;

use crate::platform::PrivilegeLevel;

/// Main error type for oltssh operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Stream read/write errors on the interactive shell
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Local state-machine and protocol errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Outcomes the device reported in its own output
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// The server presented a key that differs from known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Strict verification rejected a host missing from known_hosts
    #[error("Host {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Errors on the interactive byte stream.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Reading device output failed for a reason other than end of stream
    #[error("Failed to read device output: {0}")]
    Read(#[source] io::Error),

    /// Writing keystrokes to the device failed
    #[error("Failed to write to device: {0}")]
    Write(#[source] io::Error),

    /// The session was already terminated
    #[error("Session closed")]
    Closed,
}

/// Driver layer errors (mode guards, unexpected response shapes).
#[derive(Error, Debug)]
pub enum DriverError {
    /// The session is not in the mode the operation requires
    #[error("Wrong CLI mode: expected {expected}, session is in {actual}")]
    WrongMode {
        expected: PrivilegeLevel,
        actual: PrivilegeLevel,
    },

    /// The device answered in a shape the driver does not understand
    #[error("Unexpected response to '{command}' (prompt '{prompt}'): {message}")]
    Protocol {
        command: String,
        prompt: String,
        message: String,
    },

    /// Session builder settings are incomplete
    #[error("Invalid session configuration: {message}")]
    InvalidConfig { message: String },
}

/// Business outcomes reported by the device.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// A `Failure:` line in the output
    #[error("Device rejected '{command}': {message}")]
    Rejected { command: String, message: String },

    /// No ONT is registered with the serial number
    #[error("ONT {serial} not found")]
    NotFound { serial: String },

    /// The device did not accept the serial number syntax
    #[error("Invalid serial number '{serial}'")]
    InvalidSerialNumber { serial: String },

    /// The serial number is already registered on the OLT
    #[error("Serial number {serial} is already registered")]
    DuplicateSerialNumber { serial: String },

    /// The service port references a VLAN the OLT does not have
    #[error("VLAN {vlan} does not exist")]
    VlanNotFound { vlan: u32 },

    /// The configuration is already present
    #[error("Repeated configuration for '{command}'")]
    ConfigurationConflict { command: String },

    /// A display query reported an error
    #[error("Query '{command}' failed: {message}")]
    Query { command: String, message: String },
}

/// Errors produced while turning screen text into records.
///
/// These carry no command context; the driver wraps them before they reach
/// the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `Failure:` line was found before structural parsing
    #[error("Device reported failure: {message}")]
    Rejected { message: String },

    /// A required label never appeared
    #[error("Missing field '{field}'")]
    MissingField { field: &'static str },

    /// A line did not carry the label expected at its position
    #[error("Expected '{expected}', got '{line}'")]
    UnexpectedLine { expected: &'static str, line: String },

    /// A numeric field held something else
    #[error("Field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// An F/S/P address did not have three numeric parts
    #[error("Invalid F/S/P address '{0}'")]
    InvalidAddress(String),
}

impl ParseError {
    /// Attach the command context of the exchange that produced the text.
    pub(crate) fn into_error(self, command: &str, prompt: &str) -> Error {
        match self {
            ParseError::Rejected { message } => DeviceError::Rejected {
                command: command.to_string(),
                message,
            }
            .into(),
            other => DriverError::Protocol {
                command: command.to_string(),
                prompt: prompt.to_string(),
                message: other.to_string(),
            }
            .into(),
        }
    }
}

/// Result type alias using oltssh's Error.
pub type Result<T> = std::result::Result<T, Error>;
