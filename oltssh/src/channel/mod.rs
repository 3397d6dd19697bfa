//! Channel layer for prompt matching over the device's shell stream.
//!
//! This module handles the interactive session I/O, including
//! prompt detection, pagination and escape-sequence stripping.

mod buffer;
pub mod patterns;
mod pty;

pub use buffer::PromptBuffer;
pub use pty::PtyChannel;
