//! Session context: the tracked CLI level and selected line card.

use log::debug;

use crate::error::{DriverError, Result};
use crate::platform::{LineCard, PrivilegeLevel};

/// Mutable per-session state of the CLI state machine.
///
/// The context only changes after the device acknowledged a mode-changing
/// command, and only one level at a time. The line card is present exactly
/// when the level is [`PrivilegeLevel::InterfaceConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    level: PrivilegeLevel,
    line_card: Option<LineCard>,
}

impl SessionContext {
    /// A fresh context at the user prompt.
    pub fn new() -> Self {
        Self {
            level: PrivilegeLevel::Unauthenticated,
            line_card: None,
        }
    }

    /// Current privilege level.
    pub fn level(&self) -> PrivilegeLevel {
        self.level
    }

    /// Line card selected by `interface gpon`, if inside one.
    pub fn line_card(&self) -> Option<LineCard> {
        self.line_card
    }

    /// Fail with [`DriverError::WrongMode`] unless the session is exactly at
    /// `expected`. Purely local: nothing is sent to the device.
    pub fn require(&self, expected: PrivilegeLevel) -> Result<()> {
        if self.level == expected {
            Ok(())
        } else {
            Err(DriverError::WrongMode {
                expected,
                actual: self.level,
            }
            .into())
        }
    }

    /// Record a successful single-step escalation.
    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.level.next() {
            debug!("privilege {} -> {}", self.level, next);
            self.level = next;
        }
    }

    /// Record a successful `interface gpon F/S`.
    pub(crate) fn enter_line_card(&mut self, card: LineCard) {
        self.advance();
        self.line_card = Some(card);
    }

    /// Record a successful single-step `quit`.
    pub(crate) fn retreat(&mut self) {
        if let Some(previous) = self.level.previous() {
            debug!("privilege {} -> {}", self.level, previous);
            self.level = previous;
        }
        if self.level != PrivilegeLevel::InterfaceConfig {
            self.line_card = None;
        }
    }

    /// Forget all state after logout.
    pub(crate) fn reset(&mut self) {
        self.level = PrivilegeLevel::Unauthenticated;
        self.line_card = None;
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
