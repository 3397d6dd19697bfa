//! OLT session: command execution and CLI mode transitions.

use std::time::Instant;

use log::{debug, trace, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use super::interactive::{InteractiveBuilder, InteractiveEvent, InteractiveResult, InteractiveStep};
use super::privilege::SessionContext;
use super::response::Response;
use crate::channel::PtyChannel;
use crate::error::{ChannelError, Result};
use crate::platform::vendors::huawei::{LOGOUT_CONFIRM, LOGOUT_DONE};
use crate::platform::{LineCard, OltPlatform, PrivilegeLevel};
use crate::transport::SshTransport;

/// One interactive conversation with an OLT.
///
/// The session owns the shell stream and the [`SessionContext`]. Every
/// operation takes `&mut self`, so exactly one command is outstanding at a
/// time; run one session per task to work on several OLTs or line cards
/// concurrently.
///
/// Operations check the tracked level locally before anything is written
/// and fail with [`DriverError::WrongMode`](crate::error::DriverError::WrongMode)
/// when the session is elsewhere.
pub struct OltSession<S> {
    /// Prompt-synchronised channel over the shell stream.
    channel: PtyChannel<S>,

    /// Platform definition (prompts, provisioning profile).
    platform: OltPlatform,

    /// Tracked CLI level and line card.
    context: SessionContext,

    /// SSH connection kept alive for the lifetime of the stream.
    transport: Option<SshTransport>,

    /// Set once the logout exchange went through.
    closed: bool,
}

impl<S> OltSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a session over a stream positioned right after the device's
    /// user-mode prompt.
    pub fn new(stream: S, platform: OltPlatform) -> Self {
        Self {
            channel: PtyChannel::new(stream),
            platform,
            context: SessionContext::new(),
            transport: None,
            closed: false,
        }
    }

    /// Create a session over a freshly opened shell, consuming the login
    /// banner up to the user-mode prompt.
    pub async fn attach(stream: S, platform: OltPlatform) -> Result<Self> {
        let mut session = Self::new(stream, platform);
        let root_prompt = session.platform.root_prompt();
        let banner = session.channel.read_until(&root_prompt).await?;
        trace!("login banner:\n{}", banner);
        if session.channel.is_eof() {
            return Err(ChannelError::Closed.into());
        }
        Ok(session)
    }

    pub(crate) fn with_transport(mut self, transport: SshTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// The session context (level and line card).
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Current privilege level.
    pub fn level(&self) -> PrivilegeLevel {
        self.context.level()
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &OltPlatform {
        &self.platform
    }

    /// Whether the session was logged out or the stream ended.
    pub fn is_closed(&self) -> bool {
        self.closed || self.channel.is_eof()
    }

    /// Fail unless the session is exactly at `level`.
    pub(crate) fn require(&self, level: PrivilegeLevel) -> Result<()> {
        self.context.require(level)
    }

    /// Prompt of the level the session is currently in.
    pub(crate) fn current_prompt(&self) -> String {
        self.platform
            .prompt_for(self.context.level(), self.context.line_card())
    }

    /// Write `command` and read until `prompt` appears.
    ///
    /// The output is returned as-is; success or failure markers in it are
    /// not interpreted. Device commands are not idempotent, so a failed
    /// call must not be retried blindly.
    pub async fn execute(&mut self, command: &str, prompt: &str) -> Result<Response> {
        if self.is_closed() {
            return Err(ChannelError::Closed.into());
        }

        let start = Instant::now();
        debug!("send: {:?} (expect {:?})", command.trim_end(), prompt);

        self.channel.send(command).await?;
        let output = self.channel.read_until(prompt).await?;

        let elapsed = start.elapsed();
        debug!("{:?} done in {:?}", command.trim_end(), elapsed);
        trace!("output:\n{}", output);

        Ok(Response::new(command, prompt, output, elapsed))
    }

    /// Run `command` at the current level, expecting to stay there.
    pub(crate) async fn execute_here(&mut self, command: &str) -> Result<Response> {
        let prompt = self.current_prompt();
        self.execute(command, &prompt).await
    }

    /// Run a mode-changing command. Fails with `Closed` unless the device
    /// printed the prompt of the new mode, leaving the context untouched.
    async fn transition(&mut self, command: &str, prompt: &str) -> Result<()> {
        let response = self.execute(command, prompt).await?;
        if !response.reached_prompt() {
            warn!("stream ended before {:?} acknowledged {:?}", prompt, command);
            return Err(ChannelError::Closed.into());
        }
        Ok(())
    }

    /// Send an interactive command sequence, each input waiting for its
    /// prompt before the next one is sent.
    pub async fn send_interactive(&mut self, events: &[InteractiveEvent]) -> Result<InteractiveResult> {
        let start = Instant::now();
        let mut steps = Vec::with_capacity(events.len());

        for event in events {
            let step_start = Instant::now();
            debug!("interactive: {:?} (expect {:?})", event.display_input(), event.prompt);

            if self.is_closed() {
                return Err(ChannelError::Closed.into());
            }
            self.channel.send(&event.input).await?;
            let output = self.channel.read_until(&event.prompt).await?;

            steps.push(InteractiveStep {
                input: event.display_input().to_string(),
                output,
                elapsed: step_start.elapsed(),
            });
        }

        Ok(InteractiveResult::new(steps, start.elapsed()))
    }

    /// `enable`: user mode to privileged mode.
    pub async fn enter_privileged(&mut self) -> Result<()> {
        self.require(PrivilegeLevel::Unauthenticated)?;
        let prompt = self.platform.privileged_prompt();
        self.transition("enable", &prompt).await?;
        self.context.advance();
        Ok(())
    }

    /// `config`: privileged mode to global configuration.
    pub async fn enter_global_config(&mut self) -> Result<()> {
        self.require(PrivilegeLevel::Privileged)?;
        let prompt = self.platform.config_prompt();
        self.transition("config", &prompt).await?;
        self.context.advance();
        Ok(())
    }

    /// `interface gpon F/S`: global configuration into a line card.
    pub async fn enter_interface(&mut self, frame: u32, slot: u32) -> Result<()> {
        self.require(PrivilegeLevel::GlobalConfig)?;
        let card = LineCard::new(frame, slot);
        let prompt = self.platform.interface_prompt(card);
        self.transition(&format!("interface gpon {card}"), &prompt).await?;
        self.context.enter_line_card(card);
        Ok(())
    }

    /// Unwind the CLI.
    ///
    /// With `exit_session == false` exactly one level is dropped: interface
    /// to global config, global config to privileged, and from privileged
    /// (or user) mode the session logs out. With `exit_session == true`
    /// every level is unwound and the session logs out.
    pub async fn leave(&mut self, exit_session: bool) -> Result<()> {
        if self.context.level() >= PrivilegeLevel::InterfaceConfig {
            let prompt = self.platform.config_prompt();
            self.transition("quit", &prompt).await?;
            self.context.retreat();
            if !exit_session {
                return Ok(());
            }
        }

        if self.context.level() >= PrivilegeLevel::GlobalConfig {
            let prompt = self.platform.privileged_prompt();
            self.transition("quit", &prompt).await?;
            self.context.retreat();
            if !exit_session {
                return Ok(());
            }
        }

        self.logout().await
    }

    /// `quit` + `y` from the top level. The device usually drops the
    /// connection right after, which the reader treats as normal.
    async fn logout(&mut self) -> Result<()> {
        let events = InteractiveBuilder::new()
            .send("quit")
            .expect(LOGOUT_CONFIRM)
            .send("y")
            .expect(LOGOUT_DONE)
            .build();
        self.send_interactive(&events).await?;

        debug!("logged out");
        self.context.reset();
        self.closed = true;
        Ok(())
    }

    /// Log out if still logged in, then disconnect the SSH transport.
    pub async fn close(mut self) -> Result<()> {
        let unwound = if self.is_closed() {
            Ok(())
        } else {
            self.leave(true).await
        };

        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }

        unwound
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{DriverError, Error};
    use crate::platform::vendors::huawei;
    use tokio_test::io::{Builder, Mock};

    pub(crate) fn session_at(mock: Mock, level: PrivilegeLevel) -> OltSession<Mock> {
        let mut session = OltSession::new(mock, huawei::ma5683t());
        while session.level() < level {
            if session.level() == PrivilegeLevel::GlobalConfig {
                session.context.enter_line_card(LineCard::new(0, 1));
            } else {
                session.context.advance();
            }
        }
        session
    }

    #[tokio::test]
    async fn test_attach_consumes_banner() {
        let mock = Builder::new()
            .read(b"\r\n  Huawei Integrated Access Software (MA5600T).\r\n")
            .read(b"\r\nMA5683T>")
            .build();
        let session = OltSession::attach(mock, huawei::ma5683t()).await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::Unauthenticated);
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn test_attach_fails_when_stream_ends() {
        let mock = Builder::new().read(b"Reenter times have reached the upper limit.").build();
        let err = OltSession::attach(mock, huawei::ma5683t()).await.err().unwrap();
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_execute_returns_verbatim_text() {
        let mock = Builder::new()
            .write(b"display time\n")
            .read(b"display time\r\n  2024-05-01 10:00:00+08:00\r\n\r\nMA5683T#")
            .build();
        let mut session = session_at(mock, PrivilegeLevel::Privileged);

        let response = session.execute("display time", "MA5683T#").await.unwrap();
        assert_eq!(response.command, "display time");
        assert_eq!(response.prompt, "MA5683T#");
        assert_eq!(
            response.output,
            "display time\r\n  2024-05-01 10:00:00+08:00\r\n\r\nMA5683T#"
        );
    }

    #[tokio::test]
    async fn test_execute_write_failure_skips_read() {
        let mock = Builder::new()
            .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let mut session = session_at(mock, PrivilegeLevel::Privileged);

        let err = session.execute("config", "MA5683T(config)#").await.unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Write(_))));
    }

    #[tokio::test]
    async fn test_escalate_to_interface() {
        let mock = Builder::new()
            .write(b"enable\n")
            .read(b"enable\r\n\r\nMA5683T#")
            .write(b"config\n")
            .read(b"config\r\n\r\nMA5683T(config)#")
            .write(b"interface gpon 0/1\n")
            .read(b"interface gpon 0/1\r\n\r\nMA5683T(config-if-gpon-0/1)#")
            .build();
        let mut session = OltSession::new(mock, huawei::ma5683t());

        session.enter_privileged().await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::Privileged);
        session.enter_global_config().await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::GlobalConfig);
        session.enter_interface(0, 1).await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::InterfaceConfig);
        assert_eq!(session.context().line_card(), Some(LineCard::new(0, 1)));
    }

    #[tokio::test]
    async fn test_mode_guards_send_nothing() {
        // Any write to an empty mock fails, so WrongMode proves silence.
        let mut session = session_at(Builder::new().build(), PrivilegeLevel::Unauthenticated);
        let err = session.enter_global_config().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Driver(DriverError::WrongMode {
                expected: PrivilegeLevel::Privileged,
                actual: PrivilegeLevel::Unauthenticated,
            })
        ));
        assert!(session.enter_interface(0, 1).await.is_err());

        let mut session = session_at(Builder::new().build(), PrivilegeLevel::GlobalConfig);
        assert!(matches!(
            session.enter_privileged().await.unwrap_err(),
            Error::Driver(DriverError::WrongMode { .. })
        ));
        assert!(session.enter_global_config().await.is_err());
        assert_eq!(session.level(), PrivilegeLevel::GlobalConfig);

        let mut session = session_at(Builder::new().build(), PrivilegeLevel::InterfaceConfig);
        assert!(session.enter_interface(0, 2).await.is_err());
        assert_eq!(session.context().line_card(), Some(LineCard::new(0, 1)));
    }

    #[tokio::test]
    async fn test_leave_one_step_at_a_time() {
        let mock = Builder::new()
            .write(b"quit\n")
            .read(b"quit\r\n\r\nMA5683T(config)#")
            .write(b"quit\n")
            .read(b"quit\r\n\r\nMA5683T#")
            .write(b"quit\n")
            .read(b"quit\r\n  Check whether system data has been changed. Please save data before logout.\r\n  Are you sure to log out? (y/n)[n]:")
            .write(b"y\n")
            .read(b"y\r\n  Thank you for using Huawei Integrated Access Software. Press ENTER to log on\r\n")
            .build();
        let mut session = session_at(mock, PrivilegeLevel::InterfaceConfig);

        session.leave(false).await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::GlobalConfig);
        assert_eq!(session.context().line_card(), None);

        session.leave(false).await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::Privileged);

        session.leave(false).await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::Unauthenticated);
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn test_leave_full_unwind() {
        let mock = Builder::new()
            .write(b"quit\n")
            .read(b"quit\r\nMA5683T(config)#")
            .write(b"quit\n")
            .read(b"quit\r\nMA5683T#")
            .write(b"quit\n")
            .read(b"quit\r\nPlease save data before logout.\r\nAre you sure to log out? (y/n)[n]:")
            .write(b"y\n")
            .build();
        let mut session = session_at(mock, PrivilegeLevel::InterfaceConfig);

        // The device hangs up after "y"; end of stream is a clean exit.
        session.leave(true).await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::Unauthenticated);
        assert!(session.is_closed());

        let err = session.execute("enable", "MA5683T#").await.unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_leave_from_global_config_stops_at_privileged() {
        let mock = Builder::new()
            .write(b"quit\n")
            .read(b"quit\r\nMA5683T#")
            .build();
        let mut session = session_at(mock, PrivilegeLevel::GlobalConfig);

        session.leave(false).await.unwrap();
        assert_eq!(session.level(), PrivilegeLevel::Privileged);
        assert!(!session.is_closed());
    }

    #[tokio::test]
    async fn test_hangup_during_enable_keeps_level() {
        let mock = Builder::new()
            .write(b"enable\n")
            .read(b"enable\r\n")
            .build();
        let mut session = OltSession::new(mock, huawei::ma5683t());

        let err = session.enter_privileged().await.unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
        assert_eq!(session.level(), PrivilegeLevel::Unauthenticated);
        assert!(session.is_closed());

        // Nothing more is written to a stream that has ended
        let err = session.execute("enable", "MA5683T#").await.unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn test_hangup_during_quit_keeps_line_card() {
        let mock = Builder::new()
            .write(b"quit\n")
            .read(b"quit\r\n")
            .build();
        let mut session = session_at(mock, PrivilegeLevel::InterfaceConfig);

        assert!(session.leave(false).await.is_err());
        assert_eq!(session.level(), PrivilegeLevel::InterfaceConfig);
        assert_eq!(session.context().line_card(), Some(LineCard::new(0, 1)));
    }

    #[tokio::test]
    async fn test_close_logs_out_first() {
        let mock = Builder::new()
            .write(b"quit\n")
            .read(b"quit\r\nMA5683T#")
            .write(b"quit\n")
            .read(b"quit\r\nbefore logout.\r\n(y/n)[n]:")
            .write(b"y\n")
            .build();
        let session = session_at(mock, PrivilegeLevel::GlobalConfig);
        session.close().await.unwrap();
    }
}
