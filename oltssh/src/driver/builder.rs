//! Builder for opening OLT sessions over SSH.

use std::path::PathBuf;
use std::time::Duration;

use log::info;
use secrecy::SecretString;

use super::session::OltSession;
use crate::error::{DriverError, Result};
use crate::platform::OltPlatform;
use crate::transport::{AuthMethod, HostKeyVerification, SshConfig, SshStream, SshTransport};

/// Jump host credentials.
#[derive(Debug)]
struct JumpHost {
    host: String,
    port: u16,
    username: String,
    auth: AuthMethod,
}

/// Builder for connecting to an OLT and opening its CLI.
///
/// # Example
///
/// ```rust,no_run
/// use oltssh::driver::SessionBuilder;
///
/// # async fn example() -> Result<(), oltssh::Error> {
/// let mut session = SessionBuilder::new("10.10.0.2")
///     .username("admin")
///     .password("secret")
///     .jump_host("bastion.example.net", 22, "ops", "secret")
///     .enter_config_mode(true)
///     .connect()
///     .await?;
///
/// let onts = session.list_unmanaged_onts().await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: AuthMethod,
    jump: Option<JumpHost>,
    platform: OltPlatform,
    timeout: Duration,
    terminal_size: Option<(u32, u32)>,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    enter_config_mode: bool,
}

impl SessionBuilder {
    /// Create a new session builder for the specified OLT.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: AuthMethod::None,
            jump: None,
            platform: OltPlatform::default(),
            timeout: Duration::from_secs(30),
            terminal_size: None,
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            enter_config_mode: false,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::password(password);
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        };
        self
    }

    /// Set private key authentication with passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        key_path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: Some(SecretString::from(passphrase.into())),
        };
        self
    }

    /// Reach the OLT through an SSH jump host using password
    /// authentication.
    pub fn jump_host(
        mut self,
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.jump = Some(JumpHost {
            host: host.into(),
            port,
            username: username.into(),
            auth: AuthMethod::password(password),
        });
        self
    }

    /// Set the platform definition (default: Huawei MA5683T).
    pub fn platform(mut self, platform: OltPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the connection timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set terminal dimensions, overriding the platform's.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_size = Some((width, height));
        self
    }

    /// Set the host key verification mode for every hop.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Run `enable` and `config` right after login.
    pub fn enter_config_mode(mut self, enter: bool) -> Self {
        self.enter_config_mode = enter;
        self
    }

    fn hop(&self, host: String, port: u16, username: String, auth: AuthMethod) -> SshConfig {
        let (terminal_width, terminal_height) = self
            .terminal_size
            .unwrap_or((self.platform.terminal_width, self.platform.terminal_height));
        SshConfig {
            host,
            port,
            username,
            auth,
            timeout: self.timeout,
            terminal_width,
            terminal_height,
            host_key_verification: self.host_key_verification.clone(),
            known_hosts_path: self.known_hosts_path.clone(),
        }
    }

    /// Validate the settings and split them into per-hop SSH configs.
    fn into_configs(mut self) -> Result<(Option<SshConfig>, SshConfig, OltPlatform, bool)> {
        let username = self.username.take().ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;
        if self.host.is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "Host is required".to_string(),
            }
            .into());
        }

        let jump = self
            .jump
            .take()
            .map(|j| self.hop(j.host, j.port, j.username, j.auth));
        let auth = std::mem::replace(&mut self.auth, AuthMethod::None);
        let host = std::mem::take(&mut self.host);
        let target = self.hop(host, self.port, username, auth);

        Ok((jump, target, self.platform, self.enter_config_mode))
    }

    /// Connect, open the shell and wait for the user-mode prompt.
    ///
    /// The returned session is at user level, or in global configuration
    /// when [`enter_config_mode`](Self::enter_config_mode) is set.
    pub async fn connect(self) -> Result<OltSession<SshStream>> {
        let (jump, target, platform, enter_config_mode) = self.into_configs()?;

        let transport = match jump {
            Some(jump) => SshTransport::connect_via(jump, target).await?,
            None => SshTransport::connect(target).await?,
        };
        let shell = transport.open_shell().await?;

        let mut session = OltSession::attach(shell, platform)
            .await?
            .with_transport(transport);
        info!("logged in to {}", session.platform().hostname);

        if enter_config_mode {
            session.enter_privileged().await?;
            session.enter_global_config().await?;
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_username_required() {
        let err = SessionBuilder::new("10.0.0.2").into_configs().unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }

    #[test]
    fn test_configs_without_jump() {
        let (jump, target, platform, enter) = SessionBuilder::new("10.0.0.2")
            .port(2222)
            .username("admin")
            .password("secret")
            .enter_config_mode(true)
            .into_configs()
            .unwrap();

        assert!(jump.is_none());
        assert_eq!(target.socket_addr(), "10.0.0.2:2222");
        assert_eq!(target.username, "admin");
        assert!(matches!(target.auth, AuthMethod::Password(_)));
        assert_eq!(target.terminal_width, platform.terminal_width);
        assert!(enter);
    }

    #[test]
    fn test_configs_with_jump() {
        let (jump, target, _, enter) = SessionBuilder::new("10.0.0.2")
            .username("admin")
            .password("secret")
            .jump_host("bastion", 2200, "ops", "hop-secret")
            .terminal_size(200, 50)
            .timeout(Duration::from_secs(5))
            .host_key_verification(HostKeyVerification::Disabled)
            .into_configs()
            .unwrap();

        let jump = jump.unwrap();
        assert_eq!(jump.socket_addr(), "bastion:2200");
        assert_eq!(jump.username, "ops");
        assert_eq!(jump.timeout, Duration::from_secs(5));
        assert_eq!(jump.host_key_verification, HostKeyVerification::Disabled);
        assert_eq!((target.terminal_width, target.terminal_height), (200, 50));
        assert!(!enter);
    }
}
