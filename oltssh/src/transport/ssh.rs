//! SSH transport implementation using russh.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use russh::ChannelStream;
use russh::client::{self, Handle, Msg};
use russh::keys::{PrivateKeyWithHashAlg, PublicKey, load_secret_key};
use secrecy::ExposeSecret;

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use crate::error::{Result, TransportError};

/// Interactive shell stream of an SSH session.
pub type SshStream = ChannelStream<Msg>;

type HostKeyError = Arc<Mutex<Option<TransportError>>>;

/// SSH connection to an OLT, optionally relayed through a jump host.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Configuration used for this connection.
    config: SshConfig,

    /// Jump host connection carrying this one, kept alive until close.
    jump: Option<Box<SshTransport>>,
}

impl SshTransport {
    /// Connect directly to the SSH server and authenticate.
    pub async fn connect(config: SshConfig) -> Result<Self> {
        debug!("connecting to {}", config.socket_addr());

        let (handler, host_key_error) = SshHandler::new(&config);
        let connected = tokio::time::timeout(
            config.timeout,
            client::connect(client_config(&config), (config.host.as_str(), config.port), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.timeout))?;
        let mut session = unwrap_connect(connected, &host_key_error)?;

        Self::authenticate(&mut session, &config).await?;

        Ok(Self {
            session,
            config,
            jump: None,
        })
    }

    /// Connect to `target` through a `direct-tcpip` channel of an SSH
    /// connection to `jump`.
    pub async fn connect_via(jump: SshConfig, target: SshConfig) -> Result<Self> {
        let jump = Self::connect(jump).await?;
        debug!(
            "relaying to {} via {}",
            target.socket_addr(),
            jump.config.socket_addr()
        );

        let channel = jump
            .session
            .channel_open_direct_tcpip(target.host.as_str(), u32::from(target.port), "127.0.0.1", 0)
            .await
            .map_err(TransportError::Ssh)?;

        let (handler, host_key_error) = SshHandler::new(&target);
        let connected = tokio::time::timeout(
            target.timeout,
            client::connect_stream(client_config(&target), channel.into_stream(), handler),
        )
        .await
        .map_err(|_| TransportError::Timeout(target.timeout))?;
        let mut session = unwrap_connect(connected, &host_key_error)?;

        Self::authenticate(&mut session, &target).await?;

        Ok(Self {
            session,
            config: target,
            jump: Some(Box::new(jump)),
        })
    }

    /// Open a PTY shell and return it as a byte stream.
    pub async fn open_shell(&self) -> Result<SshStream> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        // Request PTY
        channel
            .request_pty(
                true,
                "vt100",
                self.config.terminal_width,
                self.config.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(TransportError::Ssh)?;

        // Request shell
        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(channel.into_stream())
    }

    /// Authenticate with the server.
    async fn authenticate(session: &mut Handle<SshHandler>, config: &SshConfig) -> Result<()> {
        let success = match &config.auth {
            AuthMethod::None => session
                .authenticate_none(&config.username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_ref().map(|p| p.expose_secret()))
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                // Get the best RSA hash algorithm supported by the server
                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(
                        &config.username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        debug!("authenticated as {} on {}", config.username, config.socket_addr());
        Ok(())
    }

    /// Disconnect, then disconnect the jump host if there is one.
    pub async fn close(self) -> Result<()> {
        let closed = self
            .session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh);

        if let Some(jump) = self.jump {
            if let Err(e) = Box::pin(jump.close()).await {
                warn!("failed to close jump host connection: {}", e);
            }
        }

        closed?;
        Ok(())
    }
}

fn client_config(config: &SshConfig) -> Arc<client::Config> {
    Arc::new(client::Config {
        inactivity_timeout: Some(config.timeout),
        ..Default::default()
    })
}

/// Prefer the detailed host-key error stored by the handler over the
/// generic `russh::Error::UnknownKey`.
fn unwrap_connect(
    connected: std::result::Result<Handle<SshHandler>, russh::Error>,
    host_key_error: &HostKeyError,
) -> Result<Handle<SshHandler>> {
    connected.map_err(|e| {
        let stored = host_key_error.lock().ok().and_then(|mut slot| slot.take());
        stored.unwrap_or(TransportError::Ssh(e)).into()
    })
}

/// SSH client handler for russh.
struct SshHandler {
    host: String,
    port: u16,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    /// Stores a detailed host-key error so connect() can surface it
    /// instead of the generic russh::Error::UnknownKey.
    host_key_error: HostKeyError,
}

impl SshHandler {
    fn new(config: &SshConfig) -> (Self, HostKeyError) {
        let host_key_error: HostKeyError = Arc::new(Mutex::new(None));
        let handler = Self {
            host: config.host.clone(),
            port: config.port,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
            host_key_error: host_key_error.clone(),
        };
        (handler, host_key_error)
    }

    /// Check the host key against known_hosts.
    ///
    /// Returns `Ok(true)` if matched, `Ok(false)` if host not found,
    /// `Err(TransportError::HostKeyChanged)` if key changed.
    fn check_known_hosts(&self, pubkey: &PublicKey) -> std::result::Result<bool, TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::check_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::check_known_hosts(&self.host, self.port, pubkey)
        };

        match result {
            Ok(matched) => Ok(matched),
            Err(russh::keys::Error::KeyChanged { line }) => Err(TransportError::HostKeyChanged {
                host: self.host.clone(),
                port: self.port,
                line,
            }),
            Err(e) => Err(TransportError::KnownHosts(e.to_string())),
        }
    }

    /// Save a new host key to known_hosts.
    fn learn_host_key(&self, pubkey: &PublicKey) -> std::result::Result<(), TransportError> {
        let result = if let Some(ref path) = self.known_hosts_path {
            russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, pubkey, path)
        } else {
            russh::keys::known_hosts::learn_known_hosts(&self.host, self.port, pubkey)
        };

        result.map_err(|e| TransportError::KnownHosts(e.to_string()))
    }

    fn reject(&self, error: TransportError) -> bool {
        warn!("rejecting host key of {}:{}: {}", self.host, self.port, error);
        if let Ok(mut slot) = self.host_key_error.lock() {
            *slot = Some(error);
        }
        false
    }
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        let accepted = match self.host_key_verification {
            HostKeyVerification::Disabled => true,

            HostKeyVerification::AcceptNew => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => {
                    // Unknown host: learn the key
                    if let Err(e) = self.learn_host_key(server_public_key) {
                        warn!("Failed to save host key: {}", e);
                    }
                    true
                }
                Err(e) => self.reject(e),
            },

            HostKeyVerification::Strict => match self.check_known_hosts(server_public_key) {
                Ok(true) => true,
                Ok(false) => self.reject(TransportError::HostKeyUnknown {
                    host: self.host.clone(),
                    port: self.port,
                }),
                Err(e) => self.reject(e),
            },
        };
        Ok(accepted)
    }
}

