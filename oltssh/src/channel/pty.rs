//! PTY channel abstraction for interactive sessions.

use bytes::BytesMut;
use log::{trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::buffer::PromptBuffer;
use super::patterns;
use crate::error::{ChannelError, Result};

/// Size of a single read from the stream.
const READ_CHUNK: usize = 4096;

/// Prompt-synchronised reader/writer over an interactive shell stream.
///
/// The stream is anything that carries the device's terminal: an SSH
/// channel in production, a scripted mock in tests. The channel does not
/// interpret output beyond pagination and escape-sequence handling.
pub struct PtyChannel<S> {
    /// The underlying duplex stream.
    stream: S,

    /// Buffer for accumulating cleaned output.
    buffer: PromptBuffer,

    /// Scratch space for a single read.
    chunk: BytesMut,

    /// Tail of earlier reads that may be the start of a pagination banner.
    pending: Vec<u8>,

    /// Whether the remote side closed the stream.
    eof: bool,
}

impl<S> PtyChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap a connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: PromptBuffer::new(),
            chunk: BytesMut::with_capacity(READ_CHUNK),
            pending: Vec::new(),
            eof: false,
        }
    }

    /// Whether end of stream has been observed.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Write a line followed by a newline keystroke.
    pub async fn send(&mut self, line: &str) -> Result<()> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.write_raw(&data).await
    }

    async fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.stream
            .write_all(data)
            .await
            .map_err(ChannelError::Write)?;
        self.stream.flush().await.map_err(ChannelError::Write)?;
        Ok(())
    }

    /// Read until `prompt` appears anywhere in the accumulated output.
    ///
    /// Pagination banners are answered with a newline and removed; escape
    /// sequences are dropped. End of stream before the prompt is not an
    /// error: whatever arrived so far is returned. There is no timeout here;
    /// wrap the call if the device may stall.
    pub async fn read_until(&mut self, prompt: &str) -> Result<String> {
        self.buffer.clear();
        self.pending.clear();

        loop {
            self.chunk.clear();
            self.chunk.reserve(READ_CHUNK);

            let n = self
                .stream
                .read_buf(&mut self.chunk)
                .await
                .map_err(ChannelError::Read)?;

            if n == 0 {
                self.eof = true;
                self.flush_pending();
                warn!(
                    "stream closed before prompt {:?} ({} bytes buffered)",
                    prompt,
                    self.buffer.len()
                );
                break;
            }

            trace!("read {} bytes", n);

            // A banner may arrive split over several reads
            self.pending.extend_from_slice(&self.chunk);
            for _ in 0..patterns::count_banners(&self.pending) {
                trace!("answering pagination banner");
                self.write_raw(b"\n").await?;
            }

            let cleaned = patterns::strip_banners(&self.pending).into_owned();
            let ready = cleaned.len() - patterns::partial_banner_len(&cleaned);
            self.buffer.extend(&cleaned[..ready]);
            self.pending = cleaned[ready..].to_vec();

            if self.buffer.contains_prompt(prompt) {
                self.flush_pending();
                break;
            }
        }

        Ok(self.buffer.take())
    }
}

impl<S> PtyChannel<S> {
    fn flush_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        self.buffer.extend(&pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_read_until_prompt() {
        let mock = Builder::new()
            .read(b"enable\r\n")
            .read(b"\r\nMA5683T#")
            .build();
        let mut channel = PtyChannel::new(mock);

        let text = channel.read_until("MA5683T#").await.unwrap();
        assert_eq!(text, "enable\r\n\r\nMA5683T#");
        assert!(!channel.is_eof());
    }

    #[tokio::test]
    async fn test_send_appends_newline() {
        let mock = Builder::new().write(b"display time\n").build();
        let mut channel = PtyChannel::new(mock);
        channel.send("display time").await.unwrap();
    }

    #[tokio::test]
    async fn test_pagination_answered_once_per_banner() {
        let mock = Builder::new()
            .read(b"Number : 1\r\n---- More ( Press 'Q' to break ) ----")
            .write(b"\n")
            .read(b"\x1b[37DNumber : 2\r\n---- More ( Press 'Q' to break ) ----")
            .write(b"\n")
            .read(b"\x1b[37DNumber : 3\r\nMA5683T(config)#")
            .build();
        let mut channel = PtyChannel::new(mock);

        let text = channel.read_until("MA5683T(config)#").await.unwrap();
        assert!(!text.contains("---- More"));
        assert!(!text.contains('\x1b'));
        assert_eq!(
            text,
            "Number : 1\r\nNumber : 2\r\nNumber : 3\r\nMA5683T(config)#"
        );
    }

    #[tokio::test]
    async fn test_pagination_banner_split_across_reads() {
        let mock = Builder::new()
            .read(b"Number : 1\r\n---- More ( Press ")
            .read(b"'Q' to break ) ----")
            .write(b"\n")
            .read(b"\x1b[37DNumber : 2\r\nMA5683T(config)#")
            .build();
        let mut channel = PtyChannel::new(mock);

        let text = channel.read_until("MA5683T(config)#").await.unwrap();
        assert_eq!(text, "Number : 1\r\nNumber : 2\r\nMA5683T(config)#");
    }

    #[tokio::test]
    async fn test_dashes_held_back_are_kept() {
        let mock = Builder::new()
            .read(b"  --------")
            .read(b"--------\r\nMA5683T#")
            .build();
        let mut channel = PtyChannel::new(mock);

        let text = channel.read_until("MA5683T#").await.unwrap();
        assert_eq!(text, "  ----------------\r\nMA5683T#");
    }

    #[tokio::test]
    async fn test_eof_returns_partial_text() {
        let mock = Builder::new().read(b"Are you sure to log out? ").build();
        let mut channel = PtyChannel::new(mock);

        let text = channel.read_until("to log on").await.unwrap();
        assert_eq!(text, "Are you sure to log out? ");
        assert!(channel.is_eof());
    }

    #[tokio::test]
    async fn test_read_error_is_surfaced() {
        let mock = Builder::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let mut channel = PtyChannel::new(mock);

        let err = channel.read_until("#").await.unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Read(_))));
    }

    #[tokio::test]
    async fn test_write_error_is_surfaced() {
        let mock = Builder::new()
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let mut channel = PtyChannel::new(mock);

        let err = channel.send("enable").await.unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::Write(_))));
    }
}
