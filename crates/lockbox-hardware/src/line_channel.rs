//! Newline-delimited command channel over any byte stream.
//!
//! Operators talk to the lockbox over a serial console: one ASCII command per
//! line, `\n` or `\r\n` terminated. [`LineCommandChannel`] frames such a
//! stream with [`LinesCodec`] and implements [`CommandChannel`] on top of it.
//!
//! Over-long lines are rejected instead of buffered without bound.

use crate::{Result, traits::CommandChannel};
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

/// Longest accepted command line, in bytes.
pub const MAX_LINE_LENGTH: usize = 256;

/// Command channel reading newline-terminated text from `R`.
///
/// # Examples
///
/// ```
/// use lockbox_hardware::line_channel::LineCommandChannel;
/// use lockbox_hardware::traits::CommandChannel;
///
/// #[tokio::main]
/// async fn main() -> lockbox_hardware::Result<()> {
///     let input: &[u8] = b"ENABLE_LDR\r\nSTOP_ALARM\n";
///     let mut channel = LineCommandChannel::new(input);
///
///     assert_eq!(channel.next_line().await?, Some("ENABLE_LDR".to_string()));
///     assert_eq!(channel.next_line().await?, Some("STOP_ALARM".to_string()));
///     assert_eq!(channel.next_line().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct LineCommandChannel<R> {
    lines: FramedRead<R, LinesCodec>,
}

impl<R: AsyncRead + Unpin> LineCommandChannel<R> {
    /// Frame `reader` into command lines.
    pub fn new(reader: R) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)),
        }
    }
}

impl<R> CommandChannel for LineCommandChannel<R>
where
    R: AsyncRead + Unpin + Send + Sync,
{
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => Err(
                crate::HardwareError::invalid_data(format!(
                    "command line longer than {MAX_LINE_LENGTH} bytes"
                )),
            ),
            Some(Err(LinesCodecError::Io(e))) => Err(e.into()),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_line_channel_strips_terminators() {
        let input: &[u8] = b"DISABLE_LDR\r\nENABLE_LDR\n";
        let mut channel = LineCommandChannel::new(input);

        assert_eq!(channel.next_line().await.unwrap().unwrap(), "DISABLE_LDR");
        assert_eq!(channel.next_line().await.unwrap().unwrap(), "ENABLE_LDR");
        assert!(channel.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_line_channel_unterminated_last_line() {
        let input: &[u8] = b"STOP_ALARM";
        let mut channel = LineCommandChannel::new(input);

        assert_eq!(channel.next_line().await.unwrap().unwrap(), "STOP_ALARM");
        assert!(channel.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_line_channel_rejects_oversized_line() {
        let long = "X".repeat(MAX_LINE_LENGTH + 1) + "\n";
        let mut channel = LineCommandChannel::new(long.as_bytes());

        let err = channel.next_line().await.unwrap_err();
        assert!(matches!(err, crate::HardwareError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_line_channel_over_duplex_stream() {
        let (mut writer, reader) = tokio::io::duplex(64);
        let mut channel = LineCommandChannel::new(reader);

        writer.write_all(b"ENABLE_LDR\n").await.unwrap();
        assert_eq!(channel.next_line().await.unwrap().unwrap(), "ENABLE_LDR");

        drop(writer);
        assert!(channel.next_line().await.unwrap().is_none());
    }
}
