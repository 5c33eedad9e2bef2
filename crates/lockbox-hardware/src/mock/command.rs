//! Mock operator command channel.

use crate::{Result, traits::CommandChannel};
use tokio::sync::mpsc;

/// Mock command channel fed through a [`MockCommandHandle`].
///
/// The channel closes (returns `Ok(None)`) once every handle is dropped.
///
/// # Examples
///
/// ```
/// use lockbox_hardware::mock::MockCommandChannel;
/// use lockbox_hardware::traits::CommandChannel;
///
/// #[tokio::main]
/// async fn main() -> lockbox_hardware::Result<()> {
///     let (mut channel, handle) = MockCommandChannel::new();
///
///     handle.send_line("STOP_ALARM").await?;
///     drop(handle);
///
///     assert_eq!(channel.next_line().await?, Some("STOP_ALARM".to_string()));
///     assert_eq!(channel.next_line().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockCommandChannel {
    line_rx: mpsc::Receiver<String>,
}

impl MockCommandChannel {
    /// Create a new mock command channel.
    pub fn new() -> (Self, MockCommandHandle) {
        let (line_tx, line_rx) = mpsc::channel(16);
        (Self { line_rx }, MockCommandHandle { line_tx })
    }
}

impl CommandChannel for MockCommandChannel {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.line_rx.recv().await)
    }
}

/// Handle for sending lines to a [`MockCommandChannel`].
#[derive(Debug, Clone)]
pub struct MockCommandHandle {
    line_tx: mpsc::Sender<String>,
}

impl MockCommandHandle {
    /// Send one command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel has been dropped.
    pub async fn send_line(&self, line: impl Into<String>) -> Result<()> {
        self.line_tx
            .send(line.into())
            .await
            .map_err(|_| crate::HardwareError::disconnected("Command channel closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_command_lines_in_order() {
        let (mut channel, handle) = MockCommandChannel::new();

        handle.send_line("ENABLE_LDR").await.unwrap();
        handle.send_line("DISABLE_LDR").await.unwrap();

        assert_eq!(channel.next_line().await.unwrap().unwrap(), "ENABLE_LDR");
        assert_eq!(channel.next_line().await.unwrap().unwrap(), "DISABLE_LDR");
    }

    #[tokio::test]
    async fn test_mock_command_closes_when_handles_dropped() {
        let (mut channel, handle) = MockCommandChannel::new();
        let second = handle.clone();

        drop(handle);
        second.send_line("STOP_ALARM").await.unwrap();
        drop(second);

        assert!(channel.next_line().await.unwrap().is_some());
        assert!(channel.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mock_command_send_after_channel_dropped() {
        let (channel, handle) = MockCommandChannel::new();

        drop(channel);

        assert!(handle.send_line("STOP_ALARM").await.is_err());
    }
}
