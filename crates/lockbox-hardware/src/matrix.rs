//! 4×4 matrix keypad decoding.
//!
//! A matrix scanner (PIO program, interrupt handler or polling loop) samples
//! the sixteen switches and publishes a 16-bit scan word whenever the set of
//! held keys changes. Bit `i` is set while key [`MATRIX_KEY_MAP`]`[i]` is held.
//!
//! [`MatrixDecoder`] turns that stream of words into discrete key presses:
//!
//! - only keys that were *released* in the previous word and *held* in the
//!   current one produce a press (rising edge);
//! - a key that stays held produces nothing further;
//! - when several keys go down in the same word, the lowest bit wins.
//!
//! [`MatrixKeypad`] wraps a decoder around a FIFO of scan words and exposes
//! it as a [`KeySource`]. Each poll feeds every queued word through the
//! decoder in order and hands out one buffered press, so presses made
//! between two polls are never lost.
//!
//! ```text
//! scan words:  0x0000  0x0008  0x0008  0x0000  0x0008
//! presses:       -       '1'     -       -       '1'
//! ```

use std::collections::VecDeque;

use crate::{Result, traits::KeySource, types::DeviceInfo};
use lockbox_core::{Key, constants::MATRIX_KEY_MAP};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::trace;

/// Decode a single bit index of the scan word.
fn key_for_bit(bit: u32) -> Option<Key> {
    let symbol = MATRIX_KEY_MAP.as_bytes().get(bit as usize)?;
    Key::from_char(char::from(*symbol)).ok()
}

/// Rising-edge decoder for matrix scan words.
///
/// # Examples
///
/// ```
/// use lockbox_hardware::matrix::MatrixDecoder;
/// use lockbox_core::Key;
///
/// let mut decoder = MatrixDecoder::new();
///
/// // Bit 3 is '1'
/// assert_eq!(decoder.feed(0b1000), Some(Key::Digit(1)));
/// // Still held: no repeat
/// assert_eq!(decoder.feed(0b1000), None);
/// // Released, then pressed again
/// assert_eq!(decoder.feed(0), None);
/// assert_eq!(decoder.feed(0b1000), Some(Key::Digit(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatrixDecoder {
    previous: u16,
}

impl MatrixDecoder {
    /// Create a decoder with every key released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next scan word and return the key that went down, if any.
    pub fn feed(&mut self, word: u16) -> Option<Key> {
        let pressed = word & !self.previous;
        self.previous = word;

        if pressed == 0 {
            return None;
        }
        key_for_bit(pressed.trailing_zeros())
    }

    /// The last scan word seen.
    pub fn held(&self) -> u16 {
        self.previous
    }
}

/// Keypad backed by a FIFO of raw matrix scan words.
#[derive(Debug)]
pub struct MatrixKeypad {
    scan_rx: mpsc::Receiver<u16>,
    decoder: MatrixDecoder,
    pending: VecDeque<Key>,
}

impl MatrixKeypad {
    /// Create a keypad and the handle the scanner pushes words into.
    pub fn new() -> (Self, MatrixScanHandle) {
        let (scan_tx, scan_rx) = mpsc::channel(64);

        let keypad = Self {
            scan_rx,
            decoder: MatrixDecoder::new(),
            pending: VecDeque::new(),
        };

        (keypad, MatrixScanHandle { scan_tx })
    }
}

impl KeySource for MatrixKeypad {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        let mut drained = false;
        loop {
            match self.scan_rx.try_recv() {
                Ok(word) => {
                    drained = true;
                    let key = self.decoder.feed(word);
                    trace!(word, ?key, "Matrix scan");
                    self.pending.extend(key);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) if drained || !self.pending.is_empty() => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(crate::HardwareError::disconnected("Matrix scanner stopped"));
                }
            }
        }

        Ok(self.pending.pop_front())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new("Matrix Keypad", "4x4 membrane"))
    }
}

/// Producer side of a [`MatrixKeypad`]: the scanner pushes words here.
#[derive(Debug, Clone)]
pub struct MatrixScanHandle {
    scan_tx: mpsc::Sender<u16>,
}

impl MatrixScanHandle {
    /// Publish a new scan word.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub async fn push(&self, word: u16) -> Result<()> {
        self.scan_tx
            .send(word)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Matrix keypad dropped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Key::Star)]
    #[case(1, Key::Digit(7))]
    #[case(3, Key::Digit(1))]
    #[case(4, Key::Digit(0))]
    #[case(8, Key::Hash)]
    #[case(11, Key::Digit(3))]
    #[case(12, Key::Letter('D'))]
    #[case(15, Key::Letter('A'))]
    fn test_bit_mapping(#[case] bit: u32, #[case] expected: Key) {
        let mut decoder = MatrixDecoder::new();
        assert_eq!(decoder.feed(1 << bit), Some(expected));
    }

    #[test]
    fn test_every_bit_decodes() {
        for bit in 0..16 {
            assert!(key_for_bit(bit).is_some(), "bit {bit} has no key");
        }
        assert!(key_for_bit(16).is_none());
    }

    #[test]
    fn test_held_key_fires_once() {
        let mut decoder = MatrixDecoder::new();

        assert_eq!(decoder.feed(1 << 4), Some(Key::Digit(0)));
        assert_eq!(decoder.feed(1 << 4), None);
        assert_eq!(decoder.feed(1 << 4), None);
        assert_eq!(decoder.held(), 1 << 4);
    }

    #[test]
    fn test_second_key_while_first_held() {
        let mut decoder = MatrixDecoder::new();

        assert_eq!(decoder.feed(1 << 4), Some(Key::Digit(0)));
        // '0' still held, '#' goes down
        assert_eq!(decoder.feed((1 << 4) | (1 << 8)), Some(Key::Hash));
        // '0' released, '#' still held
        assert_eq!(decoder.feed(1 << 8), None);
    }

    #[test]
    fn test_simultaneous_press_lowest_bit_wins() {
        let mut decoder = MatrixDecoder::new();

        assert_eq!(decoder.feed((1 << 11) | (1 << 2)), Some(Key::Digit(4)));
    }

    #[test]
    fn test_release_produces_nothing() {
        let mut decoder = MatrixDecoder::new();

        decoder.feed(1 << 5);
        assert_eq!(decoder.feed(0), None);
    }

    #[tokio::test]
    async fn test_matrix_keypad_keeps_every_press_between_polls() {
        let (mut keypad, scanner) = MatrixKeypad::new();

        // '1' then '2', each pressed and released, all before the first poll
        for word in [1 << 3, 0, 1 << 7, 0] {
            scanner.push(word).await.unwrap();
        }

        assert_eq!(keypad.poll_key().await.unwrap(), Some(Key::Digit(1)));
        assert_eq!(keypad.poll_key().await.unwrap(), Some(Key::Digit(2)));
        assert_eq!(keypad.poll_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_matrix_keypad_buffered_press_survives_scanner_exit() {
        let (mut keypad, scanner) = MatrixKeypad::new();

        for word in [1 << 4, 0, 1 << 8] {
            scanner.push(word).await.unwrap();
        }
        drop(scanner);

        assert_eq!(keypad.poll_key().await.unwrap(), Some(Key::Digit(0)));
        assert_eq!(keypad.poll_key().await.unwrap(), Some(Key::Hash));
        assert!(keypad.poll_key().await.unwrap_err().is_disconnected());
    }

    #[tokio::test]
    async fn test_matrix_keypad_held_key_across_polls() {
        let (mut keypad, scanner) = MatrixKeypad::new();

        scanner.push(1 << 8).await.unwrap();
        assert_eq!(keypad.poll_key().await.unwrap(), Some(Key::Hash));

        scanner.push(1 << 8).await.unwrap();
        assert_eq!(keypad.poll_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_matrix_keypad_scanner_gone() {
        let (mut keypad, scanner) = MatrixKeypad::new();

        scanner.push(1 << 0).await.unwrap();
        drop(scanner);

        // Queued word is still delivered
        assert_eq!(keypad.poll_key().await.unwrap(), Some(Key::Star));
        assert!(keypad.poll_key().await.unwrap_err().is_disconnected());
    }
}
