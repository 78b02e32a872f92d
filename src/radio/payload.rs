//! Payload bytes → displayable text.

use crate::config::MAX_PAYLOAD_LEN;
use heapless::String;

/// Text form of a packet payload, bounded by the largest LoRa payload.
pub type PayloadText = String<MAX_PAYLOAD_LEN>;

/// Replacement for byte sequences that are not valid UTF-8.
const REPLACEMENT: char = '?';

/// Decode a payload the way senders of C strings expect it.
///
/// Everything from the first NUL byte on is dropped. Invalid UTF-8 is
/// replaced by `?` (one byte each at most, so the result always fits).
pub fn decode(bytes: &[u8]) -> PayloadText {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());

    let mut text = PayloadText::new();
    for chunk in bytes[..end].utf8_chunks() {
        for c in chunk.valid().chars() {
            if text.push(c).is_err() {
                return text;
            }
        }
        if !chunk.invalid().is_empty() && text.push(REPLACEMENT).is_err() {
            return text;
        }
    }
    text
}
