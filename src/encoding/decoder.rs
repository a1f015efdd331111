//! LSB extractor: rebuilds message bytes from payload low bits.

use crate::encoding::encoder::TERMINATOR;
use crate::error::{Error, Result};

/// Scan complete 8-byte groups, returning the bytes before the terminator
/// and whether the terminator was seen.
fn scan(payload: &[u8]) -> (Vec<u8>, bool) {
    let mut message = Vec::new();

    for group in payload.chunks_exact(8) {
        let byte = group
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, sample)| acc | ((sample & 1) << bit));

        if byte == TERMINATOR {
            return (message, true);
        }
        message.push(byte);
    }

    (message, false)
}

/// Recover a hidden message from `payload`.
///
/// Stops at the first terminator. When the payload ends first, whatever was
/// accumulated from complete groups is returned; trailing bytes that do not
/// form a full group are ignored.
pub fn extract(payload: &[u8]) -> Vec<u8> {
    scan(payload).0
}

/// Like [`extract`], but fails with [`Error::NoTerminator`] when the payload
/// ends before a terminator is found.
pub fn extract_strict(payload: &[u8]) -> Result<Vec<u8>> {
    match scan(payload) {
        (message, true) => Ok(message),
        (_, false) => Err(Error::NoTerminator),
    }
}
