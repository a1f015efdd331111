//! LSB embedder: writes message bits into payload bytes.

use crate::error::{Error, Result};

/// Byte appended to every message to mark where it ends.
pub const TERMINATOR: u8 = 0x00;

/// Payload bytes needed to carry `message_len` bytes plus the terminator.
pub fn required_payload_len(message_len: usize) -> usize {
    (message_len + 1) * 8
}

/// Longest message (in bytes) that fits into a payload of `payload_len` bytes.
pub fn capacity_for(payload_len: usize) -> usize {
    (payload_len / 8).saturating_sub(1)
}

/// Hide `message` in the low bits of `payload`.
///
/// Message byte `i`, bit `b` (least significant first) lands in the low bit
/// of `payload[i * 8 + b]`. The terminator is embedded after the message.
/// Every other bit, and every byte past the used prefix, is copied unchanged.
///
/// # Example
///
/// ```
/// use audio_stego_store::encoding::{embed, extract};
///
/// let payload = vec![0x80u8; 64];
/// let stego = embed(&payload, b"hey").unwrap();
///
/// assert_eq!(stego.len(), payload.len());
/// assert_eq!(extract(&stego), b"hey");
/// ```
pub fn embed(payload: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let needed = required_payload_len(message.len());
    if needed > payload.len() {
        return Err(Error::CapacityExceeded {
            needed,
            available: payload.len(),
        });
    }

    let mut out = payload.to_vec();
    let bytes = message.iter().copied().chain(std::iter::once(TERMINATOR));

    for (i, byte) in bytes.enumerate() {
        for bit in 0..8 {
            let pos = i * 8 + bit;
            out[pos] = (out[pos] & 0xFE) | ((byte >> bit) & 1);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_known_bits() {
        // 'A' = 0b0100_0001
        let payload = vec![0xFFu8; 16];
        let stego = embed(&payload, b"A").unwrap();

        assert_eq!(
            &stego[..8],
            &[0xFF, 0xFE, 0xFE, 0xFE, 0xFE, 0xFE, 0xFF, 0xFE]
        );
        // terminator clears every low bit of the second group
        assert!(stego[8..16].iter().all(|b| *b == 0xFE));
    }

    #[test]
    fn test_embed_exact_capacity() {
        let payload = vec![0u8; 80];
        assert!(embed(&payload, b"123456789").is_ok());
    }

    #[test]
    fn test_embed_one_byte_over() {
        let payload = vec![0u8; 80];
        let result = embed(&payload, b"1234567890");

        assert!(matches!(
            result,
            Err(Error::CapacityExceeded {
                needed: 88,
                available: 80
            })
        ));
    }

    #[test]
    fn test_embed_empty_message_needs_terminator_only() {
        assert!(embed(&[0u8; 7], b"").is_err());
        assert_eq!(embed(&[1u8; 8], b"").unwrap(), vec![0u8; 8]);
    }

    #[test]
    fn test_untouched_region_preserved() {
        let payload: Vec<u8> = (0..200u32).map(|i| (i * 37 % 256) as u8).collect();
        let stego = embed(&payload, b"hidden").unwrap();
        let used = required_payload_len(6);

        assert_eq!(&stego[used..], &payload[used..]);
        for (a, b) in stego[..used].iter().zip(&payload[..used]) {
            assert_eq!(a & 0xFE, b & 0xFE);
        }
    }

    #[test]
    fn test_capacity_helpers() {
        assert_eq!(capacity_for(80), 9);
        assert_eq!(capacity_for(87), 9);
        assert_eq!(capacity_for(7), 0);
        assert_eq!(capacity_for(9_956), 1_243);
        assert_eq!(required_payload_len(9), 80);
    }
}
