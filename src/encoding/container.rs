//! Fixed-header container parsing and reassembly.

use crate::config::HEADER_SIZE;
use crate::error::{Error, Result};

/// An audio container split into its opaque header and mutable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Header bytes, round-tripped verbatim.
    pub header: Vec<u8>,
    /// Sample bytes that carry hidden data.
    pub payload: Vec<u8>,
}

impl Container {
    /// Build a container from an existing header and payload.
    pub fn from_parts(header: Vec<u8>, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    /// Split raw file bytes using the canonical 44-byte WAV header.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_with_header(bytes, HEADER_SIZE)
    }

    /// Split raw file bytes using a custom header length.
    ///
    /// The header is not interpreted; only its length is checked.
    pub fn parse_with_header(bytes: &[u8], header_size: usize) -> Result<Self> {
        if bytes.len() < header_size {
            return Err(Error::MalformedContainer {
                expected: header_size,
                actual: bytes.len(),
            });
        }

        let (header, payload) = bytes.split_at(header_size);
        Ok(Self {
            header: header.to_vec(),
            payload: payload.to_vec(),
        })
    }

    /// Concatenate header then payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Total serialized length.
    pub fn len(&self) -> usize {
        self.header.len() + self.payload.len()
    }

    /// Whether both header and payload are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into `(header, payload)`.
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.header, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<u8> {
        let mut h = b"RIFF\x24\x08\x00\x00WAVEfmt ".to_vec();
        h.resize(HEADER_SIZE, 0x11);
        h
    }

    #[test]
    fn test_parse_splits_at_header() {
        let mut bytes = header();
        bytes.extend_from_slice(&[1, 2, 3, 4]);

        let container = Container::parse(&bytes).unwrap();

        assert_eq!(container.header, header());
        assert_eq!(container.payload, vec![1, 2, 3, 4]);
        assert_eq!(container.len(), bytes.len());
    }

    #[test]
    fn test_parse_too_short() {
        let result = Container::parse(&[0u8; HEADER_SIZE - 1]);

        assert!(matches!(
            result,
            Err(Error::MalformedContainer {
                expected: HEADER_SIZE,
                actual: 43
            })
        ));
    }

    #[test]
    fn test_header_only_has_empty_payload() {
        let container = Container::parse(&header()).unwrap();
        assert!(container.payload.is_empty());
    }

    #[test]
    fn test_serialize_then_parse_preserves_parts() {
        for payload in [Vec::new(), vec![0xAB], (0..=255u8).collect::<Vec<_>>()] {
            let original = Container::from_parts(header(), payload);
            let parsed = Container::parse(&original.to_bytes()).unwrap();
            assert_eq!(parsed, original);
        }
    }

    #[test]
    fn test_custom_header_size() {
        let container = Container::parse_with_header(&[9, 9, 1, 2], 2).unwrap();
        assert_eq!(container.header, vec![9, 9]);
        assert_eq!(container.payload, vec![1, 2]);
    }
}
