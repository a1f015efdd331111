//! Container codec and LSB steganography.
//!
//! A container is a fixed-size header followed by a payload byte stream.
//! Only the payload is ever modified: each hidden bit replaces the least
//! significant bit of one payload byte.
//!
//! ```text
//! message ++ 0x00 → bits (LSB first) → payload[i*8 + b] & 0xFE | bit
//! ```

mod container;
mod decoder;
mod encoder;

pub use container::Container;
pub use decoder::{extract, extract_strict};
pub use encoder::{capacity_for, embed, required_payload_len, TERMINATOR};
