//! Reply texts.

use crate::error::Error;

pub const MSG_HELLO: &str = "Hi! I can hide a short text inside a WAV file and read it back.\n\n";

pub const MSG_HELP: &str = "Send me an uncompressed WAV file first.\n\
/hide - hide a text in your audio (I will ask for the text)\n\
/extract - read the text hidden in your audio\n\
/capacity - how many bytes your audio can hold\n\
/cancel - stop waiting for text to hide";

pub const MSG_SEND_TEXT: &str = "Send me the text you want to hide.";

pub const MSG_SAVED: &str = "Audio saved.";

pub const MSG_NO_AUDIO: &str = "You haven't uploaded audio yet.";

pub const MSG_TOO_LONG: &str = "Message is too long to hide in this audio.";

pub const MSG_UNKNOWN_COMMAND: &str = "Unknown command. Send /help to see what I can do.";

pub const MSG_INVALID_ACCOUNT: &str = "I can't store audio for this account.";

pub const MSG_CANCELLED: &str = "OK, not hiding anything.";

pub const MSG_EXTRACTED_TEXT: &str = "Extracted text";

pub fn hello() -> String {
    format!("{}{}", MSG_HELLO, MSG_HELP)
}

pub fn extracted(message: &[u8]) -> String {
    format!("{}: {}", MSG_EXTRACTED_TEXT, String::from_utf8_lossy(message))
}

pub fn capacity(bytes: usize) -> String {
    format!("Your audio can hold up to {} bytes of text.", bytes)
}

/// Reply for errors that are answered instead of propagated.
pub fn for_error(err: &Error) -> Option<&'static str> {
    match err {
        Error::NotFound(_) => Some(MSG_NO_AUDIO),
        Error::CapacityExceeded { .. } => Some(MSG_TOO_LONG),
        Error::InvalidIdentity(_) => Some(MSG_INVALID_ACCOUNT),
        _ => None,
    }
}
