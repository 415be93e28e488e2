//! Text codecs for string payloads.

use std::borrow::Cow;

use crate::error::Result;

/// Converts between Rust strings and the bytes carried by STRING values.
pub trait TextCodec {
    /// Encode text into wire bytes.
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]>;

    /// Decode wire bytes into text.
    fn decode(&self, bytes: Vec<u8>) -> Result<String>;
}

/// Strict UTF-8: invalid input fails with `ProtocolError::InvalidUtf8`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl TextCodec for Utf8 {
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        Cow::Borrowed(text.as_bytes())
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        Ok(String::from_utf8(bytes)?)
    }
}

/// Lenient UTF-8: invalid sequences become U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Lossy;

impl TextCodec for Utf8Lossy {
    fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        Cow::Borrowed(text.as_bytes())
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()))
    }
}
