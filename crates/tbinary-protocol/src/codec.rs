use crate::config::ProtocolConfig;
use crate::text::Utf8;

/// A binary protocol session bound to one byte channel.
///
/// Holds the channel, a text codec and a [`ProtocolConfig`]. There is no
/// other state: every read and write goes straight through to the channel,
/// in call order. Callers drive the framing grammar:
///
/// ```text
/// message := message_begin struct message_end
/// struct  := struct_begin (field_begin value field_end)* field_stop struct_end
/// value   := scalar | struct
///          | map_begin (value value)* map_end
///          | list_begin value* list_end
///          | set_begin value* set_end
/// ```
///
/// One reader and one writer at a time; the session does no locking.
pub struct BinaryProtocol<T, C = Utf8> {
    pub(crate) transport: T,
    pub(crate) codec: C,
    pub(crate) config: ProtocolConfig,
}

impl<T> BinaryProtocol<T> {
    /// Create a session with explicit strict flags and default limits.
    pub fn new(transport: T, strict_read: bool, strict_write: bool) -> Self {
        Self::with_config(transport, ProtocolConfig::with_strict(strict_read, strict_write))
    }

    /// Create a session with explicit configuration.
    pub fn with_config(transport: T, config: ProtocolConfig) -> Self {
        Self::with_codec(transport, config, Utf8)
    }
}

impl<T, C> BinaryProtocol<T, C> {
    /// Create a session with explicit configuration and text codec.
    pub fn with_codec(transport: T, config: ProtocolConfig, codec: C) -> Self {
        Self {
            transport,
            codec,
            config,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Text codec used for string payloads.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return the channel.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T, C> std::fmt::Debug for BinaryProtocol<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinaryProtocol")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
