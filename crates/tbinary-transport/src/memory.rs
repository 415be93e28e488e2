use bytes::{Buf, Bytes, BytesMut};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// In-memory loopback channel.
///
/// Writes append to the back of the buffer, reads consume from the front.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    buf: BytesMut,
}

impl MemoryTransport {
    /// Create an empty channel.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Create a channel pre-loaded with bytes to read.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            buf: BytesMut::from(bytes.as_ref()),
        }
    }

    /// Bytes written but not yet read.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether every written byte has been read.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Take all unread bytes, leaving the channel empty.
    pub fn take(&mut self) -> Bytes {
        self.buf.split().freeze()
    }
}

impl Transport for MemoryTransport {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.buf.extend_from_slice(&[byte]);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        if !self.buf.has_remaining() {
            return Err(TransportError::UnexpectedEof {
                needed: 1,
                received: 0,
            });
        }
        Ok(self.buf.get_u8())
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        if self.buf.len() < n {
            return Err(TransportError::UnexpectedEof {
                needed: n,
                received: self.buf.len(),
            });
        }
        Ok(self.buf.split_to(n).freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_preserves_order() {
        let mut transport = MemoryTransport::new();
        transport.write(b"hello").unwrap();
        transport.write_byte(b'!').unwrap();

        assert_eq!(transport.len(), 6);
        assert_eq!(transport.read(5).unwrap().as_ref(), b"hello");
        assert_eq!(transport.read_byte().unwrap(), b'!');
        assert!(transport.is_empty());
    }

    #[test]
    fn short_read_leaves_buffer_untouched() {
        let mut transport = MemoryTransport::from_bytes(b"abc");

        let err = transport.read(4).unwrap_err();
        assert!(matches!(
            err,
            TransportError::UnexpectedEof {
                needed: 4,
                received: 3
            }
        ));
        assert_eq!(transport.as_bytes(), b"abc");
    }

    #[test]
    fn read_byte_on_empty_fails() {
        let mut transport = MemoryTransport::new();
        assert!(matches!(
            transport.read_byte(),
            Err(TransportError::UnexpectedEof { needed: 1, .. })
        ));
    }

    #[test]
    fn take_drains_unread_bytes() {
        let mut transport = MemoryTransport::new();
        transport.write(&[1, 2, 3]).unwrap();
        transport.read_byte().unwrap();

        assert_eq!(transport.take().as_ref(), &[2, 3]);
        assert!(transport.is_empty());
    }

    #[test]
    fn works_through_mutable_reference() {
        fn send(mut channel: impl Transport) {
            channel.write(b"ref").unwrap();
        }

        let mut transport = MemoryTransport::new();
        send(&mut transport);
        assert_eq!(transport.as_bytes(), b"ref");
    }
}
