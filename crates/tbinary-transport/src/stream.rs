use std::io::{ErrorKind, Read, Write};

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Byte channel over any blocking `Read + Write` stream.
///
/// Partial reads and writes are completed internally; `Interrupted` is
/// retried. No bytes are buffered between calls.
pub struct StreamTransport<S> {
    inner: S,
}

impl<S> StreamTransport<S> {
    /// Wrap a stream.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consume the channel and return the inner stream.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(TransportError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    debug!("channel closed before single byte read");
                    return Err(TransportError::UnexpectedEof {
                        needed: 1,
                        received: 0,
                    });
                }
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        // Grow in chunks so a hostile length prefix cannot force a huge allocation up front.
        let mut buf = BytesMut::with_capacity(n.min(READ_CHUNK_SIZE));
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        while buf.len() < n {
            let want = (n - buf.len()).min(READ_CHUNK_SIZE);
            match self.inner.read(&mut chunk[..want]) {
                Ok(0) => {
                    debug!(needed = n, received = buf.len(), "channel closed mid-read");
                    return Err(TransportError::UnexpectedEof {
                        needed: n,
                        received: buf.len(),
                    });
                }
                Ok(read) => buf.extend_from_slice(&chunk[..read]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        Ok(buf.freeze())
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<S> std::fmt::Debug for StreamTransport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamTransport").finish_non_exhaustive()
    }
}
