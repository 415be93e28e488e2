use bytes::Bytes;

use crate::error::Result;

/// An ordered byte channel.
///
/// Writes are forwarded in call order. Reads are exact: `read(n)` returns
/// `n` bytes or an error, never a short buffer.
pub trait Transport {
    /// Append a single byte.
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }

    /// Append a slice of bytes.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read one byte.
    fn read_byte(&mut self) -> Result<u8> {
        let bytes = self.read(1)?;
        Ok(bytes[0])
    }

    /// Read exactly `n` bytes.
    fn read(&mut self, n: usize) -> Result<Bytes>;

    /// Push any bytes held by the channel towards the peer.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
