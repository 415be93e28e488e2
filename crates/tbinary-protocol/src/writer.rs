use tbinary_transport::Transport;
use tracing::trace;

use crate::codec::BinaryProtocol;
use crate::error::{ProtocolError, Result};
use crate::pack::{pack_double, pack_width_in, I64Range, Width};
use crate::text::TextCodec;
use crate::types::{FieldHeader, ListHeader, MapHeader, MessageHeader, SetHeader, TType};

/// High 16 bits of a strict message header.
const VERSION_1_HIGH: i16 = (crate::types::VERSION_1 >> 16) as u16 as i16;

/// Frame writer.
///
/// Wire format of a strict message:
/// ```text
/// ┌────────────┬──────────┬─────────────┬──────────┬─────────────┐
/// │ 0x80 0x01  │ kind     │ name length │ name     │ sequence id │
/// │ (2B)       │ (2B BE)  │ (4B BE)     │ (UTF-8)  │ (4B BE)     │
/// └────────────┴──────────┴─────────────┴──────────┴─────────────┘
/// ```
/// A non-strict message drops the version and writes the kind as a single
/// byte after the name.
impl<T: Transport, C: TextCodec> BinaryProtocol<T, C> {
    /// Write a message envelope.
    pub fn write_message_begin(&mut self, header: &MessageHeader) -> Result<()> {
        trace!(
            name = %header.name,
            kind = %header.kind,
            seq = header.sequence_id,
            strict = self.config.strict_write,
            "write message begin"
        );
        if self.config.strict_write {
            self.write_i16(VERSION_1_HIGH)?;
            self.write_i16(i16::from(u8::from(header.kind)))?;
            self.write_string(&header.name)?;
            self.write_i32(header.sequence_id)
        } else {
            self.write_string(&header.name)?;
            self.transport.write_byte(u8::from(header.kind))?;
            self.write_i32(header.sequence_id)
        }
    }

    pub fn write_message_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Structs carry no metadata in the binary format; `name` is not written.
    pub fn write_struct_begin(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    pub fn write_struct_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write a field header: type byte then i16 id.
    pub fn write_field_begin(&mut self, header: &FieldHeader) -> Result<()> {
        self.transport.write_byte(u8::from(header.field_type))?;
        self.write_i16(header.id)
    }

    pub fn write_field_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Terminate a struct's field list.
    pub fn write_field_stop(&mut self) -> Result<()> {
        self.transport.write_byte(u8::from(TType::Stop))?;
        Ok(())
    }

    /// Write a map header: key type, value type, i32 count.
    pub fn write_map_begin(&mut self, header: &MapHeader) -> Result<()> {
        self.transport.write_byte(u8::from(header.key_type))?;
        self.transport.write_byte(u8::from(header.value_type))?;
        self.write_i32(header.count)
    }

    pub fn write_map_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write a list header: element type, i32 count.
    pub fn write_list_begin(&mut self, header: &ListHeader) -> Result<()> {
        self.transport.write_byte(u8::from(header.element_type))?;
        self.write_i32(header.count)
    }

    pub fn write_list_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write a set header: element type, i32 count.
    pub fn write_set_begin(&mut self, header: &SetHeader) -> Result<()> {
        self.transport.write_byte(u8::from(header.element_type))?;
        self.write_i32(header.count)
    }

    pub fn write_set_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.transport.write_byte(u8::from(value))?;
        Ok(())
    }

    pub fn write_byte(&mut self, value: i8) -> Result<()> {
        self.transport.write_byte(value as u8)?;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        let packed = pack_width_in(i64::from(value), Width::Two, I64Range::Full)?;
        self.transport.write(&packed)?;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let packed = pack_width_in(i64::from(value), Width::Four, I64Range::Full)?;
        self.transport.write(&packed)?;
        Ok(())
    }

    /// Write an i64, enforcing the session's [`I64Range`].
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        let packed = pack_width_in(value, Width::Eight, self.config.i64_range)?;
        self.transport.write(&packed)?;
        Ok(())
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.transport.write(&pack_double(value))?;
        Ok(())
    }

    /// Write text through the session's codec: i32 byte length then bytes.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let encoded = self.codec.encode(value);
        self.write_binary(&encoded)
    }

    /// Write raw bytes: i32 length then bytes.
    pub fn write_binary(&mut self, value: &[u8]) -> Result<()> {
        let len = checked_size(value.len())?;
        self.write_i32(len)?;
        self.transport.write(value)?;
        Ok(())
    }

    /// Flush the underlying channel.
    pub fn flush(&mut self) -> Result<()> {
        self.transport.flush()?;
        Ok(())
    }
}

/// Convert a length or count to its i32 wire form.
pub(crate) fn checked_size(len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| ProtocolError::OutOfRange {
        width: 4,
        value: i64::try_from(len).unwrap_or(i64::MAX),
    })
}
