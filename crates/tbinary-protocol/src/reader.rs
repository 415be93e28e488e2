use bytes::Bytes;
use tbinary_transport::Transport;
use tracing::{debug, trace};

use crate::codec::BinaryProtocol;
use crate::error::{ProtocolError, Result};
use crate::pack::{unpack_double, unpack_width, Width};
use crate::text::TextCodec;
use crate::types::{
    FieldHeader, ListHeader, MapHeader, MessageHeader, MessageType, SetHeader, TType,
    MESSAGE_TYPE_MASK, VERSION_1, VERSION_MASK,
};

/// Frame reader.
///
/// Message headers are negotiated from their first i32: a negative value is
/// a versioned header, anything else is the name length of a legacy
/// unversioned header.
impl<T: Transport, C: TextCodec> BinaryProtocol<T, C> {
    /// Read a message envelope, detecting strict and legacy headers.
    pub fn read_message_begin(&mut self) -> Result<MessageHeader> {
        let first = self.read_i32()?;

        let header = if first < 0 {
            let word = first as u32;
            if word & VERSION_MASK != VERSION_1 {
                debug!(header = first, "unknown message version");
                return Err(ProtocolError::MissingVersionIdentifier(first));
            }
            let kind = MessageType::try_from((word & MESSAGE_TYPE_MASK) as u8)?;
            let name = self.read_string()?;
            let sequence_id = self.read_i32()?;
            MessageHeader {
                name,
                kind,
                sequence_id,
            }
        } else {
            if self.config.strict_read {
                debug!(header = first, "unversioned message rejected by strict read");
                return Err(ProtocolError::InvalidVersionIdentifier(first));
            }
            let name = self.read_text(first)?;
            let kind = MessageType::try_from(self.transport.read_byte()?)?;
            let sequence_id = self.read_i32()?;
            MessageHeader {
                name,
                kind,
                sequence_id,
            }
        };

        trace!(
            name = %header.name,
            kind = %header.kind,
            seq = header.sequence_id,
            "read message begin"
        );
        Ok(header)
    }

    pub fn read_message_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_struct_begin(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_struct_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Read a field header. The stop tag is returned as
    /// [`FieldHeader::stop`] without reading an id.
    pub fn read_field_begin(&mut self) -> Result<FieldHeader> {
        let field_type = self.read_type_tag()?;
        if field_type == TType::Stop {
            return Ok(FieldHeader::stop());
        }
        let id = self.read_i16()?;
        Ok(FieldHeader { field_type, id })
    }

    pub fn read_field_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_map_begin(&mut self) -> Result<MapHeader> {
        let key_type = self.read_type_tag()?;
        let value_type = self.read_type_tag()?;
        let count = self.read_count()?;
        Ok(MapHeader {
            key_type,
            value_type,
            count,
        })
    }

    pub fn read_map_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_list_begin(&mut self) -> Result<ListHeader> {
        let element_type = self.read_type_tag()?;
        let count = self.read_count()?;
        Ok(ListHeader {
            element_type,
            count,
        })
    }

    pub fn read_list_end(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn read_set_begin(&mut self) -> Result<SetHeader> {
        let element_type = self.read_type_tag()?;
        let count = self.read_count()?;
        Ok(SetHeader {
            element_type,
            count,
        })
    }

    pub fn read_set_end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Any non-zero byte reads as `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.transport.read_byte()? != 0)
    }

    pub fn read_byte(&mut self) -> Result<i8> {
        Ok(self.transport.read_byte()? as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.transport.read(Width::Two.bytes())?;
        Ok(unpack_width(&bytes, Width::Two)? as i16)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.transport.read(Width::Four.bytes())?;
        Ok(unpack_width(&bytes, Width::Four)? as i32)
    }

    /// Read an i64. Decoding is exact over the full i64 range.
    pub fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.transport.read(Width::Eight.bytes())?;
        unpack_width(&bytes, Width::Eight)
    }

    pub fn read_double(&mut self) -> Result<f64> {
        let bytes = self.transport.read(8)?;
        unpack_double(&bytes)
    }

    /// Read an i32 length prefix then decode that many bytes as text.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_i32()?;
        self.read_text(len)
    }

    /// Read an i32 length prefix then that many raw bytes.
    pub fn read_binary(&mut self) -> Result<Bytes> {
        let len = self.read_i32()?;
        let len = self.check_size(len)?;
        Ok(self.transport.read(len)?)
    }

    fn read_text(&mut self, len: i32) -> Result<String> {
        let len = self.check_size(len)?;
        let bytes = self.transport.read(len)?;
        self.codec.decode(bytes.to_vec())
    }

    fn read_type_tag(&mut self) -> Result<TType> {
        TType::try_from(self.transport.read_byte()?)
    }

    fn read_count(&mut self) -> Result<i32> {
        let count = self.read_i32()?;
        if let Some(max) = self.config.container_limit {
            if count > 0 && count as usize > max {
                return Err(ProtocolError::SizeLimit {
                    size: count as usize,
                    max,
                });
            }
        }
        Ok(count)
    }

    fn check_size(&self, len: i32) -> Result<usize> {
        let size = usize::try_from(len).map_err(|_| ProtocolError::NegativeSize(len))?;
        if let Some(max) = self.config.string_limit {
            if size > max {
                return Err(ProtocolError::SizeLimit { size, max });
            }
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use tbinary_transport::{MemoryTransport, StreamTransport, TransportError};

    use super::*;
    use crate::config::ProtocolConfig;
    use crate::text::Utf8Lossy;

    const PING_STRICT: [u8; 16] = [
        0x80, 0x01, 0x00, 0x01, 0, 0, 0, 4, b'p', b'i', b'n', b'g', 0, 0, 0, 42,
    ];

    fn reader(bytes: &[u8], strict_read: bool) -> BinaryProtocol<MemoryTransport> {
        BinaryProtocol::new(MemoryTransport::from_bytes(bytes), strict_read, true)
    }

    #[test]
    fn strict_ping_decodes() {
        let mut input = reader(&PING_STRICT, true);
        let header = input.read_message_begin().unwrap();
        input.read_message_end().unwrap();

        assert_eq!(header, MessageHeader::new("ping", MessageType::Call, 42));
        assert!(input.get_ref().is_empty());
    }

    #[test]
    fn strict_message_roundtrip() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), true, true);
        let header = MessageHeader::new("getUser", MessageType::Reply, i32::MIN);

        session.write_message_begin(&header).unwrap();
        session.write_message_end().unwrap();

        assert_eq!(session.read_message_begin().unwrap(), header);
    }

    #[test]
    fn non_strict_message_roundtrip() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), false, false);
        let header = MessageHeader::new("notify", MessageType::Oneway, 7);

        session.write_message_begin(&header).unwrap();
        assert_eq!(session.read_message_begin().unwrap(), header);
    }

    #[test]
    fn lenient_reader_accepts_strict_header() {
        let mut input = reader(&PING_STRICT, false);
        assert_eq!(
            input.read_message_begin().unwrap(),
            MessageHeader::new("ping", MessageType::Call, 42)
        );
    }

    #[test]
    fn strict_reader_rejects_unversioned_header() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), true, false);
        session
            .write_message_begin(&MessageHeader::new("ping", MessageType::Call, 1))
            .unwrap();

        let err = session.read_message_begin().unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidVersionIdentifier(4)));
    }

    #[test]
    fn wrong_version_rejected() {
        let mut input = reader(&[0x80, 0x02, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0], false);
        let err = input.read_message_begin().unwrap_err();
        assert!(matches!(err, ProtocolError::MissingVersionIdentifier(_)));
    }

    #[test]
    fn version_mask_applies_before_comparison() {
        // Only the masked high half may be compared; a header whose high
        // half differs from VERSION_1 in the low bits of the version must
        // fail even though the sign bit is set.
        let mut input = reader(&[0x81, 0x01, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 0], false);
        assert!(matches!(
            input.read_message_begin(),
            Err(ProtocolError::MissingVersionIdentifier(_))
        ));

        // Bits outside the mask (the unused byte between version and kind)
        // do not affect version detection.
        let mut input = reader(
            &[0x80, 0x01, 0x7f, 0x02, 0, 0, 0, 1, b'x', 0, 0, 0, 9],
            false,
        );
        assert_eq!(
            input.read_message_begin().unwrap(),
            MessageHeader::new("x", MessageType::Reply, 9)
        );
    }

    #[test]
    fn unknown_message_kind_rejected() {
        let mut strict = reader(&[0x80, 0x01, 0x00, 0x09, 0, 0, 0, 0, 0, 0, 0, 0], false);
        assert!(matches!(
            strict.read_message_begin(),
            Err(ProtocolError::InvalidMessageType(9))
        ));

        let mut legacy = reader(&[0, 0, 0, 1, b'a', 0x00, 0, 0, 0, 0], false);
        assert!(matches!(
            legacy.read_message_begin(),
            Err(ProtocolError::InvalidMessageType(0))
        ));
    }

    #[test]
    fn field_begin_stops_without_reading_id() {
        let mut input = reader(&[0x00, 0xaa], false);
        let field = input.read_field_begin().unwrap();

        assert!(field.is_stop());
        assert_eq!(field.id, 0);
        assert_eq!(input.get_ref().as_bytes(), &[0xaa]);
    }

    #[test]
    fn field_begin_reads_type_and_id() {
        let mut input = reader(&[0x0b, 0xff, 0xfe], false);
        assert_eq!(
            input.read_field_begin().unwrap(),
            FieldHeader::new(TType::String, -2)
        );
    }

    #[test]
    fn invalid_field_type_rejected() {
        let mut input = reader(&[0x07, 0x00, 0x01], false);
        assert!(matches!(
            input.read_field_begin(),
            Err(ProtocolError::InvalidTypeTag(7))
        ));
    }

    #[test]
    fn collection_headers_roundtrip() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), false, true);
        session
            .write_map_begin(&MapHeader::new(TType::String, TType::List, 2))
            .unwrap();
        session
            .write_list_begin(&ListHeader::new(TType::I16, 5))
            .unwrap();
        session
            .write_set_begin(&SetHeader::new(TType::Bool, 0))
            .unwrap();

        assert_eq!(
            session.read_map_begin().unwrap(),
            MapHeader::new(TType::String, TType::List, 2)
        );
        session.read_map_end().unwrap();
        assert_eq!(
            session.read_list_begin().unwrap(),
            ListHeader::new(TType::I16, 5)
        );
        session.read_list_end().unwrap();
        assert_eq!(
            session.read_set_begin().unwrap(),
            SetHeader::new(TType::Bool, 0)
        );
        session.read_set_end().unwrap();
    }

    #[test]
    fn scalars_roundtrip() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), false, true);
        session.write_bool(true).unwrap();
        session.write_byte(i8::MIN).unwrap();
        session.write_i16(-12_345).unwrap();
        session.write_i32(i32::MAX).unwrap();
        session.write_i64(-(1 << 50)).unwrap();
        session.write_double(-0.0).unwrap();
        session.write_string("ünïcode").unwrap();
        session.write_binary(&[0, 1, 2, 0xff]).unwrap();

        assert!(session.read_bool().unwrap());
        assert_eq!(session.read_byte().unwrap(), i8::MIN);
        assert_eq!(session.read_i16().unwrap(), -12_345);
        assert_eq!(session.read_i32().unwrap(), i32::MAX);
        assert_eq!(session.read_i64().unwrap(), -(1 << 50));
        let zero = session.read_double().unwrap();
        assert!(zero == 0.0 && zero.is_sign_negative());
        assert_eq!(session.read_string().unwrap(), "ünïcode");
        assert_eq!(session.read_binary().unwrap().as_ref(), &[0, 1, 2, 0xff]);
        assert!(session.get_ref().is_empty());
    }

    #[test]
    fn non_zero_bool_is_true() {
        let mut input = reader(&[0x02], false);
        assert!(input.read_bool().unwrap());
    }

    #[test]
    fn read_i64_decodes_full_width() {
        let mut input = reader(&[0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff], false);
        assert_eq!(input.read_i64().unwrap(), i64::MAX);
    }

    #[test]
    fn short_string_surfaces_channel_error() {
        let mut input = reader(&[0, 0, 0, 10, b'a', b'b'], false);
        let err = input.read_string().unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Transport(TransportError::UnexpectedEof {
                needed: 10,
                received: 2
            })
        ));
    }

    #[test]
    fn short_stream_surfaces_channel_error() {
        let stream = std::io::Cursor::new(vec![0x80, 0x01]);
        let mut input = BinaryProtocol::new(StreamTransport::new(stream), false, true);
        assert!(matches!(
            input.read_message_begin(),
            Err(ProtocolError::Transport(TransportError::UnexpectedEof { .. }))
        ));
    }

    #[test]
    fn negative_length_rejected() {
        let mut input = reader(&[0xff, 0xff, 0xff, 0xff], false);
        assert!(matches!(
            input.read_binary(),
            Err(ProtocolError::NegativeSize(-1))
        ));
    }

    #[test]
    fn string_limit_enforced() {
        let config = ProtocolConfig {
            string_limit: Some(3),
            ..ProtocolConfig::default()
        };
        let mut input =
            BinaryProtocol::with_config(MemoryTransport::from_bytes([0, 0, 0, 4, 1, 2, 3, 4]), config);
        assert!(matches!(
            input.read_binary(),
            Err(ProtocolError::SizeLimit { size: 4, max: 3 })
        ));
    }

    #[test]
    fn legacy_name_respects_string_limit() {
        let config = ProtocolConfig {
            string_limit: Some(2),
            ..ProtocolConfig::default()
        };
        let mut input = BinaryProtocol::with_config(
            MemoryTransport::from_bytes([0, 0, 0, 5, b'h', b'e', b'l', b'l', b'o', 1, 0, 0, 0, 0]),
            config,
        );
        assert!(matches!(
            input.read_message_begin(),
            Err(ProtocolError::SizeLimit { size: 5, max: 2 })
        ));
    }

    #[test]
    fn container_limit_enforced() {
        let config = ProtocolConfig {
            container_limit: Some(10),
            ..ProtocolConfig::default()
        };
        let mut input = BinaryProtocol::with_config(
            MemoryTransport::from_bytes([0x08, 0, 0, 0, 11]),
            config,
        );
        assert!(matches!(
            input.read_list_begin(),
            Err(ProtocolError::SizeLimit { size: 11, max: 10 })
        ));
    }

    #[test]
    fn counts_are_not_validated_by_default() {
        let mut input = reader(&[0x08, 0xff, 0xff, 0xff, 0xfe], false);
        assert_eq!(input.read_set_begin().unwrap().count, -2);
    }

    #[test]
    fn invalid_utf8_rejected_by_strict_codec() {
        let mut input = reader(&[0, 0, 0, 2, 0xc3, 0x28], false);
        assert!(matches!(
            input.read_string(),
            Err(ProtocolError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn lossy_codec_replaces_invalid_utf8() {
        let mut input = BinaryProtocol::with_codec(
            MemoryTransport::from_bytes([0, 0, 0, 2, 0xc3, 0x28]),
            ProtocolConfig::default(),
            Utf8Lossy,
        );
        assert_eq!(input.read_string().unwrap(), "\u{fffd}(");
    }
}
