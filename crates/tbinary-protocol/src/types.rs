//! Wire type tags, message kinds, and frame headers.

use std::fmt;

use crate::error::ProtocolError;

/// Mask selecting the version half of a versioned message header.
pub const VERSION_MASK: u32 = 0xffff_0000;

/// Version identifier carried by strict message headers.
pub const VERSION_1: u32 = 0x8001_0000;

/// Mask selecting the message kind from a versioned header.
pub const MESSAGE_TYPE_MASK: u32 = 0x0000_00ff;

/// Type tag of a value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum TType {
    /// Terminates a struct's field list. Carries no value.
    Stop = 0,
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    /// Length-prefixed bytes; UTF-8 text or opaque binary.
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl TType {
    /// Human-readable tag name.
    pub fn name(self) -> &'static str {
        match self {
            TType::Stop => "STOP",
            TType::Bool => "BOOL",
            TType::Byte => "BYTE",
            TType::Double => "DOUBLE",
            TType::I16 => "I16",
            TType::I32 => "I32",
            TType::I64 => "I64",
            TType::String => "STRING",
            TType::Struct => "STRUCT",
            TType::Map => "MAP",
            TType::Set => "SET",
            TType::List => "LIST",
        }
    }

    /// Encoded size for fixed-width scalars, `None` for everything else.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            TType::Bool | TType::Byte => Some(1),
            TType::I16 => Some(2),
            TType::I32 => Some(4),
            TType::I64 | TType::Double => Some(8),
            TType::Stop => Some(0),
            TType::String | TType::Struct | TType::Map | TType::Set | TType::List => None,
        }
    }

    /// Returns true for struct, map, set and list.
    pub fn is_composite(self) -> bool {
        matches!(self, TType::Struct | TType::Map | TType::Set | TType::List)
    }
}

impl From<TType> for u8 {
    fn from(ttype: TType) -> Self {
        ttype as u8
    }
}

impl TryFrom<u8> for TType {
    type Error = ProtocolError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(TType::Stop),
            2 => Ok(TType::Bool),
            3 => Ok(TType::Byte),
            4 => Ok(TType::Double),
            6 => Ok(TType::I16),
            8 => Ok(TType::I32),
            10 => Ok(TType::I64),
            11 => Ok(TType::String),
            12 => Ok(TType::Struct),
            13 => Ok(TType::Map),
            14 => Ok(TType::Set),
            15 => Ok(TType::List),
            other => Err(ProtocolError::InvalidTypeTag(other)),
        }
    }
}

impl fmt::Display for TType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of RPC message carried by a message envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum MessageType {
    Call = 1,
    Reply = 2,
    Exception = 3,
    Oneway = 4,
}

impl MessageType {
    /// Human-readable kind name.
    pub fn name(self) -> &'static str {
        match self {
            MessageType::Call => "CALL",
            MessageType::Reply => "REPLY",
            MessageType::Exception => "EXCEPTION",
            MessageType::Oneway => "ONEWAY",
        }
    }
}

impl From<MessageType> for u8 {
    fn from(kind: MessageType) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(kind: u8) -> Result<Self, Self::Error> {
        match kind {
            1 => Ok(MessageType::Call),
            2 => Ok(MessageType::Reply),
            3 => Ok(MessageType::Exception),
            4 => Ok(MessageType::Oneway),
            other => Err(ProtocolError::InvalidMessageType(other)),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RPC message envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageHeader {
    /// Method name.
    pub name: String,
    /// Message kind.
    pub kind: MessageType,
    /// Caller-chosen sequence id, echoed in replies.
    pub sequence_id: i32,
}

impl MessageHeader {
    /// Create a new message header.
    pub fn new(name: impl Into<String>, kind: MessageType, sequence_id: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            sequence_id,
        }
    }
}

/// Field header inside a struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
    pub field_type: TType,
    pub id: i16,
}

impl FieldHeader {
    /// Create a new field header.
    pub fn new(field_type: TType, id: i16) -> Self {
        Self { field_type, id }
    }

    /// The stop sentinel returned when a struct's field list ends.
    pub fn stop() -> Self {
        Self {
            field_type: TType::Stop,
            id: 0,
        }
    }

    /// Returns true if this is the stop sentinel.
    pub fn is_stop(&self) -> bool {
        self.field_type == TType::Stop
    }
}

/// List header: element type and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHeader {
    pub element_type: TType,
    pub count: i32,
}

impl ListHeader {
    pub fn new(element_type: TType, count: i32) -> Self {
        Self {
            element_type,
            count,
        }
    }
}

/// Set header: element type and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetHeader {
    pub element_type: TType,
    pub count: i32,
}

impl SetHeader {
    pub fn new(element_type: TType, count: i32) -> Self {
        Self {
            element_type,
            count,
        }
    }
}

/// Map header: key type, value type and entry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub key_type: TType,
    pub value_type: TType,
    pub count: i32,
}

impl MapHeader {
    pub fn new(key_type: TType, value_type: TType, count: i32) -> Self {
        Self {
            key_type,
            value_type,
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_match_wire_ids() {
        let expected = [
            (TType::Stop, 0u8),
            (TType::Bool, 2),
            (TType::Byte, 3),
            (TType::Double, 4),
            (TType::I16, 6),
            (TType::I32, 8),
            (TType::I64, 10),
            (TType::String, 11),
            (TType::Struct, 12),
            (TType::Map, 13),
            (TType::Set, 14),
            (TType::List, 15),
        ];

        for (ttype, id) in expected {
            assert_eq!(u8::from(ttype), id);
            assert_eq!(TType::try_from(id).unwrap(), ttype);
        }
    }

    #[test]
    fn unknown_type_tags_rejected() {
        for tag in [1u8, 5, 7, 9, 16, 0xff] {
            assert!(matches!(
                TType::try_from(tag),
                Err(ProtocolError::InvalidTypeTag(t)) if t == tag
            ));
        }
    }

    #[test]
    fn message_kinds_roundtrip() {
        for kind in [
            MessageType::Call,
            MessageType::Reply,
            MessageType::Exception,
            MessageType::Oneway,
        ] {
            assert_eq!(MessageType::try_from(u8::from(kind)).unwrap(), kind);
        }
        assert!(matches!(
            MessageType::try_from(0),
            Err(ProtocolError::InvalidMessageType(0))
        ));
    }

    #[test]
    fn fixed_sizes() {
        assert_eq!(TType::I64.fixed_size(), Some(8));
        assert_eq!(TType::Bool.fixed_size(), Some(1));
        assert_eq!(TType::String.fixed_size(), None);
        assert!(TType::List.is_composite());
        assert!(!TType::Double.is_composite());
    }

    #[test]
    fn stop_sentinel() {
        let stop = FieldHeader::stop();
        assert!(stop.is_stop());
        assert_eq!(stop.id, 0);
        assert!(!FieldHeader::new(TType::I32, 1).is_stop());
    }
}
