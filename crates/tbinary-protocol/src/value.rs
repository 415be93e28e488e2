//! Schema-less values for inspecting and building payloads.

use bytes::Bytes;
use tbinary_transport::Transport;

use crate::codec::BinaryProtocol;
use crate::error::{ProtocolError, Result};
use crate::text::TextCodec;
use crate::types::{FieldHeader, ListHeader, MapHeader, SetHeader, TType};
use crate::writer::checked_size;

/// Upper bound on capacity reserved from an untrusted count.
const MAX_PREALLOCATED: usize = 1024;

/// A decoded value of any wire type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "value", rename_all = "lowercase")
)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    /// STRING payload that decoded as text.
    String(String),
    /// STRING payload kept as raw bytes.
    Binary(Bytes),
    Struct(Vec<Field>),
    Map {
        key_type: TType,
        value_type: TType,
        entries: Vec<(Value, Value)>,
    },
    Set {
        element_type: TType,
        elements: Vec<Value>,
    },
    List {
        element_type: TType,
        elements: Vec<Value>,
    },
}

/// One field of a [`Value::Struct`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Field {
    pub id: i16,
    pub value: Value,
}

impl Field {
    pub fn new(id: i16, value: Value) -> Self {
        Self { id, value }
    }
}

impl Value {
    /// Wire type tag of this value.
    pub fn ttype(&self) -> TType {
        match self {
            Value::Bool(_) => TType::Bool,
            Value::Byte(_) => TType::Byte,
            Value::I16(_) => TType::I16,
            Value::I32(_) => TType::I32,
            Value::I64(_) => TType::I64,
            Value::Double(_) => TType::Double,
            Value::String(_) | Value::Binary(_) => TType::String,
            Value::Struct(_) => TType::Struct,
            Value::Map { .. } => TType::Map,
            Value::Set { .. } => TType::Set,
            Value::List { .. } => TType::List,
        }
    }
}

impl<T: Transport, C: TextCodec> BinaryProtocol<T, C> {
    /// Read one value of `field_type` into a [`Value`] tree.
    ///
    /// STRING payloads that the session's codec rejects are kept as
    /// [`Value::Binary`]. `Stop` carries no value and is rejected.
    pub fn read_value(&mut self, field_type: TType) -> Result<Value> {
        self.read_value_nested(field_type, 0)
    }

    fn read_value_nested(&mut self, field_type: TType, depth: usize) -> Result<Value> {
        let value = match field_type {
            TType::Stop => return Err(ProtocolError::InvalidTypeTag(u8::from(TType::Stop))),
            TType::Bool => Value::Bool(self.read_bool()?),
            TType::Byte => Value::Byte(self.read_byte()?),
            TType::I16 => Value::I16(self.read_i16()?),
            TType::I32 => Value::I32(self.read_i32()?),
            TType::I64 => Value::I64(self.read_i64()?),
            TType::Double => Value::Double(self.read_double()?),
            TType::String => {
                let raw = self.read_binary()?;
                match self.codec.decode(raw.to_vec()) {
                    Ok(text) => Value::String(text),
                    Err(_) => Value::Binary(raw),
                }
            }
            TType::Struct => {
                let depth = self.enter_composite(depth)?;
                self.read_struct_begin()?;
                let mut fields = Vec::new();
                loop {
                    let header = self.read_field_begin()?;
                    if header.is_stop() {
                        break;
                    }
                    let value = self.read_value_nested(header.field_type, depth)?;
                    self.read_field_end()?;
                    fields.push(Field::new(header.id, value));
                }
                self.read_struct_end()?;
                Value::Struct(fields)
            }
            TType::Map => {
                let depth = self.enter_composite(depth)?;
                let header = self.read_map_begin()?;
                let mut entries = Vec::with_capacity(preallocation(header.count));
                for _ in 0..header.count {
                    let key = self.read_value_nested(header.key_type, depth)?;
                    let value = self.read_value_nested(header.value_type, depth)?;
                    entries.push((key, value));
                }
                self.read_map_end()?;
                Value::Map {
                    key_type: header.key_type,
                    value_type: header.value_type,
                    entries,
                }
            }
            TType::Set => {
                let depth = self.enter_composite(depth)?;
                let header = self.read_set_begin()?;
                let elements = self.read_elements(header.element_type, header.count, depth)?;
                self.read_set_end()?;
                Value::Set {
                    element_type: header.element_type,
                    elements,
                }
            }
            TType::List => {
                let depth = self.enter_composite(depth)?;
                let header = self.read_list_begin()?;
                let elements = self.read_elements(header.element_type, header.count, depth)?;
                self.read_list_end()?;
                Value::List {
                    element_type: header.element_type,
                    elements,
                }
            }
        };
        Ok(value)
    }

    fn read_elements(&mut self, element_type: TType, count: i32, depth: usize) -> Result<Vec<Value>> {
        let mut elements = Vec::with_capacity(preallocation(count));
        for _ in 0..count {
            elements.push(self.read_value_nested(element_type, depth)?);
        }
        Ok(elements)
    }

    /// Write a [`Value`] tree.
    ///
    /// Collection elements are checked against their declared types before
    /// the collection header is emitted.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Bool(v) => self.write_bool(*v),
            Value::Byte(v) => self.write_byte(*v),
            Value::I16(v) => self.write_i16(*v),
            Value::I32(v) => self.write_i32(*v),
            Value::I64(v) => self.write_i64(*v),
            Value::Double(v) => self.write_double(*v),
            Value::String(v) => self.write_string(v),
            Value::Binary(v) => self.write_binary(v),
            Value::Struct(fields) => {
                self.write_struct_begin("")?;
                for field in fields {
                    self.write_field_begin(&FieldHeader::new(field.value.ttype(), field.id))?;
                    self.write_value(&field.value)?;
                    self.write_field_end()?;
                }
                self.write_field_stop()?;
                self.write_struct_end()
            }
            Value::Map {
                key_type,
                value_type,
                entries,
            } => {
                for (key, value) in entries {
                    ensure_type(*key_type, key)?;
                    ensure_type(*value_type, value)?;
                }
                let count = checked_size(entries.len())?;
                self.write_map_begin(&MapHeader::new(*key_type, *value_type, count))?;
                for (key, value) in entries {
                    self.write_value(key)?;
                    self.write_value(value)?;
                }
                self.write_map_end()
            }
            Value::Set {
                element_type,
                elements,
            } => {
                let count = checked_elements(*element_type, elements)?;
                self.write_set_begin(&SetHeader::new(*element_type, count))?;
                for element in elements {
                    self.write_value(element)?;
                }
                self.write_set_end()
            }
            Value::List {
                element_type,
                elements,
            } => {
                let count = checked_elements(*element_type, elements)?;
                self.write_list_begin(&ListHeader::new(*element_type, count))?;
                for element in elements {
                    self.write_value(element)?;
                }
                self.write_list_end()
            }
        }
    }
}

fn preallocation(count: i32) -> usize {
    usize::try_from(count).unwrap_or(0).min(MAX_PREALLOCATED)
}

fn ensure_type(expected: TType, value: &Value) -> Result<()> {
    let actual = value.ttype();
    if actual != expected {
        return Err(ProtocolError::TypeMismatch { expected, actual });
    }
    Ok(())
}

fn checked_elements(element_type: TType, elements: &[Value]) -> Result<i32> {
    for element in elements {
        ensure_type(element_type, element)?;
    }
    checked_size(elements.len())
}

#[cfg(test)]
mod tests {
    use tbinary_transport::MemoryTransport;

    use super::*;
    use crate::config::ProtocolConfig;

    fn sample() -> Value {
        Value::Struct(vec![
            Field::new(1, Value::String("alice".into())),
            Field::new(2, Value::I64(1 << 40)),
            Field::new(
                3,
                Value::Map {
                    key_type: TType::String,
                    value_type: TType::List,
                    entries: vec![(
                        Value::String("scores".into()),
                        Value::List {
                            element_type: TType::Double,
                            elements: vec![Value::Double(1.5), Value::Double(-0.25)],
                        },
                    )],
                },
            ),
            Field::new(
                4,
                Value::Set {
                    element_type: TType::Struct,
                    elements: vec![Value::Struct(vec![Field::new(9, Value::Bool(true))])],
                },
            ),
            Field::new(5, Value::Binary(Bytes::from_static(&[0xff, 0x00]))),
            Field::new(-1, Value::Byte(-1)),
            Field::new(6, Value::I16(12)),
            Field::new(7, Value::I32(-70_000)),
        ])
    }

    #[test]
    fn values_read_back_equal() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), false, true);
        let value = sample();

        session.write_value(&value).unwrap();
        let decoded = session.read_value(TType::Struct).unwrap();

        assert_eq!(decoded, value);
        assert!(session.get_ref().is_empty());
    }

    #[test]
    fn value_bytes_match_manual_framing() {
        let mut by_value = BinaryProtocol::new(MemoryTransport::new(), false, true);
        by_value
            .write_value(&Value::Struct(vec![Field::new(1, Value::I32(5))]))
            .unwrap();

        let mut by_hand = BinaryProtocol::new(MemoryTransport::new(), false, true);
        by_hand.write_struct_begin("S").unwrap();
        by_hand
            .write_field_begin(&FieldHeader::new(TType::I32, 1))
            .unwrap();
        by_hand.write_i32(5).unwrap();
        by_hand.write_field_end().unwrap();
        by_hand.write_field_stop().unwrap();
        by_hand.write_struct_end().unwrap();

        assert_eq!(by_value.get_ref().as_bytes(), by_hand.get_ref().as_bytes());
    }

    #[test]
    fn mismatched_element_rejected_before_header() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), false, true);
        let list = Value::List {
            element_type: TType::I32,
            elements: vec![Value::I32(1), Value::I64(2)],
        };

        let err = session.write_value(&list).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::TypeMismatch {
                expected: TType::I32,
                actual: TType::I64
            }
        ));
        assert!(session.get_ref().is_empty());
    }

    #[test]
    fn stop_has_no_value() {
        let mut session = BinaryProtocol::new(MemoryTransport::new(), false, true);
        assert!(matches!(
            session.read_value(TType::Stop),
            Err(ProtocolError::InvalidTypeTag(0))
        ));
    }

    #[test]
    fn read_value_honours_depth_limit() {
        let config = ProtocolConfig {
            max_depth: Some(1),
            ..ProtocolConfig::default()
        };
        let mut session = BinaryProtocol::with_config(MemoryTransport::new(), config);
        session
            .write_value(&Value::List {
                element_type: TType::List,
                elements: vec![Value::List {
                    element_type: TType::I32,
                    elements: vec![],
                }],
            })
            .unwrap();

        assert!(matches!(
            session.read_value(TType::List),
            Err(ProtocolError::DepthLimitExceeded(1))
        ));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serializes_to_tagged_json() {
        let value = Value::Struct(vec![Field::new(1, Value::I32(7))]);
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "struct",
                "value": [{ "id": 1, "value": { "type": "i32", "value": 7 } }]
            })
        );
    }
}
