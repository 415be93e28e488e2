use tbinary_transport::Transport;
use tracing::trace;

use crate::codec::BinaryProtocol;
use crate::error::{ProtocolError, Result};
use crate::text::TextCodec;
use crate::types::TType;

impl<T: Transport, C: TextCodec> BinaryProtocol<T, C> {
    /// Consume exactly one serialized value of `field_type` without
    /// decoding it.
    ///
    /// Used to discard fields a reader does not recognise. Composite values
    /// are walked recursively. Malformed input ends the walk only through
    /// errors from the underlying reads, plus the optional
    /// [`max_depth`](crate::ProtocolConfig::max_depth) guard.
    pub fn skip(&mut self, field_type: TType) -> Result<()> {
        self.skip_nested(field_type, 0)
    }

    fn skip_nested(&mut self, field_type: TType, depth: usize) -> Result<()> {
        trace!(ttype = %field_type, depth, "skip");
        match field_type {
            TType::Stop => Ok(()),
            TType::Bool => self.read_bool().map(drop),
            TType::Byte => self.read_byte().map(drop),
            TType::I16 => self.read_i16().map(drop),
            TType::I32 => self.read_i32().map(drop),
            TType::I64 => self.read_i64().map(drop),
            TType::Double => self.read_double().map(drop),
            // Binary and text share the tag; skip never decodes the payload.
            TType::String => self.read_binary().map(drop),
            TType::Struct => {
                let depth = self.enter_composite(depth)?;
                self.read_struct_begin()?;
                loop {
                    let field = self.read_field_begin()?;
                    if field.is_stop() {
                        break;
                    }
                    self.skip_nested(field.field_type, depth)?;
                    self.read_field_end()?;
                }
                self.read_struct_end()
            }
            TType::Map => {
                let depth = self.enter_composite(depth)?;
                let header = self.read_map_begin()?;
                for _ in 0..header.count {
                    self.skip_nested(header.key_type, depth)?;
                    self.skip_nested(header.value_type, depth)?;
                }
                self.read_map_end()
            }
            TType::Set => {
                let depth = self.enter_composite(depth)?;
                let header = self.read_set_begin()?;
                for _ in 0..header.count {
                    self.skip_nested(header.element_type, depth)?;
                }
                self.read_set_end()
            }
            TType::List => {
                let depth = self.enter_composite(depth)?;
                let header = self.read_list_begin()?;
                for _ in 0..header.count {
                    self.skip_nested(header.element_type, depth)?;
                }
                self.read_list_end()
            }
        }
    }

    /// Step one composite level deeper, honouring `max_depth`.
    pub(crate) fn enter_composite(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        match self.config.max_depth {
            Some(max) if depth > max => Err(ProtocolError::DepthLimitExceeded(max)),
            _ => Ok(depth),
        }
    }
}
