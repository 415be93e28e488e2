//! Thrift-style binary protocol codec.
//!
//! Encodes and decodes RPC message envelopes, struct fields and nested
//! collections over any [`Transport`]. The codec knows no schema: callers
//! pass types and values explicitly at each call.
//!
//! Layers, bottom up:
//! - [`pack`]: fixed-width big-endian integers and IEEE-754 doubles
//! - [`writer`] / [`reader`]: message, struct, field and collection framing
//! - [`skip`]: discard one value of a known type without decoding it
//! - [`text`]: injected UTF-8 codec for string payloads
//! - [`value`]: schema-less value trees built on the above
//!
//! ```
//! use tbinary_protocol::{BinaryProtocol, MessageHeader, MessageType};
//! use tbinary_transport::MemoryTransport;
//!
//! let mut session = BinaryProtocol::new(MemoryTransport::new(), true, true);
//! session
//!     .write_message_begin(&MessageHeader::new("ping", MessageType::Call, 42))
//!     .unwrap();
//! session.write_message_end().unwrap();
//!
//! let header = session.read_message_begin().unwrap();
//! assert_eq!(header.name, "ping");
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod pack;
pub mod reader;
pub mod skip;
pub mod text;
pub mod types;
pub mod value;
pub mod writer;

pub use codec::BinaryProtocol;
pub use config::ProtocolConfig;
pub use error::{ProtocolError, Result};
pub use pack::{
    pack_byte, pack_double, pack_width, pack_width_in, unpack_double, unpack_width, I64Range,
    Packed, Width, MAX_EXACT_INTEGER, MIN_EXACT_INTEGER,
};
pub use tbinary_transport::Transport;
pub use text::{TextCodec, Utf8, Utf8Lossy};
pub use types::{
    FieldHeader, ListHeader, MapHeader, MessageHeader, MessageType, SetHeader, TType,
    MESSAGE_TYPE_MASK, VERSION_1, VERSION_MASK,
};
pub use value::{Field, Value};
