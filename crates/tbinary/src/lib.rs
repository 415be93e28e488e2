//! Thrift-style binary protocol codec.
//!
//! tbinary encodes and decodes RPC messages, struct fields and nested
//! collections in the binary wire format, over any ordered byte channel.
//!
//! # Crate Structure
//!
//! - [`transport`] — Byte channel abstraction and in-memory / stream channels
//! - [`protocol`] — Primitive packing, framing, skip, and dynamic values

/// Re-export transport types.
pub mod transport {
    pub use tbinary_transport::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use tbinary_protocol::*;
}
