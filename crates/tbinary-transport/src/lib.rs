//! Ordered byte channel abstraction for the tbinary codec.
//!
//! The protocol layer never touches sockets or buffers directly. It talks to
//! a [`Transport`], which can:
//! - append single bytes or byte slices in call order
//! - read exactly `n` bytes, or fail
//! - surface read/write failures as [`TransportError`]
//!
//! Two channels ship with the crate: [`StreamTransport`] over any
//! `Read + Write` stream, and [`MemoryTransport`], an in-memory loopback.

pub mod error;
pub mod memory;
pub mod stream;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::MemoryTransport;
pub use stream::StreamTransport;
pub use traits::Transport;
