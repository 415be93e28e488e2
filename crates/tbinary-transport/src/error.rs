/// Errors that can occur on a byte channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel ran dry before the requested number of bytes arrived.
    #[error("unexpected end of channel (needed {needed} bytes, received {received})")]
    UnexpectedEof { needed: usize, received: usize },

    /// The peer stopped accepting bytes.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
