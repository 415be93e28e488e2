use crate::pack::I64Range;

/// Configuration for a protocol session, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Reject message headers without a version identifier.
    pub strict_read: bool,
    /// Emit a version identifier in message headers.
    pub strict_write: bool,
    /// Accepted range for i64 writes. Default: exact-integer range.
    pub i64_range: I64Range,
    /// Maximum string/binary length accepted by reads. Default: unlimited.
    pub string_limit: Option<usize>,
    /// Maximum collection count accepted by reads. Default: unlimited.
    pub container_limit: Option<usize>,
    /// Maximum nesting of composite values during skip and dynamic reads.
    /// Default: unlimited.
    pub max_depth: Option<usize>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            strict_read: false,
            strict_write: true,
            i64_range: I64Range::Exact,
            string_limit: None,
            container_limit: None,
            max_depth: None,
        }
    }
}

impl ProtocolConfig {
    /// Default configuration with explicit strict flags.
    pub fn with_strict(strict_read: bool, strict_write: bool) -> Self {
        Self {
            strict_read,
            strict_write,
            ..Self::default()
        }
    }
}
