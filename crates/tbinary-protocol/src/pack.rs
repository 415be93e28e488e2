//! Primitive packing: fixed-width big-endian integers and IEEE-754 doubles.
//!
//! Integers are two's complement, most significant byte first. 64-bit values
//! are limited to the exact-integer range of a binary64 double
//! (`±(2^53 - 1)`) unless the caller opts into [`I64Range::Full`]. Peers that
//! carry 64-bit integers through doubles cannot represent anything wider
//! without losing precision, so the narrower range is the protocol default.

use std::num::FpCategory;
use std::ops::Deref;

use crate::error::{ProtocolError, Result};

/// Largest integer a binary64 double represents exactly (`2^53 - 1`).
pub const MAX_EXACT_INTEGER: i64 = (1 << 53) - 1;

/// Smallest integer a binary64 double represents exactly (`-(2^53 - 1)`).
pub const MIN_EXACT_INTEGER: i64 = -MAX_EXACT_INTEGER;

const SIGN_SHIFT: u32 = 63;
const EXPONENT_SHIFT: u32 = 52;
const EXPONENT_ALL_ONES: u16 = 0x7ff;
const FRACTION_MASK: u64 = (1 << EXPONENT_SHIFT) - 1;
const CANONICAL_NAN_FRACTION: u64 = 1 << 51;

/// Byte width of a packed integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Two,
    Four,
    Eight,
}

impl Width {
    /// Number of bytes on the wire.
    pub const fn bytes(self) -> usize {
        match self {
            Width::Two => 2,
            Width::Four => 4,
            Width::Eight => 8,
        }
    }

    /// Inclusive `(min, max)` accepted by [`pack_width_in`].
    pub fn bounds(self, range: I64Range) -> (i64, i64) {
        match (self, range) {
            (Width::Two, _) => (i64::from(i16::MIN), i64::from(i16::MAX)),
            (Width::Four, _) => (i64::from(i32::MIN), i64::from(i32::MAX)),
            (Width::Eight, I64Range::Exact) => (MIN_EXACT_INTEGER, MAX_EXACT_INTEGER),
            (Width::Eight, I64Range::Full) => (i64::MIN, i64::MAX),
        }
    }
}

/// Accepted range for 64-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum I64Range {
    /// `±(2^53 - 1)`, the exact-integer range of a binary64 double.
    #[default]
    Exact,
    /// The full `i64` range.
    Full,
}

/// A packed integer: up to eight big-endian bytes, stored inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packed {
    buf: [u8; 8],
    len: usize,
}

impl Deref for Packed {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl AsRef<[u8]> for Packed {
    fn as_ref(&self) -> &[u8] {
        self
    }
}

/// Pack `value` into `width` big-endian bytes, limiting 64-bit values to the
/// exact-integer range.
pub fn pack_width(value: i64, width: Width) -> Result<Packed> {
    pack_width_in(value, width, I64Range::Exact)
}

/// Pack `value` into `width` big-endian bytes under an explicit 64-bit range.
pub fn pack_width_in(value: i64, width: Width, range: I64Range) -> Result<Packed> {
    let (min, max) = width.bounds(range);
    if value < min || value > max {
        return Err(ProtocolError::OutOfRange {
            width: width.bytes(),
            value,
        });
    }

    // In-range values survive truncation of the sign-extended i64.
    let len = width.bytes();
    let full = value.to_be_bytes();
    let mut buf = [0u8; 8];
    buf[..len].copy_from_slice(&full[8 - len..]);
    Ok(Packed { buf, len })
}

/// Unpack a big-endian two's complement integer of exactly `width` bytes.
pub fn unpack_width(bytes: &[u8], width: Width) -> Result<i64> {
    if bytes.len() != width.bytes() {
        return Err(ProtocolError::SizeMismatch {
            expected: width.bytes(),
            actual: bytes.len(),
        });
    }

    let seed: i64 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
    Ok(bytes
        .iter()
        .fold(seed, |acc, &byte| (acc << 8) | i64::from(byte)))
}

/// Pack a signed byte.
pub fn pack_byte(value: i64) -> Result<u8> {
    i8::try_from(value)
        .map(|byte| byte as u8)
        .map_err(|_| ProtocolError::OutOfRange { width: 1, value })
}

/// Sign, biased exponent and fraction of a binary64 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DoubleParts {
    negative: bool,
    exponent: u16,
    fraction: u64,
}

impl DoubleParts {
    fn of(value: f64) -> Self {
        let bits = value.to_bits();
        match value.classify() {
            FpCategory::Nan => Self {
                negative: false,
                exponent: EXPONENT_ALL_ONES,
                fraction: CANONICAL_NAN_FRACTION,
            },
            FpCategory::Infinite => Self {
                negative: value.is_sign_negative(),
                exponent: EXPONENT_ALL_ONES,
                fraction: 0,
            },
            FpCategory::Zero => Self {
                negative: value.is_sign_negative(),
                exponent: 0,
                fraction: 0,
            },
            FpCategory::Subnormal => Self {
                negative: value.is_sign_negative(),
                exponent: 0,
                fraction: bits & FRACTION_MASK,
            },
            FpCategory::Normal => Self {
                negative: value.is_sign_negative(),
                exponent: ((bits >> EXPONENT_SHIFT) as u16) & EXPONENT_ALL_ONES,
                fraction: bits & FRACTION_MASK,
            },
        }
    }

    fn from_bits(bits: u64) -> Self {
        Self {
            negative: bits >> SIGN_SHIFT != 0,
            exponent: ((bits >> EXPONENT_SHIFT) as u16) & EXPONENT_ALL_ONES,
            fraction: bits & FRACTION_MASK,
        }
    }

    fn to_bits(self) -> u64 {
        (u64::from(self.negative) << SIGN_SHIFT)
            | (u64::from(self.exponent) << EXPONENT_SHIFT)
            | self.fraction
    }

    fn value(self) -> f64 {
        match (self.exponent, self.fraction) {
            (EXPONENT_ALL_ONES, 0) if self.negative => f64::NEG_INFINITY,
            (EXPONENT_ALL_ONES, 0) => f64::INFINITY,
            (EXPONENT_ALL_ONES, _) => f64::NAN,
            (0, 0) if self.negative => -0.0,
            (0, 0) => 0.0,
            // Normal and subnormal values carry their parts verbatim.
            _ => f64::from_bits(self.to_bits()),
        }
    }
}

/// Pack a double as eight big-endian IEEE-754 binary64 bytes.
///
/// Every NaN is written as the canonical quiet NaN `0x7ff8000000000000`.
pub fn pack_double(value: f64) -> [u8; 8] {
    DoubleParts::of(value).to_bits().to_be_bytes()
}

/// Unpack eight big-endian IEEE-754 binary64 bytes.
pub fn unpack_double(bytes: &[u8]) -> Result<f64> {
    let bytes: [u8; 8] = bytes
        .try_into()
        .map_err(|_| ProtocolError::SizeMismatch {
            expected: 8,
            actual: bytes.len(),
        })?;
    Ok(DoubleParts::from_bits(u64::from_be_bytes(bytes)).value())
}
