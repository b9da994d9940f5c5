//! Typed scalar values.
//!
//! A [`Value`] is the typed view of the raw cells held in variables memory,
//! on the stack or in an external slot. It is used for constants, for
//! caller-facing accessors and for conversions between types.

use std::fmt;

use crate::error::LiteralError;
use crate::scalar::Scalar;
use crate::type_desc::TypeDescriptor;

/// A single typed scalar.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
}

// Floats compare by bit pattern, so a stored NaN equals itself and
// -0.0 differs from 0.0. This matches what memory actually holds.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.type_descriptor() == other.type_descriptor() && self.to_bits() == other.to_bits()
    }
}

impl Eq for Value {}

/// Applies `$body` to the payload of any variant, bound as `$v`.
macro_rules! with_payload {
    ($value:expr, $v:ident => $body:expr) => {
        match $value {
            Value::Int8($v) => $body,
            Value::Int16($v) => $body,
            Value::Int32($v) => $body,
            Value::Int64($v) => $body,
            Value::UInt8($v) => $body,
            Value::UInt16($v) => $body,
            Value::UInt32($v) => $body,
            Value::UInt64($v) => $body,
            Value::Float32($v) => $body,
            Value::Float64($v) => $body,
        }
    };
}

/// Converts `$v` with an `as` cast into the variant named by `$to`.
macro_rules! convert_into {
    ($v:expr, $to:expr) => {
        match $to {
            TypeDescriptor::Void => None,
            TypeDescriptor::Int8 => Some(Value::Int8($v as i8)),
            TypeDescriptor::Int16 => Some(Value::Int16($v as i16)),
            TypeDescriptor::Int32 => Some(Value::Int32($v as i32)),
            TypeDescriptor::Int64 => Some(Value::Int64($v as i64)),
            TypeDescriptor::UInt8 => Some(Value::UInt8($v as u8)),
            TypeDescriptor::UInt16 => Some(Value::UInt16($v as u16)),
            TypeDescriptor::UInt32 => Some(Value::UInt32($v as u32)),
            TypeDescriptor::UInt64 => Some(Value::UInt64($v as u64)),
            TypeDescriptor::Float32 => Some(Value::Float32($v as f32)),
            TypeDescriptor::Float64 => Some(Value::Float64($v as f64)),
        }
    };
}

impl Value {
    /// The type of this value.
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            Value::Int8(_) => TypeDescriptor::Int8,
            Value::Int16(_) => TypeDescriptor::Int16,
            Value::Int32(_) => TypeDescriptor::Int32,
            Value::Int64(_) => TypeDescriptor::Int64,
            Value::UInt8(_) => TypeDescriptor::UInt8,
            Value::UInt16(_) => TypeDescriptor::UInt16,
            Value::UInt32(_) => TypeDescriptor::UInt32,
            Value::UInt64(_) => TypeDescriptor::UInt64,
            Value::Float32(_) => TypeDescriptor::Float32,
            Value::Float64(_) => TypeDescriptor::Float64,
        }
    }

    /// Raw bit pattern, as stored in memory cells.
    pub fn to_bits(&self) -> u64 {
        with_payload!(*self, v => Scalar::to_bits(v))
    }

    /// Interprets a raw bit pattern as a value of type `td`.
    ///
    /// Returns `None` for `Void`.
    pub fn from_bits(td: TypeDescriptor, bits: u64) -> Option<Value> {
        Some(match td {
            TypeDescriptor::Void => return None,
            TypeDescriptor::Int8 => Value::Int8(Scalar::from_bits(bits)),
            TypeDescriptor::Int16 => Value::Int16(Scalar::from_bits(bits)),
            TypeDescriptor::Int32 => Value::Int32(Scalar::from_bits(bits)),
            TypeDescriptor::Int64 => Value::Int64(Scalar::from_bits(bits)),
            TypeDescriptor::UInt8 => Value::UInt8(Scalar::from_bits(bits)),
            TypeDescriptor::UInt16 => Value::UInt16(Scalar::from_bits(bits)),
            TypeDescriptor::UInt32 => Value::UInt32(Scalar::from_bits(bits)),
            TypeDescriptor::UInt64 => Value::UInt64(Scalar::from_bits(bits)),
            TypeDescriptor::Float32 => Value::Float32(Scalar::from_bits(bits)),
            TypeDescriptor::Float64 => Value::Float64(Scalar::from_bits(bits)),
        })
    }

    /// Wraps a native scalar.
    pub fn from_scalar<T: Scalar>(v: T) -> Value {
        // Every Scalar impl has a numeric TYPE, so this never hits Void.
        Value::from_bits(T::TYPE, v.to_bits()).unwrap_or(Value::UInt8(0))
    }

    /// Extracts a native scalar if the types agree.
    pub fn to_scalar<T: Scalar>(&self) -> Option<T> {
        (self.type_descriptor() == T::TYPE).then(|| T::from_bits(self.to_bits()))
    }

    /// Parses an RPN literal as a value of type `td`.
    ///
    /// Integers accept an optional sign and decimal or `0x` hexadecimal
    /// digits and must fit the type. Floats accept anything
    /// [`str::parse`] accepts, including integer literals.
    pub fn parse(td: TypeDescriptor, literal: &str) -> Result<Value, LiteralError> {
        let err = || LiteralError {
            ty: td,
            literal: literal.to_string(),
        };
        match td {
            TypeDescriptor::Void => Err(err()),
            TypeDescriptor::Float32 => literal
                .parse::<f32>()
                .map(Value::Float32)
                .map_err(|_| err()),
            TypeDescriptor::Float64 => literal
                .parse::<f64>()
                .map(Value::Float64)
                .map_err(|_| err()),
            _ => {
                let n = parse_integer(literal).ok_or_else(err)?;
                let (lo, hi) = integer_bounds(td).ok_or_else(err)?;
                if n < lo || n > hi {
                    return Err(err());
                }
                convert_into!(n, td).ok_or_else(err)
            }
        }
    }

    /// Converts this value to `to` with native `as` semantics.
    ///
    /// Integer narrowing wraps, float to integer truncates and saturates,
    /// `float64` to `float32` rounds. The flag is `false` when the source
    /// value lies outside the range of the target type. Returns `None` for
    /// `Void`.
    pub fn cast(&self, to: TypeDescriptor) -> Option<(Value, bool)> {
        let converted = with_payload!(*self, v => convert_into!(v, to))?;
        Some((converted, self.fits(to)))
    }

    /// Returns true if the value is representable in the range of `to`.
    fn fits(&self, to: TypeDescriptor) -> bool {
        match to {
            TypeDescriptor::Void => false,
            TypeDescriptor::Float64 => true,
            TypeDescriptor::Float32 => match *self {
                Value::Float64(v) => !v.is_finite() || (v as f32).is_finite(),
                _ => true,
            },
            _ => {
                let Some((lo, hi)) = integer_bounds(to) else {
                    return false;
                };
                match self.to_i128() {
                    Some(n) => lo <= n && n <= hi,
                    None => {
                        let t = self.to_f64().trunc();
                        t >= lo as f64 && t < (hi + 1) as f64
                    }
                }
            }
        }
    }

    /// Integer payload widened to `i128`, or `None` for floats.
    pub fn to_i128(&self) -> Option<i128> {
        match *self {
            Value::Int8(v) => Some(i128::from(v)),
            Value::Int16(v) => Some(i128::from(v)),
            Value::Int32(v) => Some(i128::from(v)),
            Value::Int64(v) => Some(i128::from(v)),
            Value::UInt8(v) => Some(i128::from(v)),
            Value::UInt16(v) => Some(i128::from(v)),
            Value::UInt32(v) => Some(i128::from(v)),
            Value::UInt64(v) => Some(i128::from(v)),
            Value::Float32(_) | Value::Float64(_) => None,
        }
    }

    /// Payload converted to `f64` (possibly rounding large integers).
    pub fn to_f64(&self) -> f64 {
        with_payload!(*self, v => v as f64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        with_payload!(*self, v => write!(f, "{v}"))
    }
}

/// Inclusive value range of an integer type.
fn integer_bounds(td: TypeDescriptor) -> Option<(i128, i128)> {
    if !td.is_integer() {
        return None;
    }
    let bits = td.byte_size() * 8;
    if td.is_signed() {
        let half = 1i128 << (bits - 1);
        Some((-half, half - 1))
    } else {
        Some((0, (1i128 << bits) - 1))
    }
}

fn parse_integer(literal: &str) -> Option<i128> {
    let (negative, digits) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i128::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i128>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}
