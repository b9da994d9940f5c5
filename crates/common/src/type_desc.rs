//! Scalar type descriptors for the rteval type system.
//!
//! Every value on the stack, every variable and every constant carries
//! exactly one [`TypeDescriptor`]. `Void` marks a variable whose type has
//! not been set yet and is rejected by the compiler.

use std::fmt;

use crate::memory::byte_size_to_data_memory_size;

/// Identifies the scalar type of a value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeDescriptor {
    /// Unresolved type.
    #[default]
    Void = 0x00,
    /// Signed 8-bit integer.
    Int8 = 0x01,
    /// Signed 16-bit integer.
    Int16 = 0x02,
    /// Signed 32-bit integer.
    Int32 = 0x03,
    /// Signed 64-bit integer.
    Int64 = 0x04,
    /// Unsigned 8-bit integer. Also the result type of comparisons.
    UInt8 = 0x05,
    /// Unsigned 16-bit integer.
    UInt16 = 0x06,
    /// Unsigned 32-bit integer.
    UInt32 = 0x07,
    /// Unsigned 64-bit integer.
    UInt64 = 0x08,
    /// IEEE 754 32-bit float.
    Float32 = 0x09,
    /// IEEE 754 64-bit float.
    Float64 = 0x0A,
}

/// All numeric type descriptors, in registration order.
pub const ALL_NUMERIC_TYPES: [TypeDescriptor; 10] = [
    TypeDescriptor::Int8,
    TypeDescriptor::Int16,
    TypeDescriptor::Int32,
    TypeDescriptor::Int64,
    TypeDescriptor::UInt8,
    TypeDescriptor::UInt16,
    TypeDescriptor::UInt32,
    TypeDescriptor::UInt64,
    TypeDescriptor::Float32,
    TypeDescriptor::Float64,
];

/// Cost of promoting any integer to `float32`.
const INT_TO_FLOAT32_COST: u32 = 4;
/// Cost of promoting any integer to `float64`.
const INT_TO_FLOAT64_COST: u32 = 5;

impl TypeDescriptor {
    /// Returns the RPN name for this type.
    pub fn name(&self) -> &'static str {
        match self {
            TypeDescriptor::Void => "void",
            TypeDescriptor::Int8 => "int8",
            TypeDescriptor::Int16 => "int16",
            TypeDescriptor::Int32 => "int32",
            TypeDescriptor::Int64 => "int64",
            TypeDescriptor::UInt8 => "uint8",
            TypeDescriptor::UInt16 => "uint16",
            TypeDescriptor::UInt32 => "uint32",
            TypeDescriptor::UInt64 => "uint64",
            TypeDescriptor::Float32 => "float32",
            TypeDescriptor::Float64 => "float64",
        }
    }

    /// Looks up a numeric type by its RPN name (case-insensitive).
    ///
    /// `float` and `double` are accepted as aliases. `void` is not a valid
    /// RPN type and yields `None`.
    pub fn from_name(name: &str) -> Option<TypeDescriptor> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "float" => return Some(TypeDescriptor::Float32),
            "double" => return Some(TypeDescriptor::Float64),
            _ => {}
        }
        ALL_NUMERIC_TYPES.iter().find(|td| td.name() == lower).copied()
    }

    /// Size in bytes of one value of this type. `Void` has size 0.
    pub fn byte_size(&self) -> u32 {
        match self {
            TypeDescriptor::Void => 0,
            TypeDescriptor::Int8 | TypeDescriptor::UInt8 => 1,
            TypeDescriptor::Int16 | TypeDescriptor::UInt16 => 2,
            TypeDescriptor::Int32 | TypeDescriptor::UInt32 | TypeDescriptor::Float32 => 4,
            TypeDescriptor::Int64 | TypeDescriptor::UInt64 | TypeDescriptor::Float64 => 8,
        }
    }

    /// Number of data memory cells a value of this type occupies.
    pub fn cells(&self) -> u16 {
        byte_size_to_data_memory_size(self.byte_size())
    }

    /// Returns true for every type except `Void`.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, TypeDescriptor::Void)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, TypeDescriptor::Float32 | TypeDescriptor::Float64)
    }

    pub fn is_integer(&self) -> bool {
        self.is_numeric() && !self.is_float()
    }

    /// Returns true for signed integers and floats.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Int8
                | TypeDescriptor::Int16
                | TypeDescriptor::Int32
                | TypeDescriptor::Int64
                | TypeDescriptor::Float32
                | TypeDescriptor::Float64
        )
    }

    /// Cost of implicitly promoting a value of this type to `to`.
    ///
    /// Returns `Some(0)` for identical types and `None` when no implicit
    /// promotion exists. Allowed promotions:
    ///
    /// - integer to a wider integer of the same signedness
    /// - unsigned integer to a strictly wider signed integer
    /// - any integer to `float32` or `float64`
    /// - `float32` to `float64`
    ///
    /// Narrowing, float to integer and signed to unsigned are never implicit.
    pub fn promotion_cost(&self, to: TypeDescriptor) -> Option<u32> {
        if *self == to {
            return Some(0);
        }
        if !self.is_numeric() || !to.is_numeric() {
            return None;
        }
        match (self.is_float(), to.is_float()) {
            (true, true) => (to.byte_size() > self.byte_size()).then_some(1),
            (true, false) => None,
            (false, true) => Some(match to {
                TypeDescriptor::Float32 => INT_TO_FLOAT32_COST,
                _ => INT_TO_FLOAT64_COST,
            }),
            (false, false) => {
                if to.byte_size() <= self.byte_size() {
                    return None;
                }
                if self.is_signed() && !to.is_signed() {
                    return None;
                }
                let steps = to.byte_size().trailing_zeros() - self.byte_size().trailing_zeros();
                let sign_change = u32::from(self.is_signed() != to.is_signed());
                Some(steps + sign_change)
            }
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
