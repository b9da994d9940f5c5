//! Native Rust types that can live in data memory cells.

use crate::type_desc::TypeDescriptor;

/// A native numeric type with a fixed [`TypeDescriptor`].
///
/// Values travel through memory as raw 64-bit patterns. Narrow integers are
/// zero-extended from their own width, so an `i8` of `-1` is stored as
/// `0xFF`. Floats use their IEEE bit representation.
pub trait Scalar: Copy + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Descriptor of this type.
    const TYPE: TypeDescriptor;

    /// Raw bit pattern of this value.
    fn to_bits(self) -> u64;

    /// Rebuilds a value from its raw bit pattern. Extra high bits are ignored.
    fn from_bits(bits: u64) -> Self;
}

macro_rules! impl_scalar_int {
    ($($ty:ty => $unsigned:ty, $td:ident;)*) => {
        $(
            impl Scalar for $ty {
                const TYPE: TypeDescriptor = TypeDescriptor::$td;

                fn to_bits(self) -> u64 {
                    self as $unsigned as u64
                }

                fn from_bits(bits: u64) -> Self {
                    bits as $unsigned as $ty
                }
            }
        )*
    };
}

impl_scalar_int! {
    i8 => u8, Int8;
    i16 => u16, Int16;
    i32 => u32, Int32;
    i64 => u64, Int64;
    u8 => u8, UInt8;
    u16 => u16, UInt16;
    u32 => u32, UInt32;
    u64 => u64, UInt64;
}

impl Scalar for f32 {
    const TYPE: TypeDescriptor = TypeDescriptor::Float32;

    fn to_bits(self) -> u64 {
        u64::from(f32::to_bits(self))
    }

    fn from_bits(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl Scalar for f64 {
    const TYPE: TypeDescriptor = TypeDescriptor::Float64;

    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}
