//! ADD, SUB, MUL, DIV on every type and NEG on signed types.
//!
//! Integer arithmetic wraps. Integer division by zero yields zero and
//! raises `DivisionByZero`. `MIN / -1` and `-MIN` wrap and raise
//! `Overflow`. Floats follow IEEE 754 and never raise.

use rteval_common::{Fault, Scalar};

use super::{binary_checked, unary_checked};
use crate::registry::FunctionRegistry;

/// Arithmetic with a fixed overflow policy.
trait Arithmetic: Scalar {
    fn sum(self, rhs: Self) -> (Self, Option<Fault>);
    fn difference(self, rhs: Self) -> (Self, Option<Fault>);
    fn product(self, rhs: Self) -> (Self, Option<Fault>);
    fn quotient(self, rhs: Self) -> (Self, Option<Fault>);
}

trait Negate: Scalar {
    fn negate(self) -> (Self, Option<Fault>);
}

macro_rules! impl_int_arith {
    ($($ty:ty),*) => {
        $(
            impl Arithmetic for $ty {
                fn sum(self, rhs: Self) -> (Self, Option<Fault>) {
                    (self.wrapping_add(rhs), None)
                }

                fn difference(self, rhs: Self) -> (Self, Option<Fault>) {
                    (self.wrapping_sub(rhs), None)
                }

                fn product(self, rhs: Self) -> (Self, Option<Fault>) {
                    (self.wrapping_mul(rhs), None)
                }

                fn quotient(self, rhs: Self) -> (Self, Option<Fault>) {
                    if rhs == 0 {
                        return (0, Some(Fault::DivisionByZero));
                    }
                    match self.checked_div(rhs) {
                        Some(q) => (q, None),
                        None => (self.wrapping_div(rhs), Some(Fault::Overflow)),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_float_arith {
    ($($ty:ty),*) => {
        $(
            impl Arithmetic for $ty {
                fn sum(self, rhs: Self) -> (Self, Option<Fault>) {
                    (self + rhs, None)
                }

                fn difference(self, rhs: Self) -> (Self, Option<Fault>) {
                    (self - rhs, None)
                }

                fn product(self, rhs: Self) -> (Self, Option<Fault>) {
                    (self * rhs, None)
                }

                fn quotient(self, rhs: Self) -> (Self, Option<Fault>) {
                    (self / rhs, None)
                }
            }

            impl Negate for $ty {
                fn negate(self) -> (Self, Option<Fault>) {
                    (-self, None)
                }
            }
        )*
    };
}

macro_rules! impl_int_negate {
    ($($ty:ty),*) => {
        $(
            impl Negate for $ty {
                fn negate(self) -> (Self, Option<Fault>) {
                    match self.checked_neg() {
                        Some(n) => (n, None),
                        None => (self.wrapping_neg(), Some(Fault::Overflow)),
                    }
                }
            }
        )*
    };
}

impl_int_arith!(i8, i16, i32, i64, u8, u16, u32, u64);
impl_float_arith!(f32, f64);
impl_int_negate!(i8, i16, i32, i64);

fn register_type<T: Arithmetic>(registry: &mut FunctionRegistry) {
    registry.insert(binary_checked::<T>("ADD", T::sum));
    registry.insert(binary_checked::<T>("SUB", T::difference));
    registry.insert(binary_checked::<T>("MUL", T::product));
    registry.insert(binary_checked::<T>("DIV", T::quotient));
}

pub(super) fn register(registry: &mut FunctionRegistry) {
    register_type::<i8>(registry);
    register_type::<i16>(registry);
    register_type::<i32>(registry);
    register_type::<i64>(registry);
    register_type::<u8>(registry);
    register_type::<u16>(registry);
    register_type::<u32>(registry);
    register_type::<u64>(registry);
    register_type::<f32>(registry);
    register_type::<f64>(registry);

    registry.insert(unary_checked::<i8>("NEG", Negate::negate));
    registry.insert(unary_checked::<i16>("NEG", Negate::negate));
    registry.insert(unary_checked::<i32>("NEG", Negate::negate));
    registry.insert(unary_checked::<i64>("NEG", Negate::negate));
    registry.insert(unary_checked::<f32>("NEG", Negate::negate));
    registry.insert(unary_checked::<f64>("NEG", Negate::negate));
}
