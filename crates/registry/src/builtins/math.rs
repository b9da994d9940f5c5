//! Transcendental functions on `float32` and `float64`.

use super::{binary, unary};
use crate::registry::FunctionRegistry;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.insert(unary::<f32>("SIN", f32::sin));
    registry.insert(unary::<f64>("SIN", f64::sin));
    registry.insert(unary::<f32>("COS", f32::cos));
    registry.insert(unary::<f64>("COS", f64::cos));
    registry.insert(unary::<f32>("TAN", f32::tan));
    registry.insert(unary::<f64>("TAN", f64::tan));
    registry.insert(unary::<f32>("EXP", f32::exp));
    registry.insert(unary::<f64>("EXP", f64::exp));
    registry.insert(unary::<f32>("LOG", f32::ln));
    registry.insert(unary::<f64>("LOG", f64::ln));
    registry.insert(unary::<f32>("LOG10", f32::log10));
    registry.insert(unary::<f64>("LOG10", f64::log10));
    registry.insert(unary::<f32>("SQRT", f32::sqrt));
    registry.insert(unary::<f64>("SQRT", f64::sqrt));

    // Base is pushed first, exponent sits on top.
    registry.insert(binary::<f32>("POW", f32::powf));
    registry.insert(binary::<f64>("POW", f64::powf));
}
