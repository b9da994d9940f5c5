//! Comparisons. Every overload yields `uint8` 1 or 0.
//!
//! Float equality is exact. `NE` is an alias of `NEQ`.

use rteval_common::{Scalar, TypeDescriptor};

use crate::record::FunctionRecord;
use crate::registry::FunctionRegistry;

fn comparison<T: Scalar + PartialOrd>(name: &str, op: fn(&T, &T) -> bool) -> FunctionRecord {
    FunctionRecord::new(name, vec![T::TYPE, T::TYPE], vec![TypeDescriptor::UInt8], move |ctx| {
        let rhs: T = ctx.pop();
        let lhs: T = ctx.pop();
        ctx.push(u8::from(op(&lhs, &rhs)));
        Ok(())
    })
}

fn register_type<T: Scalar + PartialOrd>(registry: &mut FunctionRegistry) {
    registry.insert(comparison::<T>("GT", PartialOrd::gt));
    registry.insert(comparison::<T>("LT", PartialOrd::lt));
    registry.insert(comparison::<T>("GTE", PartialOrd::ge));
    registry.insert(comparison::<T>("LTE", PartialOrd::le));
    registry.insert(comparison::<T>("EQ", PartialEq::eq));
    registry.insert(comparison::<T>("NEQ", PartialEq::ne));
    registry.insert(comparison::<T>("NE", PartialEq::ne));
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
}
