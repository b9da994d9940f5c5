//! Logical operators on `uint8` truth values (non-zero is true).

use super::{binary, unary};
use crate::registry::FunctionRegistry;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.insert(binary::<u8>("AND", |a, b| u8::from(a != 0 && b != 0)));
    registry.insert(binary::<u8>("OR", |a, b| u8::from(a != 0 || b != 0)));
    registry.insert(binary::<u8>("XOR", |a, b| u8::from((a != 0) != (b != 0))));
    registry.insert(unary::<u8>("NOT", |a| u8::from(a == 0)));
}

#[cfg(test)]
mod tests {
    use crate::builtins::test_support::VecContext;
    use crate::context::Context;
    use crate::FunctionRegistry;
    use rteval_common::TypeDescriptor::*;

    fn logic(name: &str, lhs: u8, rhs: u8) -> u8 {
        let registry = FunctionRegistry::with_builtins();
        let code = registry.find(name, &[UInt8, UInt8], &[UInt8]).unwrap();
        let mut ctx = VecContext::default();
        {
            let ctx: &mut dyn Context = &mut ctx;
            ctx.push(lhs);
            ctx.push(rhs);
        }
        (registry.get(code).unwrap().execute)(&mut ctx).unwrap();
        let ctx: &mut dyn Context = &mut ctx;
        ctx.pop::<u8>()
    }

    #[test]
    fn truth_tables() {
        assert_eq!(logic("AND", 1, 7), 1);
        assert_eq!(logic("AND", 1, 0), 0);
        assert_eq!(logic("OR", 0, 0), 0);
        assert_eq!(logic("OR", 0, 2), 1);
        assert_eq!(logic("XOR", 3, 4), 0);
        assert_eq!(logic("XOR", 0, 4), 1);
    }

    #[test]
    fn only_uint8_overloads() {
        let registry = FunctionRegistry::with_builtins();
        for name in ["AND", "OR", "XOR", "NOT"] {
            assert_eq!(registry.candidates(name).count(), 1, "{name}");
        }
        assert!(registry.find("AND", &[Float64, Float64], &[Float64]).is_none());
    }
}
