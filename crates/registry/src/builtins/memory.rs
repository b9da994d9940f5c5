//! READ and WRITE move values between variables and the stack. DUP copies
//! the top of the stack.

use rteval_common::type_desc::ALL_NUMERIC_TYPES;

use crate::record::FunctionRecord;
use crate::registry::FunctionRegistry;
use crate::{DUP, READ, WRITE};

pub(super) fn register(registry: &mut FunctionRegistry) {
    for &td in &ALL_NUMERIC_TYPES {
        let cells = td.cells();
        registry.insert(
            FunctionRecord::new(READ, vec![], vec![td], move |ctx| {
                let address = ctx.operand();
                let bits = ctx.load_bits(address, cells);
                ctx.push_bits(cells, bits);
                Ok(())
            })
            .with_operand(),
        );
        registry.insert(
            FunctionRecord::new(WRITE, vec![td], vec![], move |ctx| {
                let address = ctx.operand();
                let bits = ctx.pop_bits(cells);
                ctx.store_bits(address, cells, bits);
                Ok(())
            })
            .with_operand(),
        );
    }
    for &td in &ALL_NUMERIC_TYPES {
        let cells = td.cells();
        registry.insert(FunctionRecord::new(DUP, vec![td], vec![td, td], move |ctx| {
            let bits = ctx.pop_bits(cells);
            ctx.push_bits(cells, bits);
            ctx.push_bits(cells, bits);
            Ok(())
        }));
    }
}

#[cfg(test)]
mod tests {
    use crate::builtins::test_support::VecContext;
    use crate::context::Context;
    use crate::FunctionRegistry;
    use rteval_common::TypeDescriptor::*;

    #[test]
    fn read_then_write_copies_two_cells() {
        let registry = FunctionRegistry::with_builtins();
        let read = registry.find("READ", &[], &[Float64]).unwrap();
        let write = registry.find("WRITE", &[Float64], &[]).unwrap();

        let mut ctx = VecContext {
            memory: vec![0x1111, 0x2222, 0, 0],
            operands: vec![0, 2],
            ..Default::default()
        };
        (registry.get(read).unwrap().execute)(&mut ctx).unwrap();
        assert_eq!(ctx.stack, vec![0x1111, 0x2222]);
        (registry.get(write).unwrap().execute)(&mut ctx).unwrap();
        assert!(ctx.stack.is_empty());
        assert_eq!(ctx.memory, vec![0x1111, 0x2222, 0x1111, 0x2222]);
    }

    #[test]
    fn narrow_types_use_one_cell() {
        let registry = FunctionRegistry::with_builtins();
        let read = registry.find("READ", &[], &[Int8]).unwrap();
        let mut ctx = VecContext {
            memory: vec![0xFF],
            operands: vec![0],
            ..Default::default()
        };
        (registry.get(read).unwrap().execute)(&mut ctx).unwrap();
        let ctx: &mut dyn Context = &mut ctx;
        assert_eq!(ctx.pop::<i8>(), -1);
    }

    #[test]
    fn read_and_write_take_operands() {
        let registry = FunctionRegistry::with_builtins();
        for name in ["READ", "WRITE"] {
            let overloads: Vec<_> = registry.candidates(name).collect();
            assert_eq!(overloads.len(), 10);
            assert!(overloads.iter().all(|(_, r)| r.has_operand));
        }
    }

    #[test]
    fn dup_copies_top() {
        let registry = FunctionRegistry::with_builtins();
        let dup = registry.find("DUP", &[Float64], &[Float64, Float64]).unwrap();
        let mut ctx = VecContext {
            stack: vec![7, 0xAAAA, 0xBBBB],
            ..Default::default()
        };
        (registry.get(dup).unwrap().execute)(&mut ctx).unwrap();
        assert_eq!(ctx.stack, vec![7, 0xAAAA, 0xBBBB, 0xAAAA, 0xBBBB]);
    }
}
