//! The built-in catalog.
//!
//! Records are registered group by group. Within a group, overloads are
//! added in [`ALL_NUMERIC_TYPES`](rteval_common::type_desc::ALL_NUMERIC_TYPES)
//! order, which is also the tie-break order for overload resolution.

mod arith;
mod cast;
mod compare;
mod logic;
mod math;
mod memory;

use rteval_common::{Fault, Scalar};

use crate::record::FunctionRecord;
use crate::registry::FunctionRegistry;

pub(crate) fn register_all(registry: &mut FunctionRegistry) {
    memory::register(registry);
    cast::register(registry);
    arith::register(registry);
    math::register(registry);
    compare::register(registry);
    logic::register(registry);
}

/// `T -> T` with no fault.
pub(crate) fn unary<T: Scalar>(name: &str, op: fn(T) -> T) -> FunctionRecord {
    FunctionRecord::new(name, vec![T::TYPE], vec![T::TYPE], move |ctx| {
        let x: T = ctx.pop();
        ctx.push(op(x));
        Ok(())
    })
}

/// `T -> T` that may raise a fault after pushing its result.
pub(crate) fn unary_checked<T: Scalar>(
    name: &str,
    op: fn(T) -> (T, Option<Fault>),
) -> FunctionRecord {
    FunctionRecord::new(name, vec![T::TYPE], vec![T::TYPE], move |ctx| {
        let x: T = ctx.pop();
        let (result, fault) = op(x);
        ctx.push(result);
        fault.map_or(Ok(()), Err)
    })
}

/// `(T, T) -> T` with no fault. The left operand was pushed first.
pub(crate) fn binary<T: Scalar>(name: &str, op: fn(T, T) -> T) -> FunctionRecord {
    FunctionRecord::new(name, vec![T::TYPE, T::TYPE], vec![T::TYPE], move |ctx| {
        let rhs: T = ctx.pop();
        let lhs: T = ctx.pop();
        ctx.push(op(lhs, rhs));
        Ok(())
    })
}

/// `(T, T) -> T` that may raise a fault after pushing its result.
pub(crate) fn binary_checked<T: Scalar>(
    name: &str,
    op: fn(T, T) -> (T, Option<Fault>),
) -> FunctionRecord {
    FunctionRecord::new(name, vec![T::TYPE, T::TYPE], vec![T::TYPE], move |ctx| {
        let rhs: T = ctx.pop();
        let lhs: T = ctx.pop();
        let (result, fault) = op(lhs, rhs);
        ctx.push(result);
        fault.map_or(Ok(()), Err)
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use rteval_common::memory::{bits_to_cells, cells_to_bits, DataMemoryAddress};

    use crate::context::Context;

    /// A bounds-checked context over plain vectors.
    #[derive(Debug, Default)]
    pub(crate) struct VecContext {
        pub stack: Vec<u32>,
        pub memory: Vec<u32>,
        pub operands: Vec<DataMemoryAddress>,
    }

    impl Context for VecContext {
        fn pop_bits(&mut self, cells: u16) -> u64 {
            let at = self.stack.len() - usize::from(cells);
            let bits = cells_to_bits(&self.stack[at..]);
            self.stack.truncate(at);
            bits
        }

        fn push_bits(&mut self, cells: u16, bits: u64) {
            let split = bits_to_cells(bits, cells);
            self.stack.extend_from_slice(&split[..usize::from(cells)]);
        }

        fn operand(&mut self) -> DataMemoryAddress {
            self.operands.remove(0)
        }

        fn load_bits(&mut self, address: DataMemoryAddress, cells: u16) -> u64 {
            let at = usize::from(address);
            cells_to_bits(&self.memory[at..at + usize::from(cells)])
        }

        fn store_bits(&mut self, address: DataMemoryAddress, cells: u16, bits: u64) {
            let at = usize::from(address);
            let split = bits_to_cells(bits, cells);
            self.memory[at..at + usize::from(cells)].copy_from_slice(&split[..usize::from(cells)]);
        }
    }
}
