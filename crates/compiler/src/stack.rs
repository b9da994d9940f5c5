//! Stack depth analysis over pseudo-code.
//!
//! Walks the program with a cell counter, independent of the type stack,
//! and reports the deepest point reached.

use rteval_common::CodeMemoryElement;
use rteval_registry::FunctionRegistry;

use crate::error::CompileError;

/// Maximum stack depth in cells reached by `code`.
///
/// # Errors
///
/// [`CompileError::MalformedCode`] if an opcode is unknown, an operand is
/// missing or an instruction would pop more cells than are on the stack.
pub fn max_stack_depth(
    code: &[CodeMemoryElement],
    registry: &FunctionRegistry,
) -> Result<usize, CompileError> {
    let mut depth: usize = 0;
    let mut max_depth: usize = 0;
    let mut pc = 0;

    while pc < code.len() {
        let at = pc;
        let record = registry
            .get(code[pc])
            .ok_or(CompileError::MalformedCode { at })?;
        pc += record.code_cells();
        if pc > code.len() {
            return Err(CompileError::MalformedCode { at });
        }

        depth = depth
            .checked_sub(record.input_cells() as usize)
            .ok_or(CompileError::MalformedCode { at })?;
        depth += record.output_cells() as usize;
        max_depth = max_depth.max(depth);
    }

    Ok(max_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rteval_common::TypeDescriptor::*;

    fn op(
        registry: &FunctionRegistry,
        name: &str,
        inputs: &[rteval_common::TypeDescriptor],
        outputs: &[rteval_common::TypeDescriptor],
    ) -> CodeMemoryElement {
        registry.find(name, inputs, outputs).unwrap()
    }

    #[test]
    fn empty_program() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(max_stack_depth(&[], &registry).unwrap(), 0);
    }

    #[test]
    fn two_float64_reads_need_four_cells() {
        let registry = FunctionRegistry::with_builtins();
        let read = op(&registry, "READ", &[], &[Float64]);
        let add = op(&registry, "ADD", &[Float64, Float64], &[Float64]);
        let write = op(&registry, "WRITE", &[Float64], &[]);
        let code = [read, 0, read, 2, add, write, 4];
        assert_eq!(max_stack_depth(&code, &registry).unwrap(), 4);
    }

    #[test]
    fn narrow_types_take_one_cell_each() {
        let registry = FunctionRegistry::with_builtins();
        let read = op(&registry, "READ", &[], &[Int8]);
        let add = op(&registry, "ADD", &[Int8, Int8], &[Int8]);
        let write = op(&registry, "WRITE", &[Int8], &[]);
        let code = [read, 0, read, 0, read, 0, add, add, write, 1];
        assert_eq!(max_stack_depth(&code, &registry).unwrap(), 3);
    }

    #[test]
    fn missing_operand_is_malformed() {
        let registry = FunctionRegistry::with_builtins();
        let read = op(&registry, "READ", &[], &[Int8]);
        assert_eq!(
            max_stack_depth(&[read], &registry),
            Err(CompileError::MalformedCode { at: 0 })
        );
    }

    #[test]
    fn underflow_is_malformed() {
        let registry = FunctionRegistry::with_builtins();
        let add = op(&registry, "ADD", &[Int8, Int8], &[Int8]);
        assert_eq!(
            max_stack_depth(&[add], &registry),
            Err(CompileError::MalformedCode { at: 0 })
        );
    }

    #[test]
    fn unknown_opcode_is_malformed() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(
            max_stack_depth(&[u16::MAX], &registry),
            Err(CompileError::MalformedCode { at: 0 })
        );
    }
}
