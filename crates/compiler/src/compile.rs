//! RPN text to pseudo-code.
//!
//! Compilation runs in four passes over an already extracted symbol table:
//! type check, memory layout, instruction selection and stack sizing.

use std::collections::HashSet;

use rteval_common::memory::bits_to_cells;
use rteval_common::{
    CodeMemoryElement, DataMemoryAddress, DataMemoryElement, EvaluatorConfig, ExternalSlot,
    TypeDescriptor, Value,
};
use rteval_registry::{FunctionRegistry, CAST, READ, WRITE};
use tracing::{debug, trace};

use crate::error::CompileError;
use crate::parser::{parse_program, Command};
use crate::stack::max_stack_depth;
use crate::symbols::SymbolTable;
use crate::types::{describe, promote_top, select_overload, TypeStack};

/// Number of addressable data cells.
const ADDRESS_SPACE: usize = DataMemoryAddress::MAX as usize + 1;

/// The output of [`compile`].
#[derive(Debug, Clone, Default)]
pub struct CompiledProgram {
    /// Opcodes, each followed by its operand cell if the record takes one.
    pub code: Vec<CodeMemoryElement>,
    /// Internal variables memory: constants, then inputs, then outputs.
    pub memory: Vec<DataMemoryElement>,
    /// Slots for external variables. Address `memory.len() + k` refers to
    /// `externals[k]`.
    pub externals: Vec<ExternalSlot>,
    /// Deepest point the stack reaches, in cells.
    pub stack_size: usize,
}

/// An instruction before flattening into code cells.
type Instruction = (CodeMemoryElement, Option<DataMemoryAddress>);

/// Compile `text` against a symbol table produced by
/// [`extract_variables`](crate::extract_variables) for the same text.
///
/// On success every variable in `symbols` has a location and every constant
/// holds its value in the returned memory.
///
/// # Errors
///
/// Returns the first problem found. The symbol table may have been partially
/// updated in that case.
pub fn compile(
    text: &str,
    symbols: &mut SymbolTable,
    registry: &FunctionRegistry,
    config: &EvaluatorConfig,
) -> Result<CompiledProgram, CompileError> {
    // Past extraction, an unknown mnemonic is an unsupported function.
    let lines = parse_program(text, registry).map_err(|e| match e {
        CompileError::UnknownCommand { line, token } => CompileError::UnknownFunction {
            line,
            name: token,
        },
        other => other,
    })?;

    check_types(symbols)?;
    let mut program = layout(symbols)?;

    let mut instructions: Vec<Instruction> = Vec::new();
    let mut stack = TypeStack::new(config.max_type_stack_depth);
    let mut written: HashSet<String> = HashSet::new();
    let mut next_constant = 0;

    for rpn in lines {
        let line = rpn.line;
        match rpn.command {
            Command::Const(ty, literal) => {
                let constant = symbols
                    .constants
                    .get_mut(next_constant)
                    .filter(|c| c.ty == ty)
                    .ok_or(CompileError::ConstantMismatch { line })?;
                next_constant += 1;

                let value = Value::parse(ty, &literal)
                    .map_err(|source| CompileError::ConstantPlacement { line, source })?;
                let address = constant
                    .location
                    .ok_or(CompileError::ConstantMismatch { line })?;
                constant.constant = Some(value);
                store(&mut program.memory, address, ty, value);

                let code = find_read(registry, ty, line)?;
                instructions.push((code, Some(address)));
                stack.push(ty, instructions.len(), line)?;
            }

            Command::Read(name) => {
                let variable = if written.contains(&name) {
                    symbols.output(&name)
                } else {
                    symbols.input(&name).or_else(|| symbols.output(&name))
                };
                let (ty, address) = variable
                    .and_then(|v| v.location.map(|address| (v.ty, address)))
                    .ok_or_else(|| CompileError::UnknownVariable {
                        line,
                        name: name.clone(),
                    })?;

                let code = find_read(registry, ty, line)?;
                instructions.push((code, Some(address)));
                stack.push(ty, instructions.len(), line)?;
            }

            Command::Write(name) => {
                let (ty, address) = symbols
                    .output(&name)
                    .and_then(|v| v.location.map(|address| (v.ty, address)))
                    .ok_or_else(|| CompileError::UnknownVariable {
                        line,
                        name: name.clone(),
                    })?;

                match promote_top(registry, &stack, ty) {
                    Some(Some(promotion)) => {
                        let at = stack.promote(promotion.index, promotion.to);
                        instructions.insert(at, (promotion.cast, None));
                    }
                    Some(None) => {}
                    None if stack.is_empty() => {
                        return Err(CompileError::MissingOperands {
                            line,
                            name: WRITE.to_string(),
                            needed: 1,
                            available: 0,
                        });
                    }
                    None => {
                        return Err(CompileError::NoMatchingOverload {
                            line,
                            name: WRITE.to_string(),
                            operands: describe(stack.top()),
                        });
                    }
                }

                let code = registry.find(WRITE, &[ty], &[]).ok_or_else(|| {
                    CompileError::NoMatchingOverload {
                        line,
                        name: WRITE.to_string(),
                        operands: describe([ty]),
                    }
                })?;
                instructions.push((code, Some(address)));
                stack.pop_n(1);
                written.insert(name);
            }

            Command::Cast(to) => {
                let from = stack.top().ok_or(CompileError::MissingOperands {
                    line,
                    name: CAST.to_string(),
                    needed: 1,
                    available: 0,
                })?;
                let code = registry.find(CAST, &[from], &[to]).ok_or_else(|| {
                    CompileError::NoMatchingOverload {
                        line,
                        name: CAST.to_string(),
                        operands: describe([from]),
                    }
                })?;
                instructions.push((code, None));
                stack.pop_n(1);
                stack.push(to, instructions.len(), line)?;
            }

            Command::Call(name) => {
                let selection = select_overload(registry, &name, &stack, line)?;
                for promotion in &selection.promotions {
                    let at = stack.promote(promotion.index, promotion.to);
                    instructions.insert(at, (promotion.cast, None));
                }

                let record = registry
                    .get(selection.code)
                    .ok_or(CompileError::UnknownFunction { line, name })?;
                instructions.push((selection.code, None));
                stack.pop_n(record.input_types.len());
                stack.push_outputs(&record.output_types, instructions.len(), line)?;
            }
        }

        if let Some(&(code, operand)) = instructions.last() {
            if let Some(record) = registry.get(code) {
                trace!(target: "rteval::compiler", line, ?operand, "{record}");
            }
        }
    }

    if !stack.is_empty() {
        return Err(CompileError::LeftoverValues { count: stack.len() });
    }

    program.code = flatten(&instructions);
    if program.code.len() > config.max_code_cells {
        return Err(CompileError::CodeOverflow {
            cells: program.code.len(),
            limit: config.max_code_cells,
        });
    }
    program.stack_size = max_stack_depth(&program.code, registry)?;

    debug!(
        target: "rteval::compiler",
        code_cells = program.code.len(),
        memory_cells = program.memory.len(),
        externals = program.externals.len(),
        stack_cells = program.stack_size,
        "compiled"
    );
    Ok(program)
}

/// Every input and output must have a numeric type.
fn check_types(symbols: &SymbolTable) -> Result<(), CompileError> {
    let roles = [("input", &symbols.inputs), ("output", &symbols.outputs)];
    for (role, variables) in roles {
        if let Some(v) = variables.iter().find(|v| !v.ty.is_numeric()) {
            return Err(CompileError::UnsetType {
                role,
                name: v.name.clone(),
            });
        }
    }
    Ok(())
}

/// Assigns addresses and sizes the internal memory.
///
/// Internal cells hold constants, then inputs, then outputs. External
/// variables are numbered after the internal block, inputs first.
fn layout(symbols: &mut SymbolTable) -> Result<CompiledProgram, CompileError> {
    let mut internal: usize = 0;
    let variables = symbols
        .constants
        .iter_mut()
        .chain(symbols.inputs.iter_mut())
        .chain(symbols.outputs.iter_mut());
    let mut external = Vec::new();
    for variable in variables {
        if variable.is_external() {
            external.push(variable);
            continue;
        }
        variable.location = address(internal)?;
        internal += usize::from(variable.ty.cells());
    }
    if internal + external.len() > ADDRESS_SPACE {
        return Err(CompileError::MemoryOverflow {
            cells: internal + external.len(),
        });
    }

    let mut externals = Vec::with_capacity(external.len());
    for (k, variable) in external.into_iter().enumerate() {
        variable.location = address(internal + k)?;
        if let Some(slot) = &variable.external {
            externals.push(slot.clone());
        }
    }

    Ok(CompiledProgram {
        memory: vec![0; internal],
        externals,
        ..CompiledProgram::default()
    })
}

fn address(cell: usize) -> Result<Option<DataMemoryAddress>, CompileError> {
    match DataMemoryAddress::try_from(cell) {
        Ok(address) => Ok(Some(address)),
        Err(_) => Err(CompileError::MemoryOverflow { cells: cell + 1 }),
    }
}

fn store(
    memory: &mut [DataMemoryElement],
    address: DataMemoryAddress,
    ty: TypeDescriptor,
    value: Value,
) {
    let cells = usize::from(ty.cells());
    let start = usize::from(address);
    let split = bits_to_cells(value.to_bits(), ty.cells());
    memory[start..start + cells].copy_from_slice(&split[..cells]);
}

fn find_read(
    registry: &FunctionRegistry,
    ty: TypeDescriptor,
    line: usize,
) -> Result<CodeMemoryElement, CompileError> {
    registry
        .find(READ, &[], &[ty])
        .ok_or_else(|| CompileError::NoMatchingOverload {
            line,
            name: READ.to_string(),
            operands: describe([ty]),
        })
}

fn flatten(instructions: &[Instruction]) -> Vec<CodeMemoryElement> {
    let mut code = Vec::with_capacity(instructions.len() * 2);
    for &(opcode, operand) in instructions {
        code.push(opcode);
        code.extend(operand);
    }
    code
}
