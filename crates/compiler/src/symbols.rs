//! Symbol tables and variable extraction.

use rteval_common::{DataMemoryAddress, Value, VariableInformation};
use rteval_registry::FunctionRegistry;
use tracing::debug;

use crate::error::CompileError;
use crate::parser::{parse_program, Command};

/// Inputs, outputs and constants of one RPN program.
///
/// Names are unique within each list. A name may appear both as an input
/// and as an output, in which case they are distinct variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    pub inputs: Vec<VariableInformation>,
    pub outputs: Vec<VariableInformation>,
    pub constants: Vec<VariableInformation>,
}

impl SymbolTable {
    pub fn input(&self, name: &str) -> Option<&VariableInformation> {
        self.inputs.iter().find(|v| v.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&VariableInformation> {
        self.outputs.iter().find(|v| v.name == name)
    }

    /// The variable or constant placed at `address`.
    pub fn variable_at(&self, address: DataMemoryAddress) -> Option<&VariableInformation> {
        self.constants
            .iter()
            .chain(&self.inputs)
            .chain(&self.outputs)
            .find(|v| v.location == Some(address))
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
        self.constants.clear();
    }
}

/// Name given to a constant placed at `address`.
pub fn constant_name(address: usize) -> String {
    format!("Constant@{address}")
}

/// Scan RPN text and build a fresh symbol table.
///
/// `READ` declares an input unless an output of that name was written on
/// an earlier line, in which case the later `READ` reads the output back.
/// `WRITE` declares an output. `CONST` declares a typed constant whose
/// name records its address among the constants. Inputs and outputs start
/// with the `Void` type.
///
/// # Errors
///
/// Any malformed line, unknown type or unparsable literal. All of these
/// are [`ErrorKind::Syntax`](rteval_common::ErrorKind::Syntax).
pub fn extract_variables(
    text: &str,
    registry: &FunctionRegistry,
) -> Result<SymbolTable, CompileError> {
    let mut table = SymbolTable::default();
    let mut next_constant: usize = 0;

    for rpn in parse_program(text, registry)? {
        match rpn.command {
            Command::Read(name) => {
                if table.output(&name).is_none() && table.input(&name).is_none() {
                    table.inputs.push(VariableInformation::new(name));
                }
            }
            Command::Write(name) => {
                if table.output(&name).is_none() {
                    table.outputs.push(VariableInformation::new(name));
                }
            }
            Command::Const(ty, literal) => {
                let value = Value::parse(ty, &literal).map_err(|source| {
                    CompileError::InvalidLiteral {
                        line: rpn.line,
                        source,
                    }
                })?;
                table
                    .constants
                    .push(VariableInformation::constant(constant_name(next_constant), value));
                next_constant += usize::from(ty.cells());
            }
            Command::Cast(_) | Command::Call(_) => {}
        }
    }

    debug!(
        target: "rteval::compiler",
        inputs = table.inputs.len(),
        outputs = table.outputs.len(),
        constants = table.constants.len(),
        "extracted variables"
    );
    Ok(table)
}
