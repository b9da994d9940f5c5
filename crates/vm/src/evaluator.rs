//! The evaluator: symbol table, compiled program and stack behind one API.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use rteval_common::memory::{bits_to_cells, cells_to_bits};
use rteval_common::{
    DataMemoryElement, EvaluatorConfig, ExternalSlot, RuntimeStatus, Scalar, TypeDescriptor,
    Value, VariableInformation,
};
use rteval_compiler::{compile, decompile, extract_variables, CompiledProgram, SymbolTable};
use rteval_registry::FunctionRegistry;
use tracing::{trace, warn};

use crate::error::EvaluatorError;
use crate::execute::{ExecutionMode, Trace};
use crate::machine::Machine;

/// Inputs or outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Input,
    Output,
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Input => f.write_str("input"),
            VariableKind::Output => f.write_str("output"),
        }
    }
}

/// Selects a variable by position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKey<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for VariableKey<'_> {
    fn from(index: usize) -> Self {
        VariableKey::Index(index)
    }
}

impl<'a> From<&'a str> for VariableKey<'a> {
    fn from(name: &'a str) -> Self {
        VariableKey::Name(name)
    }
}

impl fmt::Display for VariableKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKey::Index(i) => write!(f, "#{i}"),
            VariableKey::Name(name) => f.write_str(name),
        }
    }
}

/// Compiles an RPN program once and executes it any number of times.
///
/// Typical use:
///
/// 1. [`extract_variables`](Self::extract_variables) lists inputs, outputs
///    and constants.
/// 2. [`set_variable_type`](Self::set_variable_type) for every input and
///    output, optionally [`bind_external`](Self::bind_external).
/// 3. [`compile`](Self::compile).
/// 4. Write inputs, [`execute`](Self::execute), read outputs. Repeat.
///
/// Changing a type or a binding drops the compiled program.
pub struct RuntimeEvaluator {
    registry: Arc<FunctionRegistry>,
    config: EvaluatorConfig,
    symbols: SymbolTable,
    program: Option<CompiledProgram>,
    stack: Vec<DataMemoryElement>,
}

impl Default for RuntimeEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuntimeEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeEvaluator")
            .field("config", &self.config)
            .field("symbols", &self.symbols)
            .field("compiled", &self.program.is_some())
            .finish_non_exhaustive()
    }
}

impl RuntimeEvaluator {
    /// An evaluator over the built-in function catalog.
    pub fn new() -> Self {
        Self::with_registry(FunctionRegistry::shared(), EvaluatorConfig::default())
    }

    pub fn with_registry(registry: Arc<FunctionRegistry>, config: EvaluatorConfig) -> Self {
        let stack = Vec::with_capacity(config.initial_stack_cells);
        Self {
            registry,
            config,
            symbols: SymbolTable::default(),
            program: None,
            stack,
        }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }

    /// Rebuilds the symbol table from `text`.
    ///
    /// Drops any compiled program. On failure the table is left empty.
    pub fn extract_variables(&mut self, text: &str) -> Result<(), EvaluatorError> {
        self.invalidate();
        self.symbols.clear();
        self.symbols = extract_variables(text, &self.registry)?;
        Ok(())
    }

    /// Number of inputs or outputs.
    pub fn variable_count(&self, kind: VariableKind) -> usize {
        self.list(kind).len()
    }

    /// An input or output by index or name.
    pub fn variable<'k>(
        &self,
        kind: VariableKind,
        key: impl Into<VariableKey<'k>>,
    ) -> Option<&VariableInformation> {
        let list = self.list(kind);
        match key.into() {
            VariableKey::Index(i) => list.get(i),
            VariableKey::Name(name) => list.iter().find(|v| v.name == name),
        }
    }

    /// Constants found by the last extraction, in address order.
    pub fn constants(&self) -> &[VariableInformation] {
        &self.symbols.constants
    }

    pub fn set_variable_type<'k>(
        &mut self,
        kind: VariableKind,
        key: impl Into<VariableKey<'k>>,
        ty: TypeDescriptor,
    ) -> Result<(), EvaluatorError> {
        let variable = self.select_mut(kind, key.into())?;
        if !ty.is_numeric() {
            return Err(EvaluatorError::InvalidType {
                name: variable.name.clone(),
                ty,
            });
        }
        variable.ty = ty;
        self.invalidate();
        Ok(())
    }

    /// Backs a variable with caller-owned storage.
    pub fn bind_external<'k>(
        &mut self,
        kind: VariableKind,
        key: impl Into<VariableKey<'k>>,
        slot: ExternalSlot,
    ) -> Result<(), EvaluatorError> {
        self.select_mut(kind, key.into())?.external = Some(slot);
        self.invalidate();
        Ok(())
    }

    /// Returns a variable to internal storage, handing back its slot.
    pub fn unbind_external<'k>(
        &mut self,
        kind: VariableKind,
        key: impl Into<VariableKey<'k>>,
    ) -> Result<Option<ExternalSlot>, EvaluatorError> {
        let slot = self.select_mut(kind, key.into())?.external.take();
        self.invalidate();
        Ok(slot)
    }

    /// Compiles `text` against the current symbol table and sizes the stack.
    ///
    /// Variables memory starts zeroed apart from constants.
    pub fn compile(&mut self, text: &str) -> Result<(), EvaluatorError> {
        self.invalidate();
        match compile(text, &mut self.symbols, &self.registry, &self.config) {
            Ok(program) => {
                self.stack.resize(program.stack_size, 0);
                self.program = Some(program);
                Ok(())
            }
            Err(e) => {
                warn!(target: "rteval::vm", error = %e, "compile failed");
                Err(e.into())
            }
        }
    }

    /// Runs the compiled program once.
    ///
    /// `sink` is required in [`ExecutionMode::Debug`] and ignored otherwise.
    pub fn execute(&mut self, mode: ExecutionMode, sink: Option<&mut dyn Write>) -> RuntimeStatus {
        let Some(program) = self.program.as_mut() else {
            return RuntimeStatus {
                not_compiled: true,
                ..RuntimeStatus::ok()
            };
        };

        let trace = match (mode, sink) {
            (ExecutionMode::Debug, Some(sink)) => Some(Trace {
                sink,
                symbols: &self.symbols,
            }),
            (ExecutionMode::Debug, None) => {
                return RuntimeStatus {
                    parameters_error: true,
                    ..RuntimeStatus::ok()
                };
            }
            _ => None,
        };

        let mut machine = Machine::new(
            &program.code,
            &mut program.memory,
            &program.externals,
            &mut self.stack,
            mode.is_checked(),
        );
        let status = machine.run(&self.registry, trace);

        if status.is_ok() {
            trace!(target: "rteval::vm", ?mode, "executed");
        } else {
            warn!(target: "rteval::vm", ?mode, %status, "execution raised flags");
        }
        status
    }

    /// RPN text for the compiled program.
    pub fn decompile(&self, show_types: bool) -> Result<String, EvaluatorError> {
        let program = self.program.as_ref().ok_or(EvaluatorError::NotCompiled)?;
        Ok(decompile(program, &self.symbols, &self.registry, show_types)?)
    }

    /// Cells of internal variables memory.
    pub fn size_of_variables(&self) -> usize {
        self.program.as_ref().map_or(0, |p| p.memory.len())
    }

    /// Cells of pseudo-code.
    pub fn size_of_code(&self) -> usize {
        self.program.as_ref().map_or(0, |p| p.code.len())
    }

    /// Cells of stack.
    pub fn size_of_stack(&self) -> usize {
        self.stack.len()
    }

    /// Internal variables memory: constants, then inputs, then outputs.
    pub fn variables_memory(&self) -> &[DataMemoryElement] {
        self.program
            .as_ref()
            .map(|p| p.memory.as_slice())
            .unwrap_or_default()
    }

    /// Stores a typed value into an input.
    pub fn write_input<'k, T: Scalar>(
        &mut self,
        key: impl Into<VariableKey<'k>>,
        value: T,
    ) -> Result<(), EvaluatorError> {
        self.set_variable_value(VariableKind::Input, key, Value::from_scalar(value))
    }

    /// Loads a typed value from an output.
    pub fn read_output<'k, T: Scalar>(
        &self,
        key: impl Into<VariableKey<'k>>,
    ) -> Result<T, EvaluatorError> {
        let key = key.into();
        let value = self.variable_value(VariableKind::Output, key)?;
        value.to_scalar().ok_or_else(|| EvaluatorError::TypeMismatch {
            name: key.to_string(),
            expected: value.type_descriptor(),
            found: T::TYPE,
        })
    }

    /// Current value of an input or output.
    pub fn variable_value<'k>(
        &self,
        kind: VariableKind,
        key: impl Into<VariableKey<'k>>,
    ) -> Result<Value, EvaluatorError> {
        let key = key.into();
        let variable = self
            .variable(kind, key)
            .ok_or_else(|| not_found(kind, key))?;

        let bits = match (&variable.external, &self.program) {
            (Some(slot), _) => slot.bits(),
            (None, Some(program)) => {
                let start = variable
                    .location
                    .map(usize::from)
                    .ok_or(EvaluatorError::NotCompiled)?;
                let cells = usize::from(variable.ty.cells());
                let slice = program
                    .memory
                    .get(start..start + cells)
                    .ok_or(EvaluatorError::NotCompiled)?;
                cells_to_bits(slice)
            }
            (None, None) => return Err(EvaluatorError::NotCompiled),
        };
        Value::from_bits(variable.ty, bits).ok_or_else(|| EvaluatorError::InvalidType {
            name: variable.name.clone(),
            ty: variable.ty,
        })
    }

    /// Overwrites an input or output. The value must have the variable's type.
    pub fn set_variable_value<'k>(
        &mut self,
        kind: VariableKind,
        key: impl Into<VariableKey<'k>>,
        value: Value,
    ) -> Result<(), EvaluatorError> {
        let key = key.into();
        let variable = self
            .variable(kind, key)
            .ok_or_else(|| not_found(kind, key))?;
        if variable.ty != value.type_descriptor() {
            return Err(EvaluatorError::TypeMismatch {
                name: variable.name.clone(),
                expected: variable.ty,
                found: value.type_descriptor(),
            });
        }

        if let Some(slot) = &variable.external {
            slot.set_bits(value.to_bits());
            return Ok(());
        }
        let start = variable
            .location
            .map(usize::from)
            .ok_or(EvaluatorError::NotCompiled)?;
        let ty = variable.ty;
        let program = self.program.as_mut().ok_or(EvaluatorError::NotCompiled)?;
        let cells = usize::from(ty.cells());
        let slice = program
            .memory
            .get_mut(start..start + cells)
            .ok_or(EvaluatorError::NotCompiled)?;
        slice.copy_from_slice(&bits_to_cells(value.to_bits(), ty.cells())[..cells]);
        trace!(target: "rteval::vm", %kind, %key, %value, "variable set");
        Ok(())
    }

    /// Drops the compiled program and its stack.
    fn invalidate(&mut self) {
        self.program = None;
        self.stack.clear();
    }

    fn list(&self, kind: VariableKind) -> &[VariableInformation] {
        match kind {
            VariableKind::Input => &self.symbols.inputs,
            VariableKind::Output => &self.symbols.outputs,
        }
    }

    fn select_mut(
        &mut self,
        kind: VariableKind,
        key: VariableKey<'_>,
    ) -> Result<&mut VariableInformation, EvaluatorError> {
        let list = match kind {
            VariableKind::Input => &mut self.symbols.inputs,
            VariableKind::Output => &mut self.symbols.outputs,
        };
        let found = match key {
            VariableKey::Index(i) => list.get_mut(i),
            VariableKey::Name(name) => list.iter_mut().find(|v| v.name == name),
        };
        found.ok_or_else(|| not_found(kind, key))
    }
}

fn not_found(kind: VariableKind, key: VariableKey<'_>) -> EvaluatorError {
    EvaluatorError::VariableNotFound {
        kind,
        key: key.to_string(),
    }
}
