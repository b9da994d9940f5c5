//! Main execution loop and the debug trace.

use std::io::Write;

use rteval_common::{RuntimeStatus, Value};
use rteval_compiler::SymbolTable;
use rteval_registry::{FunctionRecord, FunctionRegistry, READ, WRITE};

use crate::machine::Machine;

/// How much checking `execute` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Dispatch only. Stack accesses are clamped but not reported.
    #[default]
    Fast,
    /// Report stack and code pointer faults, and a stack not back at the
    /// origin at the end.
    Safe,
    /// As `Safe`, and write one trace line per instruction to a sink.
    Debug,
}

impl ExecutionMode {
    pub fn is_checked(self) -> bool {
        self != ExecutionMode::Fast
    }
}

/// Header line of the debug trace.
pub const DEBUG_HEADER: &str = "[line]-[stackPtr]-[codePtr]::[CODE] stack-in => stack-out";

/// Where debug lines go, plus what is needed to name operands.
pub(crate) struct Trace<'s> {
    pub sink: &'s mut dyn Write,
    pub symbols: &'s SymbolTable,
}

impl Machine<'_> {
    /// Runs the program from the first cell to the last.
    ///
    /// Stops early only on an invalid opcode, or on a stack or code pointer
    /// fault in checked mode.
    pub(crate) fn run(
        &mut self,
        registry: &FunctionRegistry,
        mut trace: Option<Trace<'_>>,
    ) -> RuntimeStatus {
        if let Some(t) = trace.as_mut() {
            if writeln!(t.sink, "{DEBUG_HEADER}").is_err() {
                self.status.parameters_error = true;
                trace = None;
            }
        }

        let code = self.code();
        let mut step = 0usize;
        while self.pc < code.len() {
            step += 1;
            let (sp, pc) = (self.sp, self.pc);
            let Some(record) = registry.get(code[pc]) else {
                if self.checked {
                    self.status.invalid_code_pointer = true;
                }
                self.status.not_completed = true;
                break;
            };
            self.pc += 1;

            let before = trace.as_ref().map(|_| self.peek(&record.input_types));
            let before_status = self.status;
            if let Err(fault) = (record.execute)(self) {
                self.status.raise(fault);
            }

            if let (Some(t), Some(inputs)) = (trace.as_mut(), before) {
                let outputs = self.peek(&record.output_types);
                let line = trace_line(step, sp, pc, record, code, t.symbols, inputs, outputs);
                let marker = if self.status != before_status { " <ERROR>" } else { "" };
                if writeln!(t.sink, "{line}{marker}").is_err() {
                    self.status.parameters_error = true;
                    trace = None;
                }
            }

            if self.checked && self.status.has_bounds_violation() {
                self.status.not_completed = true;
                break;
            }
        }

        if self.checked && self.sp != 0 {
            self.status.stack_not_empty = true;
        }
        if let Some(t) = trace.as_mut() {
            if writeln!(t.sink, "{} - {} :: END", self.sp, self.pc).is_err() {
                self.status.parameters_error = true;
            }
        }
        self.status
    }
}

/// `(float64)2`, `(uint8)1`.
fn typed(values: &[Value]) -> String {
    let parts: Vec<String> = values
        .iter()
        .map(|v| format!("({}){v}", v.type_descriptor()))
        .collect();
    format!("({})", parts.join(","))
}

/// One trace line, without the fault marker.
///
/// Inputs are listed top of the stack first.
#[allow(clippy::too_many_arguments)]
fn trace_line(
    step: usize,
    sp: usize,
    pc: usize,
    record: &FunctionRecord,
    code: &[u16],
    symbols: &SymbolTable,
    inputs: Option<Vec<Value>>,
    outputs: Option<Vec<Value>>,
) -> String {
    let prefix = format!("{step} - {sp} - {pc} :: {}", record.name);
    let shown = |values: Option<Vec<Value>>, reverse: bool| match values {
        Some(mut v) => {
            if reverse {
                v.reverse();
            }
            typed(&v)
        }
        None => "(?)".to_string(),
    };

    if !record.has_operand {
        return format!("{prefix} {} => {}", shown(inputs, true), shown(outputs, false));
    }

    let variable = code
        .get(pc + 1)
        .and_then(|&address| symbols.variable_at(address));
    let label = match variable {
        Some(v) => match &v.constant {
            Some(value) => format!("{} {value}", v.ty),
            None => v.name.clone(),
        },
        None => "?".to_string(),
    };
    match record.name.as_str() {
        READ => format!("{prefix}  {label} => {}", shown(outputs, false)),
        WRITE => format!("{prefix}  {label}{}", shown(inputs, true)),
        _ => format!("{prefix}  {label} {} => {}", shown(inputs, true), shown(outputs, false)),
    }
}
