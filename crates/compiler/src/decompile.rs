//! Pseudo-code back to RPN text.
//!
//! Output is one instruction per line. Without types the text compiles back
//! to the same pseudo-code, with implicit promotions spelled out as `CAST`.

use rteval_common::memory::cells_to_bits;
use rteval_common::{TypeDescriptor, Value};
use rteval_registry::{FunctionRecord, FunctionRegistry, CAST, CONST, READ, WRITE};

use crate::compile::CompiledProgram;
use crate::error::CompileError;
use crate::symbols::SymbolTable;

/// Render `program` as RPN text.
///
/// With `show_types` each line carries the signature of the record it
/// executes, e.g. `ADD(float64,float64) => (float64)` or `READ A => (float64)`.
///
/// # Errors
///
/// [`CompileError::MalformedCode`] for an unknown opcode, a missing operand
/// or an operand that is not a variable address.
pub fn decompile(
    program: &CompiledProgram,
    symbols: &SymbolTable,
    registry: &FunctionRegistry,
    show_types: bool,
) -> Result<String, CompileError> {
    let code = &program.code;
    let mut out = String::new();
    let mut pc = 0;

    while pc < code.len() {
        let at = pc;
        let record = registry
            .get(code[pc])
            .ok_or(CompileError::MalformedCode { at })?;
        pc += 1;

        let line = if record.has_operand {
            let address = *code.get(pc).ok_or(CompileError::MalformedCode { at })?;
            pc += 1;
            let variable = symbols
                .variable_at(address)
                .ok_or(CompileError::MalformedCode { at })?;

            match record.name.as_str() {
                READ if variable.is_constant() => {
                    let value = constant_value(program, address, variable.ty)
                        .ok_or(CompileError::MalformedCode { at })?;
                    format!("{CONST} {} {value}", variable.ty)
                }
                READ if show_types => {
                    format!("{READ} {} => {}", variable.name, record.outputs_to_string())
                }
                WRITE if show_types => {
                    format!("{WRITE} {}{}", variable.name, record.inputs_to_string())
                }
                _ => format!("{} {}", record.name, variable.name),
            }
        } else if show_types {
            record.to_string()
        } else {
            plain(record)
        };

        out.push_str(&line);
        out.push('\n');
    }

    Ok(out)
}

/// A line without type annotations. `CAST` names its target type.
fn plain(record: &FunctionRecord) -> String {
    match (record.name.as_str(), record.output_types.as_slice()) {
        (CAST, [to]) => format!("{CAST} {to}"),
        _ => record.name.clone(),
    }
}

fn constant_value(program: &CompiledProgram, address: u16, ty: TypeDescriptor) -> Option<Value> {
    let start = usize::from(address);
    let cells = program.memory.get(start..start + usize::from(ty.cells()))?;
    Value::from_bits(ty, cells_to_bits(cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::symbols::extract_variables;
    use rteval_common::EvaluatorConfig;
    use TypeDescriptor::*;

    fn compiled(
        text: &str,
        inputs: &[TypeDescriptor],
        outputs: &[TypeDescriptor],
    ) -> (CompiledProgram, SymbolTable) {
        let registry = FunctionRegistry::with_builtins();
        let mut symbols = extract_variables(text, &registry).unwrap();
        for (v, &t) in symbols.inputs.iter_mut().zip(inputs) {
            v.ty = t;
        }
        for (v, &t) in symbols.outputs.iter_mut().zip(outputs) {
            v.ty = t;
        }
        let program = compile(text, &mut symbols, &registry, &EvaluatorConfig::default()).unwrap();
        (program, symbols)
    }

    #[test]
    fn plain_listing() {
        let (program, symbols) = compiled(
            "READ A\nCONST int64 2\nPOW\nWRITE ret\n",
            &[Float64],
            &[Float64],
        );
        let registry = FunctionRegistry::with_builtins();
        let text = decompile(&program, &symbols, &registry, false).unwrap();
        assert_eq!(text, "READ A\nCONST int64 2\nCAST float64\nPOW\nWRITE ret\n");
    }

    #[test]
    fn typed_listing() {
        let (program, symbols) = compiled(
            "READ A\nCONST int64 2\nPOW\nWRITE ret\n",
            &[Float64],
            &[Float64],
        );
        let text = decompile(&program, &symbols, &FunctionRegistry::with_builtins(), true).unwrap();
        assert_eq!(
            text,
            "READ A => (float64)\n\
             CONST int64 2\n\
             CAST(int64) => (float64)\n\
             POW(float64,float64) => (float64)\n\
             WRITE ret(float64)\n"
        );
    }

    #[test]
    fn float_constants_print_shortest() {
        let (program, symbols) = compiled(
            "CONST float32 0.1\nCONST float64 2.0\nCAST float32\nADD\nWRITE y\n",
            &[],
            &[Float32],
        );
        let registry = FunctionRegistry::with_builtins();
        let text = decompile(&program, &symbols, &registry, false).unwrap();
        assert_eq!(text, "CONST float32 0.1\nCONST float64 2\nCAST float32\nADD\nWRITE y\n");
    }

    #[test]
    fn bad_opcode() {
        let program = CompiledProgram {
            code: vec![u16::MAX],
            ..CompiledProgram::default()
        };
        let registry = FunctionRegistry::with_builtins();
        let err = decompile(&program, &SymbolTable::default(), &registry, false).unwrap_err();
        assert_eq!(err, CompileError::MalformedCode { at: 0 });
    }

    #[test]
    fn unknown_address() {
        let registry = FunctionRegistry::with_builtins();
        let read = registry.find(READ, &[], &[Int8]).unwrap();
        let program = CompiledProgram {
            code: vec![read, 9],
            ..CompiledProgram::default()
        };
        let err = decompile(&program, &SymbolTable::default(), &registry, false).unwrap_err();
        assert_eq!(err, CompileError::MalformedCode { at: 0 });
    }
}
