//! Integration tests for the rteval compiler.
//!
//! Tests cover:
//! - Variable extraction and compilation of the reference programs
//! - Implicit promotion placement
//! - Memory layout with external variables
//! - Decompile → recompile round-trips
//! - Error categories

use proptest::prelude::*;
use rteval_common::{ErrorKind, EvaluatorConfig, ExternalSlot, TypeDescriptor};
use rteval_compiler::{
    compile, decompile, extract_variables, max_stack_depth, CompileError, CompiledProgram,
    SymbolTable,
};
use rteval_registry::FunctionRegistry;

use TypeDescriptor::*;

// ---- Test helpers ----

fn registry() -> FunctionRegistry {
    FunctionRegistry::with_builtins()
}

/// Extracts `text` and assigns types to inputs and outputs in order.
fn typed(text: &str, inputs: &[TypeDescriptor], outputs: &[TypeDescriptor]) -> SymbolTable {
    let mut symbols = extract_variables(text, &registry()).unwrap();
    assert_eq!(symbols.inputs.len(), inputs.len(), "input count");
    assert_eq!(symbols.outputs.len(), outputs.len(), "output count");
    for (v, &t) in symbols.inputs.iter_mut().zip(inputs) {
        v.ty = t;
    }
    for (v, &t) in symbols.outputs.iter_mut().zip(outputs) {
        v.ty = t;
    }
    symbols
}

fn build(text: &str, symbols: &mut SymbolTable) -> Result<CompiledProgram, CompileError> {
    compile(text, symbols, &registry(), &EvaluatorConfig::default())
}

fn listing(program: &CompiledProgram, symbols: &SymbolTable) -> String {
    decompile(program, symbols, &registry(), true).unwrap()
}

// ---- Reference programs ----

#[test]
fn float_power() {
    let text = "READ A\nCONST int64 2\nPOW\nWRITE ret\n";
    let mut symbols = typed(text, &[Float64], &[Float64]);
    let program = build(text, &mut symbols).unwrap();

    assert_eq!(symbols.constants[0].name, "Constant@0");
    assert_eq!(
        listing(&program, &symbols),
        "READ A => (float64)\n\
         CONST int64 2\n\
         CAST(int64) => (float64)\n\
         POW(float64,float64) => (float64)\n\
         WRITE ret(float64)\n"
    );
    // READ, CONST and WRITE carry an operand.
    assert_eq!(program.code.len(), 8);
    assert_eq!(program.stack_size, 4);
}

#[test]
fn trig_identity() {
    let text = "READ theta\nSIN\nREAD theta\nSIN\nMUL\n\
                READ theta\nCOS\nREAD theta\nCOS\nMUL\nADD\nWRITE one\n";
    let mut symbols = typed(text, &[Float64], &[Float64]);
    let program = build(text, &mut symbols).unwrap();
    assert_eq!(program.stack_size, 6);
    assert_eq!(program.memory.len(), 4);
}

#[test]
fn mixed_integer_widths() {
    let text = "READ a\nREAD b\nADD\nWRITE c\n";
    let mut symbols = typed(text, &[UInt8, Int16], &[Int32]);
    let program = build(text, &mut symbols).unwrap();
    assert_eq!(
        listing(&program, &symbols),
        "READ a => (uint8)\n\
         CAST(uint8) => (int16)\n\
         READ b => (int16)\n\
         ADD(int16,int16) => (int16)\n\
         CAST(int16) => (int32)\n\
         WRITE c(int32)\n"
    );
}

#[test]
fn comparison_feeds_logic() {
    let text = "READ x\nCONST float64 0\nGT\nREAD x\nCONST float64 10\nLT\nAND\nWRITE inside\n";
    let mut symbols = typed(text, &[Float64], &[UInt8]);
    let program = build(text, &mut symbols).unwrap();
    let listed = listing(&program, &symbols);
    assert!(listed.contains("GT(float64,float64) => (uint8)\n"));
    assert!(listed.contains("AND(uint8,uint8) => (uint8)\n"));
    assert_eq!(symbols.constants.len(), 2);
    assert_eq!(symbols.constants[1].name, "Constant@2");
}

// ---- Memory layout ----

#[test]
fn external_addresses_follow_internal_block() {
    let text = "READ a\nREAD b\nADD\nWRITE c\nREAD a\nWRITE d\n";
    let mut symbols = typed(text, &[Float64, Float64], &[Float64, Float64]);
    let a = ExternalSlot::new();
    let d = ExternalSlot::new();
    symbols.inputs[0].external = Some(a.clone());
    symbols.outputs[1].external = Some(d.clone());

    let program = build(text, &mut symbols).unwrap();
    // b and c are internal, two cells each.
    assert_eq!(program.memory.len(), 4);
    assert_eq!(symbols.input("b").unwrap().location, Some(0));
    assert_eq!(symbols.output("c").unwrap().location, Some(2));
    assert_eq!(symbols.input("a").unwrap().location, Some(4));
    assert_eq!(symbols.output("d").unwrap().location, Some(5));
    assert!(program.externals[0].ptr_eq(&a));
    assert!(program.externals[1].ptr_eq(&d));
}

#[test]
fn recompile_is_idempotent() {
    let text = "READ A\nCONST float32 0.5\nMUL\nWRITE y\n";
    let mut symbols = typed(text, &[Float32], &[Float32]);
    let first = build(text, &mut symbols).unwrap();
    let second = build(text, &mut symbols).unwrap();
    assert_eq!(first.code, second.code);
    assert_eq!(first.memory, second.memory);
    assert_eq!(first.stack_size, second.stack_size);
}

// ---- Round-trips ----

#[test]
fn decompiled_text_recompiles_identically() {
    let text = "READ a\nREAD b\nCONST int8 -3\nMUL\nSUB\nCAST float32\nSQRT\nWRITE r\n";
    let mut symbols = typed(text, &[Int32, Int64], &[Float64]);
    let program = build(text, &mut symbols).unwrap();

    let plain = decompile(&program, &symbols, &registry(), false).unwrap();
    let mut again = typed(&plain, &[Int32, Int64], &[Float64]);
    let recompiled = build(&plain, &mut again).unwrap();
    assert_eq!(recompiled.code, program.code);
    assert_eq!(recompiled.memory, program.memory);
}

// ---- Error categories ----

#[test]
fn errors_map_to_kinds() {
    let cases: &[(&str, &[TypeDescriptor], &[TypeDescriptor], ErrorKind)] = &[
        ("READ a\nWRITE b\nREAD\n", &[], &[], ErrorKind::Syntax),
        ("READ a\nREAD a\n", &[Int8], &[], ErrorKind::Syntax),
        ("READ a\nWRITE b\n", &[Void], &[Int8], ErrorKind::Parameters),
        ("READ a\nNOT\nWRITE b\n", &[Float32], &[UInt8], ErrorKind::UnsupportedFeature),
        ("READ a\nADD\nWRITE b\n", &[Int8], &[Int8], ErrorKind::UnsupportedFeature),
    ];
    for (text, inputs, outputs, kind) in cases {
        let err = extract_variables(text, &registry()).and_then(|mut symbols| {
            for (v, &t) in symbols.inputs.iter_mut().zip(inputs.iter()) {
                v.ty = t;
            }
            for (v, &t) in symbols.outputs.iter_mut().zip(outputs.iter()) {
                v.ty = t;
            }
            build(text, &mut symbols)
        });
        assert_eq!(err.unwrap_err().kind(), *kind, "program {text:?}");
    }
}

#[test]
fn error_carries_line_number() {
    let text = "READ a\n\n; comment\nFROB\n";
    let err = extract_variables(text, &registry()).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownCommand {
            line: 4,
            token: "FROB".to_string()
        }
    );
}

#[test]
fn mixed_signs_meet_in_float() {
    let text = "READ a\nREAD b\nADD\nWRITE c\n";
    let mut symbols = typed(text, &[Int32, UInt64], &[Float64]);
    let program = build(text, &mut symbols).unwrap();
    assert!(listing(&program, &symbols).contains("ADD(float32,float32) => (float32)\n"));

    // A float result never narrows back to an integer output.
    let mut symbols = typed(text, &[Int32, UInt64], &[Int64]);
    let err = build(text, &mut symbols).unwrap_err();
    assert_eq!(
        err,
        CompileError::NoMatchingOverload {
            line: 4,
            name: "WRITE".to_string(),
            operands: "(float32)".to_string()
        }
    );
}

// ---- Properties ----

fn arb_type() -> impl Strategy<Value = TypeDescriptor> {
    prop::sample::select(&rteval_common::type_desc::ALL_NUMERIC_TYPES[..])
}

fn arb_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(&["ADD", "SUB", "MUL", "DIV"][..])
}

proptest! {
    /// Whenever a binary program compiles, the computed stack size equals
    /// the deepest point of the code and the decompiled text round-trips.
    #[test]
    fn binary_programs_roundtrip(
        a in arb_type(),
        b in arb_type(),
        out in arb_type(),
        op in arb_op(),
    ) {
        let text = format!("READ a\nREAD b\n{op}\nWRITE c\n");
        let mut symbols = typed(&text, &[a, b], &[out]);
        if let Ok(program) = build(&text, &mut symbols) {
            let depth = max_stack_depth(&program.code, &registry()).unwrap();
            prop_assert_eq!(program.stack_size, depth);

            let plain = decompile(&program, &symbols, &registry(), false).unwrap();
            let mut again = typed(&plain, &[a, b], &[out]);
            let recompiled = build(&plain, &mut again).unwrap();
            prop_assert_eq!(recompiled.code, program.code);
        }
    }
}
