//! rteval compiler: RPN text to pseudo-code and back.
//!
//! Compiling is a two-step affair. [`extract_variables`] scans the text and
//! lists its inputs, outputs and constants. The caller then gives every input
//! and output a type (and optionally an external slot) before [`compile`]
//! checks the program, lays out variables memory and resolves each mnemonic
//! to a registry opcode, inserting implicit promotions where needed.
//!
//! # Usage
//!
//! ```
//! use rteval_common::{EvaluatorConfig, TypeDescriptor};
//! use rteval_compiler::{compile, decompile, extract_variables};
//! use rteval_registry::FunctionRegistry;
//!
//! let registry = FunctionRegistry::with_builtins();
//! let text = "READ A\nCONST float64 2\nMUL\nWRITE y\n";
//! let mut symbols = extract_variables(text, &registry).unwrap();
//! symbols.inputs[0].ty = TypeDescriptor::Float32;
//! symbols.outputs[0].ty = TypeDescriptor::Float64;
//!
//! let program = compile(text, &mut symbols, &registry, &EvaluatorConfig::default()).unwrap();
//! assert_eq!(
//!     decompile(&program, &symbols, &registry, false).unwrap(),
//!     "READ A\nCAST float64\nCONST float64 2\nMUL\nWRITE y\n"
//! );
//! ```

pub mod compile;
pub mod decompile;
pub mod error;
pub mod parser;
pub mod stack;
pub mod symbols;

mod lexer;
mod types;

pub use compile::{compile, CompiledProgram};
pub use decompile::decompile;
pub use error::CompileError;
pub use stack::max_stack_depth;
pub use symbols::{constant_name, extract_variables, SymbolTable};
