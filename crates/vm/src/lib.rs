//! rteval virtual machine: executes compiled RPN programs.
//!
//! The machine is a cell stack driven by a flat array of opcodes. Each
//! opcode indexes a record in the [`FunctionRegistry`](rteval_registry::FunctionRegistry),
//! whose callback pops its inputs and pushes its outputs. `READ` and `WRITE`
//! are followed by one address cell.
//!
//! # Usage
//!
//! ```
//! use rteval_common::TypeDescriptor;
//! use rteval_vm::{ExecutionMode, RuntimeEvaluator, VariableKind};
//!
//! let text = "READ A\nCONST int64 2\nPOW\nWRITE ret\n";
//! let mut evaluator = RuntimeEvaluator::new();
//! evaluator.extract_variables(text).unwrap();
//! evaluator.set_variable_type(VariableKind::Input, "A", TypeDescriptor::Float64).unwrap();
//! evaluator.set_variable_type(VariableKind::Output, "ret", TypeDescriptor::Float64).unwrap();
//! evaluator.compile(text).unwrap();
//!
//! evaluator.write_input("A", 3.0f64).unwrap();
//! let status = evaluator.execute(ExecutionMode::Safe, None);
//! assert!(status.is_ok());
//! assert_eq!(evaluator.read_output::<f64>("ret").unwrap(), 9.0);
//! ```

pub mod error;
pub mod evaluator;
pub mod execute;

mod machine;

pub use error::EvaluatorError;
pub use evaluator::{RuntimeEvaluator, VariableKey, VariableKind};
pub use execute::{ExecutionMode, DEBUG_HEADER};
