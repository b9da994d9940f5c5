//! rteval function registry.
//!
//! A [`FunctionRegistry`] is an ordered catalog of [`FunctionRecord`]s. Each
//! record is one typed overload of an RPN mnemonic together with the
//! callback that performs it against a [`Context`]. The compiler resolves
//! mnemonics to opcodes through the registry and the virtual machine
//! dispatches opcodes back to callbacks.
//!
//! # Usage
//!
//! ```
//! use rteval_common::TypeDescriptor;
//! use rteval_registry::FunctionRegistry;
//!
//! let registry = FunctionRegistry::shared();
//! let f64s = [TypeDescriptor::Float64, TypeDescriptor::Float64];
//! let add = registry.find("ADD", &f64s, &[TypeDescriptor::Float64]).unwrap();
//! assert_eq!(registry.get(add).unwrap().to_string(), "ADD(float64,float64) => (float64)");
//! ```
//!
//! # Built-in catalog
//!
//! - `READ`, `WRITE` for every type (take one address operand)
//! - `DUP` for every type
//! - `CAST` between every pair of types
//! - `ADD`, `SUB`, `MUL`, `DIV` for every type, `NEG` for signed types
//! - `SIN`, `COS`, `TAN`, `EXP`, `LOG`, `LOG10`, `SQRT`, `POW` for floats
//! - `GT`, `LT`, `GTE`, `LTE`, `EQ`, `NEQ`, `NE` for every type, yielding `uint8`
//! - `AND`, `OR`, `XOR`, `NOT` on `uint8`

pub mod context;
pub mod error;
pub mod record;
pub mod registry;

mod builtins;

pub use context::Context;
pub use error::RegistryError;
pub use record::{ExecuteFn, FunctionRecord};
pub use registry::FunctionRegistry;

/// Mnemonic that pushes a variable.
pub const READ: &str = "READ";
/// Mnemonic that pops into a variable.
pub const WRITE: &str = "WRITE";
/// Mnemonic that duplicates the top of the stack.
pub const DUP: &str = "DUP";
/// Mnemonic that converts the top of the stack.
pub const CAST: &str = "CAST";
/// RPN command for an inline constant. Compiles to a `READ`.
pub const CONST: &str = "CONST";
