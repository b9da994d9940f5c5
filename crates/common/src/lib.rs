//! rteval common types.
//!
//! This crate provides the data model shared by the registry, compiler and
//! virtual machine:
//!
//! - [`TypeDescriptor`]: the ten scalar types plus `Void`
//! - [`Scalar`]: native Rust types that encode to data memory cells
//! - [`Value`]: a typed scalar, with literal parsing and conversions
//! - [`VariableInformation`] and [`ExternalSlot`]: symbol table entries
//! - [`RuntimeStatus`] and [`Fault`]: execution flags
//! - [`ErrorKind`]: the error taxonomy every crate maps into
//! - [`EvaluatorConfig`]: limits and initial sizes

pub mod config;
pub mod error;
pub mod memory;
pub mod scalar;
pub mod status;
pub mod type_desc;
pub mod value;
pub mod variable;

// Re-export commonly used types at the crate root.
pub use config::EvaluatorConfig;
pub use error::{ErrorKind, Fault, LiteralError};
pub use memory::{CodeMemoryElement, DataMemoryAddress, DataMemoryElement};
pub use scalar::Scalar;
pub use status::RuntimeStatus;
pub use type_desc::TypeDescriptor;
pub use value::Value;
pub use variable::{ExternalSlot, VariableInformation};
