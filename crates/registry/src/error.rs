//! Errors raised while building a registry.

use thiserror::Error;

/// Errors from [`FunctionRegistry::register`](crate::FunctionRegistry::register).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An overload with the same name and signature already exists.
    #[error("{name}{signature} is already registered")]
    DuplicateRecord { name: String, signature: String },

    /// No opcode is left for another record.
    #[error("registry is full ({capacity} records)")]
    Full { capacity: usize },
}
