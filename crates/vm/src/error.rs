//! Errors returned by the evaluator's setup and accessor methods.
//!
//! Execution itself never fails with an error: it reports through
//! [`RuntimeStatus`](rteval_common::RuntimeStatus) flags instead.

use rteval_common::{ErrorKind, TypeDescriptor};
use rteval_compiler::CompileError;
use thiserror::Error;

use crate::evaluator::VariableKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluatorError {
    /// Extraction, compilation or decompilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// No input or output matches the index or name.
    #[error("no {kind} variable '{key}'")]
    VariableNotFound { kind: VariableKind, key: String },

    /// A value of one type was offered to a variable of another.
    #[error("variable '{name}' is {expected}, not {found}")]
    TypeMismatch {
        name: String,
        expected: TypeDescriptor,
        found: TypeDescriptor,
    },

    /// Variables can only be given one of the ten numeric types.
    #[error("variable '{name}' cannot be given type {ty}")]
    InvalidType { name: String, ty: TypeDescriptor },

    /// The operation needs a successfully compiled program.
    #[error("program is not compiled")]
    NotCompiled,
}

impl EvaluatorError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvaluatorError::Compile(e) => e.kind(),
            EvaluatorError::VariableNotFound { .. }
            | EvaluatorError::TypeMismatch { .. }
            | EvaluatorError::InvalidType { .. }
            | EvaluatorError::NotCompiled => ErrorKind::Parameters,
        }
    }
}
