//! Error types for variable extraction, compilation and decompilation.

use rteval_common::{ErrorKind, LiteralError};
use thiserror::Error;

/// Errors produced while turning RPN text into pseudo-code or back.
///
/// Line numbers are 1-based positions in the RPN text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The first token of a line is neither a keyword nor a known mnemonic.
    #[error("line {line}: unknown command '{token}'")]
    UnknownCommand { line: usize, token: String },

    /// A command did not have enough arguments.
    #[error("line {line}: {command} expects {expected} argument(s)")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: usize,
    },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A type name is not one of the ten numeric types.
    #[error("line {line}: unknown type '{token}'")]
    UnknownType { line: usize, token: String },

    /// A CONST literal does not parse as its declared type.
    #[error("line {line}: {source}")]
    InvalidLiteral { line: usize, source: LiteralError },

    /// A declared variable still has the `Void` type.
    #[error("{role} variable '{name}' has no type")]
    UnsetType { role: &'static str, name: String },

    /// READ or WRITE names a variable missing from the symbol table.
    #[error("line {line}: unknown variable '{name}'")]
    UnknownVariable { line: usize, name: String },

    /// A mnemonic has no overload in the registry.
    #[error("line {line}: unknown function '{name}'")]
    UnknownFunction { line: usize, name: String },

    /// Overloads exist but none accepts the operands, even after promotion.
    #[error("line {line}: no overload of {name} accepts {operands}")]
    NoMatchingOverload {
        line: usize,
        name: String,
        operands: String,
    },

    /// Fewer operands on the type stack than the function consumes.
    #[error("line {line}: {name} needs {needed} operand(s), {available} available")]
    MissingOperands {
        line: usize,
        name: String,
        needed: usize,
        available: usize,
    },

    /// Values were left on the type stack after the last line.
    #[error("{count} value(s) left on the stack at end of program")]
    LeftoverValues { count: usize },

    /// The type stack grew past the configured depth.
    #[error("line {line}: type stack deeper than {limit}")]
    TypeStackOverflow { line: usize, limit: usize },

    /// A CONST literal failed to parse while filling variables memory.
    #[error("line {line}: cannot place constant: {source}")]
    ConstantPlacement { line: usize, source: LiteralError },

    /// The constant table does not match the CONST lines of the program.
    #[error("line {line}: constant does not match the extracted variables")]
    ConstantMismatch { line: usize },

    /// Variables need more cells than an address can reach.
    #[error("variables need {cells} cells, more than the address space")]
    MemoryOverflow { cells: usize },

    /// The pseudo-code grew past the configured size.
    #[error("program needs {cells} code cells, limit is {limit}")]
    CodeOverflow { cells: usize, limit: usize },

    /// Pseudo-code refers to an opcode, operand or address that does not exist.
    #[error("malformed pseudo-code at cell {at}")]
    MalformedCode { at: usize },
}

impl CompileError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::UnknownCommand { .. }
            | CompileError::MissingArgument { .. }
            | CompileError::UnexpectedToken { .. }
            | CompileError::UnknownType { .. }
            | CompileError::InvalidLiteral { .. }
            | CompileError::LeftoverValues { .. } => ErrorKind::Syntax,
            CompileError::UnsetType { .. } | CompileError::UnknownVariable { .. } => {
                ErrorKind::Parameters
            }
            CompileError::UnknownFunction { .. }
            | CompileError::NoMatchingOverload { .. }
            | CompileError::MissingOperands { .. } => ErrorKind::UnsupportedFeature,
            CompileError::TypeStackOverflow { .. }
            | CompileError::ConstantPlacement { .. }
            | CompileError::ConstantMismatch { .. }
            | CompileError::MemoryOverflow { .. }
            | CompileError::CodeOverflow { .. }
            | CompileError::MalformedCode { .. } => ErrorKind::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rteval_common::TypeDescriptor;

    #[test]
    fn error_display_unknown_command() {
        let e = CompileError::UnknownCommand {
            line: 3,
            token: "FOO".to_string(),
        };
        assert_eq!(e.to_string(), "line 3: unknown command 'FOO'");
    }

    #[test]
    fn error_display_missing_argument() {
        let e = CompileError::MissingArgument {
            line: 7,
            command: "CONST",
            expected: 2,
        };
        assert_eq!(e.to_string(), "line 7: CONST expects 2 argument(s)");
    }

    #[test]
    fn error_display_invalid_literal() {
        let e = CompileError::InvalidLiteral {
            line: 2,
            source: LiteralError {
                ty: TypeDescriptor::Int8,
                literal: "999".to_string(),
            },
        };
        assert_eq!(e.to_string(), "line 2: invalid int8 literal '999'");
    }

    #[test]
    fn error_display_unset_type() {
        let e = CompileError::UnsetType {
            role: "input",
            name: "A".to_string(),
        };
        assert_eq!(e.to_string(), "input variable 'A' has no type");
    }

    #[test]
    fn error_display_no_overload() {
        let e = CompileError::NoMatchingOverload {
            line: 4,
            name: "AND".to_string(),
            operands: "(float64,float64)".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "line 4: no overload of AND accepts (float64,float64)"
        );
    }

    #[test]
    fn kinds() {
        assert_eq!(
            CompileError::LeftoverValues { count: 1 }.kind(),
            ErrorKind::Syntax
        );
        assert_eq!(
            CompileError::UnknownVariable {
                line: 1,
                name: "x".to_string()
            }
            .kind(),
            ErrorKind::Parameters
        );
        assert_eq!(
            CompileError::UnknownFunction {
                line: 1,
                name: "FOO".to_string()
            }
            .kind(),
            ErrorKind::UnsupportedFeature
        );
        assert_eq!(CompileError::MalformedCode { at: 0 }.kind(), ErrorKind::Fatal);
    }
}
