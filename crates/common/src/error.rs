//! Error taxonomy shared by every rteval crate.

use std::fmt;

use thiserror::Error;

use crate::type_desc::TypeDescriptor;

/// Broad category of a failure, independent of which crate raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed RPN text.
    Syntax,
    /// Bad caller input: unset type, unknown variable, out-of-range index.
    Parameters,
    /// Unknown opcode or no viable overload.
    UnsupportedFeature,
    /// Literal parse failure during compile or a broken internal invariant.
    Fatal,
    /// Non-fatal situational note, such as a saturated conversion.
    Warning,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Parameters => "parameters error",
            ErrorKind::UnsupportedFeature => "unsupported feature",
            ErrorKind::Fatal => "fatal error",
            ErrorKind::Warning => "warning",
        };
        f.write_str(name)
    }
}

/// A fault raised while executing one instruction.
///
/// Function callbacks return these after leaving the stack in the shape
/// their record declares, so execution can carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Fault {
    /// A push would run past the end of the stack.
    #[error("stack overflow")]
    StackOverflow,

    /// A pop found fewer cells than requested.
    #[error("stack underflow")]
    StackUnderflow,

    /// An opcode or operand fetch fell outside the program or registry.
    #[error("invalid code pointer")]
    InvalidCodePointer,

    /// Signed integer overflow that wrapped (`MIN / -1`, `-MIN`).
    #[error("arithmetic overflow")]
    Overflow,

    /// Integer division by zero. The result is zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A conversion saturated or wrapped.
    #[error("value out of range for target type")]
    OutOfRange,
}

impl Fault {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Fault::StackOverflow | Fault::StackUnderflow | Fault::InvalidCodePointer => {
                ErrorKind::Fatal
            }
            Fault::Overflow | Fault::DivisionByZero | Fault::OutOfRange => ErrorKind::Warning,
        }
    }
}

/// A literal that does not parse as its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {ty} literal '{literal}'")]
pub struct LiteralError {
    pub ty: TypeDescriptor,
    pub literal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_fault() {
        assert_eq!(Fault::DivisionByZero.to_string(), "division by zero");
        assert_eq!(Fault::StackUnderflow.to_string(), "stack underflow");
    }

    #[test]
    fn fault_kinds() {
        assert_eq!(Fault::StackOverflow.kind(), ErrorKind::Fatal);
        assert_eq!(Fault::InvalidCodePointer.kind(), ErrorKind::Fatal);
        assert_eq!(Fault::OutOfRange.kind(), ErrorKind::Warning);
    }

    #[test]
    fn display_error_kind() {
        assert_eq!(ErrorKind::UnsupportedFeature.to_string(), "unsupported feature");
        assert_eq!(ErrorKind::Parameters.to_string(), "parameters error");
    }

    #[test]
    fn display_literal_error() {
        let e = LiteralError {
            ty: TypeDescriptor::Float32,
            literal: "x".to_string(),
        };
        assert_eq!(e.to_string(), "invalid float32 literal 'x'");
    }
}
