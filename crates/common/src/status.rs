//! Aggregate status returned by one execution.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::{ErrorKind, Fault};

/// Every flag raised during one execution, OR-ed together.
///
/// A clean run has no flag set. Flags never clear within a run, so a
/// caller can tell a run that completed with issues from a clean one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RuntimeStatus {
    pub stack_overflow: bool,
    pub stack_underflow: bool,
    pub invalid_code_pointer: bool,
    pub overflow: bool,
    pub division_by_zero: bool,
    pub out_of_range: bool,
    /// Execution stopped before the end of the program.
    pub not_completed: bool,
    /// Bad execute arguments, such as debug mode without a sink.
    pub parameters_error: bool,
    /// The stack pointer was not back at the origin after the last instruction.
    pub stack_not_empty: bool,
    /// Execute was called without a successful compile.
    pub not_compiled: bool,
}

impl RuntimeStatus {
    /// Status with no flag raised.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Returns true when no flag is raised.
    pub fn is_ok(&self) -> bool {
        *self == Self::default()
    }

    /// Raises the flag matching `fault`.
    pub fn raise(&mut self, fault: Fault) {
        match fault {
            Fault::StackOverflow => self.stack_overflow = true,
            Fault::StackUnderflow => self.stack_underflow = true,
            Fault::InvalidCodePointer => self.invalid_code_pointer = true,
            Fault::Overflow => self.overflow = true,
            Fault::DivisionByZero => self.division_by_zero = true,
            Fault::OutOfRange => self.out_of_range = true,
        }
    }

    /// Returns true if any stack or code pointer check failed.
    pub fn has_bounds_violation(&self) -> bool {
        self.stack_overflow || self.stack_underflow || self.invalid_code_pointer
    }

    /// Most severe kind among the raised flags, or `None` when clean.
    pub fn kind(&self) -> Option<ErrorKind> {
        if self.not_compiled || self.parameters_error {
            Some(ErrorKind::Parameters)
        } else if self.has_bounds_violation() || self.not_completed || self.stack_not_empty {
            Some(ErrorKind::Fatal)
        } else if self.overflow || self.division_by_zero || self.out_of_range {
            Some(ErrorKind::Warning)
        } else {
            None
        }
    }

    fn flags(&self) -> [(&'static str, bool); 10] {
        [
            ("stack_overflow", self.stack_overflow),
            ("stack_underflow", self.stack_underflow),
            ("invalid_code_pointer", self.invalid_code_pointer),
            ("overflow", self.overflow),
            ("division_by_zero", self.division_by_zero),
            ("out_of_range", self.out_of_range),
            ("not_completed", self.not_completed),
            ("parameters_error", self.parameters_error),
            ("stack_not_empty", self.stack_not_empty),
            ("not_compiled", self.not_compiled),
        ]
    }
}

impl From<Fault> for RuntimeStatus {
    fn from(fault: Fault) -> Self {
        let mut status = RuntimeStatus::ok();
        status.raise(fault);
        status
    }
}

impl BitOr for RuntimeStatus {
    type Output = RuntimeStatus;

    fn bitor(mut self, rhs: RuntimeStatus) -> RuntimeStatus {
        self |= rhs;
        self
    }
}

impl BitOrAssign for RuntimeStatus {
    fn bitor_assign(&mut self, rhs: RuntimeStatus) {
        self.stack_overflow |= rhs.stack_overflow;
        self.stack_underflow |= rhs.stack_underflow;
        self.invalid_code_pointer |= rhs.invalid_code_pointer;
        self.overflow |= rhs.overflow;
        self.division_by_zero |= rhs.division_by_zero;
        self.out_of_range |= rhs.out_of_range;
        self.not_completed |= rhs.not_completed;
        self.parameters_error |= rhs.parameters_error;
        self.stack_not_empty |= rhs.stack_not_empty;
        self.not_compiled |= rhs.not_compiled;
    }
}

impl BitOrAssign<Fault> for RuntimeStatus {
    fn bitor_assign(&mut self, rhs: Fault) {
        self.raise(rhs);
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raised: Vec<&str> = self
            .flags()
            .iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| *name)
            .collect();
        if raised.is_empty() {
            f.write_str("ok")
        } else {
            f.write_str(&raised.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ok() {
        assert!(RuntimeStatus::ok().is_ok());
        assert_eq!(RuntimeStatus::ok().kind(), None);
        assert_eq!(RuntimeStatus::ok().to_string(), "ok");
    }

    #[test]
    fn or_accumulates() {
        let mut s = RuntimeStatus::from(Fault::Overflow);
        s |= Fault::StackUnderflow;
        s |= RuntimeStatus::from(Fault::OutOfRange);
        assert!(s.overflow && s.stack_underflow && s.out_of_range);
        assert!(!s.division_by_zero);
        assert_eq!(s.to_string(), "stack_underflow|overflow|out_of_range");
    }

    #[test]
    fn severity() {
        assert_eq!(
            RuntimeStatus::from(Fault::DivisionByZero).kind(),
            Some(ErrorKind::Warning)
        );
        assert_eq!(
            RuntimeStatus::from(Fault::StackOverflow).kind(),
            Some(ErrorKind::Fatal)
        );
        let s = RuntimeStatus {
            not_compiled: true,
            ..RuntimeStatus::ok()
        };
        assert_eq!(s.kind(), Some(ErrorKind::Parameters));
    }

    #[test]
    fn bitor_is_commutative() {
        let a = RuntimeStatus::from(Fault::Overflow);
        let b = RuntimeStatus::from(Fault::InvalidCodePointer);
        assert_eq!(a | b, b | a);
        assert!((a | b).has_bounds_violation());
    }
}
