//! Symbol table entries and caller-owned memory slots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::memory::DataMemoryAddress;
use crate::scalar::Scalar;
use crate::type_desc::TypeDescriptor;
use crate::value::Value;

/// Caller-owned storage for one external variable.
///
/// The caller keeps a clone and reads or writes it between executions. The
/// evaluator holds another clone and never frees it. Accesses use relaxed
/// atomics and no further synchronisation.
#[derive(Debug, Clone, Default)]
pub struct ExternalSlot(Arc<AtomicU64>);

impl ExternalSlot {
    /// A zero-initialised slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot already holding `value`.
    pub fn with_value<T: Scalar>(value: T) -> Self {
        Self(Arc::new(AtomicU64::new(value.to_bits())))
    }

    pub fn get<T: Scalar>(&self) -> T {
        T::from_bits(self.bits())
    }

    pub fn set<T: Scalar>(&self, value: T) {
        self.set_bits(value.to_bits());
    }

    /// Raw bit pattern currently stored.
    pub fn bits(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set_bits(&self, bits: u64) {
        self.0.store(bits, Ordering::Relaxed);
    }

    /// Returns true if both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &ExternalSlot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ExternalSlot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// One named input, output or constant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInformation {
    /// Identifier from the RPN text, or `Constant@<addr>` for constants.
    pub name: String,
    /// `Void` until the caller sets it. Constants get theirs from the text.
    pub ty: TypeDescriptor,
    /// Address in variables memory, assigned by compile.
    pub location: Option<DataMemoryAddress>,
    /// Caller memory backing this variable, if any.
    pub external: Option<ExternalSlot>,
    /// Literal value, for constants only.
    pub constant: Option<Value>,
}

impl VariableInformation {
    /// A variable with no type yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeDescriptor::Void,
            location: None,
            external: None,
            constant: None,
        }
    }

    /// A constant holding `value`.
    pub fn constant(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            ty: value.type_descriptor(),
            location: None,
            external: None,
            constant: Some(value),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }

    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_roundtrip() {
        let slot = ExternalSlot::new();
        assert_eq!(slot.get::<f64>(), 0.0);
        slot.set(-3i16);
        assert_eq!(slot.get::<i16>(), -3);
        assert_eq!(slot.bits(), 0xFFFD);
    }

    #[test]
    fn slot_clones_share_storage() {
        let a = ExternalSlot::with_value(1.5f32);
        let b = a.clone();
        b.set(2.5f32);
        assert_eq!(a.get::<f32>(), 2.5);
        assert!(a.ptr_eq(&b));
        assert_ne!(a, ExternalSlot::with_value(2.5f32));
    }

    #[test]
    fn new_variable_is_void() {
        let v = VariableInformation::new("A");
        assert_eq!(v.ty, TypeDescriptor::Void);
        assert!(!v.is_constant());
        assert!(!v.is_external());
    }

    #[test]
    fn constant_takes_type_from_value() {
        let c = VariableInformation::constant("Constant@0", Value::Int64(2));
        assert_eq!(c.ty, TypeDescriptor::Int64);
        assert!(c.is_constant());
    }
}
