//! The function registry and the process-wide default catalog.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rteval_common::{CodeMemoryElement, TypeDescriptor};
use tracing::debug;

use crate::builtins;
use crate::error::RegistryError;
use crate::record::FunctionRecord;

static DEFAULT_REGISTRY: Lazy<Arc<FunctionRegistry>> = Lazy::new(|| {
    let registry = FunctionRegistry::with_builtins();
    debug!(
        target: "rteval::registry",
        records = registry.len(),
        "built default function registry"
    );
    Arc::new(registry)
});

/// An ordered catalog of function records.
///
/// The position of a record is its opcode in pseudo-code. Records sharing a
/// mnemonic are overloads and are tried in registration order. A registry
/// is built up front and then shared immutably behind an [`Arc`].
#[derive(Debug, Default, Clone)]
pub struct FunctionRegistry {
    records: Vec<FunctionRecord>,
    by_name: HashMap<String, Vec<CodeMemoryElement>>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// The shared built-in registry, built on first use.
    pub fn shared() -> Arc<FunctionRegistry> {
        Arc::clone(&DEFAULT_REGISTRY)
    }

    /// Adds a record and returns its opcode.
    ///
    /// # Errors
    ///
    /// Fails if a record with the same name and signature exists, or if
    /// the opcode space is exhausted.
    pub fn register(&mut self, record: FunctionRecord) -> Result<CodeMemoryElement, RegistryError> {
        let duplicate = self
            .candidates(&record.name)
            .any(|(_, r)| r.matches(&record.input_types, &record.output_types));
        if duplicate {
            let signature = record.inputs_to_string();
            return Err(RegistryError::DuplicateRecord {
                name: record.name,
                signature,
            });
        }
        if self.records.len() > usize::from(CodeMemoryElement::MAX) {
            return Err(RegistryError::Full {
                capacity: usize::from(CodeMemoryElement::MAX) + 1,
            });
        }
        Ok(self.insert(record))
    }

    /// Adds a record known to be unique.
    pub(crate) fn insert(&mut self, record: FunctionRecord) -> CodeMemoryElement {
        let code = self.records.len() as CodeMemoryElement;
        self.by_name.entry(record.name.clone()).or_default().push(code);
        self.records.push(record);
        code
    }

    /// The record for an opcode.
    pub fn get(&self, code: CodeMemoryElement) -> Option<&FunctionRecord> {
        self.records.get(usize::from(code))
    }

    /// Every overload of `name`, in registration order.
    pub fn candidates<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = (CodeMemoryElement, &'a FunctionRecord)> + 'a {
        let codes = self
            .by_name
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        codes
            .iter()
            .filter_map(move |&code| self.get(code).map(|record| (code, record)))
    }

    /// The opcode of the overload with exactly this signature.
    pub fn find(
        &self,
        name: &str,
        inputs: &[TypeDescriptor],
        outputs: &[TypeDescriptor],
    ) -> Option<CodeMemoryElement> {
        self.candidates(name)
            .find(|(_, record)| record.matches(inputs, outputs))
            .map(|(code, _)| code)
    }

    /// Returns true if any overload of `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records with their opcodes.
    pub fn iter(&self) -> impl Iterator<Item = (CodeMemoryElement, &FunctionRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (i as CodeMemoryElement, record))
    }
}
