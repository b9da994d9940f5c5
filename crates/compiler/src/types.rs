//! Symbolic type stack and overload resolution.
//!
//! The compiler tracks the type of every value the program would leave on
//! the runtime stack. Each entry also remembers where its producing
//! instruction ends, so a promotion can be inserted right after it.

use rteval_common::{CodeMemoryElement, TypeDescriptor};
use rteval_registry::{FunctionRegistry, CAST};

use crate::error::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry {
    pub ty: TypeDescriptor,
    /// Index of the instruction following the producer.
    pub end: usize,
    /// Set on every output of a multi-output producer except the top one.
    /// A cast placed after the producer would see the wrong value, so these
    /// entries are never promoted.
    pub buried: bool,
}

/// The compile-time stack of operand types.
#[derive(Debug)]
pub(crate) struct TypeStack {
    entries: Vec<Entry>,
    limit: usize,
}

/// A promotion to apply to one operand before a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Promotion {
    /// Position of the operand in the type stack.
    pub index: usize,
    pub cast: CodeMemoryElement,
    pub to: TypeDescriptor,
}

/// The overload chosen for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection {
    pub code: CodeMemoryElement,
    pub promotions: Vec<Promotion>,
}

impl TypeStack {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<TypeDescriptor> {
        self.entries.last().map(|e| e.ty)
    }

    /// The top `n` entries, bottom first.
    pub fn window(&self, n: usize) -> &[Entry] {
        &self.entries[self.entries.len().saturating_sub(n)..]
    }

    pub fn push(
        &mut self,
        ty: TypeDescriptor,
        end: usize,
        line: usize,
    ) -> Result<(), CompileError> {
        self.push_entry(Entry { ty, end, buried: false }, line)
    }

    /// Pushes the outputs of one producer, bottom first.
    pub fn push_outputs(
        &mut self,
        types: &[TypeDescriptor],
        end: usize,
        line: usize,
    ) -> Result<(), CompileError> {
        let last = types.len().saturating_sub(1);
        for (i, &ty) in types.iter().enumerate() {
            let buried = i < last;
            self.push_entry(Entry { ty, end, buried }, line)?;
        }
        Ok(())
    }

    fn push_entry(&mut self, entry: Entry, line: usize) -> Result<(), CompileError> {
        if self.entries.len() >= self.limit {
            return Err(CompileError::TypeStackOverflow {
                line,
                limit: self.limit,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn pop_n(&mut self, n: usize) {
        let keep = self.entries.len().saturating_sub(n);
        self.entries.truncate(keep);
    }

    /// Retypes entry `index` as `to` and returns where its cast goes.
    ///
    /// Every entry produced after that position moves down by one
    /// instruction to make room.
    pub fn promote(&mut self, index: usize, to: TypeDescriptor) -> usize {
        let at = self.entries[index].end;
        for entry in &mut self.entries {
            if entry.end > at {
                entry.end += 1;
            }
        }
        self.entries[index] = Entry {
            ty: to,
            end: at + 1,
            buried: false,
        };
        at
    }

    /// Returns true if a cast placed after entry `index`'s producer would
    /// see that entry on top of the stack.
    fn castable(&self, index: usize) -> bool {
        !self.entries[index].buried
    }
}

/// Formats operand types as `(float64,int64)`.
pub(crate) fn describe(types: impl IntoIterator<Item = TypeDescriptor>) -> String {
    let names: Vec<&str> = types.into_iter().map(|t| t.name()).collect();
    format!("({})", names.join(","))
}

/// Picks the overload of `name` for the current top of the type stack.
///
/// An exact match wins. Otherwise the overload with the lowest total
/// promotion cost is chosen, ties going to the earliest registered. Records
/// taking an address operand are never candidates.
pub(crate) fn select_overload(
    registry: &FunctionRegistry,
    name: &str,
    stack: &TypeStack,
    line: usize,
) -> Result<Selection, CompileError> {
    let mut any_candidate = false;
    let mut fewest_missing: Option<usize> = None;
    let mut widest_fitting: Option<usize> = None;
    let mut best: Option<(u32, Selection)> = None;

    for (code, record) in registry.candidates(name).filter(|(_, r)| !r.has_operand) {
        any_candidate = true;
        let needed = record.input_types.len();
        if needed > stack.len() {
            fewest_missing = Some(fewest_missing.map_or(needed, |n| n.min(needed)));
            continue;
        }
        widest_fitting = Some(widest_fitting.map_or(needed, |n| n.max(needed)));
        let base = stack.len() - needed;
        let Some((cost, promotions)) = promotion_plan(registry, stack, base, &record.input_types)
        else {
            continue;
        };
        if best.as_ref().map_or(true, |(best_cost, _)| cost < *best_cost) {
            best = Some((cost, Selection { code, promotions }));
            if cost == 0 {
                break;
            }
        }
    }

    if !any_candidate {
        return Err(CompileError::UnknownFunction {
            line,
            name: name.to_string(),
        });
    }
    match (best, widest_fitting) {
        (Some((_, selection)), _) => Ok(selection),
        (None, None) => Err(CompileError::MissingOperands {
            line,
            name: name.to_string(),
            needed: fewest_missing.unwrap_or_default(),
            available: stack.len(),
        }),
        (None, Some(arity)) => Err(CompileError::NoMatchingOverload {
            line,
            name: name.to_string(),
            operands: describe(stack.window(arity).iter().map(|e| e.ty)),
        }),
    }
}

/// Promotions needed to feed `inputs` from the entries starting at `base`.
fn promotion_plan(
    registry: &FunctionRegistry,
    stack: &TypeStack,
    base: usize,
    inputs: &[TypeDescriptor],
) -> Option<(u32, Vec<Promotion>)> {
    let mut total = 0;
    let mut promotions = Vec::new();
    for (offset, &wanted) in inputs.iter().enumerate() {
        let index = base + offset;
        let have = stack.entries[index].ty;
        let cost = have.promotion_cost(wanted)?;
        if cost > 0 {
            if !stack.castable(index) {
                return None;
            }
            let cast = registry.find(CAST, &[have], &[wanted])?;
            promotions.push(Promotion {
                index,
                cast,
                to: wanted,
            });
        }
        total += cost;
    }
    Some((total, promotions))
}

/// The cast that turns the top entry into `to`, if `to` is an implicit
/// promotion of it.
pub(crate) fn promote_top(
    registry: &FunctionRegistry,
    stack: &TypeStack,
    to: TypeDescriptor,
) -> Option<Option<Promotion>> {
    let index = stack.len().checked_sub(1)?;
    let have = stack.entries[index].ty;
    match have.promotion_cost(to)? {
        0 => Some(None),
        _ if !stack.castable(index) => None,
        _ => registry
            .find(CAST, &[have], &[to])
            .map(|cast| Some(Promotion { index, cast, to })),
    }
}
