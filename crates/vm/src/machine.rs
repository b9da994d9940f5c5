//! Machine state for one execution: code, memory, stack and pointers.

use rteval_common::memory::{bits_to_cells, cells_to_bits, mask_to_cells};
use rteval_common::{
    CodeMemoryElement, DataMemoryAddress, DataMemoryElement, ExternalSlot, Fault, RuntimeStatus,
    TypeDescriptor, Value,
};
use rteval_registry::Context;

/// A running program.
///
/// Borrows everything from the evaluator for the length of one execution.
/// Out-of-bounds accesses never touch memory: they read zeros or write
/// nothing, and in checked mode they also raise a fault.
pub(crate) struct Machine<'a> {
    code: &'a [CodeMemoryElement],
    memory: &'a mut [DataMemoryElement],
    externals: &'a [ExternalSlot],
    stack: &'a mut [DataMemoryElement],
    /// Stack pointer, in cells.
    pub(crate) sp: usize,
    /// Code pointer, in cells.
    pub(crate) pc: usize,
    pub(crate) checked: bool,
    pub(crate) status: RuntimeStatus,
}

impl<'a> Machine<'a> {
    pub(crate) fn new(
        code: &'a [CodeMemoryElement],
        memory: &'a mut [DataMemoryElement],
        externals: &'a [ExternalSlot],
        stack: &'a mut [DataMemoryElement],
        checked: bool,
    ) -> Self {
        Self {
            code,
            memory,
            externals,
            stack,
            sp: 0,
            pc: 0,
            checked,
            status: RuntimeStatus::ok(),
        }
    }

    pub(crate) fn code(&self) -> &'a [CodeMemoryElement] {
        self.code
    }

    fn fault(&mut self, fault: Fault) {
        if self.checked {
            self.status.raise(fault);
        }
    }

    /// Decodes the values on top of the stack, typed bottom first.
    ///
    /// Returns `None` when the stack holds fewer cells than `types` need.
    pub(crate) fn peek(&self, types: &[TypeDescriptor]) -> Option<Vec<Value>> {
        let total: usize = types.iter().map(|t| usize::from(t.cells())).sum();
        let mut at = self.sp.checked_sub(total)?;
        let mut values = Vec::with_capacity(types.len());
        for &ty in types {
            let cells = usize::from(ty.cells());
            let bits = cells_to_bits(self.stack.get(at..at + cells)?);
            values.push(Value::from_bits(ty, bits)?);
            at += cells;
        }
        Some(values)
    }

    fn external(&self, address: usize) -> Option<&ExternalSlot> {
        address
            .checked_sub(self.memory.len())
            .and_then(|k| self.externals.get(k))
    }
}

impl Context for Machine<'_> {
    fn pop_bits(&mut self, cells: u16) -> u64 {
        let n = usize::from(cells);
        match self.sp.checked_sub(n) {
            Some(sp) => {
                self.sp = sp;
                cells_to_bits(&self.stack[sp..sp + n])
            }
            None => {
                self.fault(Fault::StackUnderflow);
                self.sp = 0;
                0
            }
        }
    }

    fn push_bits(&mut self, cells: u16, bits: u64) {
        let n = usize::from(cells);
        if self.sp + n > self.stack.len() {
            self.fault(Fault::StackOverflow);
            return;
        }
        let split = bits_to_cells(bits, cells);
        self.stack[self.sp..self.sp + n].copy_from_slice(&split[..n]);
        self.sp += n;
    }

    fn operand(&mut self) -> DataMemoryAddress {
        match self.code.get(self.pc) {
            Some(&address) => {
                self.pc += 1;
                address
            }
            None => {
                self.fault(Fault::InvalidCodePointer);
                0
            }
        }
    }

    fn load_bits(&mut self, address: DataMemoryAddress, cells: u16) -> u64 {
        let start = usize::from(address);
        if let Some(slice) = self.memory.get(start..start + usize::from(cells)) {
            return cells_to_bits(slice);
        }
        match self.external(start) {
            Some(slot) => mask_to_cells(slot.bits(), cells),
            None => {
                self.fault(Fault::InvalidCodePointer);
                0
            }
        }
    }

    fn store_bits(&mut self, address: DataMemoryAddress, cells: u16, bits: u64) {
        let start = usize::from(address);
        let n = usize::from(cells);
        if let Some(slice) = self.memory.get_mut(start..start + n) {
            slice.copy_from_slice(&bits_to_cells(bits, cells)[..n]);
            return;
        }
        match self.external(start) {
            Some(slot) => slot.set_bits(mask_to_cells(bits, cells)),
            None => self.fault(Fault::InvalidCodePointer),
        }
    }
}
