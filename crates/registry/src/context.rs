//! The interface function callbacks use to reach the running machine.

use rteval_common::memory::DataMemoryAddress;
use rteval_common::Scalar;

/// Stack and memory access offered to a function callback.
///
/// Every method is infallible. An implementation that detects a bounds
/// violation records it itself and hands back zeros, so callbacks can stay
/// simple and the stack keeps the shape the record declares.
pub trait Context {
    /// Pops `cells` cells and returns them as one bit pattern.
    fn pop_bits(&mut self, cells: u16) -> u64;

    /// Pushes the low `cells` cells of `bits`.
    fn push_bits(&mut self, cells: u16, bits: u64);

    /// Fetches the next code cell, used as a variable address.
    fn operand(&mut self) -> DataMemoryAddress;

    /// Reads `cells` cells from a variable.
    fn load_bits(&mut self, address: DataMemoryAddress, cells: u16) -> u64;

    /// Writes the low `cells` cells of `bits` to a variable.
    fn store_bits(&mut self, address: DataMemoryAddress, cells: u16, bits: u64);
}

impl dyn Context + '_ {
    /// Pops a typed value.
    pub fn pop<T: Scalar>(&mut self) -> T {
        T::from_bits(self.pop_bits(T::TYPE.cells()))
    }

    /// Pushes a typed value.
    pub fn push<T: Scalar>(&mut self, value: T) {
        self.push_bits(T::TYPE.cells(), value.to_bits());
    }
}
