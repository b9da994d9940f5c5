//! Cell types for code and data memory.

/// One cell of variables memory or of the runtime stack.
pub type DataMemoryElement = u32;

/// One cell of pseudo-code: an opcode index or an operand address.
pub type CodeMemoryElement = u16;

/// Address of a cell in variables memory. Addresses at or past the end of
/// the internal block refer to external slots.
pub type DataMemoryAddress = u16;

/// Bytes per data memory cell.
pub const DATA_MEMORY_ELEMENT_BYTES: u32 = DataMemoryElement::BITS / 8;

/// Number of whole cells needed to hold `bytes` bytes.
pub fn byte_size_to_data_memory_size(bytes: u32) -> u16 {
    bytes.div_ceil(DATA_MEMORY_ELEMENT_BYTES) as u16
}

/// Splits the low `cells` cells out of a 64-bit pattern, lowest cell first.
pub fn bits_to_cells(bits: u64, cells: u16) -> [DataMemoryElement; 2] {
    match cells {
        0 => [0, 0],
        1 => [bits as u32, 0],
        _ => [bits as u32, (bits >> 32) as u32],
    }
}

/// Joins up to two cells (lowest first) into a 64-bit pattern.
pub fn cells_to_bits(cells: &[DataMemoryElement]) -> u64 {
    match cells {
        [] => 0,
        [lo] => u64::from(*lo),
        [lo, hi, ..] => u64::from(*lo) | (u64::from(*hi) << 32),
    }
}

/// Keeps only the bits that fit into `cells` cells.
pub fn mask_to_cells(bits: u64, cells: u16) -> u64 {
    match cells {
        0 => 0,
        1 => bits & u64::from(u32::MAX),
        _ => bits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_up() {
        assert_eq!(byte_size_to_data_memory_size(0), 0);
        assert_eq!(byte_size_to_data_memory_size(1), 1);
        assert_eq!(byte_size_to_data_memory_size(4), 1);
        assert_eq!(byte_size_to_data_memory_size(5), 2);
        assert_eq!(byte_size_to_data_memory_size(8), 2);
    }

    #[test]
    fn split_and_join() {
        let bits = 0x1122_3344_5566_7788u64;
        let cells = bits_to_cells(bits, 2);
        assert_eq!(cells, [0x5566_7788, 0x1122_3344]);
        assert_eq!(cells_to_bits(&cells), bits);
        assert_eq!(cells_to_bits(&cells[..1]), 0x5566_7788);
    }

    #[test]
    fn masking() {
        assert_eq!(mask_to_cells(u64::MAX, 1), 0xFFFF_FFFF);
        assert_eq!(mask_to_cells(u64::MAX, 2), u64::MAX);
        assert_eq!(mask_to_cells(u64::MAX, 0), 0);
    }
}
