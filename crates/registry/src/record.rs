//! Function records: one typed overload of one mnemonic.

use std::fmt;
use std::sync::Arc;

use rteval_common::{Fault, TypeDescriptor};

use crate::context::Context;

/// Callback that performs an operation against the machine.
pub type ExecuteFn = Arc<dyn Fn(&mut dyn Context) -> Result<(), Fault> + Send + Sync>;

/// One concretely typed implementation of an RPN mnemonic.
#[derive(Clone)]
pub struct FunctionRecord {
    /// Upper-case mnemonic.
    pub name: String,
    /// Inputs in stack order: the last entry is the top of the stack.
    pub input_types: Vec<TypeDescriptor>,
    /// Outputs in push order.
    pub output_types: Vec<TypeDescriptor>,
    /// True when the opcode is followed by one address cell.
    pub has_operand: bool,
    pub execute: ExecuteFn,
}

impl FunctionRecord {
    pub fn new<F>(
        name: &str,
        input_types: Vec<TypeDescriptor>,
        output_types: Vec<TypeDescriptor>,
        execute: F,
    ) -> Self
    where
        F: Fn(&mut dyn Context) -> Result<(), Fault> + Send + Sync + 'static,
    {
        Self {
            name: name.to_ascii_uppercase(),
            input_types,
            output_types,
            has_operand: false,
            execute: Arc::new(execute),
        }
    }

    /// Marks the record as taking an address operand.
    pub fn with_operand(mut self) -> Self {
        self.has_operand = true;
        self
    }

    /// Stack cells consumed.
    pub fn input_cells(&self) -> u32 {
        self.input_types.iter().map(|t| u32::from(t.cells())).sum()
    }

    /// Stack cells produced.
    pub fn output_cells(&self) -> u32 {
        self.output_types.iter().map(|t| u32::from(t.cells())).sum()
    }

    /// Code cells one instance occupies.
    pub fn code_cells(&self) -> usize {
        1 + usize::from(self.has_operand)
    }

    /// Returns true if the input and output types match exactly.
    pub fn matches(&self, inputs: &[TypeDescriptor], outputs: &[TypeDescriptor]) -> bool {
        self.input_types == inputs && self.output_types == outputs
    }

    /// Formats the input types as `(float64,float64)`.
    pub fn inputs_to_string(&self) -> String {
        type_list(&self.input_types)
    }

    /// Formats the output types as `(float64)`.
    pub fn outputs_to_string(&self) -> String {
        type_list(&self.output_types)
    }
}

fn type_list(types: &[TypeDescriptor]) -> String {
    let names: Vec<&str> = types.iter().map(|t| t.name()).collect();
    format!("({})", names.join(","))
}

impl fmt::Debug for FunctionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRecord")
            .field("name", &self.name)
            .field("input_types", &self.input_types)
            .field("output_types", &self.output_types)
            .field("has_operand", &self.has_operand)
            .finish_non_exhaustive()
    }
}

/// `ADD(float64,float64) => (float64)`.
impl fmt::Display for FunctionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.input_types.is_empty() {
            f.write_str(&self.inputs_to_string())?;
        }
        if !self.output_types.is_empty() {
            write!(f, " => {}", self.outputs_to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TypeDescriptor::*;

    fn noop(_: &mut dyn Context) -> Result<(), Fault> {
        Ok(())
    }

    #[test]
    fn name_is_uppercased() {
        let r = FunctionRecord::new("add", vec![Int8, Int8], vec![Int8], noop);
        assert_eq!(r.name, "ADD");
    }

    #[test]
    fn cell_accounting() {
        let r = FunctionRecord::new("POW", vec![Float64, Float64], vec![Float64], noop);
        assert_eq!(r.input_cells(), 4);
        assert_eq!(r.output_cells(), 2);
        assert_eq!(r.code_cells(), 1);
        let w = FunctionRecord::new("WRITE", vec![Int8], vec![], noop).with_operand();
        assert_eq!(w.code_cells(), 2);
    }

    #[test]
    fn display_signature() {
        let r = FunctionRecord::new("ADD", vec![Float64, Float64], vec![Float64], noop);
        assert_eq!(r.to_string(), "ADD(float64,float64) => (float64)");
        let read = FunctionRecord::new("READ", vec![], vec![UInt8], noop);
        assert_eq!(read.to_string(), "READ => (uint8)");
    }

    #[test]
    fn debug_skips_callback() {
        let r = FunctionRecord::new("NOT", vec![UInt8], vec![UInt8], noop);
        let text = format!("{r:?}");
        assert!(text.contains("NOT"));
        assert!(text.contains(".."));
    }
}
