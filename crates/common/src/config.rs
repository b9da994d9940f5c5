//! Evaluator configuration.

/// Limits and initial sizes used by compile and execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Stack cells reserved before compile sizes the stack.
    pub initial_stack_cells: usize,
    /// Deepest symbolic type stack a program may build.
    pub max_type_stack_depth: usize,
    /// Largest pseudo-code program, in cells.
    pub max_code_cells: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            initial_stack_cells: 32,
            max_type_stack_depth: 32,
            max_code_cells: u16::MAX as usize,
        }
    }
}

impl EvaluatorConfig {
    pub fn with_max_type_stack_depth(mut self, depth: usize) -> Self {
        self.max_type_stack_depth = depth;
        self
    }

    pub fn with_max_code_cells(mut self, cells: usize) -> Self {
        self.max_code_cells = cells;
        self
    }

    pub fn with_initial_stack_cells(mut self, cells: usize) -> Self {
        self.initial_stack_cells = cells;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.initial_stack_cells, 32);
        assert_eq!(config.max_type_stack_depth, 32);
        assert_eq!(config.max_code_cells, 65535);
    }

    #[test]
    fn builders_override_single_field() {
        let config = EvaluatorConfig::default().with_max_code_cells(16);
        assert_eq!(config.max_code_cells, 16);
        assert_eq!(config.max_type_stack_depth, 32);
    }
}
