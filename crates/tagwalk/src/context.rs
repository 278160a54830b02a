//! Execution context configuration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration and state for a run of the interpreter.
///
/// This is consulted by every loop and call and controls limits,
/// interruption and whether directive elements are hidden after they run.
#[derive(Debug, Clone)]
pub struct ExecContext {
    /// Iterations a single `for`/`while` may run before it is stopped
    pub max_loop_iterations: usize,

    /// Maximum nesting of `call` (stack overflow protection)
    pub max_call_depth: usize,

    /// Rounds of the mutation bridge per `run`/`flush_mutations`
    pub max_mutation_rounds: usize,

    /// Whether executed directive elements get `display: none`
    pub hide_directives: bool,

    /// Interrupt flag - set to true to abort loops and calls
    pub interrupt: Arc<AtomicBool>,

    /// Whether to emit a trace event for every dispatched directive
    pub trace: bool,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self {
            max_loop_iterations: 10_000,
            max_call_depth: 256,
            max_mutation_rounds: 64,
            hide_directives: true,
            interrupt: Arc::new(AtomicBool::new(false)),
            trace: false,
        }
    }
}

impl ExecContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-loop iteration budget.
    pub fn with_max_loop_iterations(mut self, limit: usize) -> Self {
        self.max_loop_iterations = limit;
        self
    }

    /// Set the call depth limit.
    pub fn with_max_call_depth(mut self, max_depth: usize) -> Self {
        self.max_call_depth = max_depth;
        self
    }

    /// Set how many rounds of inserted nodes are processed per flush.
    pub fn with_max_mutation_rounds(mut self, rounds: usize) -> Self {
        self.max_mutation_rounds = rounds;
        self
    }

    /// Keep directive elements visible after they run.
    pub fn with_hide_directives(mut self, hide: bool) -> Self {
        self.hide_directives = hide;
        self
    }

    /// Enable per-directive tracing.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Share an interrupt flag owned elsewhere (e.g. a signal handler).
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    /// Check if execution has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Request interruption of execution.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Reset the interrupt flag.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let ctx = ExecContext::new()
            .with_max_loop_iterations(5)
            .with_max_call_depth(3)
            .with_hide_directives(false);
        assert_eq!(ctx.max_loop_iterations, 5);
        assert_eq!(ctx.max_call_depth, 3);
        assert!(!ctx.hide_directives);
        assert_eq!(ctx.max_mutation_rounds, 64);
    }

    #[test]
    fn test_interrupt_is_shared_between_clones() {
        let ctx = ExecContext::new();
        let other = ctx.clone();
        other.interrupt();
        assert!(ctx.is_interrupted());
        ctx.reset_interrupt();
        assert!(!other.is_interrupted());
    }
}
