//! `if`, `for` and `while`

use tracing::trace;

use super::Interpreter;
use crate::dom::NodeId;
use crate::error::DirectiveError;
use crate::expr::execute_statement;
use crate::host::Host;
use crate::target::TargetContext;

impl<H: Host> Interpreter<H> {
    /// `<if condition>`
    pub(super) fn exec_if(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let condition = self.attr(node, "condition").unwrap_or_default();
        if self.evaluate_condition(&condition) {
            self.dispatch_children(node, target)?;
        }
        Ok(())
    }

    /// `<while condition>`
    pub(super) fn exec_while(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let condition = self.attr(node, "condition").unwrap_or_default();
        let mut iterations = 0;
        while self.evaluate_condition(&condition) {
            self.check_loop_budget("while", iterations)?;
            iterations += 1;
            self.dispatch_children(node, target)?;
        }
        trace!(%node, iterations, "while finished");
        Ok(())
    }

    /// `<for init condition increment>`
    ///
    /// `init` and `increment` are statements; a failure in either ends the
    /// loop with an error.
    pub(super) fn exec_for(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let init = self.required_attr(node, "init");
        let condition = self.attr(node, "condition").unwrap_or_default();
        let increment = self.required_attr(node, "increment");

        if let Some(init) = init {
            execute_statement(&init, &mut self.namespace)?;
        }

        let mut iterations = 0;
        while self.evaluate_condition(&condition) {
            self.check_loop_budget("for", iterations)?;
            iterations += 1;
            self.dispatch_children(node, target)?;
            if let Some(increment) = &increment {
                execute_statement(increment, &mut self.namespace)?;
            }
        }
        trace!(%node, iterations, "for finished");
        Ok(())
    }

    fn check_loop_budget(
        &self,
        directive: &'static str,
        iterations: usize,
    ) -> Result<(), DirectiveError> {
        if self.ctx.is_interrupted() {
            return Err(DirectiveError::Interrupted);
        }
        if iterations >= self.ctx.max_loop_iterations {
            return Err(DirectiveError::LoopBudgetExceeded {
                directive,
                limit: self.ctx.max_loop_iterations,
            });
        }
        Ok(())
    }
}
