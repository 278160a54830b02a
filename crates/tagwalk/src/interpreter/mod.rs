//! The directive interpreter
//!
//! [`Interpreter`] owns the document, the namespace and the host. A run
//! collects every directive element that is not inside another directive,
//! dispatches each in document order, and then drains the document's
//! insertion journal so that directive markup added while running (through
//! `innerHTML`, `append`, or an event handler) is executed too.
//!
//! Handlers live in submodules grouped by what they do:
//!
//! - `declare`: `function`, `variable`, `addEventListener`, `call`
//! - `control`: `if`, `for`, `while`
//! - `scope`: `getElementById`, `querySelector`, `querySelectorAll`, `create`
//! - `actions`: `set`, `get`, `append`, `remove`, `show`, `hide`, `toggle`
//! - `dialogs`: `alert`, `confirm`, `prompt`, `log`

mod actions;
mod control;
mod declare;
mod dialogs;
mod scope;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use crate::context::ExecContext;
use crate::directive::DirectiveKind;
use crate::dom::{Document, NodeId};
use crate::error::{DirectiveError, DocumentError};
use crate::expr;
use crate::host::Host;
use crate::namespace::{Function, Namespace};
use crate::target::TargetContext;
use crate::value::Value;

/// Something an event listener can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// `target="window"`
    Window,
    /// `target="document"`
    Document,
    /// An element resolved by id or selector
    Node(NodeId),
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTarget::Window => write!(f, "window"),
            EventTarget::Document => write!(f, "document"),
            EventTarget::Node(id) => write!(f, "{}", id),
        }
    }
}

/// A function bound to an event by `<addEventListener>`.
#[derive(Debug, Clone)]
struct Listener {
    target: EventTarget,
    event: String,
    function: Arc<Function>,
}

/// Executes the directives of a [`Document`].
///
/// # Example
///
/// ```
/// use tagwalk::{Document, Interpreter, RecordingHost, Value};
///
/// let doc = Document::parse(
///     r#"<variable name="n" value="2" type="number"></variable>
///        <log message="n * 21"></log>"#,
/// ).unwrap();
///
/// let mut interp = Interpreter::new(doc, RecordingHost::new());
/// interp.run();
///
/// assert_eq!(interp.namespace().lookup_variable("n"), Some(&Value::Number(2.0)));
/// assert_eq!(interp.host().logs(), vec!["42"]);
/// ```
pub struct Interpreter<H: Host> {
    document: Document,
    namespace: Namespace,
    host: H,
    ctx: ExecContext,
    listeners: Vec<Listener>,
    call_depth: usize,
    /// Directive elements that have been dispatched at least once
    executed: HashSet<NodeId>,
}

impl<H: Host> Interpreter<H> {
    /// Create an interpreter with the default [`ExecContext`].
    pub fn new(document: Document, host: H) -> Self {
        Self {
            document,
            namespace: Namespace::new(),
            host,
            ctx: ExecContext::default(),
            listeners: Vec::new(),
            call_depth: 0,
            executed: HashSet::new(),
        }
    }

    /// Parse `markup` and create an interpreter over it.
    pub fn from_markup(markup: &str, host: H) -> Result<Self, DocumentError> {
        Ok(Self::new(Document::parse(markup)?, host))
    }

    /// Replace the execution context.
    pub fn with_context(mut self, ctx: ExecContext) -> Self {
        self.ctx = ctx;
        self
    }

    // ═══════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════

    /// The document being executed.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document. Insertions made through it are
    /// picked up by the next [`flush_mutations`](Self::flush_mutations).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The variable and function store.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Mutable access to the store, e.g. to seed variables before a run.
    pub fn namespace_mut(&mut self) -> &mut Namespace {
        &mut self.namespace
    }

    /// The host services.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host services.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The execution context.
    pub fn context(&self) -> &ExecContext {
        &self.ctx
    }

    /// Number of bound event listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Tree Scan and Mutation Bridge
    // ═══════════════════════════════════════════════════════════════════

    /// Execute every top-level directive in the document, then process
    /// whatever the run inserted.
    ///
    /// Returns the number of directive elements dispatched from the scan
    /// and the mutation bridge together.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> usize {
        let root = self.document.root();
        let dispatched = self.scan(root);
        debug!(dispatched, "initial scan complete");
        dispatched + self.flush_mutations()
    }

    /// Dispatch every directive in the subtree at `node` that is not nested
    /// inside another directive.
    ///
    /// The set of directives is collected before any of them runs, so
    /// elements a directive inserts are left to the mutation bridge.
    /// Directives that already ran, together with their bodies, are
    /// skipped, so a subtree moved after it ran does not run again.
    pub fn scan(&mut self, node: NodeId) -> usize {
        let directives = self.collect_directives(node);
        let mut count = 0;
        for directive in directives {
            if self.ctx.is_interrupted() {
                warn!("scan interrupted");
                break;
            }
            self.dispatch(directive, TargetContext::empty());
            count += 1;
        }
        count
    }

    /// Execute directives in subtrees inserted since the last flush.
    ///
    /// Repeats until nothing new was inserted or the configured number of
    /// rounds is used up. Nodes that were detached again before their turn,
    /// and nodes whose ancestor was inserted in the same round, are skipped.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn flush_mutations(&mut self) -> usize {
        let mut count = 0;
        for round in 0..self.ctx.max_mutation_rounds {
            let batch = self.document.take_inserted();
            if batch.is_empty() {
                return count;
            }
            trace!(round, inserted = batch.len(), "processing insertions");

            let roots: Vec<NodeId> = batch
                .iter()
                .copied()
                .enumerate()
                .filter(|&(i, id)| {
                    self.document.is_connected(id)
                        && !batch[..i].contains(&id)
                        && !batch.iter().any(|&other| {
                            other != id && self.document.is_inclusive_ancestor(other, id)
                        })
                })
                .map(|(_, id)| id)
                .collect();

            for id in roots {
                count += self.scan(id);
            }
        }
        if self.document.has_pending_insertions() {
            warn!(
                rounds = self.ctx.max_mutation_rounds,
                "insertions still pending after the last mutation round"
            );
        }
        count
    }

    fn collect_directives(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(tag) = self.document.tag_name(id) else {
                if id == self.document.root() {
                    stack.extend(self.document.children(id).iter().rev());
                }
                continue;
            };
            if DirectiveKind::from_tag(tag).is_some() {
                if !self.executed.contains(&id) {
                    out.push(id);
                }
            } else {
                stack.extend(self.document.children(id).iter().rev());
            }
        }
        out
    }

    // ═══════════════════════════════════════════════════════════════════
    // Dispatch
    // ═══════════════════════════════════════════════════════════════════

    /// Execute a single element if it is a directive.
    ///
    /// Failures are logged and swallowed; the element is hidden afterwards
    /// either way (unless hiding is disabled in the context).
    pub fn dispatch(&mut self, node: NodeId, target: TargetContext) {
        let Some(kind) = self.document.tag_name(node).and_then(DirectiveKind::from_tag) else {
            return;
        };
        if self.ctx.trace {
            trace!(%kind, %node, scope = ?target.resolve_target(), "dispatch");
        }
        self.executed.insert(node);

        let result = match kind {
            DirectiveKind::Function => self.exec_function(node, target),
            DirectiveKind::Variable => self.exec_variable(node),
            DirectiveKind::AddEventListener => self.exec_add_event_listener(node),
            DirectiveKind::Call => self.exec_call(node),
            DirectiveKind::If => self.exec_if(node, target),
            DirectiveKind::For => self.exec_for(node, target),
            DirectiveKind::While => self.exec_while(node, target),
            DirectiveKind::GetElementById => self.exec_get_element_by_id(node),
            DirectiveKind::QuerySelector => self.exec_query_selector(node),
            DirectiveKind::QuerySelectorAll => self.exec_query_selector_all(node),
            DirectiveKind::Set => self.exec_set(node, target),
            DirectiveKind::Get => self.exec_get(node, target),
            DirectiveKind::Create => self.exec_create(node, target),
            DirectiveKind::Append => self.exec_append(node, target),
            DirectiveKind::Remove => self.exec_remove(target),
            DirectiveKind::Show => self.exec_visibility(target, Visibility::Show),
            DirectiveKind::Hide => self.exec_visibility(target, Visibility::Hide),
            DirectiveKind::Toggle => self.exec_visibility(target, Visibility::Toggle),
            DirectiveKind::Alert => self.exec_alert(node),
            DirectiveKind::Confirm => self.exec_confirm(node),
            DirectiveKind::Prompt => self.exec_prompt(node),
            DirectiveKind::Log => self.exec_log(node),
        };

        if let Err(err) = result {
            report(kind, node, &err);
        }

        if self.ctx.hide_directives {
            if let Err(err) = self.document.set_hidden(node, true) {
                debug!(%node, error = %err, "could not hide directive");
            }
        }
    }

    /// Dispatch each element child of `node`, in order, with `target`.
    ///
    /// The child list is read once up front; children added while running
    /// are not visited. Stops early if the interrupt flag is raised.
    pub(crate) fn dispatch_children(
        &mut self,
        node: NodeId,
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        let children = self.document.element_children(node);
        self.dispatch_all(&children, target)
    }

    fn dispatch_all(
        &mut self,
        nodes: &[NodeId],
        target: TargetContext,
    ) -> Result<(), DirectiveError> {
        for &child in nodes {
            if self.ctx.is_interrupted() {
                return Err(DirectiveError::Interrupted);
            }
            self.dispatch(child, target);
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════

    /// Evaluate a condition against the current namespace.
    pub fn evaluate_condition(&self, text: &str) -> bool {
        expr::evaluate_condition(text, &self.namespace)
    }

    /// Resolve a value attribute against the current namespace.
    pub fn evaluate_value(&self, text: &str) -> Value {
        expr::evaluate_value(text, &self.namespace)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Functions and Events
    // ═══════════════════════════════════════════════════════════════════

    /// Call a declared function by name.
    ///
    /// Returns `Ok(false)` if no function has that name.
    pub fn call_function(&mut self, name: &str) -> Result<bool, DirectiveError> {
        let Some(function) = self.namespace.lookup_function(name) else {
            return Ok(false);
        };
        self.invoke(&function)?;
        Ok(true)
    }

    /// Run a function body with the context it was declared under.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %function.name))]
    pub(crate) fn invoke(&mut self, function: &Function) -> Result<(), DirectiveError> {
        if self.call_depth >= self.ctx.max_call_depth {
            return Err(DirectiveError::StackOverflow {
                depth: self.call_depth,
                max: self.ctx.max_call_depth,
            });
        }
        self.call_depth += 1;
        let result = self.dispatch_all(&function.body, function.context);
        self.call_depth -= 1;
        result
    }

    /// Fire `event` on `target`, running every bound function in the order
    /// the listeners were added, then process any insertions they made.
    ///
    /// Returns the number of listeners run.
    pub fn dispatch_event(&mut self, target: EventTarget, event: &str) -> usize {
        let handlers: Vec<Arc<Function>> = self
            .listeners
            .iter()
            .filter(|l| l.target == target && l.event == event)
            .map(|l| Arc::clone(&l.function))
            .collect();
        debug!(event_target = %target, event, handlers = handlers.len(), "dispatching event");

        for function in &handlers {
            if let Err(err) = self.invoke(function) {
                error!(
                    event_target = %target,
                    event,
                    function = %function.name,
                    error = %err,
                    "event handler failed"
                );
            }
        }
        self.flush_mutations();
        handlers.len()
    }

    fn add_listener(&mut self, target: EventTarget, event: String, function: Arc<Function>) {
        self.listeners.push(Listener {
            target,
            event,
            function,
        });
    }

    // ═══════════════════════════════════════════════════════════════════
    // Attribute Helpers
    // ═══════════════════════════════════════════════════════════════════

    /// A directive attribute, owned so handlers can keep it across
    /// mutations of the document.
    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.document.attribute(node, name).map(str::to_string)
    }

    /// A directive attribute that must be present and non-empty.
    fn required_attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.attr(node, name).filter(|v| !v.is_empty())
    }
}

/// What `show`, `hide` and `toggle` do to their target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Show,
    Hide,
    Toggle,
}

fn report(kind: DirectiveKind, node: NodeId, err: &DirectiveError) {
    match err {
        DirectiveError::LoopBudgetExceeded { .. } | DirectiveError::StackOverflow { .. } => {
            error!(%kind, %node, error = %err, "directive aborted");
        }
        DirectiveError::Interrupted => debug!(%kind, %node, "directive interrupted"),
        _ => warn!(%kind, %node, error = %err, "directive failed"),
    }
}
