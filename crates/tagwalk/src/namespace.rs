//! Variable and function bindings shared by every directive
//!
//! The namespace is flat and lives as long as the interpreter: there are no
//! nested scopes, redeclaring a name overwrites it, and nothing is ever
//! removed. Variables and functions are kept in separate maps, so a name
//! may be both at once.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::dom::NodeId;
use crate::target::TargetContext;
use crate::value::Value;

/// A function declared by a `<function>` directive.
///
/// The body is the list of child nodes of the declaring element, captured
/// when the declaration ran. Invoking the function re-dispatches those
/// nodes with the target context that was in force at the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// The declared name
    pub name: String,

    /// Child nodes of the declaring element, in document order
    pub body: Vec<NodeId>,

    /// Target context captured at declaration
    pub context: TargetContext,
}

/// The interpreter's variable and function store.
///
/// # Example
///
/// ```
/// use tagwalk::{Namespace, Value};
///
/// let mut ns = Namespace::new();
/// ns.declare_variable("x", Value::Number(1.0));
/// ns.declare_variable("x", Value::string("again"));
///
/// assert_eq!(ns.lookup_variable("x"), Some(&Value::string("again")));
/// assert_eq!(ns.lookup_variable("y"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    variables: IndexMap<String, Value>,
    functions: IndexMap<String, Arc<Function>>,
}

impl Namespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Variables
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` to `value`, replacing any earlier binding.
    pub fn declare_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Current value of a variable.
    pub fn lookup_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Whether a variable is declared.
    pub fn contains_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Iterate variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Functions
    // ═══════════════════════════════════════════════════════════════════

    /// Bind a function under its own name, replacing any earlier one.
    ///
    /// Returns the shared handle, which event listeners keep so that a later
    /// redeclaration does not change what an existing listener runs.
    pub fn declare_function(&mut self, function: Function) -> Arc<Function> {
        let function = Arc::new(function);
        self.functions
            .insert(function.name.clone(), Arc::clone(&function));
        function
    }

    /// Look up a function by name.
    pub fn lookup_function(&self, name: &str) -> Option<Arc<Function>> {
        self.functions.get(name).cloned()
    }

    /// Whether a function is declared.
    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Iterate function names in declaration order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Total number of bindings of either kind.
    pub fn len(&self) -> usize {
        self.variables.len() + self.functions.len()
    }

    /// Whether nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.functions.is_empty()
    }

    /// Drop every binding.
    pub fn clear(&mut self) {
        self.variables.clear();
        self.functions.clear();
    }
}
