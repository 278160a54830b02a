//! Error types for tagwalk
//!
//! Errors are layered the same way the interpreter is: the expression
//! language, the host document, and directive execution each have their own
//! enum, and [`DirectiveError`] wraps the other two. Directive failures
//! never escape a dispatch pass; the interpreter logs them and carries on
//! with the next sibling.

use thiserror::Error;

use crate::dom::NodeId;

/// Errors raised while tokenizing, parsing or evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// The expression text was empty or only whitespace
    #[error("Empty expression")]
    Empty,

    /// A character that cannot start any token
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Byte offset into the source text
        offset: usize,
    },

    /// A string literal without its closing quote
    #[error("Unterminated string literal starting at offset {offset}")]
    UnterminatedString {
        /// Byte offset of the opening quote
        offset: usize,
    },

    /// A numeric literal that could not be parsed
    #[error("Invalid number literal '{text}'")]
    InvalidNumber {
        /// The literal text
        text: String,
    },

    /// The parser found a token it did not expect
    #[error("Unexpected token {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        /// Description of the token found
        found: String,
        /// What the parser was looking for
        expected: String,
        /// Byte offset into the source text
        offset: usize,
    },

    /// The input ended in the middle of an expression
    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for
        expected: String,
    },

    /// An identifier that names no declared variable
    #[error("Undefined variable: {name}")]
    UndefinedVariable {
        /// The identifier
        name: String,
    },

    /// Brackets, prefix operators or operator chains nested past the
    /// parser's limit
    #[error("Expression nested deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit
        limit: usize,
    },

    /// The left side of an assignment is not a plain name
    #[error("Invalid assignment target: {0}")]
    InvalidAssignTarget(String),

    /// An operation was applied to a value that does not support it
    #[error("Type error: {message}")]
    TypeError {
        /// Human-readable description
        message: String,
    },
}

/// Errors raised by the host document, its markup parser and selector engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Malformed markup
    #[error("Markup error at offset {offset}: {message}")]
    Markup {
        /// Human-readable description
        message: String,
        /// Byte offset into the markup
        offset: usize,
    },

    /// A selector outside the supported grammar
    #[error("Invalid selector '{selector}': {message}")]
    Selector {
        /// The selector text
        selector: String,
        /// Human-readable description
        message: String,
    },

    /// A tag name that cannot name an element
    #[error("Invalid tag name '{0}'")]
    InvalidTagName(String),

    /// A node id that does not belong to this document
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// An element operation applied to a text, comment or document node
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    /// Appending a node beneath itself
    #[error("Cannot append node {child} into its own subtree at {parent}")]
    Cycle {
        /// The node being appended
        child: NodeId,
        /// The intended parent
        parent: NodeId,
    },
}

/// Errors raised while executing a single directive element.
///
/// Resolution misses (unknown ids, undeclared functions) are not errors;
/// handlers skip them quietly. These variants cover the failures worth
/// surfacing in the log.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectiveError {
    /// A `variable` literal that does not parse as its declared type
    #[error("Variable '{name}' declared as {kind} has an invalid literal: {message}")]
    InvalidLiteral {
        /// The variable name
        name: String,
        /// The declared type tag
        kind: String,
        /// Parser message
        message: String,
    },

    /// Call-site arguments that do not parse
    #[error("Invalid arguments for '{function}': {message}")]
    InvalidArguments {
        /// The function being called
        function: String,
        /// Parser message
        message: String,
    },

    /// A loop ran past the configured iteration budget
    #[error("<{directive}> exceeded the iteration budget of {limit}")]
    LoopBudgetExceeded {
        /// The loop directive (`for` or `while`)
        directive: &'static str,
        /// The configured limit
        limit: usize,
    },

    /// Function calls nested past the configured depth
    #[error("Stack overflow: call depth {depth} exceeds maximum {max}")]
    StackOverflow {
        /// Current depth
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// The interrupt flag was raised
    #[error("Execution interrupted")]
    Interrupted,

    /// Expression failure in a position that cannot fall back
    #[error(transparent)]
    Expr(#[from] ExprError),

    /// Host document failure
    #[error(transparent)]
    Document(#[from] DocumentError),
}
