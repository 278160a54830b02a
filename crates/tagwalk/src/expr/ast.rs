//! Expression syntax tree

use crate::value::Value;

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value
    Literal(Value),

    /// A variable reference
    Variable(String),

    /// `[a, b, c]`
    Array(Vec<Expr>),

    /// Prefix operator
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Box<Expr>,
    },

    /// Infix operator
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },

    /// `target.name`
    Member {
        /// The object expression
        target: Box<Expr>,
        /// The property name
        name: String,
    },

    /// `target[index]`
    Index {
        /// The object expression
        target: Box<Expr>,
        /// The index expression
        index: Box<Expr>,
    },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
    /// `+`
    Plus,
}

/// Infix operators, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    LooseEq,
    /// `!=`
    LooseNe,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    /// `&&`
    And,
    /// `||`
    Or,
}

/// A statement, as accepted by `for` `init`/`increment` attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = value` or compound `name op= value`
    Assign {
        /// Variable being written
        name: String,
        /// Operator for compound assignment, `None` for plain `=`
        op: Option<BinaryOp>,
        /// Right-hand side
        value: Expr,
    },

    /// `name++`, `++name`, `name--`, `--name`
    Step {
        /// Variable being written
        name: String,
        /// `1.0` or `-1.0`
        delta: f64,
    },

    /// An expression evaluated for nothing but its failure modes
    Expr(Expr),
}
