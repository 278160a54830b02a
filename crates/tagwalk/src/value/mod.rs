//! Value representation for runtime values

mod display;
mod impls;

pub use impls::parse_float;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::dom::NodeId;

/// Runtime value held by variables and produced by expressions.
///
/// Scalars are stored inline. Sequences and records are `Arc`-wrapped so a
/// value read into a second variable shares the same allocation; strict
/// equality on them compares identity, not contents.
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// Missing property or never-assigned result
    Undefined,

    /// Explicit absence (cancelled prompt, JSON `null`)
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// Double-precision number; every numeric literal parses to this
    Number(f64),

    /// Heap-allocated string
    String(Arc<String>),

    // ═══════════════════════════════════════════════════════════════════
    // Structured values
    // ═══════════════════════════════════════════════════════════════════
    /// Ordered sequence (declared with `type="array"`)
    Array(Arc<Vec<Value>>),

    /// Structured record with insertion-ordered keys (`type="object"`)
    Object(Arc<IndexMap<String, Value>>),

    /// Reference to a node of the host document
    Node(NodeId),
}
