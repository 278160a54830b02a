//! # tagwalk
//!
//! A tree-walking interpreter for directive elements embedded in markup.
//!
//! Elements whose tag names a directive (`<variable>`, `<if>`, `<for>`,
//! `<set>`, `<querySelectorAll>`, ...) are executed as instructions against
//! the document that contains them, then hidden. Everything else in the
//! document is ordinary content the directives read and write.
//!
//! ## Architecture
//!
//! - **Document**: arena-backed host tree with a markup parser, serializer
//!   and selector engine
//! - **Namespace**: flat store of variables and functions
//! - **Expressions**: a small language for conditions, values and loop
//!   statements, evaluated against the namespace
//! - **Interpreter**: scans the document, dispatches directives with an
//!   explicit target context, and re-scans inserted markup
//! - **Host**: dialogs and logging, behind a trait
//!
//! ## Example
//!
//! ```
//! use tagwalk::{Interpreter, RecordingHost};
//!
//! let markup = r#"
//!     <ul id="list"></ul>
//!     <for init="i = 0" condition="i < 3" increment="i++">
//!         <create tag="li" variable="item">
//!             <set innertext="'item ' + i"></set>
//!         </create>
//!         <append target="list" source="item"></append>
//!     </for>
//! "#;
//!
//! let mut interp = Interpreter::from_markup(markup, RecordingHost::new()).unwrap();
//! interp.run();
//!
//! let doc = interp.document();
//! let list = doc.get_element_by_id("list").unwrap();
//! assert_eq!(doc.inner_html(list), "<li>item 0</li><li>item 1</li><li>item 2</li>");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod directive;
pub mod dom;
pub mod error;
pub mod expr;
pub mod host;
pub mod interpreter;
pub mod namespace;
pub mod target;
pub mod value;

// Re-export main types
pub use context::ExecContext;
pub use directive::DirectiveKind;
pub use dom::{Document, Element, NodeId, NodeKind};
pub use error::{DirectiveError, DocumentError, ExprError};
pub use expr::{evaluate_condition, evaluate_value, execute_statement, Evaluate};
pub use host::{ConsoleHost, Host, HostEvent, RecordingHost};
pub use interpreter::{EventTarget, Interpreter};
pub use namespace::{Function, Namespace};
pub use target::TargetContext;
pub use value::Value;

/// tagwalk version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
