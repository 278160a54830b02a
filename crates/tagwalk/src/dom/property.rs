//! Script-visible element properties
//!
//! Directives read and write elements through property names rather than
//! raw attributes. A few names are computed from the tree (`innerText`,
//! `innerHTML`, `tagName`), a few reflect attributes (`id`, `title`,
//! `className`), and everything else is an expando stored on the element.

use super::{Document, NodeId};
use crate::error::DocumentError;
use crate::value::Value;

/// Properties that read and write the attribute of the same name.
const REFLECTED_ATTRIBUTES: &[&str] = &[
    "id",
    "title",
    "href",
    "src",
    "alt",
    "name",
    "type",
    "placeholder",
    "lang",
    "dir",
];

impl Document {
    /// Read a property off an element.
    ///
    /// Lookup order: computed properties, the `value` and expando store,
    /// reflected attributes, then any attribute of that name. Missing
    /// properties read as `undefined`.
    pub fn get_property(&self, id: NodeId, name: &str) -> Value {
        let Some(el) = self.element(id) else {
            return Value::Undefined;
        };

        match name {
            "innerText" | "innertext" => return Value::string(self.inner_text(id)),
            "textContent" | "textcontent" => return Value::string(self.text_content(id)),
            "innerHTML" | "innerhtml" => return Value::string(self.inner_html(id)),
            "outerHTML" | "outerhtml" => return Value::string(self.outer_html(id)),
            "tagName" | "nodeName" => return Value::string(el.tag.to_ascii_uppercase()),
            "className" | "classname" => {
                return Value::string(el.attribute("class").unwrap_or_default())
            }
            "childElementCount" => {
                return Value::Number(self.element_children(id).len() as f64)
            }
            "hidden" => return Value::Bool(el.is_hidden()),
            "parentNode" | "parentElement" => {
                return self
                    .parent(id)
                    .filter(|&p| name == "parentNode" || self.element(p).is_some())
                    .map_or(Value::Null, Value::Node)
            }
            _ => {}
        }

        if let Some(value) = el
            .properties
            .get(name)
            .or_else(|| el.properties.get(&name.to_ascii_lowercase()))
        {
            return value.clone();
        }
        if REFLECTED_ATTRIBUTES.contains(&name) || name == "value" {
            return Value::string(el.attribute(name).unwrap_or_default());
        }
        el.attribute(name)
            .map_or(Value::Undefined, Value::string)
    }

    /// Write a property on an element.
    ///
    /// `name` is matched case-insensitively against the computed and
    /// reflected properties, because directive attribute names arrive
    /// lower-cased from markup.
    pub fn set_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: Value,
    ) -> Result<(), DocumentError> {
        self.element_mut(id)?;
        let lower = name.to_ascii_lowercase();

        match lower.as_str() {
            "innertext" | "textcontent" => self.set_text_content(id, &value.to_string()),
            "innerhtml" => self.set_inner_html(id, &value.to_string()),
            "classname" => self.set_attribute(id, "class", value.to_string()),
            "hidden" => self.set_hidden(id, value.is_truthy()),
            reflected if REFLECTED_ATTRIBUTES.contains(&reflected) => {
                self.set_attribute(id, reflected, value.to_string())
            }
            _ => {
                self.element_mut(id)?.properties.insert(lower, value);
                Ok(())
            }
        }
    }
}
