//! CSS selector subset
//!
//! Supported: type selectors, `*`, `#id`, `.class`, attribute selectors
//! (`[a]`, `[a=v]`, `[a~=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`), compound
//! selectors, the descendant (whitespace) and child (`>`) combinators, and
//! comma-separated groups. Pseudo-classes are rejected.

use super::{Document, NodeId};
use crate::error::DocumentError;

/// A comma-separated group of selectors; matches if any member matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Selector>);

/// A chain of compound selectors joined by combinators, stored
/// right-to-left: `parts[0]` is the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<(Compound, Combinator)>,
}

/// How a compound relates to the one on its right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// The subject; no relation
    None,
    /// Any ancestor
    Descendant,
    /// Direct parent
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeSelector {
    name: String,
    op: AttributeOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeOp {
    Exists,
    Equals(String),
    Includes(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

impl SelectorList {
    /// Parse selector text.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let err = |message: &str| DocumentError::Selector {
            selector: text.to_string(),
            message: message.to_string(),
        };

        let mut selectors = Vec::new();
        for group in split_groups(text) {
            let group = group.trim();
            if group.is_empty() {
                return Err(err("empty selector"));
            }
            selectors.push(Selector::parse(group).map_err(|m| err(&m))?);
        }
        if selectors.is_empty() {
            return Err(err("empty selector"));
        }
        Ok(Self(selectors))
    }

    /// Whether `node` matches any selector in the group.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(doc, node))
    }
}

/// Split on commas that are not inside an attribute selector.
fn split_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    groups.push(&text[start..]);
    groups
}

impl Selector {
    fn parse(text: &str) -> Result<Self, String> {
        let chars: Vec<char> = text.chars().collect();
        let mut pos = 0;
        let mut left_to_right: Vec<(Combinator, Compound)> = Vec::new();
        let mut pending = Combinator::None;

        loop {
            let saw_space = skip_ws(&chars, &mut pos);
            if pos >= chars.len() {
                break;
            }
            if chars[pos] == '>' {
                if left_to_right.is_empty() {
                    return Err("selector cannot start with a combinator".to_string());
                }
                pos += 1;
                skip_ws(&chars, &mut pos);
                pending = Combinator::Child;
                continue;
            }
            if !left_to_right.is_empty() && pending == Combinator::None {
                if !saw_space {
                    return Err(format!("unexpected '{}'", chars[pos]));
                }
                pending = Combinator::Descendant;
            }
            let compound = parse_compound(&chars, &mut pos)?;
            left_to_right.push((pending, compound));
            pending = Combinator::None;
        }

        if pending != Combinator::None {
            return Err("dangling combinator".to_string());
        }

        // Store right-to-left with each compound's relation to its right neighbour
        let mut parts = Vec::with_capacity(left_to_right.len());
        let mut relation = Combinator::None;
        for (combinator, compound) in left_to_right.into_iter().rev() {
            parts.push((compound, relation));
            relation = combinator;
        }
        Ok(Self { parts })
    }

    /// Whether `node` matches this selector.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.matches_from(doc, node, 0)
    }

    fn matches_from(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        let Some((compound, _)) = self.parts.get(index) else {
            return true;
        };
        if !compound.matches(doc, node) {
            return false;
        }
        let Some((_, relation)) = self.parts.get(index + 1) else {
            return true;
        };
        match relation {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| self.matches_from(doc, p, index + 1)),
            Combinator::Descendant => doc
                .ancestors_inclusive(node)
                .skip(1)
                .any(|a| self.matches_from(doc, a, index + 1)),
            Combinator::None => true,
        }
    }
}

fn skip_ws(chars: &[char], pos: &mut usize) -> bool {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
    *pos > start
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_ident(chars: &[char], pos: &mut usize) -> Result<String, String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    if *pos == start {
        return Err(match chars.get(*pos) {
            Some(c) => format!("expected a name, found '{}'", c),
            None => "expected a name".to_string(),
        });
    }
    Ok(chars[start..*pos].iter().collect())
}

fn parse_compound(chars: &[char], pos: &mut usize) -> Result<Compound, String> {
    let mut compound = Compound::default();
    let start = *pos;

    if chars[*pos] == '*' {
        *pos += 1;
    } else if is_ident_char(chars[*pos]) {
        if chars[*pos].is_ascii_digit() {
            return Err("type selector cannot start with a digit".to_string());
        }
        compound.tag = Some(parse_ident(chars, pos)?.to_ascii_lowercase());
    }

    while *pos < chars.len() {
        match chars[*pos] {
            '#' => {
                *pos += 1;
                compound.id = Some(parse_ident(chars, pos)?);
            }
            '.' => {
                *pos += 1;
                compound.classes.push(parse_ident(chars, pos)?);
            }
            '[' => {
                *pos += 1;
                compound.attributes.push(parse_attribute(chars, pos)?);
            }
            ':' => return Err("pseudo-classes are not supported".to_string()),
            c if c.is_whitespace() || c == '>' => break,
            c => return Err(format!("unexpected '{}'", c)),
        }
    }

    if *pos == start {
        return Err(format!("unexpected '{}'", chars[start]));
    }
    Ok(compound)
}

fn parse_attribute(chars: &[char], pos: &mut usize) -> Result<AttributeSelector, String> {
    skip_ws(chars, pos);
    let name = parse_ident(chars, pos)?.to_ascii_lowercase();
    skip_ws(chars, pos);

    let op_prefix = match chars.get(*pos) {
        Some(']') => {
            *pos += 1;
            return Ok(AttributeSelector {
                name,
                op: AttributeOp::Exists,
            });
        }
        Some('=') => None,
        Some(&(c @ ('~' | '^' | '$' | '*'))) if chars.get(*pos + 1) == Some(&'=') => {
            *pos += 1;
            Some(c)
        }
        _ => return Err("malformed attribute selector".to_string()),
    };
    *pos += 1; // '='
    skip_ws(chars, pos);

    let value = match chars.get(*pos) {
        Some(&(q @ ('"' | '\''))) => {
            *pos += 1;
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != q {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return Err("unterminated string in attribute selector".to_string());
            }
            let v: String = chars[start..*pos].iter().collect();
            *pos += 1;
            v
        }
        _ => parse_ident(chars, pos)?,
    };
    skip_ws(chars, pos);
    if chars.get(*pos) != Some(&']') {
        return Err("expected ']'".to_string());
    }
    *pos += 1;

    let op = match op_prefix {
        None => AttributeOp::Equals(value),
        Some('~') => AttributeOp::Includes(value),
        Some('^') => AttributeOp::Prefix(value),
        Some('$') => AttributeOp::Suffix(value),
        _ => AttributeOp::Substring(value),
    };
    Ok(AttributeSelector { name, op })
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if &el.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| el.classes().any(|k| k == c)) {
            return false;
        }
        self.attributes.iter().all(|a| {
            let actual = if a.name == "style" {
                (!el.style.is_empty()).then(|| el.style_text())
            } else {
                el.attribute(&a.name).map(str::to_string)
            };
            let Some(actual) = actual else {
                return false;
            };
            match &a.op {
                AttributeOp::Exists => true,
                AttributeOp::Equals(v) => &actual == v,
                AttributeOp::Includes(v) => actual.split_ascii_whitespace().any(|w| w == v),
                AttributeOp::Prefix(v) => !v.is_empty() && actual.starts_with(v.as_str()),
                AttributeOp::Suffix(v) => !v.is_empty() && actual.ends_with(v.as_str()),
                AttributeOp::Substring(v) => !v.is_empty() && actual.contains(v.as_str()),
            }
        })
    }
}
