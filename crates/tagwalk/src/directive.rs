//! The directive vocabulary

use std::fmt;

/// Every element tag the interpreter executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `<function name>`: declare a function whose body is the children
    Function,
    /// `<variable name value type>`
    Variable,
    /// `<addEventListener target event function>`
    AddEventListener,
    /// `<call function args>`
    Call,
    /// `<if condition>`
    If,
    /// `<for init condition increment>`
    For,
    /// `<while condition>`
    While,
    /// `<getElementById target>`
    GetElementById,
    /// `<querySelector selector>`
    QuerySelector,
    /// `<querySelectorAll selector>`
    QuerySelectorAll,
    /// `<set ...>`: every attribute is a mutation of the target
    Set,
    /// `<get property variable>`
    Get,
    /// `<create tag variable>`
    Create,
    /// `<append target source>`
    Append,
    /// `<remove>`
    Remove,
    /// `<show>`
    Show,
    /// `<hide>`
    Hide,
    /// `<toggle>`
    Toggle,
    /// `<alert message>`
    Alert,
    /// `<confirm message variable>`
    Confirm,
    /// `<prompt message default variable>`
    Prompt,
    /// `<log message>`
    Log,
}

impl DirectiveKind {
    /// Every directive kind, in the order they are documented.
    pub const ALL: [DirectiveKind; 22] = [
        DirectiveKind::Function,
        DirectiveKind::Variable,
        DirectiveKind::AddEventListener,
        DirectiveKind::Call,
        DirectiveKind::If,
        DirectiveKind::For,
        DirectiveKind::While,
        DirectiveKind::GetElementById,
        DirectiveKind::QuerySelector,
        DirectiveKind::QuerySelectorAll,
        DirectiveKind::Set,
        DirectiveKind::Get,
        DirectiveKind::Create,
        DirectiveKind::Append,
        DirectiveKind::Remove,
        DirectiveKind::Show,
        DirectiveKind::Hide,
        DirectiveKind::Toggle,
        DirectiveKind::Alert,
        DirectiveKind::Confirm,
        DirectiveKind::Prompt,
        DirectiveKind::Log,
    ];

    /// Classify a tag name, ignoring case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag_name().eq_ignore_ascii_case(tag))
    }

    /// The canonical tag spelling.
    pub fn tag_name(self) -> &'static str {
        match self {
            DirectiveKind::Function => "function",
            DirectiveKind::Variable => "variable",
            DirectiveKind::AddEventListener => "addEventListener",
            DirectiveKind::Call => "call",
            DirectiveKind::If => "if",
            DirectiveKind::For => "for",
            DirectiveKind::While => "while",
            DirectiveKind::GetElementById => "getElementById",
            DirectiveKind::QuerySelector => "querySelector",
            DirectiveKind::QuerySelectorAll => "querySelectorAll",
            DirectiveKind::Set => "set",
            DirectiveKind::Get => "get",
            DirectiveKind::Create => "create",
            DirectiveKind::Append => "append",
            DirectiveKind::Remove => "remove",
            DirectiveKind::Show => "show",
            DirectiveKind::Hide => "hide",
            DirectiveKind::Toggle => "toggle",
            DirectiveKind::Alert => "alert",
            DirectiveKind::Confirm => "confirm",
            DirectiveKind::Prompt => "prompt",
            DirectiveKind::Log => "log",
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.tag_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_ignores_case() {
        assert_eq!(
            DirectiveKind::from_tag("queryselectorall"),
            Some(DirectiveKind::QuerySelectorAll)
        );
        assert_eq!(
            DirectiveKind::from_tag("ADDEVENTLISTENER"),
            Some(DirectiveKind::AddEventListener)
        );
        assert_eq!(DirectiveKind::from_tag("div"), None);
    }

    #[test]
    fn test_every_kind_round_trips_through_its_tag() {
        for kind in DirectiveKind::ALL {
            assert_eq!(DirectiveKind::from_tag(kind.tag_name()), Some(kind));
        }
    }
}
