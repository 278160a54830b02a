//! Tokenizer for the expression language

use std::fmt;

use crate::error::ExprError;

/// A lexical token with its byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind and payload
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub offset: usize,
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal
    Number(f64),
    /// String literal with escapes resolved
    Str(String),
    /// Identifier or keyword
    Ident(String),

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `===`
    EqEqEq,
    /// `!==`
    NotEqEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    StarAssign,
    /// `/=`
    SlashAssign,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Number(n) => return write!(f, "number {}", n),
            TokenKind::Str(s) => return write!(f, "string {:?}", s),
            TokenKind::Ident(s) => return write!(f, "identifier `{}`", s),
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEqEq => "!==",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            TokenKind::StarAssign => "*=",
            TokenKind::SlashAssign => "/=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
        };
        write!(f, "`{}`", s)
    }
}

/// Split expression text into tokens.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        // Numbers: 12, 3.5, .5, 1e3
        if c.is_ascii_digit()
            || (c == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit))
        {
            while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                pos += 1;
            }
            if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
                let mut look = pos + 1;
                if look < bytes.len() && (bytes[look] == b'+' || bytes[look] == b'-') {
                    look += 1;
                }
                if look < bytes.len() && bytes[look].is_ascii_digit() {
                    pos = look;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
            }
            let text = &src[start..pos];
            let n = text.parse::<f64>().map_err(|_| ExprError::InvalidNumber {
                text: text.to_string(),
            })?;
            tokens.push(Token {
                kind: TokenKind::Number(n),
                offset: start,
            });
            continue;
        }

        // Identifiers (ASCII letters, digits, `_`, `$`, and any non-ASCII)
        if c.is_ascii_alphabetic() || c == b'_' || c == b'$' || c >= 0x80 {
            let rest = &src[pos..];
            let len = rest
                .find(|ch: char| !(ch.is_alphanumeric() || ch == '_' || ch == '$'))
                .unwrap_or(rest.len());
            if len == 0 {
                let ch = rest.chars().next().unwrap_or('\u{fffd}');
                return Err(ExprError::UnexpectedChar { ch, offset: start });
            }
            pos += len;
            tokens.push(Token {
                kind: TokenKind::Ident(src[start..pos].to_string()),
                offset: start,
            });
            continue;
        }

        if c == b'"' || c == b'\'' {
            let (s, end) = lex_string(src, start)?;
            pos = end;
            tokens.push(Token {
                kind: TokenKind::Str(s),
                offset: start,
            });
            continue;
        }

        let three = src.get(pos..pos + 3);
        let two = src.get(pos..pos + 2);
        let (kind, len) = match (three, two, c) {
            (Some("==="), _, _) => (TokenKind::EqEqEq, 3),
            (Some("!=="), _, _) => (TokenKind::NotEqEq, 3),
            (_, Some("=="), _) => (TokenKind::EqEq, 2),
            (_, Some("!="), _) => (TokenKind::NotEq, 2),
            (_, Some("<="), _) => (TokenKind::Le, 2),
            (_, Some(">="), _) => (TokenKind::Ge, 2),
            (_, Some("&&"), _) => (TokenKind::AndAnd, 2),
            (_, Some("||"), _) => (TokenKind::OrOr, 2),
            (_, Some("+="), _) => (TokenKind::PlusAssign, 2),
            (_, Some("-="), _) => (TokenKind::MinusAssign, 2),
            (_, Some("*="), _) => (TokenKind::StarAssign, 2),
            (_, Some("/="), _) => (TokenKind::SlashAssign, 2),
            (_, Some("++"), _) => (TokenKind::PlusPlus, 2),
            (_, Some("--"), _) => (TokenKind::MinusMinus, 2),
            (_, _, b'+') => (TokenKind::Plus, 1),
            (_, _, b'-') => (TokenKind::Minus, 1),
            (_, _, b'*') => (TokenKind::Star, 1),
            (_, _, b'/') => (TokenKind::Slash, 1),
            (_, _, b'%') => (TokenKind::Percent, 1),
            (_, _, b'!') => (TokenKind::Bang, 1),
            (_, _, b'<') => (TokenKind::Lt, 1),
            (_, _, b'>') => (TokenKind::Gt, 1),
            (_, _, b'=') => (TokenKind::Assign, 1),
            (_, _, b'(') => (TokenKind::LParen, 1),
            (_, _, b')') => (TokenKind::RParen, 1),
            (_, _, b'[') => (TokenKind::LBracket, 1),
            (_, _, b']') => (TokenKind::RBracket, 1),
            (_, _, b'.') => (TokenKind::Dot, 1),
            (_, _, b',') => (TokenKind::Comma, 1),
            (_, _, b';') => (TokenKind::Semicolon, 1),
            _ => {
                let ch = src[pos..].chars().next().unwrap_or('\u{fffd}');
                return Err(ExprError::UnexpectedChar { ch, offset: start });
            }
        };
        pos += len;
        tokens.push(Token {
            kind,
            offset: start,
        });
    }

    Ok(tokens)
}

/// Lex a quoted string starting at `start`; returns the contents and the
/// offset just past the closing quote.
fn lex_string(src: &str, start: usize) -> Result<(String, usize), ExprError> {
    let mut chars = src[start..].char_indices();
    let quote = chars.next().map(|(_, q)| q).unwrap_or('"');
    let mut out = String::new();

    while let Some((i, ch)) = chars.next() {
        match ch {
            c if c == quote => return Ok((out, start + i + 1)),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, '0')) => out.push('\0'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            c => out.push(c),
        }
    }
    Err(ExprError::UnterminatedString { offset: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            kinds("a<=b!==c&&d"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Le,
                TokenKind::Ident("b".into()),
                TokenKind::NotEqEq,
                TokenKind::Ident("c".into()),
                TokenKind::AndAnd,
                TokenKind::Ident("d".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            kinds("3.5 .5 1e3 2E-2"),
            vec![
                TokenKind::Number(3.5),
                TokenKind::Number(0.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(0.02),
            ]
        );
        assert!(matches!(
            tokenize("1.2.3"),
            Err(ExprError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_tokenize_strings() {
        assert_eq!(
            kinds(r#"'it\'s' "a\nb""#),
            vec![
                TokenKind::Str("it's".into()),
                TokenKind::Str("a\nb".into()),
            ]
        );
        assert_eq!(
            tokenize("'open"),
            Err(ExprError::UnterminatedString { offset: 0 })
        );
    }

    #[test]
    fn test_tokenize_increment() {
        assert_eq!(
            kinds("i++"),
            vec![TokenKind::Ident("i".into()), TokenKind::PlusPlus]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("a # b"),
            Err(ExprError::UnexpectedChar { ch: '#', offset: 2 })
        );
    }
}
