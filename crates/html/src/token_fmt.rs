//! Deterministic token formatting for golden-style tests.
//!
//! One stable line per token. Attribute encounter order is preserved; control
//! characters are escaped so snapshot lines stay printable and diffable.

use crate::token::{Tag, Token};

/// Render a token as a stable one-line string.
pub fn token_line(token: &Token) -> String {
    match token {
        Token::StartTag(tag) => format!("START {}", tag_fields(tag)),
        Token::EndTag(tag) => format!("END {}", tag_fields(tag)),
        Token::Character(c) => format!("CHAR \"{}\"", escape_text(&c.to_string())),
        Token::EndOfFile => "EOF".to_string(),
    }
}

/// Render a whole token sequence, one line per token.
pub fn token_lines(tokens: &[Token]) -> Vec<String> {
    tokens.iter().map(token_line).collect()
}

fn tag_fields(tag: &Tag) -> String {
    let mut out = String::new();
    out.push_str("name=");
    out.push_str(&tag.name);
    out.push_str(" attrs=[");
    for (i, attr) in tag.attributes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_text(&attr.value));
        out.push('"');
    }
    out.push_str("] self_closing=");
    out.push_str(if tag.self_closing { "true" } else { "false" });
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Attribute, Tag};

    #[test]
    fn start_tag_line_preserves_attribute_order() {
        let token = Token::StartTag(Tag {
            name: "div".to_string(),
            self_closing: false,
            attributes: vec![Attribute::new("id", "a"), Attribute::new("class", "b c")],
        });
        assert_eq!(
            token_line(&token),
            "START name=div attrs=[id=\"a\" class=\"b c\"] self_closing=false"
        );
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(token_line(&Token::Character('\t')), "CHAR \"\\t\"");
        assert_eq!(token_line(&Token::Character('"')), "CHAR \"\\\"\"");
        assert_eq!(token_line(&Token::Character('\u{0C}')), "CHAR \"\\u{0C}\"");
        let token = Token::EndTag(Tag {
            name: "p".to_string(),
            self_closing: false,
            attributes: vec![Attribute::new("x", "a\"b\\c")],
        });
        assert_eq!(
            token_line(&token),
            "END name=p attrs=[x=\"a\\\"b\\\\c\"] self_closing=false"
        );
    }

    #[test]
    fn eof_renders_bare() {
        assert_eq!(token_line(&Token::EndOfFile), "EOF");
    }
}
