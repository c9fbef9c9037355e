//! ASCII character classification for HTML tokenization.
//!
//! All predicates are pure and total over `char`. Non-ASCII code points fall
//! through every class and are remapped by nothing.

pub const fn is_ascii_alpha(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z')
}

pub const fn is_ascii_digit(c: char) -> bool {
    matches!(c, '0'..='9')
}

pub const fn is_ascii_alphanumeric(c: char) -> bool {
    is_ascii_alpha(c) || is_ascii_digit(c)
}

/// HTML whitespace in the broad sense (includes CR).
///
/// This is the class used by newline normalization and content-type sniffing,
/// not by tokenizer transitions; those use [`is_tokenizer_whitespace`].
pub const fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0C}')
}

/// Whitespace as observed by tokenizer transitions: tab, LF, FF, space.
///
/// CR is excluded; carriage returns are the concern of a preceding
/// newline-normalization pass and reach the state machine as ordinary
/// characters if that pass is skipped.
pub const fn is_tokenizer_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\u{0C}' | ' ')
}

/// Remap `A-Z` to `a-z`; identity for every other code point.
pub const fn to_ascii_lower(c: char) -> char {
    if c.is_ascii_uppercase() {
        (c as u8 + 0x20) as char
    } else {
        c
    }
}

/// Remap `a-z` to `A-Z`; identity for every other code point.
pub const fn to_ascii_upper(c: char) -> char {
    if c.is_ascii_lowercase() {
        (c as u8 - 0x20) as char
    } else {
        c
    }
}
