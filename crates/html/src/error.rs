//! Parse-error codes and the reporting channel.
//!
//! Parse errors never interrupt tokenization: the state machine reports them
//! to a sink and continues along its prescribed recovery transition. Codes are
//! the stable identifiers from the HTML Standard, rendered verbatim by
//! [`ParseErrorCode::as_str`].

use std::fmt;

/// Spec-named tokenizer parse errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParseErrorCode {
    UnexpectedQuestionMarkInsteadOfTagName,
    InvalidFirstCharacterOfTagName,
    EofBeforeTagName,
    MissingEndTagName,
    EofInTag,
    UnexpectedEqualsSignBeforeAttributeName,
    UnexpectedCharacterInAttributeName,
    MissingAttributeValue,
    UnexpectedCharacterInUnquotedAttributeValue,
    MissingWhitespaceBetweenAttributes,
    UnexpectedSolidusInTag,
    EofInComment,
}

impl ParseErrorCode {
    /// Stable identifier as spelled in the HTML Standard.
    pub fn as_str(self) -> &'static str {
        match self {
            ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName => {
                "unexpected-question-mark-instead-of-tag-name"
            }
            ParseErrorCode::InvalidFirstCharacterOfTagName => "invalid-first-character-of-tag-name",
            ParseErrorCode::EofBeforeTagName => "eof-before-tag-name",
            ParseErrorCode::MissingEndTagName => "missing-end-tag-name",
            ParseErrorCode::EofInTag => "eof-in-tag",
            ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName => {
                "unexpected-equals-sign-before-attribute-name"
            }
            ParseErrorCode::UnexpectedCharacterInAttributeName => {
                "unexpected-character-in-attribute-name"
            }
            ParseErrorCode::MissingAttributeValue => "missing-attribute-value",
            ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue => {
                "unexpected-character-in-unquoted-attribute-value"
            }
            ParseErrorCode::MissingWhitespaceBetweenAttributes => {
                "missing-whitespace-between-attributes"
            }
            ParseErrorCode::UnexpectedSolidusInTag => "unexpected-solidus-in-tag",
            ParseErrorCode::EofInComment => "eof-in-comment",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reported parse error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ParseErrorCode,
    /// Byte offset of the input cursor at report time.
    pub position: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.code, self.position)
    }
}

impl std::error::Error for ParseError {}

/// Receiver for tokenizer parse errors.
pub trait ParseErrorSink {
    fn report(&mut self, error: ParseError);
}

/// Default sink: forwards every error to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrorSink;

impl ParseErrorSink for LogErrorSink {
    fn report(&mut self, error: ParseError) {
        log::debug!(target: "html.tokenizer", "parse error: {error}");
    }
}

/// Capturing sink: stores errors in report order.
#[derive(Clone, Debug, Default)]
pub struct ErrorLog {
    errors: Vec<ParseError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Codes in report order, for compact test assertions.
    pub fn codes(&self) -> Vec<ParseErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl ParseErrorSink for ErrorLog {
    fn report(&mut self, error: ParseError) {
        log::debug!(target: "html.tokenizer", "parse error: {error}");
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_strings_match_spec_identifiers() {
        let table = [
            (
                ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName,
                "unexpected-question-mark-instead-of-tag-name",
            ),
            (
                ParseErrorCode::InvalidFirstCharacterOfTagName,
                "invalid-first-character-of-tag-name",
            ),
            (ParseErrorCode::EofBeforeTagName, "eof-before-tag-name"),
            (ParseErrorCode::MissingEndTagName, "missing-end-tag-name"),
            (ParseErrorCode::EofInTag, "eof-in-tag"),
            (
                ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName,
                "unexpected-equals-sign-before-attribute-name",
            ),
            (
                ParseErrorCode::UnexpectedCharacterInAttributeName,
                "unexpected-character-in-attribute-name",
            ),
            (ParseErrorCode::MissingAttributeValue, "missing-attribute-value"),
            (
                ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue,
                "unexpected-character-in-unquoted-attribute-value",
            ),
            (
                ParseErrorCode::MissingWhitespaceBetweenAttributes,
                "missing-whitespace-between-attributes",
            ),
            (ParseErrorCode::UnexpectedSolidusInTag, "unexpected-solidus-in-tag"),
            (ParseErrorCode::EofInComment, "eof-in-comment"),
        ];
        for (code, expected) in table {
            assert_eq!(code.as_str(), expected);
            assert_eq!(code.to_string(), expected);
        }
    }

    #[test]
    fn error_log_preserves_report_order() {
        let mut sink = ErrorLog::new();
        sink.report(ParseError {
            code: ParseErrorCode::EofBeforeTagName,
            position: 2,
        });
        sink.report(ParseError {
            code: ParseErrorCode::EofInTag,
            position: 5,
        });
        assert_eq!(
            sink.codes(),
            vec![ParseErrorCode::EofBeforeTagName, ParseErrorCode::EofInTag]
        );
        assert_eq!(sink.errors()[1].position, 5);
    }
}
