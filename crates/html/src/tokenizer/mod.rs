//! Streaming HTML tokenizer.
//!
//! This is a pull-based tokenizer: each call to [`Tokenizer::next`] runs the
//! state machine until exactly one token is produced. The input is fully
//! materialized at construction and borrowed for the tokenizer's lifetime.
//!
//! Invariants:
//! - Totality: `next` always returns; every state handles EOF, and a full
//!   drain reaches `EndOfFile` within `O(len)` calls.
//! - Emission order: when a single transition produces several tokens (the
//!   EOF-in-`<` and EOF-in-`</` cases), they are handed out across successive
//!   `next` calls in spec order. The pending buffer is drained before the
//!   state machine is re-entered.
//! - Tag and attribute names are canonical ASCII lowercase; attribute values
//!   are verbatim. An attribute with an empty name is never committed.
//! - Parse errors are reported to the sink and never interrupt tokenization.
//! - Post-EOF calls keep returning `EndOfFile` and report nothing further.

use memchr::memchr;

use crate::chars::{is_ascii_alpha, is_tokenizer_whitespace, to_ascii_lower};
use crate::error::{ParseError, ParseErrorCode, ParseErrorSink};
use crate::token::{Attribute, Tag, Token};
use states::TokenizerState;

mod states;


/// Tokenizer instrumentation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    pub steps: u64,
    pub state_transitions: u64,
    pub tokens_emitted: u64,
    pub parse_errors: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TagKind {
    Start,
    End,
}

/// HTML tokenizer over a fully materialized input.
///
/// Not `Sync`: a single instance must not be shared across threads. Multiple
/// independent instances over the same input are fine.
pub struct Tokenizer<'i> {
    input: &'i str,
    /// Byte cursor into `input`; always on a `char` boundary.
    pos: usize,
    /// Most recent read, including the EOF read. Re-yielded on reconsume.
    current: Option<char>,
    reconsume: bool,
    state: TokenizerState,
    /// Tokens queued by multi-token transitions, popped from the back.
    pending: Vec<Token>,
    eof_emitted: bool,
    current_tag_kind: TagKind,
    current_tag_name: String,
    current_tag_self_closing: bool,
    current_tag_attrs: Vec<Attribute>,
    current_attr_name: String,
    current_attr_value: String,
    stats: TokenizerStats,
}

impl<'i> Tokenizer<'i> {
    pub fn new(input: &'i str) -> Self {
        Self {
            input,
            pos: 0,
            current: None,
            reconsume: false,
            state: TokenizerState::Data,
            pending: Vec::new(),
            eof_emitted: false,
            current_tag_kind: TagKind::Start,
            current_tag_name: String::new(),
            current_tag_self_closing: false,
            current_tag_attrs: Vec::new(),
            current_attr_name: String::new(),
            current_attr_value: String::new(),
            stats: TokenizerStats::default(),
        }
    }

    /// Produce the next token.
    ///
    /// Parse errors encountered along the way are reported to `sink` in
    /// encounter order. After `EndOfFile` has been returned once (and the
    /// pending buffer is empty), every further call returns `EndOfFile`
    /// without reporting anything.
    pub fn next(&mut self, sink: &mut dyn ParseErrorSink) -> Token {
        if let Some(token) = self.pending.pop() {
            return self.finish_token(token);
        }
        if self.eof_emitted {
            return Token::EndOfFile;
        }

        // Each iteration consumes (or reconsumes) at most one character, and a
        // character is re-observed at most twice through chained reconsumes,
        // so a single `next` call is bounded by a small multiple of the
        // remaining input.
        let step_bound = 4 * (self.input.len() - self.pos) + 16;
        let mut steps_this_call: usize = 0;

        loop {
            steps_this_call += 1;
            debug_assert!(
                steps_this_call <= step_bound,
                "tokenizer stopped making progress: state={:?} pos={} after {} steps",
                self.state,
                self.pos,
                steps_this_call
            );
            self.stats.steps = self.stats.steps.saturating_add(1);

            let c = self.consume();
            let emitted = match self.state {
                TokenizerState::Data => self.step_data(c),
                TokenizerState::TagOpen => self.step_tag_open(c, sink),
                TokenizerState::EndTagOpen => self.step_end_tag_open(c, sink),
                TokenizerState::TagName => self.step_tag_name(c, sink),
                TokenizerState::BeforeAttributeName => self.step_before_attribute_name(c, sink),
                TokenizerState::AttributeName => self.step_attribute_name(c, sink),
                TokenizerState::AfterAttributeName => self.step_after_attribute_name(c, sink),
                TokenizerState::BeforeAttributeValue => self.step_before_attribute_value(c, sink),
                TokenizerState::AttributeValueDoubleQuoted => {
                    self.step_attribute_value_quoted(c, sink, '"')
                }
                TokenizerState::AttributeValueSingleQuoted => {
                    self.step_attribute_value_quoted(c, sink, '\'')
                }
                TokenizerState::AttributeValueUnquoted => {
                    self.step_attribute_value_unquoted(c, sink)
                }
                TokenizerState::AfterAttributeValueQuoted => {
                    self.step_after_attribute_value_quoted(c, sink)
                }
                TokenizerState::SelfClosingStartTag => self.step_self_closing_start_tag(c, sink),
                TokenizerState::Comment => self.step_comment(c, sink),
            };

            if let Some(token) = emitted {
                return self.finish_token(token);
            }
        }
    }

    /// Return a copy of the instrumentation counters.
    pub fn stats(&self) -> TokenizerStats {
        self.stats
    }

    // Input consumption.
    //
    // Reconsume re-yields the most recent read, including the EOF read: an
    // EOF that triggers reconsumption must be observed as EOF again in the
    // target state, otherwise inputs ending inside a tag never terminate.

    fn consume(&mut self) -> Option<char> {
        if self.reconsume {
            self.reconsume = false;
            return self.current;
        }
        match self.input[self.pos..].chars().next() {
            Some(ch) => {
                self.pos += ch.len_utf8();
                self.current = Some(ch);
                Some(ch)
            }
            None => {
                self.current = None;
                None
            }
        }
    }

    fn transition_to(&mut self, next: TokenizerState) {
        if self.state == next {
            return;
        }
        log::trace!(
            target: "html.tokenizer",
            "state {:?} -> {:?} @{}",
            self.state,
            next,
            self.pos
        );
        self.state = next;
        self.stats.state_transitions = self.stats.state_transitions.saturating_add(1);
    }

    fn reconsume_in(&mut self, next: TokenizerState) {
        self.reconsume = true;
        self.transition_to(next);
    }

    fn report(&mut self, sink: &mut dyn ParseErrorSink, code: ParseErrorCode) {
        self.stats.parse_errors = self.stats.parse_errors.saturating_add(1);
        sink.report(ParseError {
            code,
            position: self.pos,
        });
    }

    fn finish_token(&mut self, token: Token) -> Token {
        log::trace!(target: "html.tokenizer", "emit token: {token:?}");
        self.stats.tokens_emitted = self.stats.tokens_emitted.saturating_add(1);
        if token.is_eof() {
            self.eof_emitted = true;
        }
        token
    }

    // State handlers. Each receives the consumed read and returns the token
    // to emit, or `None` to keep stepping.

    fn step_data(&mut self, c: Option<char>) -> Option<Token> {
        match c {
            Some('<') => {
                self.transition_to(TokenizerState::TagOpen);
                None
            }
            Some(ch) => Some(Token::Character(ch)),
            None => Some(Token::EndOfFile),
        }
    }

    fn step_tag_open(&mut self, c: Option<char>, sink: &mut dyn ParseErrorSink) -> Option<Token> {
        match c {
            Some('!') => {
                // Markup declarations (comments, doctype, CDATA) are absorbed
                // by the placeholder comment state.
                self.transition_to(TokenizerState::Comment);
                None
            }
            Some('/') => {
                self.transition_to(TokenizerState::EndTagOpen);
                None
            }
            Some(ch) if is_ascii_alpha(ch) => {
                self.begin_tag(TagKind::Start);
                self.reconsume_in(TokenizerState::TagName);
                None
            }
            Some('?') => {
                self.report(sink, ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.reconsume_in(TokenizerState::Comment);
                None
            }
            Some(_) => {
                self.report(sink, ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.reconsume_in(TokenizerState::Data);
                Some(Token::Character('<'))
            }
            None => {
                self.report(sink, ParseErrorCode::EofBeforeTagName);
                self.pending.push(Token::EndOfFile);
                Some(Token::Character('<'))
            }
        }
    }

    fn step_end_tag_open(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some(ch) if is_ascii_alpha(ch) => {
                self.begin_tag(TagKind::End);
                self.reconsume_in(TokenizerState::TagName);
                None
            }
            Some('>') => {
                self.report(sink, ParseErrorCode::MissingEndTagName);
                self.transition_to(TokenizerState::Data);
                None
            }
            Some(_) => {
                self.report(sink, ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.reconsume_in(TokenizerState::Comment);
                None
            }
            None => {
                self.report(sink, ParseErrorCode::EofBeforeTagName);
                // Pushed in reverse so the LIFO drain yields `/` then EOF.
                self.pending.push(Token::EndOfFile);
                self.pending.push(Token::Character('/'));
                Some(Token::Character('<'))
            }
        }
    }

    fn step_tag_name(&mut self, c: Option<char>, sink: &mut dyn ParseErrorSink) -> Option<Token> {
        match c {
            Some(ch) if is_tokenizer_whitespace(ch) => {
                self.transition_to(TokenizerState::BeforeAttributeName);
                None
            }
            Some('/') => {
                self.transition_to(TokenizerState::SelfClosingStartTag);
                None
            }
            Some('>') => {
                self.transition_to(TokenizerState::Data);
                Some(self.emit_current_tag())
            }
            Some(ch) => {
                self.current_tag_name.push(to_ascii_lower(ch));
                None
            }
            None => {
                // The partially built tag is discarded, never emitted.
                self.report(sink, ParseErrorCode::EofInTag);
                Some(Token::EndOfFile)
            }
        }
    }

    fn step_before_attribute_name(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some(ch) if is_tokenizer_whitespace(ch) => None,
            Some('/') | Some('>') => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
                None
            }
            Some('=') => {
                self.report(sink, ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName);
                self.start_new_attribute();
                // The offending `=` seeds the attribute name verbatim.
                self.current_attr_name.push('=');
                self.transition_to(TokenizerState::AttributeName);
                None
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
                None
            }
            None => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
                None
            }
        }
    }

    fn step_attribute_name(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some(ch) if is_tokenizer_whitespace(ch) || ch == '/' || ch == '>' => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
                None
            }
            Some('=') => {
                self.transition_to(TokenizerState::BeforeAttributeValue);
                None
            }
            Some(ch @ ('"' | '\'' | '<')) => {
                self.report(sink, ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.current_attr_name.push(to_ascii_lower(ch));
                None
            }
            Some(ch) => {
                self.current_attr_name.push(to_ascii_lower(ch));
                None
            }
            None => {
                self.reconsume_in(TokenizerState::AfterAttributeName);
                None
            }
        }
    }

    fn step_after_attribute_name(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some(ch) if is_tokenizer_whitespace(ch) => None,
            Some('/') => {
                self.transition_to(TokenizerState::SelfClosingStartTag);
                None
            }
            Some('=') => {
                self.transition_to(TokenizerState::BeforeAttributeValue);
                None
            }
            Some('>') => {
                self.transition_to(TokenizerState::Data);
                Some(self.emit_current_tag())
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
                None
            }
            None => {
                self.report(sink, ParseErrorCode::EofInTag);
                Some(Token::EndOfFile)
            }
        }
    }

    fn step_before_attribute_value(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some(ch) if is_tokenizer_whitespace(ch) => None,
            Some('"') => {
                self.transition_to(TokenizerState::AttributeValueDoubleQuoted);
                None
            }
            Some('\'') => {
                self.transition_to(TokenizerState::AttributeValueSingleQuoted);
                None
            }
            Some('>') => {
                self.report(sink, ParseErrorCode::MissingAttributeValue);
                self.transition_to(TokenizerState::Data);
                Some(self.emit_current_tag())
            }
            Some(_) => {
                self.reconsume_in(TokenizerState::AttributeValueUnquoted);
                None
            }
            None => {
                self.reconsume_in(TokenizerState::AttributeValueUnquoted);
                None
            }
        }
    }

    fn step_attribute_value_quoted(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
        quote: char,
    ) -> Option<Token> {
        match c {
            Some(ch) if ch == quote => {
                self.transition_to(TokenizerState::AfterAttributeValueQuoted);
                None
            }
            Some(ch) => {
                self.current_attr_value.push(ch);
                None
            }
            None => {
                self.report(sink, ParseErrorCode::EofInTag);
                Some(Token::EndOfFile)
            }
        }
    }

    fn step_attribute_value_unquoted(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some(ch) if is_tokenizer_whitespace(ch) => {
                self.transition_to(TokenizerState::BeforeAttributeName);
                None
            }
            Some('>') => {
                self.transition_to(TokenizerState::Data);
                Some(self.emit_current_tag())
            }
            Some(ch @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.report(
                    sink,
                    ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue,
                );
                self.current_attr_value.push(ch);
                None
            }
            Some(ch) => {
                self.current_attr_value.push(ch);
                None
            }
            None => {
                self.report(sink, ParseErrorCode::EofInTag);
                Some(Token::EndOfFile)
            }
        }
    }

    fn step_after_attribute_value_quoted(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some(ch) if is_tokenizer_whitespace(ch) => {
                self.transition_to(TokenizerState::BeforeAttributeName);
                None
            }
            Some('/') => {
                self.transition_to(TokenizerState::SelfClosingStartTag);
                None
            }
            Some('>') => {
                self.transition_to(TokenizerState::Data);
                Some(self.emit_current_tag())
            }
            Some(_) => {
                self.report(sink, ParseErrorCode::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
                None
            }
            None => {
                self.report(sink, ParseErrorCode::EofInTag);
                Some(Token::EndOfFile)
            }
        }
    }

    fn step_self_closing_start_tag(
        &mut self,
        c: Option<char>,
        sink: &mut dyn ParseErrorSink,
    ) -> Option<Token> {
        match c {
            Some('>') => {
                self.current_tag_self_closing = true;
                self.transition_to(TokenizerState::Data);
                Some(self.emit_current_tag())
            }
            Some(_) => {
                self.report(sink, ParseErrorCode::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
                None
            }
            None => {
                self.report(sink, ParseErrorCode::EofInTag);
                Some(Token::EndOfFile)
            }
        }
    }

    fn step_comment(&mut self, c: Option<char>, sink: &mut dyn ParseErrorSink) -> Option<Token> {
        match c {
            Some('>') => {
                self.transition_to(TokenizerState::Data);
                None
            }
            Some(_) => {
                // Absorb the rest of the body in one scan. `>` is ASCII and
                // cannot appear inside a UTF-8 continuation sequence.
                match memchr(b'>', &self.input.as_bytes()[self.pos..]) {
                    Some(rel) => {
                        self.pos += rel + 1;
                        self.transition_to(TokenizerState::Data);
                    }
                    None => {
                        self.pos = self.input.len();
                    }
                }
                None
            }
            None => {
                self.report(sink, ParseErrorCode::EofInComment);
                Some(Token::EndOfFile)
            }
        }
    }

    // Scratch state for the tag under construction.

    fn begin_tag(&mut self, kind: TagKind) {
        self.current_tag_kind = kind;
        self.current_tag_name.clear();
        self.current_tag_self_closing = false;
        self.current_tag_attrs.clear();
        self.clear_current_attribute();
    }

    /// Commit the in-progress attribute, then reset attribute scratch.
    fn start_new_attribute(&mut self) {
        self.finalize_current_attribute();
        self.clear_current_attribute();
    }

    fn clear_current_attribute(&mut self) {
        self.current_attr_name.clear();
        self.current_attr_value.clear();
    }

    /// Commit the in-progress attribute to the current tag.
    ///
    /// An attribute with an empty name is dropped, value included; names are
    /// non-empty on every reachable path that accumulates a value.
    fn finalize_current_attribute(&mut self) {
        if self.current_attr_name.is_empty() {
            self.current_attr_value.clear();
            return;
        }
        let name = std::mem::take(&mut self.current_attr_name);
        let value = std::mem::take(&mut self.current_attr_value);
        self.current_tag_attrs.push(Attribute { name, value });
    }

    fn emit_current_tag(&mut self) -> Token {
        self.finalize_current_attribute();
        let tag = Tag {
            name: std::mem::take(&mut self.current_tag_name),
            self_closing: self.current_tag_self_closing,
            attributes: std::mem::take(&mut self.current_tag_attrs),
        };
        self.current_tag_self_closing = false;
        self.clear_current_attribute();
        match self.current_tag_kind {
            TagKind::Start => Token::StartTag(tag),
            TagKind::End => Token::EndTag(tag),
        }
    }
}

/// Tokenize a whole input with the default log sink.
///
/// Returns every token in emission order, `EndOfFile` included.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input);
    let mut sink = crate::error::LogErrorSink;
    let mut out = Vec::new();
    loop {
        let token = tokenizer.next(&mut sink);
        let done = token.is_eof();
        out.push(token);
        if done {
            return out;
        }
    }
}
