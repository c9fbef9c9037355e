//! HTML tokenization and the DOM node model it feeds.
//!
//! The tokenizer is a pull-based state machine over a fully materialized
//! input: callers repeatedly invoke [`Tokenizer::next`] and stop at
//! [`Token::EndOfFile`]. Parse errors are reported to a [`ParseErrorSink`]
//! and never interrupt tokenization. Tree construction is out of scope; the
//! [`dom`] module provides the node arena a tree builder would materialize
//! into.

pub mod chars;
pub mod dom;
mod error;
mod token;
pub mod token_fmt;
mod tokenizer;

pub use crate::error::{ErrorLog, LogErrorSink, ParseError, ParseErrorCode, ParseErrorSink};
pub use crate::token::{Attribute, Tag, Token};
pub use crate::tokenizer::{Tokenizer, TokenizerStats, tokenize};
