//! Lexical errors.

use ampl_core::text::SourcePos;
use ampl_diagnostics::{messages, Diagnostic};
use thiserror::Error;

fn shown(byte: &u8) -> char {
    char::from(*byte)
}

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("illegal character '{}' (ASCII #{})", shown(.0), .0)]
    IllegalCharacter(u8),
    #[error("string not closed")]
    UnterminatedString,
    #[error("illegal escape code '\\{}' in string", shown(.0))]
    IllegalEscape(u8),
    #[error("non-printable character (ASCII #{0}) in string")]
    NonPrintableInString(u8),
    #[error("number too large")]
    NumberTooLarge,
    #[error("identifier too long")]
    IdentifierTooLong,
    #[error("comment not closed")]
    UnterminatedComment,
    #[error("cannot read source: {0}")]
    Io(String),
}

impl LexErrorKind {
    /// Errors the scanner records and scans past instead of returning.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LexErrorKind::NumberTooLarge | LexErrorKind::IdentifierTooLong)
    }
}

/// A lexical error at a source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pos}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub pos: SourcePos,
}

impl LexError {
    pub fn new(kind: LexErrorKind, pos: SourcePos) -> Self {
        Self { kind, pos }
    }
}

impl From<&LexError> for Diagnostic {
    fn from(error: &LexError) -> Self {
        let pos = error.pos;
        match &error.kind {
            LexErrorKind::IllegalCharacter(byte) => Diagnostic::at(
                pos,
                &messages::ILLEGAL_CHARACTER,
                &[shown(byte).to_string().as_str(), byte.to_string().as_str()],
            ),
            LexErrorKind::UnterminatedString => {
                Diagnostic::at(pos, &messages::STRING_NOT_CLOSED, &[])
            }
            LexErrorKind::IllegalEscape(byte) => Diagnostic::at(
                pos,
                &messages::ILLEGAL_ESCAPE_CODE,
                &[shown(byte).to_string().as_str()],
            ),
            LexErrorKind::NonPrintableInString(byte) => Diagnostic::at(
                pos,
                &messages::NON_PRINTABLE_CHARACTER_IN_STRING,
                &[byte.to_string().as_str()],
            ),
            LexErrorKind::NumberTooLarge => Diagnostic::at(pos, &messages::NUMBER_TOO_LARGE, &[]),
            LexErrorKind::IdentifierTooLong => {
                Diagnostic::at(pos, &messages::IDENTIFIER_TOO_LONG, &[])
            }
            LexErrorKind::UnterminatedComment => {
                Diagnostic::at(pos, &messages::COMMENT_NOT_CLOSED, &[])
            }
            LexErrorKind::Io(reason) => {
                Diagnostic::at(pos, &messages::CANNOT_READ_SOURCE, &[reason.as_str()])
            }
        }
    }
}
