//! ampl_scanner: Lexer for AMPL source code.
//!
//! Turns a byte stream into tokens with one byte of lookahead. Each token
//! carries the line and column of its first character, which later stages
//! use to report errors.

mod char_codes;
mod error;
mod scanner;
mod token;

pub use error::{LexError, LexErrorKind};
pub use scanner::Scanner;
pub use token::{Token, TokenKind, TokenValue, RESERVED_WORDS};
