//! The AMPL scanner.
//!
//! Reads a byte stream with one byte of lookahead and turns it into tokens.
//! Every token records the line and column of its first byte. Fatal lexical
//! errors are returned to the caller; "number too large" and "identifier too
//! long" are recorded as diagnostics and scanning carries on.

use crate::char_codes::*;
use crate::error::{LexError, LexErrorKind};
use crate::token::{Token, TokenKind};
use ampl_core::text::SourcePos;
use ampl_diagnostics::{Diagnostic, DiagnosticCollection};
use ampl_options::ScannerOptions;
use std::io::{self, BufReader, Bytes, Read};

/// Initial capacity of a string literal buffer; it doubles when full.
const INITIAL_STRING_CAPACITY: usize = 64;

/// The scanner converts AMPL source text into tokens.
pub struct Scanner<R> {
    /// The source byte stream.
    input: Bytes<BufReader<R>>,
    /// The lookahead byte, `None` at end of input.
    ch: Option<u8>,
    /// Position of the lookahead byte.
    pos: SourcePos,
    /// Whether the first byte has been read.
    primed: bool,
    /// Set once the iterator has yielded end-of-file or an error.
    finished: bool,
    options: ScannerOptions,
    /// Recoverable errors seen so far.
    diagnostics: DiagnosticCollection,
}

impl<'a> Scanner<&'a [u8]> {
    /// Create a scanner over an in-memory source text.
    pub fn from_source(text: &'a str) -> Self {
        Scanner::new(text.as_bytes())
    }
}

impl<R: Read> Scanner<R> {
    /// Create a scanner with the default options.
    pub fn new(input: R) -> Self {
        Self::with_options(input, ScannerOptions::default())
    }

    pub fn with_options(input: R, options: ScannerOptions) -> Self {
        Self {
            input: BufReader::new(input).bytes(),
            ch: None,
            pos: SourcePos::start(),
            primed: false,
            finished: false,
            options,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn options(&self) -> &ScannerOptions {
        &self.options
    }

    /// Position of the next unread byte.
    pub fn position(&self) -> SourcePos {
        self.pos
    }

    /// Get the accumulated diagnostics.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    fn read_byte(&mut self) -> Result<Option<u8>, LexError> {
        match self.input.next() {
            None => Ok(None),
            Some(Ok(byte)) => Ok(Some(byte)),
            Some(Err(err)) => Err(self.io_error(err)),
        }
    }

    fn io_error(&self, err: io::Error) -> LexError {
        LexError::new(LexErrorKind::Io(err.to_string()), self.pos)
    }

    /// Consume the lookahead byte and read the next one.
    fn next_char(&mut self) -> Result<(), LexError> {
        self.pos = match self.ch {
            None => return Ok(()),
            Some(LINE_FEED) => self.pos.next_line(),
            Some(TAB) => self.pos.advance(self.options.tab_width),
            Some(_) => self.pos.advance(1),
        };
        self.ch = self.read_byte()?;
        Ok(())
    }

    fn prime(&mut self) -> Result<(), LexError> {
        if !self.primed {
            self.primed = true;
            self.ch = self.read_byte()?;
        }
        Ok(())
    }

    fn skip_white_space(&mut self) -> Result<(), LexError> {
        while self.ch.is_some_and(is_white_space) {
            self.next_char()?;
        }
        Ok(())
    }

    /// Record a recoverable error and keep scanning.
    fn report(&mut self, kind: LexErrorKind, pos: SourcePos) {
        let error = LexError::new(kind, pos);
        tracing::debug!(%error, "recoverable lexical error");
        self.diagnostics.add(Diagnostic::from(&error));
    }

    /// Scan the next token.
    ///
    /// After end of input every call returns another `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.prime()?;

        loop {
            self.skip_white_space()?;
            let start = self.pos;

            let Some(ch) = self.ch else {
                return Ok(Token::new(TokenKind::Eof, start));
            };

            let token = match ch {
                OPEN_BRACE => {
                    self.skip_comment()?;
                    continue;
                }
                c if is_identifier_start(c) => self.scan_word(start)?,
                c if c.is_ascii_digit() => self.scan_number(start)?,
                DOUBLE_QUOTE => self.scan_string(start)?,

                b'=' => self.single(TokenKind::Eq, start)?,
                b'+' => self.single(TokenKind::Plus, start)?,
                b'*' => self.single(TokenKind::Mul, start)?,
                b':' => self.single(TokenKind::Colon, start)?,
                b',' => self.single(TokenKind::Comma, start)?,
                b'[' => self.single(TokenKind::LBrack, start)?,
                b']' => self.single(TokenKind::RBrack, start)?,
                b'(' => self.single(TokenKind::LParen, start)?,
                b')' => self.single(TokenKind::RParen, start)?,
                b';' => self.single(TokenKind::Semicolon, start)?,

                b'.' => self.scan_dot(start)?,
                b'>' => self.either(b'=', TokenKind::Ge, TokenKind::Gt, start)?,
                b'<' => self.either(b'=', TokenKind::Le, TokenKind::Lt, start)?,
                b'/' => self.either(b'=', TokenKind::Ne, TokenKind::Div, start)?,
                b'-' => self.either(b'>', TokenKind::Arrow, TokenKind::Minus, start)?,

                _ => {
                    self.next_char()?;
                    return Err(LexError::new(LexErrorKind::IllegalCharacter(ch), start));
                }
            };

            tracing::trace!(kind = ?token.kind, pos = %token.pos, "token");
            return Ok(token);
        }
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn single(&mut self, kind: TokenKind, start: SourcePos) -> Result<Token, LexError> {
        self.next_char()?;
        Ok(Token::new(kind, start))
    }

    /// `pair` if the byte after the current one is `second`, else `lone`.
    fn either(
        &mut self,
        second: u8,
        pair: TokenKind,
        lone: TokenKind,
        start: SourcePos,
    ) -> Result<Token, LexError> {
        self.next_char()?;
        if self.ch == Some(second) {
            self.next_char()?;
            Ok(Token::new(pair, start))
        } else {
            Ok(Token::new(lone, start))
        }
    }

    fn scan_dot(&mut self, start: SourcePos) -> Result<Token, LexError> {
        self.next_char()?;
        if self.ch == Some(b'.') {
            self.next_char()?;
            Ok(Token::new(TokenKind::DotDot, start))
        } else {
            Err(LexError::new(LexErrorKind::IllegalCharacter(b'.'), start))
        }
    }

    /// Skip a comment, including nested ones. The lookahead is the opening
    /// brace on entry and the byte after the matching close brace on exit.
    fn skip_comment(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.ch {
                None => return Err(LexError::new(LexErrorKind::UnterminatedComment, start)),
                Some(OPEN_BRACE) => depth += 1,
                Some(CLOSE_BRACE) => {
                    depth -= 1;
                    if depth == 0 {
                        return self.next_char();
                    }
                }
                Some(_) => {}
            }
            self.next_char()?;
        }
    }

    fn scan_word(&mut self, start: SourcePos) -> Result<Token, LexError> {
        let max_len = self.options.max_id_length;
        let mut lexeme = String::new();
        let mut too_long = false;

        while let Some(c) = self.ch.filter(|&c| is_identifier_part(c)) {
            if lexeme.len() < max_len {
                lexeme.push(char::from(c));
            } else {
                too_long = true;
            }
            self.next_char()?;
        }

        if too_long {
            self.report(LexErrorKind::IdentifierTooLong, start);
        }

        Ok(match TokenKind::from_keyword(&lexeme) {
            Some(keyword) => Token::new(keyword, start),
            None => Token::new(TokenKind::Id, start).with_text(lexeme),
        })
    }

    fn scan_number(&mut self, start: SourcePos) -> Result<Token, LexError> {
        let mut value: i32 = 0;
        let mut overflowed = false;

        while let Some(c) = self.ch.filter(u8::is_ascii_digit) {
            if !overflowed {
                match value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(i32::from(c - b'0')))
                {
                    Some(next) => value = next,
                    None => overflowed = true,
                }
            }
            self.next_char()?;
        }

        if overflowed {
            self.report(LexErrorKind::NumberTooLarge, start);
        }

        Ok(Token::new(TokenKind::Num, start).with_number(value))
    }

    fn scan_string(&mut self, start: SourcePos) -> Result<Token, LexError> {
        self.next_char()?; // skip opening quote
        let mut text = String::with_capacity(INITIAL_STRING_CAPACITY);

        loop {
            let pos = self.pos;
            match self.ch {
                None => return Err(LexError::new(LexErrorKind::UnterminatedString, start)),
                Some(DOUBLE_QUOTE) => {
                    self.next_char()?;
                    break;
                }
                Some(BACKSLASH) => {
                    self.next_char()?;
                    let escaped = match self.ch {
                        Some(b'n') => '\n',
                        Some(b't') => '\t',
                        Some(DOUBLE_QUOTE) => '"',
                        Some(BACKSLASH) => '\\',
                        Some(c) => {
                            return Err(LexError::new(LexErrorKind::IllegalEscape(c), pos))
                        }
                        None => {
                            return Err(LexError::new(LexErrorKind::UnterminatedString, start))
                        }
                    };
                    text.push(escaped);
                }
                Some(c) if !is_printable(c) => {
                    return Err(LexError::new(LexErrorKind::NonPrintableInString(c), pos));
                }
                Some(c) => text.push(char::from(c)),
            }
            self.next_char()?;
        }

        Ok(Token::new(TokenKind::Str, start).with_text(text))
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to and including `Eof`, or up to the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        self.finished = match &result {
            Ok(token) => token.kind == TokenKind::Eof,
            Err(_) => true,
        };
        Some(result)
    }
}
