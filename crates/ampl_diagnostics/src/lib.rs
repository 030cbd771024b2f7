//! ampl_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Diagnostics carry a message code, a category, the resolved message text
//! and, when known, the file and source position they refer to. The scanner
//! collects its recoverable complaints here, and fatal lexical errors convert
//! into the same shape so a driver has a single thing to print.

use ampl_core::text::SourcePos;
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1001, 2001).
    pub code: u32,
    /// The category of this diagnostic.
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file this diagnostic refers to, if any.
    pub file: Option<String>,
    /// The source position this diagnostic refers to, if any.
    pub pos: Option<SourcePos>,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// The category.
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            pos: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic anchored at a source position.
    pub fn at(pos: SourcePos, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            pos: Some(pos),
            ..Self::new(message, args)
        }
    }

    /// Attach the file name this diagnostic belongs to.
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:", file)?;
        }
        if let Some(pos) = self.pos {
            write!(f, "{}:", pos)?;
        }
        if self.file.is_some() || self.pos.is_some() {
            write!(f, " ")?;
        }
        write!(f, "{}: {}", self.category, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during compilation.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const ILLEGAL_CHARACTER: DiagnosticMessage =
        diag!(1001, Error, "illegal character '{0}' (ASCII #{1})");
    pub const STRING_NOT_CLOSED: DiagnosticMessage = diag!(1002, Error, "string not closed");
    pub const ILLEGAL_ESCAPE_CODE: DiagnosticMessage =
        diag!(1003, Error, "illegal escape code '\\{0}' in string");
    pub const NON_PRINTABLE_CHARACTER_IN_STRING: DiagnosticMessage =
        diag!(1004, Error, "non-printable character (ASCII #{0}) in string");
    pub const NUMBER_TOO_LARGE: DiagnosticMessage = diag!(1005, Error, "number too large");
    pub const IDENTIFIER_TOO_LONG: DiagnosticMessage = diag!(1006, Error, "identifier too long");
    pub const COMMENT_NOT_CLOSED: DiagnosticMessage = diag!(1007, Error, "comment not closed");
    pub const CANNOT_READ_SOURCE: DiagnosticMessage = diag!(1008, Error, "cannot read source: {0}");

    // ========================================================================
    // Symbol table errors (2000-2099)
    // ========================================================================
    pub const MULTIPLE_DEFINITION_OF_0: DiagnosticMessage =
        diag!(2001, Error, "multiple definition of '{0}'");
    pub const SYMBOL_TABLE_NOT_INITIALISED: DiagnosticMessage =
        diag!(2002, Error, "symbol table has no active scope");
    pub const NESTED_SUBROUTINE_0: DiagnosticMessage =
        diag!(2003, Error, "subroutine '{0}' cannot be nested in another subroutine");
    pub const SYMBOL_TABLE_STORAGE_0: DiagnosticMessage =
        diag!(2004, Error, "symbol table storage failure: {0}");

    // ========================================================================
    // Driver messages (6000-6099)
    // ========================================================================
    pub const CANNOT_OPEN_FILE_0: DiagnosticMessage = diag!(6001, Error, "cannot open file '{0}'");
    pub const INVALID_CONFIGURATION_0: DiagnosticMessage =
        diag!(6002, Error, "invalid configuration: {0}");
    pub const EMPTY_SOURCE_FILE_0: DiagnosticMessage =
        diag!(6003, Warning, "source file '{0}' contains no tokens");
}
