//! The two-level symbol table.
//!
//! AMPL has no nested subroutines, so at most two scopes are live: the
//! global scope and the body of the subroutine being compiled. While a
//! subroutine scope is open the global scope is kept aside as the saved
//! scope; only callables are visible through it.

use crate::scope::{Scope, ShiftHash};
use crate::symbol::IdProperty;
use ampl_core::collections::{HashTableError, Insertion};
use ampl_core::text::SourcePos;
use ampl_diagnostics::{messages, Diagnostic};
use ampl_options::SymbolOptions;
use std::fmt;
use thiserror::Error;

/// First offset handed out in a fresh scope.
const FIRST_OFFSET: u32 = 1;

/// Symbol table failures. These are reported to the parser, which decides
/// whether compilation continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    #[error("symbol table has no active scope")]
    Uninitialized,
    #[error("multiple definition of '{0}'")]
    Duplicate(String),
    #[error("subroutine '{0}' cannot be nested in another subroutine")]
    NestedSubroutine(String),
    #[error("symbol table storage failure: {0}")]
    Storage(#[from] HashTableError),
}

impl SymbolError {
    /// Convert to a diagnostic at the position of the offending name.
    pub fn to_diagnostic(&self, pos: SourcePos) -> Diagnostic {
        match self {
            SymbolError::Uninitialized => {
                Diagnostic::at(pos, &messages::SYMBOL_TABLE_NOT_INITIALISED, &[])
            }
            SymbolError::Duplicate(name) => {
                Diagnostic::at(pos, &messages::MULTIPLE_DEFINITION_OF_0, &[name.as_str()])
            }
            SymbolError::NestedSubroutine(name) => {
                Diagnostic::at(pos, &messages::NESTED_SUBROUTINE_0, &[name.as_str()])
            }
            SymbolError::Storage(err) => Diagnostic::at(
                pos,
                &messages::SYMBOL_TABLE_STORAGE_0,
                &[err.to_string().as_str()],
            ),
        }
    }
}

/// The symbol table: an active scope and, inside a subroutine, the saved
/// global scope.
pub struct SymbolTable {
    active: Option<Scope>,
    saved: Option<Scope>,
    /// Offset of the next variable inserted into the active scope.
    next_offset: u32,
    options: SymbolOptions,
}

impl SymbolTable {
    /// Create a table with an empty global scope.
    pub fn new() -> Result<Self, SymbolError> {
        Self::with_options(SymbolOptions::default())
    }

    pub fn with_options(options: SymbolOptions) -> Result<Self, SymbolError> {
        let global = Self::new_scope(&options)?;
        Ok(Self {
            active: Some(global),
            saved: None,
            next_offset: FIRST_OFFSET,
            options,
        })
    }

    fn new_scope(options: &SymbolOptions) -> Result<Scope, SymbolError> {
        Ok(Scope::with_load_factor(options.load_factor, ShiftHash)?)
    }

    /// Whether a subroutine scope is currently open.
    pub fn in_subroutine(&self) -> bool {
        self.saved.is_some()
    }

    /// Declare subroutine `name` in the active scope and enter its body.
    ///
    /// The subroutine's own name stays visible from inside its body since
    /// callables are looked up through the saved scope.
    pub fn open_subroutine_scope(
        &mut self,
        name: impl Into<String>,
        property: IdProperty,
    ) -> Result<(), SymbolError> {
        let name = name.into();
        if self.active.is_none() {
            return Err(SymbolError::Uninitialized);
        }
        if self.in_subroutine() {
            return Err(SymbolError::NestedSubroutine(name));
        }

        let scope = Self::new_scope(&self.options)?;
        tracing::debug!(name = %name, ty = %property.ty, "opening subroutine scope");
        self.insert(name, property)?;

        self.saved = self.active.replace(scope);
        self.next_offset = FIRST_OFFSET;
        Ok(())
    }

    /// Leave the subroutine body and reactivate the global scope.
    ///
    /// Does nothing unless a subroutine scope is open.
    pub fn close_subroutine_scope(&mut self) {
        let Some(global) = self.saved.take() else {
            return;
        };
        if let Some(scope) = self.active.replace(global) {
            tracing::debug!(
                names = scope.len(),
                width = self.next_offset,
                "closing subroutine scope"
            );
        }
        self.next_offset = 0;
    }

    /// Declare `name` in the active scope.
    ///
    /// Variables receive the next offset; callables never consume one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        mut property: IdProperty,
    ) -> Result<(), SymbolError> {
        let scope = self.active.as_mut().ok_or(SymbolError::Uninitialized)?;
        let is_variable = property.is_variable();
        property.offset = is_variable.then_some(self.next_offset);

        match scope.insert(name.into(), property)? {
            Insertion::Inserted => {
                if is_variable {
                    self.next_offset += 1;
                }
                Ok(())
            }
            Insertion::Exists(name, _) => {
                tracing::debug!(name = %name, "duplicate declaration");
                Err(SymbolError::Duplicate(name))
            }
        }
    }

    /// Look up `name`: the active scope first, then callables in the saved
    /// scope.
    pub fn find(&self, name: &str) -> Option<&IdProperty> {
        self.active
            .as_ref()
            .and_then(|scope| scope.search(name))
            .or_else(|| {
                self.saved
                    .as_ref()
                    .and_then(|scope| scope.search(name))
                    .filter(|property| property.is_callable())
            })
    }

    /// One past the highest offset assigned in the active scope; the width
    /// of the local variable frame.
    pub fn current_variable_count(&self) -> u32 {
        self.next_offset
    }

    /// Drop the active scope and its entries. The saved scope is left alone.
    pub fn release(&mut self) {
        if let Some(scope) = self.active.take() {
            tracing::debug!(names = scope.len(), "released active scope");
        }
    }

    /// The active scope's buckets, one line each, entries rendered as
    /// `name@offset[type]`.
    pub fn debug_dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active {
            Some(scope) => scope.write_buckets(f, |f, name, property| {
                write!(f, "{}{}", name, property)
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("active", &self.active)
            .field("saved", &self.saved)
            .field("next_offset", &self.next_offset)
            .finish()
    }
}
