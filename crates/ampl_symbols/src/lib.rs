//! ampl_symbols: Symbol table and scope management.
//!
//! Maps identifiers to their properties in the global scope and in the
//! body of the subroutine being compiled, and hands out local variable
//! offsets in declaration order.

mod scope;
mod symbol;
mod table;

pub use scope::{Scope, ShiftHash};
pub use symbol::{IdProperty, ValueType};
pub use table::{SymbolError, SymbolTable};
