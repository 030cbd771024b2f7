//! Identifier properties stored in the symbol table.

use std::fmt;

bitflags::bitflags! {
    /// The semantic type of an identifier.
    ///
    /// A variable is `INTEGER` or `BOOLEAN`, optionally with `ARRAY`. A
    /// subroutine carries `CALLABLE`; a function also carries its return type,
    /// a procedure carries nothing else.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValueType: u8 {
        const NONE     = 0;
        const ARRAY    = 1 << 0;
        const BOOLEAN  = 1 << 1;
        const INTEGER  = 1 << 2;
        const CALLABLE = 1 << 3;

        const SCALAR = Self::BOOLEAN.bits() | Self::INTEGER.bits();
    }
}

impl ValueType {
    /// Whether the type denotes a variable, i.e. anything that is not callable.
    pub fn is_variable(self) -> bool {
        !self.is_callable()
    }

    pub fn is_callable(self) -> bool {
        self.contains(ValueType::CALLABLE)
    }

    pub fn is_array(self) -> bool {
        self.contains(ValueType::ARRAY)
    }

    /// A subroutine with a return type.
    pub fn is_function(self) -> bool {
        self.is_callable() && self.intersects(ValueType::SCALAR)
    }

    /// A subroutine without a return type.
    pub fn is_procedure(self) -> bool {
        self.is_callable() && !self.intersects(ValueType::SCALAR)
    }

    /// The type with the callable marker removed: the element type of a
    /// variable, the return type of a function.
    pub fn base(self) -> ValueType {
        self - ValueType::CALLABLE
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scalar = if self.contains(ValueType::INTEGER) {
            Some("integer")
        } else if self.contains(ValueType::BOOLEAN) {
            Some("boolean")
        } else {
            None
        };

        match (scalar, self.is_callable()) {
            (None, true) => return f.write_str("procedure"),
            (None, false) => return f.write_str("none"),
            (Some(name), _) => f.write_str(name)?,
        }
        if self.is_array() {
            f.write_str(" array")?;
        }
        if self.is_callable() {
            f.write_str(" function")?;
        }
        Ok(())
    }
}

/// What the symbol table records about an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdProperty {
    /// The identifier's type.
    pub ty: ValueType,
    /// Local variable slot, assigned on insertion. Callables never get one.
    pub offset: Option<u32>,
    /// Parameter types of a subroutine, in declaration order.
    pub params: Vec<ValueType>,
}

impl IdProperty {
    pub fn new(ty: ValueType) -> Self {
        Self {
            ty,
            offset: None,
            params: Vec::new(),
        }
    }

    /// A scalar variable of type `ty` (`INTEGER` or `BOOLEAN`).
    pub fn variable(ty: ValueType) -> Self {
        Self::new(ty.base())
    }

    /// An array variable with elements of type `element`.
    pub fn array(element: ValueType) -> Self {
        Self::new(element.base() | ValueType::ARRAY)
    }

    pub fn procedure(params: Vec<ValueType>) -> Self {
        Self {
            params,
            ..Self::new(ValueType::CALLABLE)
        }
    }

    /// A function returning `returns` and taking `params`.
    pub fn function(returns: ValueType, params: Vec<ValueType>) -> Self {
        Self {
            params,
            ..Self::new(returns.base() | ValueType::CALLABLE)
        }
    }

    pub fn is_variable(&self) -> bool {
        self.ty.is_variable()
    }

    pub fn is_callable(&self) -> bool {
        self.ty.is_callable()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for IdProperty {
    /// Renders `@offset[type]`, or `@_[type]` for callables.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) if !self.is_callable() => write!(f, "@{}[{}]", offset, self.ty),
            _ => write!(f, "@_[{}]", self.ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_strings() {
        assert_eq!(ValueType::INTEGER.to_string(), "integer");
        assert_eq!((ValueType::BOOLEAN | ValueType::ARRAY).to_string(), "boolean array");
        assert_eq!((ValueType::INTEGER | ValueType::CALLABLE).to_string(), "integer function");
        assert_eq!(ValueType::CALLABLE.to_string(), "procedure");
        assert_eq!(ValueType::NONE.to_string(), "none");
    }

    #[test]
    fn test_type_predicates() {
        let function = ValueType::BOOLEAN | ValueType::CALLABLE;
        assert!(function.is_function());
        assert!(!function.is_procedure());
        assert!(!function.is_variable());
        assert_eq!(function.base(), ValueType::BOOLEAN);

        assert!(ValueType::CALLABLE.is_procedure());
        assert!((ValueType::INTEGER | ValueType::ARRAY).is_array());
        assert!(ValueType::INTEGER.is_variable());
    }

    #[test]
    fn test_constructors() {
        let array = IdProperty::array(ValueType::INTEGER);
        assert_eq!(array.ty, ValueType::INTEGER | ValueType::ARRAY);
        assert!(array.is_variable());

        let function = IdProperty::function(
            ValueType::INTEGER,
            vec![ValueType::INTEGER, ValueType::BOOLEAN | ValueType::ARRAY],
        );
        assert!(function.ty.is_function());
        assert_eq!(function.param_count(), 2);

        let procedure = IdProperty::procedure(Vec::new());
        assert!(procedure.ty.is_procedure());
        assert_eq!(procedure.offset, None);
    }

    #[test]
    fn test_property_display() {
        let mut x = IdProperty::variable(ValueType::INTEGER);
        x.offset = Some(3);
        assert_eq!(x.to_string(), "@3[integer]");
        assert_eq!(IdProperty::procedure(vec![]).to_string(), "@_[procedure]");
    }
}
