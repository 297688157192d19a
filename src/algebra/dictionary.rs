//! Mapping between `name<index>` identifiers and the single integer axis used
//! by the rest of the algebra system.
//!
//! | Range       | Meaning                                                   |
//! |-------------|-----------------------------------------------------------|
//! | `id >= 0`   | auxiliary quantity, `symbol_count * index + offset(name)` |
//! | `id == -1`  | the constant term                                         |
//! | `id == -2`  | invalid, never appears in a valid tree                    |
//! | `id <= -10` | component of the unknown vector, `-10 - index`            |

use crate::algebra::SymbolTable;
use std::fmt::{self, Display, Formatter};

/// An identifier on the unified integer axis.
pub type Id = i64;

/// The id of the constant term in a polynomial.
pub const CONSTANT: Id = -1;
/// Returned when a `name<index>` pair can't be resolved.
pub const INVALID: Id = -2;
/// The id of `x0`. Other unknowns count downwards from here.
pub const UNKNOWN_BASE: Id = -10;

/// What an [`Id`] refers to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum IdKind {
    Constant,
    Invalid,
    /// Component `n` of the unknown vector.
    Unknown(usize),
    /// An auxiliary quantity, which is also the index of the coefficient row
    /// defining it.
    Auxiliary(usize),
}

impl IdKind {
    pub fn of(id: Id) -> IdKind {
        if id >= 0 {
            IdKind::Auxiliary(id as usize)
        } else if id <= UNKNOWN_BASE {
            IdKind::Unknown((UNKNOWN_BASE - id) as usize)
        } else if id == CONSTANT {
            IdKind::Constant
        } else {
            IdKind::Invalid
        }
    }
}

/// The id of component `index` of the unknown vector.
pub fn unknown(index: usize) -> Id { UNKNOWN_BASE - index as Id }

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DictionaryError {
    #[error("the name of the unknown can not be empty")]
    EmptyUnknownName,
}

/// Resolves `name<index>` pairs against the unknown's name and the table of
/// auxiliary quantities.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dictionary<'a> {
    unknown_name: &'a str,
    symbols: &'a SymbolTable,
}

impl<'a> Dictionary<'a> {
    pub fn new(
        unknown_name: &'a str,
        symbols: &'a SymbolTable,
    ) -> Result<Self, DictionaryError> {
        if unknown_name.is_empty() {
            return Err(DictionaryError::EmptyUnknownName);
        }

        Ok(Dictionary {
            unknown_name,
            symbols,
        })
    }

    pub fn unknown_name(&self) -> &'a str { self.unknown_name }

    pub fn symbols(&self) -> &'a SymbolTable { self.symbols }

    /// Get the [`Id`] for `name<index>`, or [`INVALID`] if `name` is neither
    /// the unknown nor a registered auxiliary quantity.
    pub fn resolve(&self, name: &str, index: usize) -> Id {
        if name == self.unknown_name {
            return unknown(index);
        }

        match self.symbols.lookup(name) {
            Some(offset) => (self.symbols.len() * index + offset) as Id,
            None => INVALID,
        }
    }

    /// The inverse of [`Dictionary::resolve()`].
    pub fn name_of(&self, id: Id) -> Option<(&'a str, usize)> {
        match IdKind::of(id) {
            IdKind::Unknown(index) => Some((self.unknown_name, index)),
            IdKind::Auxiliary(row) if !self.symbols.is_empty() => {
                let count = self.symbols.len();
                let name = self.symbols.name(row % count)?;
                Some((name, row / count))
            },
            _ => None,
        }
    }

    /// Get something which will print an [`Id`] the way it was written.
    pub fn display(&self, id: Id) -> impl Display + 'a {
        DisplayId { dict: *self, id }
    }
}

struct DisplayId<'a> {
    dict: Dictionary<'a>,
    id: Id,
}

impl Display for DisplayId<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.dict.name_of(self.id) {
            Some((name, index)) => write!(f, "{}{}", name, index),
            None => write!(f, "#{}", self.id),
        }
    }
}
