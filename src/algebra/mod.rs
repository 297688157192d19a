//! The symbolic algebra system.
//!
//! Condition lines go through [`parse()`], which uses a [`Dictionary`] to
//! turn `name<index>` identifiers into [`Id`]s. Each resulting [`Equation`]
//! is then brought into final form with [`Equation::canonicalize()`] and
//! flattened into a [`Polynomial`].

pub mod dictionary;
mod equations;
mod expr;
mod matrix;
pub mod ops;
mod parse;
mod polynomial;
mod symbols;

pub use dictionary::{Dictionary, DictionaryError, Id, IdKind};
pub use equations::Equation;
pub use expr::{BinaryOperation, Expression};
pub use matrix::Matrix;
pub use ops::{Canonical, FinalizeError};
pub use parse::{parse, ErrorKind, Lexer, ParseError, Token, TokenKind};
pub use polynomial::Polynomial;
pub use symbols::SymbolTable;
