use crate::algebra::{
    dictionary::INVALID, BinaryOperation, Dictionary, Equation, Expression, Id,
};
use std::{
    fmt::{self, Display, Formatter},
    mem,
    ops::Range,
};

/// Parse a condition line (e.g. `"(x0 - 3)*5 = 1 + 1*4"`) into one
/// [`Equation`] per `=`.
pub fn parse(
    src: &str,
    dictionary: Dictionary<'_>,
) -> Result<Vec<Equation>, ParseError> {
    Parser::new(src, dictionary).parse()
}

/// A simple recursive descent parser (`LL(1)`) for converting a condition
/// line into equations.
///
/// The grammar:
///
/// ```text
/// conditions     := expression ("=" expression)+
///
/// expression     := term "+" expression
///                 | term "-" expression
///                 | term
///
/// term           := atom "*" term
///                 | atom "/" term
///                 | atom
///
/// atom           := "-" atom_tail
///                 | atom_tail
///
/// atom_tail      := IDENTIFIER
///                 | NUMBER
///                 | "(" expression ")"
/// ```
///
/// Both binary rules recurse on their right operand, so `a - b + c` groups
/// as `a - (b + c)`.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    forward: Token,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str, dictionary: Dictionary<'a>) -> Self {
        let mut lexer = Lexer::new(src, dictionary);
        let forward = lexer.token();

        Parser { lexer, forward }
    }

    pub(crate) fn parse(mut self) -> Result<Vec<Equation>, ParseError> {
        let equations = self.conditions()?;

        match self.forward.kind {
            TokenKind::EndOfInput => Ok(equations),
            _ => Err(self.leftover()),
        }
    }

    fn advance(&mut self) -> Token {
        let next = self.lexer.token();
        mem::replace(&mut self.forward, next)
    }

    fn conditions(&mut self) -> Result<Vec<Equation>, ParseError> {
        let leading = self.expression()?;

        match self.forward.kind {
            TokenKind::Equals => {},
            TokenKind::EndOfInput => {
                return Err(ParseError::new(
                    ErrorKind::SemanticError,
                    "expect at least one equation",
                ));
            },
            _ => return Err(self.leftover()),
        }

        let mut equations = Vec::new();

        while self.forward.kind == TokenKind::Equals {
            let _ = self.advance();
            let trailing = self.expression()?;
            equations.push(Equation::new(leading.clone(), trailing));
        }

        Ok(equations)
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        let left = self.term()?;

        self.then_right_part_of_binary_op(
            left,
            &[BinaryOperation::Plus, BinaryOperation::Minus],
            |p| p.expression(),
        )
    }

    fn term(&mut self) -> Result<Expression, ParseError> {
        let left = self.atom()?;

        self.then_right_part_of_binary_op(
            left,
            &[BinaryOperation::Times, BinaryOperation::Divide],
            |p| p.term(),
        )
    }

    fn then_right_part_of_binary_op<F>(
        &mut self,
        left: Expression,
        expected: &[BinaryOperation],
        then: F,
    ) -> Result<Expression, ParseError>
    where
        F: FnOnce(&mut Parser<'a>) -> Result<Expression, ParseError>,
    {
        if let Some(op) = self.forward.kind.as_binary_op() {
            if expected.contains(&op) {
                // skip past the operator
                let _ = self.advance();
                // and parse the second bit
                let right = then(self)?;

                return Ok(Expression::Binary {
                    left: Box::new(left),
                    right: Box::new(right),
                    op,
                });
            }
        }

        Ok(left)
    }

    fn atom(&mut self) -> Result<Expression, ParseError> {
        if self.forward.kind == TokenKind::Minus {
            let _ = self.advance();
            let operand = self.atom_tail()?;
            return Ok(-operand);
        }

        self.atom_tail()
    }

    fn atom_tail(&mut self) -> Result<Expression, ParseError> {
        let token = self.advance();

        match token.kind {
            TokenKind::Number(value) => Ok(Expression::Constant(value)),
            TokenKind::Identifier(id) => Ok(Expression::Identifier(id)),
            TokenKind::OpenParen => {
                let expr = self.expression()?;

                if self.forward.kind == TokenKind::CloseParen {
                    let _ = self.advance();
                    Ok(expr)
                } else {
                    Err(ParseError::new(
                        ErrorKind::ExpectedCharacter,
                        "missing or unmatched ')'",
                    ))
                }
            },
            TokenKind::EndOfInput => Err(ParseError::new(
                ErrorKind::UnexpectedEndOfInput,
                "unexpected EOF",
            )),
            TokenKind::Invalid(message) => {
                Err(ParseError::new(ErrorKind::InvalidToken, message))
            },
            TokenKind::Unexpected(c) => Err(ParseError::new(
                ErrorKind::UnexpectedCharacter,
                format!("unexpected character '{}'", c.escape_default()),
            )),
            _ => Err(ParseError::new(
                ErrorKind::UnexpectedCharacter,
                format!("unexpected operator '{}'", self.lexer.text(&token)),
            )),
        }
    }

    /// The error for a token which can't continue what we've parsed so far.
    fn leftover(&self) -> ParseError {
        match &self.forward.kind {
            TokenKind::Invalid(message) => {
                ParseError::new(ErrorKind::InvalidToken, message.clone())
            },
            _ => ParseError::new(
                ErrorKind::UnexpectedCharacter,
                format!(
                    "unrecognized content '{}'",
                    self.lexer.remainder_from(&self.forward)
                ),
            ),
        }
    }
}

/// The broad category an error falls into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input ended where a token was required.
    UnexpectedEndOfInput,
    /// Something which can't start a token, or trailing content after a
    /// complete parse.
    UnexpectedCharacter,
    /// A specific character or kind of token was required but missing.
    ExpectedCharacter,
    /// A malformed identifier, or a `name<index>` pair which can't be
    /// resolved.
    InvalidToken,
    /// Well formed, but meaningless.
    SemanticError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let description = match self {
            ErrorKind::UnexpectedEndOfInput => "unexpected end of input",
            ErrorKind::UnexpectedCharacter => "unexpected character",
            ErrorKind::ExpectedCharacter => "expected character",
            ErrorKind::InvalidToken => "invalid token",
            ErrorKind::SemanticError => "semantic error",
        };

        f.write_str(description)
    }
}

/// Possible errors that may occur while parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ParseError {
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        ParseError {
            kind,
            message: message.into(),
        }
    }
}

/// Splits a condition line into [`Token`]s, resolving identifiers through a
/// [`Dictionary`] as it goes.
///
/// Signs are never part of a number, `-1` is [`TokenKind::Minus`] followed by
/// [`TokenKind::Number`].
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    cursor: usize,
    dictionary: Dictionary<'a>,
}

impl<'a> Lexer<'a> {
    /// Indices larger than this are rejected so ids can't overflow.
    const MAX_INDEX: usize = u32::MAX as usize;

    pub fn new(src: &'a str, dictionary: Dictionary<'a>) -> Self {
        Lexer {
            src,
            cursor: 0,
            dictionary,
        }
    }

    /// Read the next token. Once the input is exhausted this keeps returning
    /// [`TokenKind::EndOfInput`].
    pub fn token(&mut self) -> Token {
        self.take_while(char::is_whitespace);

        let c = match self.peek() {
            Some(c) => c,
            None => {
                return Token {
                    kind: TokenKind::EndOfInput,
                    span: self.cursor..self.cursor,
                }
            },
        };

        match c {
            '(' => self.chomp(TokenKind::OpenParen),
            ')' => self.chomp(TokenKind::CloseParen),
            '+' => self.chomp(TokenKind::Plus),
            '-' => self.chomp(TokenKind::Minus),
            '*' => self.chomp(TokenKind::Times),
            '/' => self.chomp(TokenKind::Divide),
            '=' => self.chomp(TokenKind::Equals),
            'a'..='z' | 'A'..='Z' => self.chomp_identifier(),
            '0'..='9' => self.chomp_number(),
            other => self.chomp(TokenKind::Unexpected(other)),
        }
    }

    /// The source text a token was read from.
    pub fn text(&self, token: &Token) -> &'a str { &self.src[token.span.clone()] }

    fn remainder_from(&self, token: &Token) -> &'a str {
        self.src[token.span.start..].trim_end()
    }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn chomp(&mut self, kind: TokenKind) -> Token {
        let start = self.cursor;
        self.advance();

        Token {
            kind,
            span: start..self.cursor,
        }
    }

    fn take_while<P>(&mut self, mut predicate: P) -> &'a str
    where
        P: FnMut(char) -> bool,
    {
        let start = self.cursor;

        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }

            self.advance();
        }

        &self.src[start..self.cursor]
    }

    fn chomp_digits(&mut self) -> &'a str {
        self.take_while(|c| c.is_ascii_digit())
    }

    /// `[0-9]+ (\.[0-9]+)? ([eE][+-]?[0-9]+)?`, anything after that is left
    /// for the next token.
    fn chomp_number(&mut self) -> Token {
        let start = self.cursor;
        self.chomp_digits();

        let mut lookahead = self.rest().chars();
        if lookahead.next() == Some('.')
            && lookahead.next().map_or(false, |c| c.is_ascii_digit())
        {
            // skip past the decimal
            self.advance();
            self.chomp_digits();
        }

        let mut lookahead = self.rest().chars();
        if let Some('e') | Some('E') = lookahead.next() {
            let exponent_digits = match lookahead.next() {
                Some('+') | Some('-') => {
                    lookahead.next().map_or(false, |c| c.is_ascii_digit())
                },
                Some(c) => c.is_ascii_digit(),
                None => false,
            };

            if exponent_digits {
                self.advance();
                if let Some('+') | Some('-') = self.peek() {
                    self.advance();
                }
                self.chomp_digits();
            }
        }

        let span = start..self.cursor;
        let text = &self.src[span.clone()];
        let kind = match text.parse() {
            Ok(value) => TokenKind::Number(value),
            Err(e) => {
                TokenKind::Invalid(format!("invalid number '{}': {}", text, e))
            },
        };

        Token { kind, span }
    }

    /// Identifiers are always a name followed by an index, e.g. `phi12`.
    fn chomp_identifier(&mut self) -> Token {
        let start = self.cursor;
        let name = self.take_while(|c| c.is_ascii_alphabetic());
        let digits = self.chomp_digits();
        let span = start..self.cursor;
        let text = &self.src[span.clone()];

        let kind = if digits.is_empty() {
            TokenKind::Invalid(format!("expect an index after '{}'", name))
        } else {
            match parse_index(digits) {
                Some(index) => match self.dictionary.resolve(name, index) {
                    INVALID => TokenKind::Invalid(format!(
                        "unknown symbol '{}'",
                        text
                    )),
                    id => TokenKind::Identifier(id),
                },
                None => TokenKind::Invalid(format!(
                    "the index of '{}' is too large",
                    text
                )),
            }
        };

        Token { kind, span }
    }
}

/// Parse a run of ASCII digits as a plain base-10 integer, so `010` is ten.
fn parse_index(digits: &str) -> Option<usize> {
    digits
        .bytes()
        .try_fold(0_usize, |index, digit| {
            index.checked_mul(10)?.checked_add(usize::from(digit - b'0'))
        })
        .filter(|&index| index <= Lexer::MAX_INDEX)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// The kinds of token that can appear in a condition line.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Identifier(Id),
    OpenParen,
    CloseParen,
    Plus,
    Minus,
    Times,
    Divide,
    Equals,
    EndOfInput,
    /// A character which can't start any token.
    Unexpected(char),
    /// A malformed number or identifier, and why.
    Invalid(String),
}

impl TokenKind {
    fn as_binary_op(&self) -> Option<BinaryOperation> {
        match self {
            TokenKind::Plus => Some(BinaryOperation::Plus),
            TokenKind::Minus => Some(BinaryOperation::Minus),
            TokenKind::Times => Some(BinaryOperation::Times),
            TokenKind::Divide => Some(BinaryOperation::Divide),
            _ => None,
        }
    }
}
