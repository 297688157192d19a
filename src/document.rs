//! Reading a whole input document.
//!
//! A document is made up of *effective* lines (see [`EffectiveLines`]):
//!
//! ```text
//! x                 # the name of the unknown
//! y z               # names of the auxiliary quantities
//! 1 2 3 4           # coefficient rows, one per auxiliary quantity
//! 4 5 6 8           #   y0 = 1*x0 + 2*x1 + 3*x2 + 4
//! ...               #   z0 = 4*x0 + 5*x1 + 6*x2 + 8
//! x0 = 2            # conditions, starting at the first line with a "="
//! y1 = 2*z1 + 3
//! ```

use crate::{
    algebra::{
        self, Dictionary, ErrorKind, IdKind, Matrix, ParseError, Polynomial,
        SymbolTable,
    },
    Problem,
};
use smol_str::SmolStr;
use std::str::Lines;

/// Switches which change how a document is read.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Options {
    /// Coefficient rows don't include the trailing constant, every row gets
    /// a constant of `0` instead.
    pub homogeneous: bool,
}

/// Something went wrong while reading a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    /// The 1-based line number the error was detected on.
    pub line: usize,
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new<S: Into<String>>(
        line: usize,
        kind: ErrorKind,
        message: S,
    ) -> Self {
        Error {
            line,
            kind,
            message: message.into(),
        }
    }

    fn semantic<S: Into<String>>(line: usize, message: S) -> Self {
        Error::new(line, ErrorKind::SemanticError, message)
    }

    fn from_parse_error(line: usize, e: ParseError) -> Self {
        Error::new(line, e.kind, e.message)
    }
}

/// An iterator over the `(line_number, text)` pairs of a document which
/// actually have content.
///
/// Anything after a `#` is a comment, lines which are blank once comments
/// are removed get skipped, and trailing whitespace is trimmed. Line numbers
/// start at `1`.
#[derive(Debug, Clone)]
pub struct EffectiveLines<'a> {
    lines: Lines<'a>,
    line_number: usize,
}

impl<'a> EffectiveLines<'a> {
    pub fn new(src: &'a str) -> Self {
        EffectiveLines {
            lines: src.lines(),
            line_number: 0,
        }
    }

    /// The number of the line just past the last one read. Once the
    /// iterator is exhausted this points just past the end of input.
    pub fn end_of_input(&self) -> usize { self.line_number + 1 }
}

impl<'a> Iterator for EffectiveLines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for line in &mut self.lines {
            self.line_number += 1;

            let text = match line.find('#') {
                Some(comment) => &line[..comment],
                None => line,
            };
            let text = text.trim_end();

            if !text.trim_start().is_empty() {
                return Some((self.line_number, text));
            }
        }

        None
    }
}

/// A fully parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    unknown_name: SmolStr,
    symbols: SymbolTable,
    coefficients: Matrix<f64>,
    pinned: Vec<(usize, f64)>,
    conditions: Vec<Polynomial>,
}

impl Document {
    pub fn parse(src: &str, options: Options) -> Result<Document, Error> {
        let mut lines = EffectiveLines::new(src);

        let unknown_name = read_unknown_name(&mut lines)?;
        let symbols = read_symbols(&mut lines)?;
        let (coefficients, (first_line, first_condition)) =
            read_coefficients(&mut lines, symbols.len(), options)?;

        let mut reader = ConditionReader {
            dictionary: Dictionary::new(&unknown_name, &symbols)
                .map_err(|e| Error::semantic(first_line, e.to_string()))?,
            unknowns: coefficients.num_columns() - 1,
            rows: coefficients.num_rows(),
            pinned: Vec::new(),
            conditions: Vec::new(),
        };

        reader.attach(first_line, first_condition)?;
        for (line, text) in lines {
            reader.attach(line, text)?;
        }

        let ConditionReader {
            pinned, conditions, ..
        } = reader;

        Ok(Document {
            unknown_name,
            symbols,
            coefficients,
            pinned,
            conditions,
        })
    }

    /// The name used for components of the unknown vector.
    pub fn unknown_name(&self) -> &str { &self.unknown_name }

    pub fn symbols(&self) -> &SymbolTable { &self.symbols }

    pub fn unknowns(&self) -> usize { self.coefficients.num_columns() - 1 }

    pub fn rows(&self) -> usize { self.coefficients.num_rows() }

    /// The coefficient rows as written, with the constant in the last
    /// column.
    pub fn coefficients(&self) -> &Matrix<f64> { &self.coefficients }

    /// Unknowns which were given a value, as `(index, value)` pairs in the
    /// order they were written.
    pub fn pinned(&self) -> &[(usize, f64)] { &self.pinned }

    /// Conditions on the auxiliary quantities, one per equation.
    pub fn conditions(&self) -> &[Polynomial] { &self.conditions }

    /// Fold the pinned unknowns and auxiliary conditions into the
    /// coefficient matrix.
    ///
    /// Without any auxiliary conditions every coefficient row is used as-is,
    /// i.e. each auxiliary quantity is required to be `0`.
    pub fn into_problem(self) -> Problem {
        let mut problem = Problem::new(self.coefficients);

        if !self.pinned.is_empty() {
            problem.arrange_x(&self.pinned);
        }
        if !self.conditions.is_empty() {
            problem.arrange_y(&self.conditions);
        }

        problem
    }
}

fn next_line<'a>(
    lines: &mut EffectiveLines<'a>,
    what: &str,
) -> Result<(usize, &'a str), Error> {
    lines.next().ok_or_else(|| {
        Error::new(
            lines.end_of_input(),
            ErrorKind::UnexpectedEndOfInput,
            format!("{}: unexpected end of input", what),
        )
    })
}

fn is_name(word: &str) -> bool {
    word.chars().all(|c| c.is_ascii_alphabetic())
}

fn read_unknown_name(
    lines: &mut EffectiveLines<'_>,
) -> Result<SmolStr, Error> {
    const FAILED: &str = "failed to read the name of the unknown";

    let (line, text) = next_line(lines, FAILED)?;
    let mut words = text.split_whitespace();

    let name = words.next().ok_or_else(|| {
        Error::new(
            line,
            ErrorKind::ExpectedCharacter,
            format!("{}: expect a name", FAILED),
        )
    })?;

    if !is_name(name) {
        return Err(Error::new(
            line,
            ErrorKind::InvalidToken,
            format!("{}: invalid name '{}'", FAILED, name),
        ));
    }

    if let Some(extra) = words.next() {
        return Err(Error::new(
            line,
            ErrorKind::UnexpectedCharacter,
            format!("{}: unexpected content '{}'", FAILED, extra),
        ));
    }

    Ok(SmolStr::from(name))
}

fn read_symbols(
    lines: &mut EffectiveLines<'_>,
) -> Result<SymbolTable, Error> {
    const FAILED: &str = "failed to read the names of the symbols";

    let (line, text) = next_line(lines, FAILED)?;
    let mut symbols = SymbolTable::new();

    for word in text.split_whitespace() {
        if !is_name(word) {
            return Err(Error::new(
                line,
                ErrorKind::InvalidToken,
                format!("{}: invalid name '{}'", FAILED, word),
            ));
        }

        if !symbols.insert(word) {
            return Err(Error::new(
                line,
                ErrorKind::UnexpectedCharacter,
                format!("{}: duplicated name '{}'", FAILED, word),
            ));
        }
    }

    tracing::debug!(line, count = symbols.len(), "Read the symbol names");

    Ok(symbols)
}

fn parse_coefficient(word: &str) -> Option<f64> {
    word.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Read coefficient rows up to the first condition, returning the matrix
/// and that condition.
fn read_coefficients<'a>(
    lines: &mut EffectiveLines<'a>,
    symbol_count: usize,
    options: Options,
) -> Result<(Matrix<f64>, (usize, &'a str)), Error> {
    let mut coefficients: Option<Matrix<f64>> = None;

    let first_condition = loop {
        let (line, text) = next_line(lines, "failed to read coefficients")?;

        if text.contains('=') {
            break (line, text);
        }

        match coefficients.as_mut() {
            None => {
                let row = first_row(line, text, options)?;
                let mut matrix = Matrix::with_columns(row.len());
                matrix.push_row(row);
                coefficients = Some(matrix);
            },
            Some(matrix) => {
                let columns = matrix.num_columns();
                matrix.push_row(following_row(line, text, columns, options)?);
            },
        }
    };

    let (line, _) = first_condition;
    let coefficients = coefficients.ok_or_else(|| {
        Error::new(
            line,
            ErrorKind::ExpectedCharacter,
            "expect at least one row of coefficients",
        )
    })?;

    if symbol_count == 0 || coefficients.num_rows() % symbol_count != 0 {
        return Err(Error::new(
            line,
            ErrorKind::ExpectedCharacter,
            "rows of coefficients are unaligned",
        ));
    }

    tracing::debug!(
        unknowns = coefficients.num_columns() - 1,
        rows = coefficients.num_rows(),
        "Read the coefficient matrix"
    );

    Ok((coefficients, first_condition))
}

/// The first row decides how many unknowns there are.
fn first_row(
    line: usize,
    text: &str,
    options: Options,
) -> Result<Vec<f64>, Error> {
    let mut row = Vec::new();

    for word in text.split_whitespace() {
        let value = parse_coefficient(word).ok_or_else(|| {
            Error::new(
                line,
                ErrorKind::UnexpectedCharacter,
                format!("failed to read coefficients: invalid content '{}'", word),
            )
        })?;
        row.push(value);
    }

    if options.homogeneous {
        row.push(0.0);
    }

    if row.len() < 2 {
        return Err(Error::new(
            line,
            ErrorKind::ExpectedCharacter,
            "expect coefficients for at least one unknown",
        ));
    }

    Ok(row)
}

fn following_row(
    line: usize,
    text: &str,
    columns: usize,
    options: Options,
) -> Result<Vec<f64>, Error> {
    let expected = if options.homogeneous { columns - 1 } else { columns };
    let mut words = text.split_whitespace();
    let mut row = Vec::with_capacity(columns);

    for _ in 0..expected {
        match words.next().and_then(parse_coefficient) {
            Some(value) => row.push(value),
            None => {
                return Err(Error::new(
                    line,
                    ErrorKind::ExpectedCharacter,
                    "not enough coefficients on this row",
                ))
            },
        }
    }

    if let Some(extra) = words.next() {
        return Err(Error::new(
            line,
            ErrorKind::UnexpectedCharacter,
            format!("invalid content '{}'", extra),
        ));
    }

    if options.homogeneous {
        row.push(0.0);
    }

    Ok(row)
}

/// Classifies condition lines as they are read.
struct ConditionReader<'a> {
    dictionary: Dictionary<'a>,
    unknowns: usize,
    rows: usize,
    pinned: Vec<(usize, f64)>,
    conditions: Vec<Polynomial>,
}

impl<'a> ConditionReader<'a> {
    fn attach(&mut self, line: usize, text: &str) -> Result<(), Error> {
        let polynomials = algebra::parse(text, self.dictionary)
            .map_err(|e| Error::from_parse_error(line, e))?
            .into_iter()
            .map(|equation| match equation.canonicalize() {
                Ok(canonical) => Ok(canonical.polynomial()),
                Err(e) => Err(Error::semantic(line, e.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mentions = |predicate: fn(IdKind) -> bool| {
            polynomials
                .iter()
                .flat_map(|p| p.variables())
                .any(|(id, _)| predicate(IdKind::of(id)))
        };
        let has_unknowns = mentions(|kind| matches!(kind, IdKind::Unknown(_)));
        let has_auxiliaries =
            mentions(|kind| matches!(kind, IdKind::Auxiliary(_)));

        match (has_unknowns, has_auxiliaries) {
            (true, true) => Err(Error::semantic(
                line,
                format!(
                    "can not mix '{}' and auxiliary quantities",
                    self.dictionary.unknown_name()
                ),
            )),
            (true, false) => self.pin(line, polynomials),
            (false, true) => self.add_conditions(line, polynomials),
            (false, false) => {
                Err(Error::semantic(line, "equation does not have any unknown"))
            },
        }
    }

    fn pin(
        &mut self,
        line: usize,
        mut polynomials: Vec<Polynomial>,
    ) -> Result<(), Error> {
        let name = self.dictionary.unknown_name();

        if polynomials.len() != 1 {
            return Err(Error::semantic(
                line,
                format!(
                    "only one equation of '{}' is accepted per line",
                    name
                ),
            ));
        }
        let polynomial = polynomials.remove(0);

        let variables: Vec<_> = polynomial.variables().collect();
        let (id, coefficient) = match variables.as_slice() {
            [single] => *single,
            _ => {
                return Err(Error::semantic(
                    line,
                    format!(
                        "only one '{}' variable can be solved per equation",
                        name
                    ),
                ))
            },
        };

        let index = match IdKind::of(id) {
            IdKind::Unknown(index) => index,
            other => unreachable!("{:?} isn't an unknown", other),
        };

        if index >= self.unknowns {
            return Err(Error::semantic(
                line,
                format!(
                    "variable {} does not exist",
                    self.dictionary.display(id)
                ),
            ));
        }

        if approx::abs_diff_eq!(coefficient, 0.0) {
            return Err(Error::semantic(
                line,
                format!(
                    "the coefficient of {} is zero",
                    self.dictionary.display(id)
                ),
            ));
        }

        if self.pinned.iter().any(|&(column, _)| column == index) {
            return Err(Error::semantic(
                line,
                format!(
                    "{} has already been given a value",
                    self.dictionary.display(id)
                ),
            ));
        }

        let value = -polynomial.constant() / coefficient;
        tracing::debug!(line, index, value, "Pinned an unknown");
        self.pinned.push((index, value));

        Ok(())
    }

    fn add_conditions(
        &mut self,
        line: usize,
        polynomials: Vec<Polynomial>,
    ) -> Result<(), Error> {
        for polynomial in &polynomials {
            for (id, _) in polynomial.variables() {
                if let IdKind::Auxiliary(row) = IdKind::of(id) {
                    if row >= self.rows {
                        return Err(Error::semantic(
                            line,
                            format!(
                                "too large index of {}",
                                self.dictionary.display(id)
                            ),
                        ));
                    }
                }
            }
        }

        tracing::debug!(
            line,
            count = polynomials.len(),
            "Read auxiliary conditions"
        );
        self.conditions.extend(polynomials);

        Ok(())
    }
}
