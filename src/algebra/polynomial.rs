use crate::algebra::{
    dictionary::CONSTANT, BinaryOperation, Dictionary, Expression, Id,
};
use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    iter::FromIterator,
};

/// A linear polynomial, `Σ coefficient * identifier`, where the
/// [`CONSTANT`] identifier stands for the literal `1`.
///
/// Identifiers which were never mentioned have a coefficient of zero, so two
/// polynomials are equal when every coefficient matches, regardless of which
/// terms were spelled out.
#[derive(Debug, Default, Clone)]
pub struct Polynomial {
    coefficients: BTreeMap<Id, f64>,
}

impl Polynomial {
    pub fn new() -> Self { Polynomial::default() }

    /// Add `coefficient * id` to the polynomial, accumulating with any
    /// existing term.
    pub fn add_term(&mut self, id: Id, coefficient: f64) {
        *self.coefficients.entry(id).or_insert(0.0) += coefficient;
    }

    pub fn coefficient(&self, id: Id) -> f64 {
        self.coefficients.get(&id).copied().unwrap_or(0.0)
    }

    pub fn constant(&self) -> f64 { self.coefficient(CONSTANT) }

    /// Every `(id, coefficient)` pair, including the constant, in ascending
    /// id order.
    pub fn terms(&self) -> impl Iterator<Item = (Id, f64)> + '_ {
        self.coefficients.iter().map(|(&id, &c)| (id, c))
    }

    /// The non-constant terms.
    pub fn variables(&self) -> impl Iterator<Item = (Id, f64)> + '_ {
        self.terms().filter(|&(id, _)| id != CONSTANT)
    }

    pub fn len(&self) -> usize { self.coefficients.len() }

    pub fn is_empty(&self) -> bool { self.coefficients.is_empty() }

    /// Flatten an expression in final form.
    ///
    /// # Panics
    ///
    /// The expression must already have gone through
    /// [`crate::algebra::ops::finalize()`].
    pub(crate) fn from_final(expr: &Expression) -> Self {
        let mut polynomial = Polynomial::new();
        polynomial.extract(expr);
        polynomial
    }

    fn extract(&mut self, expr: &Expression) {
        match expr {
            Expression::Constant(value) => self.add_term(CONSTANT, *value),
            Expression::Identifier(id) => self.add_term(*id, 1.0),
            Expression::Binary {
                left,
                right,
                op: BinaryOperation::Plus,
            } => {
                self.extract(left);
                self.extract(right);
            },
            Expression::Binary {
                left,
                right,
                op: BinaryOperation::Times,
            } => match (&**left, &**right) {
                (Expression::Constant(c), Expression::Identifier(id)) => {
                    self.add_term(*id, *c)
                },
                _ => unreachable!("\"{}\" is not in final form", expr),
            },
            other => unreachable!("\"{}\" is not in final form", other),
        }
    }

    /// Render the polynomial using condition syntax, e.g. `3*x0 + -2*y1 + 4`.
    pub fn display<'a>(
        &'a self,
        dictionary: Dictionary<'a>,
    ) -> impl Display + 'a {
        DisplayPolynomial {
            polynomial: self,
            dictionary,
        }
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Polynomial) -> bool {
        self.coefficients
            .keys()
            .chain(other.coefficients.keys())
            .all(|&id| self.coefficient(id) == other.coefficient(id))
    }
}

impl FromIterator<(Id, f64)> for Polynomial {
    fn from_iter<I: IntoIterator<Item = (Id, f64)>>(iter: I) -> Self {
        let mut polynomial = Polynomial::new();

        for (id, coefficient) in iter {
            polynomial.add_term(id, coefficient);
        }

        polynomial
    }
}

struct DisplayPolynomial<'a> {
    polynomial: &'a Polynomial,
    dictionary: Dictionary<'a>,
}

impl Display for DisplayPolynomial<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for (id, coefficient) in self.polynomial.variables() {
            if !first {
                write!(f, " + ")?;
            }
            write!(f, "{}*{}", coefficient, self.dictionary.display(id))?;
            first = false;
        }

        match self.polynomial.coefficients.get(&CONSTANT) {
            Some(constant) if first => write!(f, "{}", constant),
            Some(constant) => write!(f, " + {}", constant),
            None if first => write!(f, "0"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{dictionary, parse, SymbolTable};

    fn symbols() -> SymbolTable { vec!["y", "z"].into_iter().collect() }

    fn canonical(src: &str, symbols: &SymbolTable) -> Vec<Polynomial> {
        let dict = Dictionary::new("x", symbols).unwrap();

        parse(src, dict)
            .unwrap()
            .into_iter()
            .map(|equation| equation.canonicalize().unwrap().polynomial())
            .collect()
    }

    #[test]
    fn duplicate_identifiers_accumulate() {
        let symbols = symbols();
        let got = canonical("x0 + 2*x0 + y1 - x0/4 = 3 - 1", &symbols);

        assert_eq!(got.len(), 1);
        let polynomial = &got[0];
        assert_eq!(polynomial.coefficient(dictionary::unknown(0)), 2.75);
        assert_eq!(polynomial.coefficient(2), 1.0);
        assert_eq!(polynomial.constant(), -2.0);
        assert_eq!(polynomial.variables().count(), 2);
    }

    #[test]
    fn missing_terms_are_zero() {
        let explicit: Polynomial =
            vec![(dictionary::unknown(0), 1.0), (CONSTANT, 0.0)]
                .into_iter()
                .collect();
        let implicit: Polynomial =
            vec![(dictionary::unknown(0), 1.0)].into_iter().collect();

        assert_eq!(explicit, implicit);
        assert_eq!(implicit.constant(), 0.0);
        assert_ne!(implicit, Polynomial::new());
    }

    #[test]
    fn chained_equalities_share_the_leading_expression() {
        let symbols = symbols();
        let got = canonical("y0 = 1 = z2", &symbols);

        let first: Polynomial = vec![(0, 1.0), (CONSTANT, -1.0)]
            .into_iter()
            .collect();
        let second: Polynomial = vec![(0, 1.0), (5, -1.0)].into_iter().collect();
        assert_eq!(got, vec![first, second]);
    }

    #[test]
    fn render_with_names() {
        let symbols = symbols();
        let dict = Dictionary::new("x", &symbols).unwrap();
        let inputs = vec![
            (vec![], "0"),
            (vec![(CONSTANT, 4.0)], "4"),
            (vec![(dictionary::unknown(0), 3.0)], "3*x0"),
            (
                vec![(dictionary::unknown(0), 3.0), (3, -2.0), (CONSTANT, 4.0)],
                "3*x0 + -2*z1 + 4",
            ),
        ];

        for (terms, should_be) in inputs {
            let polynomial: Polynomial = terms.into_iter().collect();

            let got = polynomial.display(dict).to_string();

            assert_eq!(got, should_be);
        }
    }

    #[test]
    fn rendering_survives_a_round_trip() {
        let symbols = symbols();
        let dict = Dictionary::new("x", &symbols).unwrap();
        let inputs = vec![
            "(x0-3)*5 = 1+1*4",
            "z1 = y3*1/2/4/5/6",
            "2*(y0 - 3*(z0 + 1)) = y1 - 7",
            "-x2 = 0.1 + 0.2",
            "x0/3 + x1/7 = x2*1e-3",
            "1 - 2 + 3 = 4",
        ];

        for src in inputs {
            let original = canonical(src, &symbols).remove(0);
            let rendered = format!("{} = 0", original.display(dict));

            let round_tripped = canonical(&rendered, &symbols).remove(0);

            assert_eq!(round_tripped, original, "{} => {}", src, rendered);
        }
    }
}
