use approx::assert_relative_eq;
use glls::{algebra::ErrorKind, Document, Error, Options, SolveError};
use pretty_assertions::assert_eq;

fn assert_solution(got: &[f64], should_be: &[f64]) {
    assert_eq!(got.len(), should_be.len(), "{:?}", got);

    for (got, should_be) in got.iter().zip(should_be) {
        assert_relative_eq!(*got, *should_be, epsilon = 1e-9);
    }
}

#[test]
fn solve_a_square_system_through_auxiliary_conditions() {
    let src = "
        x
        y
        1 1 -3    # y0 = x0 + x1 - 3
        1 -1 -1   # y1 = x0 - x1 - 1
        y0 = 0
        y1 = 0
    ";

    let got = glls::glls(src, Options::default()).unwrap();

    assert_solution(&got, &[2.0, 1.0]);
}

#[test]
fn rows_are_zero_without_auxiliary_conditions() {
    let src = "x\ny\n1 2 -5\n3 -1 -1\nx1 = 2\n";

    let got = glls::glls(src, Options::default()).unwrap();

    // x0 + 4 - 5 = 0 and 3*x0 - 2 - 1 = 0 are both satisfied by x0 = 1
    assert_solution(&got, &[1.0, 2.0]);
}

#[test]
fn least_squares_over_several_symbols() {
    let src = "
        u
        a b
        1 0    # a0 = u0
        1 0    # b0 = u0
        a0 = 1
        b0 = 2
        a0 + b0 = 3.3
    ";

    let got = glls::glls(src, Options::default()).unwrap();

    // minimise (u-1)^2 + (u-2)^2 + (2u-3.3)^2
    assert_solution(&got, &[(1.0 + 2.0 + 2.0 * 3.3) / 6.0]);
}

#[test]
fn homogeneous_rows_get_a_zero_constant() {
    let src = "x\ny\n1 1\n1 -1\nx0 = 2\ny1 = 1\n";

    let document =
        Document::parse(src, Options { homogeneous: true }).unwrap();
    assert_eq!(document.unknowns(), 2);
    assert_eq!(
        document.coefficients().as_slice(),
        &[1.0, 1.0, 0.0, 1.0, -1.0, 0.0]
    );

    let got = glls::glls(src, Options { homogeneous: true }).unwrap();

    // y1 = x0 - x1 = 1 with x0 = 2
    assert_solution(&got, &[2.0, 1.0]);
}

#[test]
fn minimum_norm_when_underdetermined() {
    let src = "x\ny\n1 1 1 0\ny0 = 3\n";

    let got = glls::glls(src, Options::default()).unwrap();

    assert_solution(&got, &[1.0, 1.0, 1.0]);
}

#[test]
fn pinning_every_unknown_skips_the_solve() {
    let src = "x\ny\n1 1 0\nx0 = 1\n2*x1 = 3 # x1 is 1.5\n";

    let got = glls::glls(src, Options::default()).unwrap();

    assert_eq!(got, vec![1.0, 1.5]);
}

#[test]
fn errors_report_the_input_line() {
    let src = "x\ny\n\n# comment\n1 2 3\n4 5 6\nx0 = 1\nx0*x1 = 2\n";

    let got = glls::glls(src, Options::default()).unwrap_err();

    assert_eq!(got.line(), Some(8));
    match got {
        Error::Document(e) => {
            assert_eq!(e.kind, ErrorKind::SemanticError);
            assert_eq!(e.line, 8);
        },
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[test]
fn singular_systems_are_reported() {
    let src = "x\ny\n1 1 -1\n2 2 -2\ny0 = 0\ny1 = 0\n";

    let got = glls::glls(src, Options::default()).unwrap_err();

    assert_eq!(got, Error::Solve(SolveError::Singular));
    assert_eq!(got.line(), None);
}
