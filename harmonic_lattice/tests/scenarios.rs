// Worked examples through the public API.
//
// Each test pins one concrete, hand-checkable result: a Barlow distance
// computed term by term, the first ten 5-limit intervals under Euler, and a
// comma expressed over two other commas.

use harmonic_lattice::generator::AcceptAll;
use harmonic_lattice::notation::format_list;
use harmonic_lattice::{
    BasisMatrix, Harmonicity, Limits, MetricKind, Rational, RationalGenerator, Verdict,
};

fn r(text: &str) -> Rational {
    text.parse().unwrap()
}

#[test]
fn test_barlow_distance_of_fifth() {
    let fifth = r("3/2");
    assert_eq!(fifth.powers(), &[-1, 1]);
    // |e| * 2 * (p - 1)^2 / p for p = 2 and p = 3, both with |e| = 1.
    let two_term = 2.0 * 1.0_f64.powi(2) / 2.0;
    let three_term = 2.0 * 2.0_f64.powi(2) / 3.0;
    let expected = two_term + three_term;
    let barlow = Harmonicity::new(MetricKind::Barlow);
    assert!((barlow.distance(&fifth) - expected).abs() < 1e-12);
}

#[test]
fn test_first_euler_intervals_of_5_limit() {
    let limits = Limits {
        max_count: Some(10),
        ..Limits::default()
    };
    let generator = RationalGenerator::primes(Harmonicity::new(MetricKind::Euler), 3, limits);

    let mut offered = Vec::new();
    let accepted = generator.search().visit(|rational, distance| {
        offered.push((rational.clone(), distance));
        Verdict::Accept
    });
    assert_eq!(accepted, 10);

    let rationals: Vec<Rational> = offered.iter().map(|(r, _)| r.clone()).collect();
    assert_eq!(rationals[0], Rational::one());
    assert_eq!(
        format_list(&rationals, " "),
        "1 2 1/2 3 1/3 4 1/4 6 2/3 3/2"
    );

    // The iterator and the handler-driven paths agree.
    let pulled: Vec<Rational> = generator.search().map(|p| p.point).collect();
    assert_eq!(pulled, rationals);
    let collected = generator.collect_with(&mut AcceptAll);
    assert_eq!(collected.len(), 10);
    assert_eq!(collected[9].rational, r("3/2"));
}

#[test]
fn test_diesis_over_two_commas() {
    let basis = [r("81/80"), r("128/125")];
    let target = r("2048/2025");
    assert_eq!(target, &basis[1] / &basis[0]);

    let matrix = BasisMatrix::new(&basis, None).unwrap();
    assert_eq!(matrix.coordinates(&target).unwrap(), Some(vec![-1, 1]));

    // The single-target path gives the same answer.
    let single = harmonic_lattice::matrix::find_coordinates(&basis, &target).unwrap();
    assert_eq!(single, Some(vec![-1, 1]));
}

#[test]
fn test_fifth_does_not_span_third() {
    let matrix = BasisMatrix::new(&[r("3/2")], None).unwrap();
    assert_eq!(matrix.coordinates(&r("5/4")).unwrap(), None);
}
