// Harmonic Lattice
//
// Musical intervals as exact positive rationals, stored as vectors of prime
// exponents. Two engines sit on top of that representation: a best-first
// search that enumerates the intervals built from a set of generators in
// order of harmonic distance, and a fraction-free integer matrix that
// decides whether an interval lies in the span of a basis and recovers its
// coordinates.
//
// Architecture:
// - error.rs: Crate error enum and `Result` alias
// - primes.rs: Prime table, `nth_prime`, prime index lookup
// - rational.rs: `Rational` (prime exponent vector) plus `Fraction` and
//   `SignedFraction`; arithmetic, comparison, parsing, formatting
// - notation.rs: Text lists, subgroup text `2.3.7/5 (7/5)`, cents text
// - harmonicity.rs: Distance metrics (Euler, Barlow, Tenney, Euclidean,
//   simple exponent, epimoric) and the 81/80 normalizer
// - lattice.rs: Generic best-first lattice search over integer coordinates
// - generator.rs: `RationalGenerator` mapping coordinates to rationals, and
//   the stock accept handlers (range filter, pipe, collector)
// - matrix.rs: `BasisMatrix`, fraction-free elimination and coordinate solve
// - narrow.rs: Narrow (near-unison) generator helpers
// - subgroup.rs: `Subgroup`, membership, narrows, layout parents
// - temperament.rs: Tempered sizes solved over a subgroup basis
// - library.rs: Named intervals loaded from embedded JSON
// - config.rs: `ExplorerConfig` for the `explore` binary
//
// Everything is synchronous and single-threaded. The search is lazy: it is
// an `Iterator`, and a handler can stop it at any point.

pub mod config;
pub mod error;
pub mod generator;
pub mod harmonicity;
pub mod lattice;
pub mod library;
pub mod matrix;
pub mod narrow;
pub mod notation;
pub mod primes;
pub mod rational;
pub mod subgroup;
pub mod temperament;

pub use error::{HarmonicError, Result};
pub use generator::{RationalGenerator, RationalHandler, RationalInfo};
pub use harmonicity::{Harmonicity, MetricKind};
pub use lattice::{LatticeSearch, Limits, Verdict};
pub use matrix::BasisMatrix;
pub use rational::{Pow, Rational, SignedFraction};
pub use subgroup::Subgroup;
