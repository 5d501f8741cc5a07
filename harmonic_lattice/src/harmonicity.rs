// Harmonic distance metrics.
//
// A metric maps an interval to a non-negative distance; smaller means
// simpler or more consonant. The set of metrics is closed, so it is a plain
// enum (`MetricKind`) dispatched with `match`, wrapped in `Harmonicity`
// which carries an optional normalization factor.
//
//   Euler      1 + sum |e| * (p - 1)
//   Barlow     sum |e| * 2 * (p - 1)^2 / p
//   Tenney     ln(numerator * denominator), summed per prime so it never
//              overflows
//   Euclidean  weighted L2 norm of the default narrow coordinates
//   Simple(k)  sum e^2 * p^k
//   Epimoric(k) Simple(k) applied to the superparticular decomposition
//
// Normalizing divides every distance by the distance of a sample interval
// (81/80 unless given), so different metrics share a comparable unit.
//
// Nothing here enforces that distance grows as an interval moves away from
// 1/1. The lattice search prunes on that assumption; see `lattice.rs`.

use crate::error::{HarmonicError, Result};
use crate::narrow::default_narrow_powers;
use crate::primes::nth_prime;
use crate::rational::{Pow, Rational};
use std::fmt;

/// Names accepted by `Harmonicity::from_name`, besides the parameterized
/// `Simple:<k>` and `Epimoric:<k>`.
pub const METRIC_NAMES: [&str; 4] = ["Barlow", "Euler", "Tenney", "Euclidean"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricKind {
    Euler,
    Barlow,
    Tenney,
    Euclidean,
    SimpleExponent(f64),
    Epimoric(f64),
}

impl MetricKind {
    pub fn distance(&self, r: &Rational) -> f64 {
        match *self {
            MetricKind::Euler => {
                1.0 + weighted_sum(r.powers(), |e, p| e.unsigned_abs() as f64 * (p - 1.0))
            }
            MetricKind::Barlow => weighted_sum(r.powers(), |e, p| {
                e.unsigned_abs() as f64 * 2.0 * (p - 1.0) * (p - 1.0) / p
            }),
            MetricKind::Tenney => {
                weighted_sum(r.powers(), |e, p| e.unsigned_abs() as f64 * p.ln())
            }
            // An interval whose narrow or epimoric coordinates overflow is
            // infinitely far away.
            MetricKind::Euclidean => {
                let Some(pows) = default_narrow_powers(r) else {
                    return f64::INFINITY;
                };
                let d: f64 = pows
                    .iter()
                    .enumerate()
                    .map(|(i, &e)| {
                        let e = e as f64;
                        // The small exp(-e) skew breaks ties between an
                        // interval and its inverse.
                        e * e * (-e * 0.01).exp() * (i as f64 * 0.011).exp()
                    })
                    .sum();
                d.sqrt()
            }
            MetricKind::SimpleExponent(k) => simple_exponent(r.powers(), k),
            MetricKind::Epimoric(k) => match r.epimoric_powers() {
                Ok(pows) => simple_exponent(&pows, k),
                Err(_) => f64::INFINITY,
            },
        }
    }
}

fn weighted_sum(pows: &[Pow], term: impl Fn(Pow, f64) -> f64) -> f64 {
    pows.iter()
        .enumerate()
        .filter(|&(_, &e)| e != 0)
        .map(|(i, &e)| term(e, nth_prime(i) as f64))
        .sum()
}

fn simple_exponent(pows: &[Pow], k: f64) -> f64 {
    weighted_sum(pows, |e, p| {
        let e = e as f64;
        e * e * p.powf(k)
    })
}

/// A metric plus an optional normalization factor.
#[derive(Clone, Debug, PartialEq)]
pub struct Harmonicity {
    kind: MetricKind,
    factor: Option<f64>,
}

impl Harmonicity {
    pub fn new(kind: MetricKind) -> Self {
        Harmonicity { kind, factor: None }
    }

    /// Rescale so that 81/80 has distance 1.
    pub fn normalized(self) -> Self {
        // 81/80 is nonzero under every metric.
        let sample = Rational::from_powers(&[-4, 4, -1]);
        self.normalized_by(&sample)
    }

    /// Rescale so that `sample` has distance 1. A sample at distance zero
    /// leaves the metric unnormalized.
    pub fn normalized_by(self, sample: &Rational) -> Self {
        let d = self.kind.distance(sample);
        let factor = if d > 0.0 { Some(1.0 / d) } else { None };
        Harmonicity { factor, ..self }
    }

    /// Look up a metric by name: `Barlow` (also the empty name), `Euler`,
    /// `Tenney`, `Euclidean`, `Simple:<k>`, `Epimoric:<k>`.
    pub fn from_name(name: &str, normalize: bool) -> Result<Self> {
        let unknown = || HarmonicError::UnknownMetric {
            name: name.to_string(),
        };
        let kind = match name.trim() {
            "" | "Barlow" => MetricKind::Barlow,
            "Euler" => MetricKind::Euler,
            "Tenney" => MetricKind::Tenney,
            "Euclidean" => MetricKind::Euclidean,
            other => {
                let (prefix, k) = other.split_once(':').ok_or_else(unknown)?;
                let k: f64 = k.trim().parse().map_err(|_| unknown())?;
                match prefix.trim() {
                    "Simple" => MetricKind::SimpleExponent(k),
                    "Epimoric" => MetricKind::Epimoric(k),
                    _ => return Err(unknown()),
                }
            }
        };
        let h = Harmonicity::new(kind);
        Ok(if normalize { h.normalized() } else { h })
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn is_normalized(&self) -> bool {
        self.factor.is_some()
    }

    pub fn distance(&self, r: &Rational) -> f64 {
        let d = self.kind.distance(r);
        match self.factor {
            Some(f) => d * f,
            None => d,
        }
    }

    /// Consonance on a 0..1 scale, 1 at distance zero.
    pub fn harmonicity(&self, r: &Rational) -> f64 {
        harmonicity(self.distance(r))
    }
}

impl Default for Harmonicity {
    fn default() -> Self {
        Harmonicity::new(MetricKind::Barlow)
    }
}

impl fmt::Display for Harmonicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MetricKind::Euler => f.write_str("Euler")?,
            MetricKind::Barlow => f.write_str("Barlow")?,
            MetricKind::Tenney => f.write_str("Tenney")?,
            MetricKind::Euclidean => f.write_str("Euclidean")?,
            MetricKind::SimpleExponent(k) => write!(f, "Simple:{k}")?,
            MetricKind::Epimoric(k) => write!(f, "Epimoric:{k}")?,
        }
        if self.is_normalized() {
            f.write_str(" (normalized)")?;
        }
        Ok(())
    }
}

/// Map a distance to a 0..1 consonance value.
pub fn harmonicity(distance: f64) -> f64 {
    (-distance * 1.2).exp()
}
