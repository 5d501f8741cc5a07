// Temperament: retuning just intervals by fixing the size of a few of them.
//
// Each `Tempered` entry pins a rational to a size in cents (81/80 -> 0c
// tempers out the syntonic comma). The solver puts the tempered rationals
// followed by the subgroup items into one reduced `BasisMatrix`; any
// interval in the subgroup then has float coordinates over that basis, and
// its tempered size is the coordinate-weighted sum of the basis sizes.
//
// The measure (0..1) blends between just (0) and fully tempered (1): each
// basis element is sized `pure + delta * measure`.
//
// Entries that cannot take part are dropped by `validate`: 1/1, rationals
// outside the subgroup, and rationals already dependent on earlier entries.
// `errors` explains per entry why it was dropped.

use crate::error::{HarmonicError, Result};
use crate::matrix::BasisMatrix;
use crate::notation::{format_cents, parse_cents};
use crate::rational::{Rational, SignedFraction};
use crate::subgroup::Subgroup;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// A rational pinned to a size in cents.
#[derive(Clone, Debug, PartialEq)]
pub struct Tempered {
    pub rational: Rational,
    pub cents: f64,
}

impl Tempered {
    pub fn new(rational: Rational, cents: f64) -> Self {
        Tempered { rational, cents }
    }

    /// `"81/80 0c"`, `"3/2 700"`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let (Some(r), Some(c), None) = (parts.next(), parts.next(), parts.next()) else {
            return None;
        };
        Some(Tempered {
            rational: Rational::parse(r)?,
            cents: parse_cents(c)?,
        })
    }
}

impl FromStr for Tempered {
    type Err = HarmonicError;

    fn from_str(s: &str) -> Result<Self> {
        Tempered::parse(s).ok_or_else(|| HarmonicError::parse(s))
    }
}

impl fmt::Display for Tempered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rational, format_cents(self.cents))
    }
}

struct Solved {
    matrix: BasisMatrix,
    pure: Vec<f64>,
    delta: Vec<f64>,
    measured: Vec<f64>,
}

/// Tempered sizes for intervals of a subgroup. Unset until `set` is given
/// at least one usable entry.
#[derive(Default)]
pub struct Temperament {
    solved: Option<Solved>,
    measure: f64,
}

impl Temperament {
    pub fn new() -> Self {
        Temperament::default()
    }

    pub fn is_set(&self) -> bool {
        self.solved.is_some()
    }

    pub fn measure(&self) -> f64 {
        self.measure
    }

    /// Install `entries` against `subgroup`. Unusable entries are dropped;
    /// if none remain the temperament is unset.
    pub fn set(&mut self, entries: &[Tempered], subgroup: &Subgroup) -> Result<()> {
        let valid = Temperament::validate(entries, subgroup);
        if valid.is_empty() {
            self.solved = None;
            return Ok(());
        }
        let mut basis = Vec::with_capacity(valid.len() + subgroup.items().len());
        let mut pure = Vec::with_capacity(basis.capacity());
        let mut delta = Vec::with_capacity(basis.capacity());
        for t in &valid {
            let cents = t.rational.cents();
            basis.push(t.rational.clone());
            pure.push(cents);
            delta.push(t.cents - cents);
        }
        for item in subgroup.items() {
            basis.push(item.clone());
            pure.push(item.cents());
            delta.push(0.0);
        }
        let matrix = BasisMatrix::new(&basis, None)?;
        debug!(entries = valid.len(), basis = basis.len(), "temperament set");
        self.solved = Some(Solved {
            matrix,
            measured: pure.clone(),
            pure,
            delta,
        });
        self.update_measured();
        Ok(())
    }

    /// Blend between just (0) and fully tempered (1). Clamped to 0..1.
    pub fn set_measure(&mut self, measure: f64) {
        self.measure = measure.clamp(0.0, 1.0);
        self.update_measured();
    }

    fn update_measured(&mut self) {
        let measure = self.measure;
        if let Some(s) = &mut self.solved {
            s.measured = s
                .pure
                .iter()
                .zip(&s.delta)
                .map(|(p, d)| p + d * measure)
                .collect();
        }
    }

    /// Size of `r` in cents under the current measure. Falls back to the
    /// just size when unset or when `r` cannot be solved.
    pub fn measured_cents(&self, r: &Rational) -> f64 {
        let Some(s) = &self.solved else {
            return r.cents();
        };
        if r.power_count() > s.matrix.height() {
            return r.cents();
        }
        match s.matrix.float_coordinates(r) {
            Ok(Some(coords)) => coords.iter().zip(&s.measured).map(|(c, m)| c * m).sum(),
            Ok(None) => r.cents(),
            Err(e) => {
                warn!(rational = %r, error = %e, "cannot solve tempered size");
                r.cents()
            }
        }
    }

    /// The usable entries: not 1/1, inside the subgroup, and independent of
    /// earlier usable entries.
    pub fn validate(entries: &[Tempered], subgroup: &Subgroup) -> Vec<Tempered> {
        let mut independent: Vec<Rational> = Vec::new();
        let mut result = Vec::new();
        for t in entries {
            let r = &t.rational;
            if r.is_one() || !subgroup.is_in_range(r) {
                debug!(entry = %t, "temperament entry dropped");
                continue;
            }
            if dependency(&independent, r).is_some() {
                debug!(entry = %t, "temperament entry dependent");
                continue;
            }
            independent.push(r.clone());
            result.push(t.clone());
        }
        result
    }

    /// One message per entry explaining why it is unusable, `None` for
    /// usable ones. Entries that failed to parse are `Err`.
    pub fn errors(entries: &[Result<Tempered>], subgroup: &Subgroup) -> Vec<Option<String>> {
        let mut independent: Vec<Rational> = Vec::new();
        entries
            .iter()
            .map(|entry| {
                let Ok(t) = entry else {
                    return Some("Invalid rational".to_string());
                };
                let r = &t.rational;
                if r.is_one() {
                    return Some("1/1 can't be tempered".to_string());
                }
                if !subgroup.is_in_range(r) {
                    return Some("Out of JI range".to_string());
                }
                if let Some(coords) = dependency(&independent, r) {
                    return Some(format!("Dependent: {}", format_dependency(&independent, &coords)));
                }
                independent.push(r.clone());
                None
            })
            .collect()
    }
}

// Rational coordinates of `r` over `independent`, if it lies in their span.
fn dependency(independent: &[Rational], r: &Rational) -> Option<Vec<SignedFraction>> {
    if independent.is_empty() {
        return None;
    }
    let matrix = match BasisMatrix::new(independent, None) {
        Ok(m) => m,
        Err(e) => {
            warn!(error = %e, "cannot build dependency matrix");
            return None;
        }
    };
    if r.power_count() > matrix.height() {
        return None;
    }
    matrix.rational_coordinates(r).ok().flatten()
}

// "81/80^-1 * 128/125^1"
fn format_dependency(basis: &[Rational], coords: &[SignedFraction]) -> String {
    basis
        .iter()
        .zip(coords)
        .filter(|(_, c)| !c.is_zero())
        .map(|(b, c)| format!("{b}^{c}"))
        .collect::<Vec<_>>()
        .join(" * ")
}
