// Rational generator: the lattice search in interval terms.
//
// `RationalGenerator` is a `LatticeSpace` whose generators are intervals
// (the first N primes, or any independent set such as a subgroup). The
// point at coordinates `[c0, c1, ...]` is `g0^c0 * g1^c1 * ...` and its
// distance comes from a `Harmonicity` metric.
//
// Accept decisions can be written as closures, or as `RationalHandler`
// values that compose: `RangeFilter` keeps intervals between two bounds,
// `Collector` gathers what it sees, and `HandlerPipe` chains handlers so the
// first non-Accept verdict wins.
//
// See also: `lattice.rs` for the search itself, `harmonicity.rs` for the
// metrics, `subgroup.rs` for generator sets other than primes.

use crate::error::Result;
use crate::harmonicity::Harmonicity;
use crate::lattice::{LatticeSearch, LatticeSpace, Limits, Verdict};
use crate::rational::Rational;
use std::cmp::Ordering;

/// An interval with its distance, as delivered by the search.
#[derive(Clone, Debug, PartialEq)]
pub struct RationalInfo {
    pub rational: Rational,
    pub distance: f64,
}

/// Enumerates products of generator powers in distance order.
#[derive(Clone, Debug)]
pub struct RationalGenerator {
    metric: Harmonicity,
    generators: Vec<Rational>,
    limits: Limits,
}

impl RationalGenerator {
    pub fn new(metric: Harmonicity, generators: Vec<Rational>, limits: Limits) -> Self {
        RationalGenerator {
            metric,
            generators,
            limits,
        }
    }

    /// Generators are the first `count` primes.
    pub fn primes(metric: Harmonicity, count: usize, limits: Limits) -> Self {
        RationalGenerator::new(metric, Rational::primes(count), limits)
    }

    pub fn metric(&self) -> &Harmonicity {
        &self.metric
    }

    pub fn generators(&self) -> &[Rational] {
        &self.generators
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// The interval at `coordinates`, or `Overflow` if an exponent leaves
    /// the `Pow` range.
    pub fn make_rational(&self, coordinates: &[i32]) -> Result<Rational> {
        let mut r = Rational::one();
        for (g, &c) in self.generators.iter().zip(coordinates) {
            if c != 0 {
                r = r.checked_mul(&g.checked_pow(c)?)?;
            }
        }
        Ok(r)
    }

    /// A fresh search over this generator's lattice.
    pub fn search(&self) -> LatticeSearch<&Self> {
        LatticeSearch::new(self, self.limits.clone())
    }

    /// Run `handler` over the whole search. Returns the accepted count.
    pub fn iterate(&self, handler: &mut dyn RationalHandler) -> usize {
        self.search().visit(|r, d| handler.handle(r, d))
    }

    /// Every interval `handler` accepts, in distance order.
    pub fn collect_with(&self, handler: &mut dyn RationalHandler) -> Vec<RationalInfo> {
        let mut search = self.search();
        std::iter::from_fn(|| search.next_with(|r, d| handler.handle(r, d)))
            .map(|p| RationalInfo {
                rational: p.point,
                distance: p.distance,
            })
            .collect()
    }
}

impl LatticeSpace for RationalGenerator {
    type Point = Rational;

    fn dimensions(&self) -> usize {
        self.generators.len()
    }

    fn point(&self, coordinates: &[i32]) -> Option<Rational> {
        self.make_rational(coordinates).ok()
    }

    fn distance(&self, point: &Rational) -> f64 {
        self.metric.distance(point)
    }
}

/// Decides what the search does with each interval.
pub trait RationalHandler {
    fn handle(&mut self, rational: &Rational, distance: f64) -> Verdict;
}

impl<H: RationalHandler + ?Sized> RationalHandler for &mut H {
    fn handle(&mut self, rational: &Rational, distance: f64) -> Verdict {
        (**self).handle(rational, distance)
    }
}

/// Accepts everything.
pub struct AcceptAll;

impl RationalHandler for AcceptAll {
    fn handle(&mut self, _: &Rational, _: f64) -> Verdict {
        Verdict::Accept
    }
}

/// Accepts intervals between two bounds.
///
/// An interval whose comparison overflows a 64-bit fraction is treated as
/// out of range and rejected; the search carries on past it.
#[derive(Clone, Debug)]
pub struct RangeFilter {
    pub low: Rational,
    pub high: Rational,
    pub include_low: bool,
    pub include_high: bool,
}

impl RangeFilter {
    /// Inclusive on both ends.
    pub fn new(low: Rational, high: Rational) -> Self {
        RangeFilter {
            low,
            high,
            include_low: true,
            include_high: true,
        }
    }

    pub fn contains(&self, r: &Rational) -> bool {
        let (Ok(lo), Ok(hi)) = (r.try_cmp(&self.low), r.try_cmp(&self.high)) else {
            return false;
        };
        let above_low = match lo {
            Ordering::Greater => true,
            Ordering::Equal => self.include_low,
            Ordering::Less => false,
        };
        let below_high = match hi {
            Ordering::Less => true,
            Ordering::Equal => self.include_high,
            Ordering::Greater => false,
        };
        above_low && below_high
    }
}

impl RationalHandler for RangeFilter {
    fn handle(&mut self, rational: &Rational, _: f64) -> Verdict {
        if self.contains(rational) {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}

/// Runs handlers in order; the first verdict other than `Accept` wins.
#[derive(Default)]
pub struct HandlerPipe<'a> {
    handlers: Vec<&'a mut dyn RationalHandler>,
}

impl<'a> HandlerPipe<'a> {
    pub fn new() -> Self {
        HandlerPipe {
            handlers: Vec::new(),
        }
    }

    pub fn with(mut self, handler: &'a mut dyn RationalHandler) -> Self {
        self.handlers.push(handler);
        self
    }
}

impl RationalHandler for HandlerPipe<'_> {
    fn handle(&mut self, rational: &Rational, distance: f64) -> Verdict {
        for h in self.handlers.iter_mut() {
            let verdict = h.handle(rational, distance);
            if verdict != Verdict::Accept {
                return verdict;
            }
        }
        Verdict::Accept
    }
}

/// Records every interval it is offered and accepts it.
#[derive(Clone, Debug, Default)]
pub struct Collector {
    pub items: Vec<RationalInfo>,
}

impl Collector {
    pub fn new() -> Self {
        Collector::default()
    }

    pub fn sort_by_distance(&mut self) {
        self.items.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    }

    /// Ascending by pitch.
    pub fn sort_by_value(&mut self) {
        self.items
            .sort_by(|a, b| a.rational.cents().total_cmp(&b.rational.cents()));
    }

    pub fn into_items(self) -> Vec<RationalInfo> {
        self.items
    }
}

impl RationalHandler for Collector {
    fn handle(&mut self, rational: &Rational, distance: f64) -> Verdict {
        self.items.push(RationalInfo {
            rational: rational.clone(),
            distance,
        });
        Verdict::Accept
    }
}
