// A subgroup: a finite set of generator intervals replacing the full prime
// basis, with a compiled matrix for membership tests and a set of narrows
// for tree layout.
//
// The basis matrix is built and reduced once in the constructor, then every
// `is_in_range`/`coordinates` query reuses it.
//
// Narrows are stored per highest prime index. The defaults come from
// narrowing each item against the base item (the item with the lowest
// highest prime), e.g. 2.3.5 -> 2, 3/2, 5/4 and 3.5.7 -> 3, 5/3, 7/9. User
// narrows override defaults at their prime; narrows outside the subgroup are
// skipped and reported through `error()`.
//
// See also: `narrow.rs` for the narrowing rules, `matrix.rs` for the solver,
// `temperament.rs` which validates tempered intervals against a subgroup.

use crate::error::Result;
use crate::generator::RationalGenerator;
use crate::harmonicity::Harmonicity;
use crate::lattice::Limits;
use crate::matrix::BasisMatrix;
use crate::narrow::{format_narrow_powers, make_narrow, narrow_powers, validate_narrow};
use crate::notation::{SubgroupText, format_list};
use crate::rational::{Pow, Rational};
use std::fmt;
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct Subgroup {
    items: Vec<Rational>,
    matrix: BasisMatrix,
    base_item: Option<Rational>,
    high_prime_index: Option<usize>,
    narrows: Vec<Option<Rational>>,
    error: Option<String>,
}

impl Subgroup {
    pub fn new(items: Vec<Rational>) -> Result<Self> {
        let matrix = BasisMatrix::new(&items, None)?;
        let high_prime_index = items.iter().filter_map(Rational::high_prime_index).max();
        let base_item = items
            .iter()
            .filter(|r| !r.is_one())
            .min_by_key(|r| r.high_prime_index())
            .cloned();
        let mut subgroup = Subgroup {
            items,
            matrix,
            base_item,
            high_prime_index,
            narrows: Vec::new(),
            error: None,
        };
        subgroup.set_narrows(&[]);
        Ok(subgroup)
    }

    /// The primes up to and including the one at `limit_index`.
    pub fn from_prime_limit(limit_index: usize) -> Result<Self> {
        Subgroup::new(Rational::primes(limit_index + 1))
    }

    /// Build from text like `2.3.7/5 (7/5)`.
    pub fn parse(text: &str) -> Result<Self> {
        let SubgroupText { items, narrows } = SubgroupText::parse(text)?;
        let mut subgroup = Subgroup::new(items)?;
        subgroup.set_narrows(&narrows);
        Ok(subgroup)
    }

    pub fn items(&self) -> &[Rational] {
        &self.items
    }

    /// The item with the lowest highest prime; narrows are taken against it.
    pub fn base_item(&self) -> Option<&Rational> {
        self.base_item.as_ref()
    }

    pub fn base_prime_index(&self) -> Option<usize> {
        self.base_item.as_ref().and_then(Rational::high_prime_index)
    }

    pub fn high_prime_index(&self) -> Option<usize> {
        self.high_prime_index
    }

    /// Message about user narrows that were ignored, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Integer coordinates of `r` over the items, if `r` is in the subgroup.
    pub fn coordinates(&self, r: &Rational) -> Option<Vec<i64>> {
        if r.power_count() > self.matrix.height() {
            return None;
        }
        match self.matrix.coordinates(r) {
            Ok(c) => c,
            Err(e) => {
                warn!(rational = %r, error = %e, "subgroup membership test failed");
                None
            }
        }
    }

    pub fn is_in_range(&self, r: &Rational) -> bool {
        self.coordinates(r).is_some()
    }

    /// Reset narrows to the defaults, then apply `user` narrows that lie in
    /// the subgroup.
    pub fn set_narrows(&mut self, user: &[Rational]) {
        let len = self.high_prime_index.map_or(0, |h| h + 1);
        self.narrows = vec![None; len];
        self.error = None;

        if let Some(base) = self.base_item.clone() {
            for item in self.items.clone() {
                match make_narrow(&item, &base) {
                    Ok(narrow) => self.put_narrow(&narrow),
                    Err(e) => warn!(item = %item, error = %e, "default narrow skipped"),
                }
            }
        }

        let mut rejected = Vec::new();
        for narrow in user {
            if self.is_in_range(narrow) {
                self.put_narrow(narrow);
            } else {
                rejected.push(narrow.clone());
            }
        }
        if !rejected.is_empty() {
            self.error = Some(format!(
                "Narrows out of subgroup: {}",
                format_list(&rejected, ", ")
            ));
        }
        debug!(narrows = %self.format_narrows(), "subgroup narrows set");
    }

    fn put_narrow(&mut self, narrow: &Rational) {
        let Some(n) = validate_narrow(narrow) else {
            return;
        };
        if let Some(slot) = n.high_prime_index().and_then(|h| self.narrows.get_mut(h)) {
            *slot = Some(n);
        }
    }

    fn format_narrows(&self) -> String {
        self.narrows
            .iter()
            .map(|n| n.as_ref().map_or("-".to_string(), Rational::to_string))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// The narrows that are set, in prime order.
    pub fn narrow_items(&self) -> Vec<Rational> {
        self.narrows.iter().flatten().cloned().collect()
    }

    /// The narrow at highest prime `index`, if one is set.
    pub fn narrow(&self, index: usize) -> Option<&Rational> {
        self.narrows.get(index).and_then(Option::as_ref)
    }

    pub fn narrow_powers(&self, r: &Rational) -> Option<Vec<Pow>> {
        narrow_powers(r, &self.narrows)
    }

    pub fn format_narrow_powers(&self, r: &Rational) -> Option<String> {
        self.narrow_powers(r).map(|p| format_narrow_powers(&p))
    }

    /// Parent of `r` in the layout tree: one step back along the narrow of
    /// its highest prime. Intervals at or below the base prime level have no
    /// parent (octaves of 1/1 are not linked to each other).
    pub fn narrow_parent(&self, r: &Rational) -> Option<Rational> {
        let last = r.high_prime_index()?;
        if last > self.high_prime_index? {
            return None;
        }
        if self.base_prime_index().is_some_and(|base| last <= base) {
            return None;
        }
        let step = self.narrow(last)?;
        if r.prime_power(last) > 0 {
            r.checked_div(step).ok()
        } else {
            r.checked_mul(step).ok()
        }
    }

    /// A generator over this subgroup's items.
    pub fn generator(&self, metric: Harmonicity, limits: Limits) -> RationalGenerator {
        RationalGenerator::new(metric, self.items.clone(), limits)
    }
}

impl fmt::Display for Subgroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_list(&self.items, "."))
    }
}
