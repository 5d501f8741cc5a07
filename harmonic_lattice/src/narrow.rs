// Narrow intervals: an alternate basis close to unity.
//
// A narrow replaces a generator with a nearby interval that still carries
// the same highest prime: {2, 3/2, 5/4} instead of {2, 3, 5}. Stepping
// along narrows keeps lattice coordinates small, and stepping back along
// the last narrow gives an interval's parent in a tree layout (see
// `Subgroup::narrow_parent`).
//
//   prime index          0    1    2    3    4
//   base 0 (divide by 2) 2    3/2  5/4  7/8  11/8
//   base 1 (divide by 3) 2    3    5/3  7/9  11/9
//
// Narrow vectors are indexed by the narrow's highest prime. A slot may be
// empty (`None`) when a subgroup has no generator at that prime.

use crate::error::Result;
use crate::rational::{Pow, Rational, format_powers};

/// Divide `r` by the power of `base` that brings it closest to unity from
/// above (somewhere between floor and round of `log_base(r)`). Intervals on
/// the same prime level as `base` are returned unchanged. Fails with
/// `Overflow` when the power of `base` leaves the exponent range.
pub fn make_narrow(r: &Rational, base: &Rational) -> Result<Rational> {
    if base.is_one() || r.high_prime_index() == base.high_prime_index() {
        return Ok(r.clone());
    }
    let l = r.to_f64().ln() / base.to_f64().ln();
    let e = (l + 0.25) as Pow;
    r.checked_div(&base.checked_pow(e)?)
}

/// Narrow of `r` against the prime at `base_index`: `r / b^round(log_b(r - 1))`.
pub fn make_narrow_by_prime(r: &Rational, base_index: usize) -> Result<Rational> {
    match r.high_prime_index() {
        Some(h) if h > base_index => {}
        _ => return Ok(r.clone()),
    }
    let Some(r) = validate_narrow(r) else {
        return Ok(r.clone());
    };
    let rr = r.to_f64();
    if rr < 1.0 {
        return Ok(r);
    }
    let b = crate::primes::nth_prime(base_index) as f64;
    let e = ((rr - 1.0).ln() / b.ln()).round_ties_even() as Pow;
    r.checked_div(&Rational::prime(base_index).checked_pow(e)?)
}

/// Orient a narrow so its highest prime sits in the numerator. `1/1` is not
/// a narrow.
pub fn validate_narrow(r: &Rational) -> Option<Rational> {
    let h = r.high_prime_index()?;
    if r.prime_power(h) < 0 {
        Some(r.recip())
    } else {
        Some(r.clone())
    }
}

/// Narrows of the first `count` primes against the prime at `base_index`.
pub fn default_narrows(count: usize, base_index: usize) -> Vec<Rational> {
    // A single prime's narrow never leaves the exponent range.
    (0..count)
        .filter_map(|i| make_narrow_by_prime(&Rational::prime(i), base_index).ok())
        .collect()
}

/// Coordinates of `r` over `narrows`, taken from the highest prime down.
/// `None` if `r` reaches past the last narrow slot, or if a remainder
/// exponent overflows.
pub fn narrow_powers(r: &Rational, narrows: &[Option<Rational>]) -> Option<Vec<Pow>> {
    let len = r.power_count();
    if len > narrows.len() {
        return None;
    }
    let mut result = vec![0; len];
    let mut rest = r.clone();
    for i in (0..len).rev() {
        let Some(narrow) = &narrows[i] else {
            continue;
        };
        let e = rest.prime_power(i);
        result[i] = e;
        if e != 0 {
            rest = rest.checked_div(&narrow.checked_pow(e).ok()?).ok()?;
        }
    }
    Some(result)
}

/// Coordinates of `r` over the default base-2 narrows. Every slot is
/// filled, so only exponent overflow gives `None`.
pub fn default_narrow_powers(r: &Rational) -> Option<Vec<Pow>> {
    let narrows: Vec<_> = default_narrows(r.power_count(), 0)
        .into_iter()
        .map(Some)
        .collect();
    narrow_powers(r, &narrows)
}

/// Format as `|e0 e1 ...}`. The closing brace marks narrow coordinates.
pub fn format_narrow_powers(pows: &[Pow]) -> String {
    format_powers(pows, '|', '}')
}
