// Positive rationals as prime-exponent vectors.
//
// A `Rational` stores the exponents of its prime factorization, indexed by
// prime position (0 -> 2, 1 -> 3, 2 -> 5, ...). 81/80 = 2^-4 * 3^4 * 5^-1 is
// stored as `[-4, 4, -1]`. Multiplication and division are component-wise
// addition and subtraction, so deep fractions stay cheap. Turning a vector
// back into a concrete numerator/denominator (`to_fraction`) can overflow,
// and that failure is returned to the caller of that one conversion.
//
// Exponents stay within `-Pow::MAX..=Pow::MAX`, so negation is always safe.
// The `checked_*` methods return `Err(Overflow)` when a result would leave
// that range; the operators panic instead, the same way integer operators
// do. Everything driven by user input (search steps, metrics, narrows)
// goes through the checked forms.
//
// Trailing zero exponents are always trimmed on construction, which makes
// the derived `PartialEq`/`Hash` ignore padding: `[1]` and `[1, 0, 0]` are
// the same vector.
//
// There is no "invalid" rational value: parsing returns `Option<Rational>`
// and `None` plays the role of the unset/invalid interval. `Rational::infinity`
// is a marker usable only as a comparison bound.
//
// Text forms accepted by `parse`: a positive integer (`"5"`), a fraction
// (`"81/80"` or `"81:80"`), and a monzo (`"|-4 4 -1>"`).
//
// See also: `primes.rs` for prime indexing, `notation.rs` for lists of
// intervals, `matrix.rs` which consumes exponent vectors as integer columns.

use crate::error::{HarmonicError, Result};
use crate::primes::{MAX_PRIME, nth_prime, prime_index, primes};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Div, DivAssign, Mul, MulAssign};
use std::str::FromStr;

/// A single prime exponent.
pub type Pow = i32;

type Powers = SmallVec<[Pow; 8]>;

/// A positive rational number stored as prime exponents.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    // Invariant: no trailing zeros.
    pows: Powers,
}

/// An unsigned fraction `numer/denom` in lowest terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fraction {
    pub numer: u64,
    pub denom: u64,
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// A signed fraction in lowest terms with a positive denominator.
///
/// Used for rational basis coordinates, where a coordinate may be negative
/// or zero (unlike `Rational`, which is always a positive interval).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignedFraction {
    numer: i64,
    denom: i64,
}

impl SignedFraction {
    /// Build `numer/denom` reduced to lowest terms. Panics if `denom == 0`.
    pub fn new(numer: i64, denom: i64) -> Self {
        assert!(denom != 0, "SignedFraction: zero denominator");
        if numer == 0 {
            return SignedFraction { numer: 0, denom: 1 };
        }
        let g = gcd(numer, denom);
        let sign = if denom < 0 { -1 } else { 1 };
        SignedFraction {
            numer: sign * numer / g,
            denom: sign * denom / g,
        }
    }

    pub fn from_integer(n: i64) -> Self {
        SignedFraction { numer: n, denom: 1 }
    }

    pub fn numer(&self) -> i64 {
        self.numer
    }

    pub fn denom(&self) -> i64 {
        self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    /// -1, 0, or 1.
    pub fn signum(&self) -> i64 {
        self.numer.signum()
    }

    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl Default for SignedFraction {
    fn default() -> Self {
        SignedFraction::from_integer(0)
    }
}

impl fmt::Display for SignedFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// Greatest common divisor of the absolute values; `gcd(0, 0) == 1` so the
/// result is always a valid divisor.
pub(crate) fn gcd(a: i64, b: i64) -> i64 {
    let mut a = a.unsigned_abs();
    let mut b = b.unsigned_abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    if a == 0 { 1 } else { a as i64 }
}

impl Rational {
    fn from_smallvec(mut pows: Powers) -> Self {
        while pows.last() == Some(&0) {
            pows.pop();
        }
        Rational { pows }
    }

    /// 1/1.
    pub fn one() -> Self {
        Rational {
            pows: Powers::new(),
        }
    }

    /// 2/1, the octave.
    pub fn two() -> Self {
        Rational::prime(0)
    }

    /// Comparison bound greater than every ordinary rational.
    pub fn infinity() -> Self {
        Rational {
            pows: SmallVec::from_slice(&[Pow::MAX]),
        }
    }

    /// Build from an exponent slice. Trailing zeros are dropped.
    pub fn from_powers(pows: &[Pow]) -> Self {
        Rational::from_smallvec(SmallVec::from_slice(pows))
    }

    /// The prime at position `index` as an interval (`prime(2)` is 5/1).
    pub fn prime(index: usize) -> Self {
        let mut pows = Powers::from_elem(0, index + 1);
        pows[index] = 1;
        Rational { pows }
    }

    /// The first `count` primes.
    pub fn primes(count: usize) -> Vec<Self> {
        (0..count).map(Rational::prime).collect()
    }

    /// Factor a positive integer.
    pub fn from_integer(n: u64) -> Result<Self> {
        if n == 0 {
            return Err(HarmonicError::NotPositive {
                numerator: 0,
                denominator: 1,
            });
        }
        Ok(Rational::from_smallvec(factorize(n)?))
    }

    /// Build `numer/denom`, reducing through factorization.
    pub fn new(numer: u64, denom: u64) -> Result<Self> {
        if numer == 0 || denom == 0 {
            return Err(HarmonicError::NotPositive {
                numerator: numer,
                denominator: denom,
            });
        }
        Ok(Rational::from_integer(numer)? / Rational::from_integer(denom)?)
    }

    /// Exponents without trailing zeros.
    pub fn powers(&self) -> &[Pow] {
        &self.pows
    }

    /// Exponent of the prime at `index` (zero past the stored length).
    pub fn prime_power(&self, index: usize) -> Pow {
        self.pows.get(index).copied().unwrap_or(0)
    }

    /// Number of stored exponents, i.e. `high_prime_index() + 1` or 0.
    pub fn power_count(&self) -> usize {
        self.pows.len()
    }

    /// Index of the largest prime with a nonzero exponent; `None` for 1/1.
    pub fn high_prime_index(&self) -> Option<usize> {
        self.pows.len().checked_sub(1)
    }

    pub fn is_one(&self) -> bool {
        self.pows.is_empty()
    }

    pub fn is_infinity(&self) -> bool {
        self.pows.len() == 1 && self.pows[0] == Pow::MAX
    }

    /// True when no exponent is negative.
    pub fn is_integer(&self) -> bool {
        self.pows.iter().all(|&e| e >= 0)
    }

    pub fn recip(&self) -> Self {
        Rational {
            pows: self.pows.iter().map(|&e| e.saturating_neg()).collect(),
        }
    }

    /// Integer power; any sign. Panics on exponent overflow, see
    /// `checked_pow`.
    pub fn pow(&self, e: Pow) -> Self {
        match self.checked_pow(e) {
            Ok(r) => r,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn checked_pow(&self, e: Pow) -> Result<Self> {
        if e == 0 {
            return Ok(Rational::one());
        }
        self.pows
            .iter()
            .map(|&p| exponent(p as i64 * e as i64))
            .collect::<Option<Powers>>()
            .map(Rational::from_smallvec)
            .ok_or_else(|| HarmonicError::overflow(format!("{}^{e}", self.format_monzo())))
    }

    pub fn checked_mul(&self, other: &Rational) -> Result<Self> {
        try_combine(self, other, 1)
            .ok_or_else(|| HarmonicError::overflow("exponent product"))
    }

    pub fn checked_div(&self, other: &Rational) -> Result<Self> {
        try_combine(self, other, -1)
            .ok_or_else(|| HarmonicError::overflow("exponent quotient"))
    }

    /// Split into numerator and denominator exponent vectors.
    pub fn split(&self) -> (Rational, Rational) {
        let numer = self.pows.iter().map(|&e| e.max(0)).collect();
        let denom = self.pows.iter().map(|&e| (-e).max(0)).collect();
        (Rational::from_smallvec(numer), Rational::from_smallvec(denom))
    }

    /// Concrete numerator and denominator. Fails with `Overflow` if either
    /// does not fit in a `u64`.
    pub fn to_fraction(&self) -> Result<Fraction> {
        let numer = self.pow_product(1);
        let denom = self.pow_product(-1);
        match (numer, denom) {
            (Some(numer), Some(denom)) => Ok(Fraction { numer, denom }),
            _ => Err(HarmonicError::overflow(self.format_monzo())),
        }
    }

    pub fn numerator(&self) -> Result<u64> {
        self.pow_product(1)
            .ok_or_else(|| HarmonicError::overflow(self.format_monzo()))
    }

    pub fn denominator(&self) -> Result<u64> {
        self.pow_product(-1)
            .ok_or_else(|| HarmonicError::overflow(self.format_monzo()))
    }

    // Product of p^|e| over exponents with the given sign.
    fn pow_product(&self, sign: Pow) -> Option<u64> {
        let mut n: u64 = 1;
        for (i, &e) in self.pows.iter().enumerate() {
            if e.signum() != sign {
                continue;
            }
            let p = nth_prime(i).checked_pow(e.unsigned_abs())?;
            n = n.checked_mul(p)?;
        }
        Some(n)
    }

    /// Approximate value.
    pub fn to_f64(&self) -> f64 {
        self.pows
            .iter()
            .enumerate()
            .filter(|&(_, &e)| e != 0)
            .map(|(i, &e)| (nth_prime(i) as f64).powi(e))
            .product()
    }

    /// Size in cents: `sum(e_i * log2(p_i)) * 1200`.
    pub fn cents(&self) -> f64 {
        self.pows
            .iter()
            .enumerate()
            .filter(|&(_, &e)| e != 0)
            .map(|(i, &e)| e as f64 * (nth_prime(i) as f64).log2())
            .sum::<f64>()
            * 1200.0
    }

    /// Compare by value. Fails with `Overflow` when the quotient of the two
    /// does not fit a 64-bit fraction.
    pub fn try_cmp(&self, other: &Rational) -> Result<Ordering> {
        match (self.is_infinity(), other.is_infinity()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Greater),
            (false, true) => return Ok(Ordering::Less),
            (false, false) => {}
        }
        let f = self.checked_div(other)?.to_fraction()?;
        Ok(f.numer.cmp(&f.denom))
    }

    /// Exponents of the greedy decomposition into superparticular ratios
    /// `p/(p-1)`, working from the highest prime down. Each step divides out
    /// `p/(p-1)`, so lower exponents are read from the running remainder.
    ///
    /// 81/80 = 2^-2 * (3/2)^4 * (5/4)^-1 gives `[-2, 4, -1]`. Fails with
    /// `Overflow` when a remainder exponent leaves the `Pow` range.
    pub fn epimoric_powers(&self) -> Result<Vec<Pow>> {
        let len = self.pows.len();
        let mut result = vec![0; len];
        let mut rest = self.clone();
        for i in (0..len).rev() {
            let e = rest.prime_power(i);
            result[i] = e;
            if e != 0 {
                rest = rest.checked_div(&superparticular(i).checked_pow(e)?)?;
            }
        }
        Ok(result)
    }

    /// `numer<delimiter>denom`, or just `numer` for integers.
    pub fn format_fraction(&self, delimiter: &str) -> Result<String> {
        let f = self.to_fraction()?;
        if f.denom == 1 {
            Ok(f.numer.to_string())
        } else {
            Ok(format!("{}{}{}", f.numer, delimiter, f.denom))
        }
    }

    /// Monzo notation: `|-4 4 -1>`.
    pub fn format_monzo(&self) -> String {
        format_powers(&self.pows, '|', '>')
    }

    /// Parse an integer, `n/d`, `n:d`, or monzo. `None` if the text is not a
    /// valid positive rational.
    pub fn parse(text: &str) -> Option<Rational> {
        let s = text.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<u64>() {
            return Rational::from_integer(n).ok();
        }
        if s.contains('/') || s.contains(':') {
            let mut parts = s.split(['/', ':']);
            let (Some(n), Some(d), None) = (parts.next(), parts.next(), parts.next()) else {
                return None;
            };
            let n = n.trim().parse::<u64>().ok()?;
            let d = d.trim().parse::<u64>().ok()?;
            return Rational::new(n, d).ok();
        }
        if s.starts_with('|') {
            let inner = s.trim_matches(|c| c == '|' || c == '>');
            let pows = inner
                .split_whitespace()
                .map(|p| p.parse::<Pow>().ok().filter(|&e| e != Pow::MIN))
                .collect::<Option<Powers>>()?;
            return Some(Rational::from_smallvec(pows));
        }
        None
    }
}

/// `p/(p-1)` for the prime at `index`.
fn superparticular(index: usize) -> Rational {
    // p - 1 only has factors below p, so it always factors.
    let below = factorize(nth_prime(index) - 1).unwrap_or_default();
    Rational::prime(index) / Rational::from_smallvec(below)
}

/// Format an exponent list between the given brackets: `|1 0 -2>`.
pub(crate) fn format_powers<T: fmt::Display>(pows: &[T], open: char, close: char) -> String {
    let mut s = String::new();
    s.push(open);
    for (i, e) in pows.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        s.push_str(&e.to_string());
    }
    s.push(close);
    s
}

fn factorize(mut n: u64) -> Result<Powers> {
    let mut pows = Powers::new();
    for p in primes() {
        if n == 1 {
            break;
        }
        if p.saturating_mul(p) > n {
            // What remains is itself prime.
            let index = prime_index(n).ok_or(HarmonicError::PrimeTooLarge { value: n })?;
            if pows.len() <= index {
                pows.resize(index + 1, 0);
            }
            pows[index] += 1;
            break;
        }
        if p > MAX_PRIME {
            return Err(HarmonicError::PrimeTooLarge { value: n });
        }
        let mut e = 0;
        while n % p == 0 {
            n /= p;
            e += 1;
        }
        pows.push(e);
    }
    Ok(pows)
}

/// An exponent computed in `i64`, if it lies in `-Pow::MAX..=Pow::MAX`.
fn exponent(v: i64) -> Option<Pow> {
    (v.unsigned_abs() <= Pow::MAX as u64).then_some(v as Pow)
}

fn try_combine(a: &Rational, b: &Rational, sign: i64) -> Option<Rational> {
    let len = a.pows.len().max(b.pows.len());
    (0..len)
        .map(|i| exponent(a.prime_power(i) as i64 + sign * b.prime_power(i) as i64))
        .collect::<Option<Powers>>()
        .map(Rational::from_smallvec)
}

fn combine(a: &Rational, b: &Rational, sign: i64) -> Rational {
    match try_combine(a, b, sign) {
        Some(r) => r,
        None => panic!(
            "exponent overflow combining {} and {}",
            a.format_monzo(),
            b.format_monzo()
        ),
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        combine(self, rhs, 1)
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        combine(&self, &rhs, 1)
    }
}

impl Div<&Rational> for &Rational {
    type Output = Rational;

    fn div(self, rhs: &Rational) -> Rational {
        combine(self, rhs, -1)
    }
}

impl Div for Rational {
    type Output = Rational;

    fn div(self, rhs: Rational) -> Rational {
        combine(&self, &rhs, -1)
    }
}

impl MulAssign<&Rational> for Rational {
    fn mul_assign(&mut self, rhs: &Rational) {
        *self = combine(self, rhs, 1);
    }
}

impl DivAssign<Rational> for Rational {
    fn div_assign(&mut self, rhs: Rational) {
        *self = combine(self, &rhs, -1);
    }
}

impl DivAssign<&Rational> for Rational {
    fn div_assign(&mut self, rhs: &Rational) {
        *self = combine(self, rhs, -1);
    }
}

/// `None` when the comparison overflows; see `try_cmp`.
impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl fmt::Display for Rational {
    /// The fraction, or the monzo when the fraction does not fit in `u64`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_fraction() {
            Ok(fr) => write!(f, "{}", fr),
            Err(_) => f.write_str(&self.format_monzo()),
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({} {})", self, self.format_monzo())
    }
}

impl FromStr for Rational {
    type Err = HarmonicError;

    fn from_str(s: &str) -> Result<Self> {
        Rational::parse(s).ok_or_else(|| HarmonicError::parse(s))
    }
}

// Serialized as text so intervals read naturally in JSON configs.
impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rational::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid interval {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(text: &str) -> Rational {
        Rational::parse(text).unwrap()
    }

    #[test]
    fn test_construction_and_format() {
        assert_eq!(Rational::new(1, 1).unwrap(), Rational::one());
        assert_eq!(Rational::from_integer(2).unwrap(), Rational::two());

        let r0 = Rational::new(4, 5).unwrap();
        let r1 = Rational::new(6, 4).unwrap();
        assert_eq!(r0.to_string(), "4/5");
        assert_eq!(r1.to_string(), "3/2");
        assert_eq!((&r0 * &r1).to_string(), "6/5");
        assert_eq!((&r0 / &r1).to_string(), "8/15");

        assert_eq!(r("81/80").format_monzo(), "|-4 4 -1>");
        assert_eq!(Rational::one().format_monzo(), "|>");
        assert_eq!(r("3/2").format_fraction(":").unwrap(), "3:2");
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            Rational::new(0, 5),
            Err(HarmonicError::NotPositive { .. })
        ));
        assert!(Rational::from_integer(0).is_err());
    }

    #[test]
    fn test_trailing_zeros_ignored() {
        let a = Rational::from_powers(&[1]);
        let b = Rational::from_powers(&[1, 0, 0]);
        assert_eq!(a, b);
        assert_eq!(b.powers(), &[1]);
        assert_eq!(b.high_prime_index(), Some(0));
        assert_eq!(Rational::from_powers(&[0, 0]).high_prime_index(), None);
    }

    #[test]
    fn test_group_laws() {
        let a = r("81/80");
        let b = r("128/125");
        assert_eq!(&a * &a.pow(-1), Rational::one());
        assert_eq!(&(&a * &b) / &b, a);
        assert_eq!(a.recip(), a.pow(-1));
        assert_eq!(a.pow(0), Rational::one());
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(r(" 81 / 80 \n").format_monzo(), "|-4 4 -1>");
        assert_eq!(r(" | 7 \t 0 -3> ").format_monzo(), "|7 0 -3>");
        assert_eq!(r("3:2"), r("3/2"));
        assert_eq!(r("12"), r("|2 1>"));
        assert_eq!(r("|>"), Rational::one());
    }

    #[test]
    fn test_parse_invalid() {
        for text in ["", "0", "-3", "3/0", "0/5", "-3/2", "1/2/3", "abc", "|1 x>", "3.5"] {
            assert!(Rational::parse(text).is_none(), "{text:?} should not parse");
        }
        assert!("abc".parse::<Rational>().is_err());
    }

    #[test]
    fn test_comparison() {
        assert!(r("3/2") > r("4/3"));
        assert!(r("81/80") < r("25/24"));
        assert_eq!(r("6/4").partial_cmp(&r("3/2")), Some(Ordering::Equal));
        assert!(Rational::infinity() > r("1000000"));
        assert!(r("1/1000000") < Rational::infinity());
    }

    #[test]
    fn test_overflow_is_local() {
        let deep = Rational::from_powers(&[0, 60]); // 3^60 > u64::MAX
        assert!(matches!(deep.to_fraction(), Err(HarmonicError::Overflow { .. })));
        assert_eq!(deep.partial_cmp(&Rational::one()), None);
        // Display falls back to the monzo.
        assert_eq!(deep.to_string(), "|0 60>");
        // Arithmetic on the vector keeps working.
        assert_eq!(&deep / &deep, Rational::one());
    }

    #[test]
    fn test_exponent_overflow_is_an_error() {
        let big = Rational::from_powers(&[1_500_000_000]);
        assert!(matches!(big.checked_pow(2), Err(HarmonicError::Overflow { .. })));
        assert!(matches!(big.checked_mul(&big), Err(HarmonicError::Overflow { .. })));
        assert!(matches!(
            big.recip().checked_div(&big),
            Err(HarmonicError::Overflow { .. })
        ));
        assert_eq!(big.checked_div(&big).unwrap(), Rational::one());
        assert_eq!(big.checked_pow(-1).unwrap(), big.recip());

        let top = Rational::from_powers(&[Pow::MAX]);
        assert_eq!(top.recip().powers(), &[-Pow::MAX]);
        assert!(top.checked_mul(&r("2")).is_err());
        assert!(matches!(
            top.try_cmp(&top.recip()),
            Err(HarmonicError::Overflow { .. })
        ));
        assert!(top.epimoric_powers().is_ok());
        assert!(
            Rational::from_powers(&[1_000_000_000, 1_500_000_000])
                .epimoric_powers()
                .is_err()
        );
    }

    #[test]
    #[should_panic(expected = "exponent overflow")]
    fn test_operator_overflow_panics() {
        let big = Rational::from_powers(&[1_500_000_000]);
        let _ = &big * &big;
    }

    #[test]
    fn test_monzo_rejects_min_exponent() {
        assert_eq!(Rational::parse("|-2147483648>"), None);
        assert_eq!(
            Rational::parse("|-2147483647>").map(|r| r.powers().to_vec()),
            Some(vec![-2147483647])
        );
    }

    #[test]
    fn test_cents_and_value() {
        assert!((r("2").cents() - 1200.0).abs() < 1e-9);
        assert!((r("3/2").cents() - 701.955).abs() < 1e-3);
        assert!((r("5/4").to_f64() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_is_integer() {
        assert!(r("12").is_integer());
        assert!(!r("3/2").is_integer());
        assert!(Rational::one().is_integer());
    }

    #[test]
    fn test_split() {
        let (n, d) = r("81/80").split();
        assert_eq!(n, r("81"));
        assert_eq!(d, r("80"));
    }

    #[test]
    fn test_epimoric_powers() {
        // 3/2 is itself the superparticular of prime 3.
        assert_eq!(r("3/2").epimoric_powers().unwrap(), vec![0, 1]);
        // 5/4 = 5/4 exactly.
        assert_eq!(r("5/4").epimoric_powers().unwrap(), vec![0, 0, 1]);
        // 9/8 = (3/2)^2 / 2
        assert_eq!(r("9/8").epimoric_powers().unwrap(), vec![-1, 2]);
        // 81/80 = 2^-2 * (3/2)^4 * (5/4)^-1
        assert_eq!(r("81/80").epimoric_powers().unwrap(), vec![-2, 4, -1]);
    }

    #[test]
    fn test_large_prime_factor() {
        assert_eq!(r("283").high_prime_index(), Some(60));
        // 1048583 is the first prime above the indexing cap.
        assert!(matches!(
            Rational::from_integer(1_048_583),
            Err(HarmonicError::PrimeTooLarge { .. })
        ));
    }

    #[test]
    fn test_signed_fraction() {
        let f = SignedFraction::new(6, -4);
        assert_eq!(f.numer(), -3);
        assert_eq!(f.denom(), 2);
        assert_eq!(f.to_string(), "-3/2");
        assert_eq!(SignedFraction::new(0, 7).to_string(), "0");
        assert_eq!(SignedFraction::new(8, 4).to_string(), "2");
        assert!(SignedFraction::new(0, -3).is_zero());
    }

    #[test]
    fn test_serde_as_text() {
        let json = serde_json::to_string(&r("81/80")).unwrap();
        assert_eq!(json, "\"81/80\"");
        let back: Rational = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r("81/80"));
        assert!(serde_json::from_str::<Rational>("\"nope\"").is_err());
    }
}
