// Text forms built on top of single-interval parsing.
//
//   "81/80, 128/125"     rational list, any separator set
//   "2.3.7/5 (7/5)"      subgroup items, optional narrows in parentheses
//   "701.955c" / "3/2"   an interval given either as cents or as a rational
//
// Batch parsers return one result per item so every bad item can be
// reported, plus strict variants that give up on the first bad one.

use crate::error::{HarmonicError, Result};
use crate::rational::Rational;
use std::fmt;

/// Parse every non-empty item between `separators`.
pub fn parse_list(text: &str, separators: &[char]) -> Vec<Result<Rational>> {
    text.split(separators)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Like `parse_list`, but `None` if any item is invalid.
pub fn parse_list_strict(text: &str, separators: &[char]) -> Option<Vec<Rational>> {
    parse_list(text, separators)
        .into_iter()
        .collect::<Result<Vec<_>>>()
        .ok()
}

pub fn format_list(rationals: &[Rational], separator: &str) -> String {
    rationals
        .iter()
        .map(Rational::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Cents with up to three decimals and a `c` suffix: `701.955c`, `0c`.
pub fn format_cents(cents: f64) -> String {
    let s = format!("{cents:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    let s = if s == "-0" { "0" } else { s };
    format!("{s}c")
}

/// `"701.955c"` or a bare number.
pub fn parse_cents(text: &str) -> Option<f64> {
    let s = text.trim();
    let s = s.strip_suffix('c').unwrap_or(s);
    s.trim().parse::<f64>().ok().filter(|c| c.is_finite())
}

/// Parsed form of subgroup text like `2.3.7/5 (7/5)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubgroupText {
    pub items: Vec<Rational>,
    pub narrows: Vec<Rational>,
}

impl SubgroupText {
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split(['(', ')']);
        let items = parts.next().unwrap_or("");
        let narrows = parts.next().unwrap_or("");
        let strict = |part: &str| -> Result<Vec<Rational>> {
            parse_list(part, &['.']).into_iter().collect()
        };
        Ok(SubgroupText {
            items: strict(items)?,
            narrows: strict(narrows)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.narrows.is_empty()
    }
}

impl fmt::Display for SubgroupText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_list(&self.items, "."))?;
        if !self.narrows.is_empty() {
            if !self.items.is_empty() {
                f.write_str(" ")?;
            }
            write!(f, "({})", format_list(&self.narrows, "."))?;
        }
        Ok(())
    }
}

/// An interval given either exactly or as a plain size in cents.
#[derive(Clone, Debug, PartialEq)]
pub enum SomeInterval {
    Rational(Rational),
    Cents(f64),
}

impl SomeInterval {
    /// A rational if the text is one, otherwise cents.
    pub fn parse(text: &str) -> Option<Self> {
        match Rational::parse(text) {
            Some(r) => Some(SomeInterval::Rational(r)),
            None => parse_cents(text).map(SomeInterval::Cents),
        }
    }

    pub fn cents(&self) -> f64 {
        match self {
            SomeInterval::Rational(r) => r.cents(),
            SomeInterval::Cents(c) => *c,
        }
    }

    pub fn rational(&self) -> Option<&Rational> {
        match self {
            SomeInterval::Rational(r) => Some(r),
            SomeInterval::Cents(_) => None,
        }
    }
}

impl fmt::Display for SomeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SomeInterval::Rational(r) => write!(f, "{r}"),
            SomeInterval::Cents(c) => f.write_str(&format_cents(*c)),
        }
    }
}

/// Parse a list such as `"3/2, 386.3c; 7/4"`. `Err` names the first bad
/// item.
pub fn parse_interval_list(text: &str) -> Result<Vec<SomeInterval>> {
    text.split([';', ',', ' '])
        .filter(|s| !s.trim().is_empty())
        .map(|s| SomeInterval::parse(s).ok_or_else(|| HarmonicError::parse(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(text: &str) -> Rational {
        Rational::parse(text).unwrap()
    }

    #[test]
    fn test_parse_list_reports_each_item() {
        let items = parse_list("81/80, x, 128/125,, 0", &[',']);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].as_ref().unwrap(), &r("81/80"));
        assert!(matches!(&items[1], Err(HarmonicError::Parse { text }) if text == "x"));
        assert_eq!(items[2].as_ref().unwrap(), &r("128/125"));
        assert!(items[3].is_err());
    }

    #[test]
    fn test_parse_list_strict() {
        assert_eq!(
            parse_list_strict("81/80; 128/125", &[';']),
            Some(vec![r("81/80"), r("128/125")])
        );
        assert_eq!(parse_list_strict("81/80; nope", &[';']), None);
        assert_eq!(parse_list_strict("   ", &[';']), Some(vec![]));
    }

    #[test]
    fn test_format_list_round_trip() {
        let rs = vec![r("81/80"), r("128/125"), r("2")];
        let text = format_list(&rs, ", ");
        assert_eq!(text, "81/80, 128/125, 2");
        assert_eq!(parse_list_strict(&text, &[',']), Some(rs));
    }

    #[test]
    fn test_subgroup_text() {
        let s = SubgroupText::parse("2.3.7/5 (7/5)").unwrap();
        assert_eq!(s.items, vec![r("2"), r("3"), r("7/5")]);
        assert_eq!(s.narrows, vec![r("7/5")]);
        assert_eq!(s.to_string(), "2.3.7/5 (7/5)");

        let s = SubgroupText::parse(" 2.3.5 ").unwrap();
        assert!(s.narrows.is_empty());
        assert_eq!(s.to_string(), "2.3.5");

        assert!(SubgroupText::parse("").unwrap().is_empty());
        assert!(SubgroupText::parse("2.x.5").is_err());
    }

    #[test]
    fn test_cents() {
        assert_eq!(format_cents(701.955_000_1), "701.955c");
        assert_eq!(format_cents(0.0), "0c");
        assert_eq!(format_cents(-0.0001), "0c");
        assert_eq!(format_cents(700.0), "700c");
        assert_eq!(format_cents(-21.5), "-21.5c");
        assert_eq!(parse_cents("701.955c"), Some(701.955));
        assert_eq!(parse_cents(" -5 "), Some(-5.0));
        assert_eq!(parse_cents("c"), None);
        assert_eq!(parse_cents("inf"), None);
    }

    #[test]
    fn test_some_interval() {
        let fifth = SomeInterval::parse("3/2").unwrap();
        assert_eq!(fifth.rational(), Some(&r("3/2")));
        assert_eq!(fifth.to_string(), "3/2");

        let tempered = SomeInterval::parse("700c").unwrap();
        assert_eq!(tempered, SomeInterval::Cents(700.0));
        assert_eq!(tempered.cents(), 700.0);
        assert_eq!(tempered.to_string(), "700c");

        // A bare integer is a rational, not cents.
        assert_eq!(SomeInterval::parse("5"), Some(SomeInterval::Rational(r("5"))));
        assert_eq!(SomeInterval::parse("abc"), None);
    }

    #[test]
    fn test_interval_list() {
        let items = parse_interval_list("3/2, 386.3c; 7/4").unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], SomeInterval::Cents(386.3));
        assert!(parse_interval_list("3/2, what").is_err());
    }
}
