// Crate-wide error type.
//
// Most "failures" in this crate are ordinary data conditions and are modeled
// as `Option`: an unparsable interval is `None`, a vector outside a basis
// span has no coordinates. `HarmonicError` covers the remaining cases, which
// are either local arithmetic failures scoped to one conversion (overflow
// while turning exponents into a fixed-width fraction) or caller mistakes
// detected at construction time (unknown metric name, a query vector longer
// than the matrix it is solved against).
//
// See also: `rational.rs` for the overflow sites, `harmonicity.rs` for metric
// lookup, `matrix.rs` for the length check, `config.rs` for JSON loading.

use thiserror::Error;

/// Errors raised by interval arithmetic, metric lookup, and basis solving.
#[derive(Debug, Error)]
pub enum HarmonicError {
    /// A prime-power product did not fit in a 64-bit integer.
    #[error("integer overflow converting {what}")]
    Overflow { what: String },

    /// Intervals are positive rationals; zero was supplied.
    #[error("rational must be positive: {numerator}/{denominator}")]
    NotPositive { numerator: u64, denominator: u64 },

    /// A factor exceeds the largest prime the factorizer will index.
    #[error("prime factor {value} is too large")]
    PrimeTooLarge { value: u64 },

    /// Text that is not an integer, `n/d`, `n:d`, or monzo.
    #[error("cannot parse interval: {text:?}")]
    Parse { text: String },

    /// No harmonicity metric is registered under this name.
    #[error("unknown harmonicity metric: {name:?}")]
    UnknownMetric { name: String },

    /// The query vector spans more primes than the matrix has rows.
    #[error("vector of length {length} exceeds matrix height {height}")]
    VectorTooLong { length: usize, height: usize },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarmonicError {
    pub(crate) fn overflow(what: impl Into<String>) -> Self {
        HarmonicError::Overflow { what: what.into() }
    }

    pub(crate) fn parse(text: impl Into<String>) -> Self {
        HarmonicError::Parse { text: text.into() }
    }
}

pub type Result<T> = std::result::Result<T, HarmonicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = HarmonicError::NotPositive {
            numerator: 0,
            denominator: 3,
        };
        assert_eq!(e.to_string(), "rational must be positive: 0/3");

        let e = HarmonicError::VectorTooLong {
            length: 5,
            height: 3,
        };
        assert_eq!(e.to_string(), "vector of length 5 exceeds matrix height 3");
    }

    #[test]
    fn test_config_error_from_json() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let e: HarmonicError = err.into();
        assert!(e.to_string().starts_with("invalid config:"));
    }
}
