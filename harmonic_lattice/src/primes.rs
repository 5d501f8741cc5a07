// Prime numbers indexed by position: 0 -> 2, 1 -> 3, 2 -> 5, ...
//
// Exponent vectors in `rational.rs` are indexed by prime position, so every
// conversion between integers and vectors goes through `nth_prime` and
// `prime_index`. The first 60 primes (up to 281) come from a table; beyond
// that both functions fall back to trial division / a small sieve, capped at
// `MAX_PRIME` so that factoring user input cannot run away.

/// Largest prime the factorizer will assign an index to.
pub const MAX_PRIME: u64 = 1 << 20;

const PRIMES: [u64; 60] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, //
    31, 37, 41, 43, 47, 53, 59, 61, 67, 71, //
    73, 79, 83, 89, 97, 101, 103, 107, 109, 113, //
    127, 131, 137, 139, 149, 151, 157, 163, 167, 173, //
    179, 181, 191, 193, 197, 199, 211, 223, 227, 229, //
    233, 239, 241, 251, 257, 263, 269, 271, 277, 281,
];

/// The prime at position `index`.
pub fn nth_prime(index: usize) -> u64 {
    if let Some(&p) = PRIMES.get(index) {
        return p;
    }
    let mut count = PRIMES.len() - 1;
    let mut candidate = PRIMES[PRIMES.len() - 1];
    while count < index {
        candidate += 2;
        if is_prime(candidate) {
            count += 1;
        }
    }
    candidate
}

/// Iterator over the primes in ascending order, starting at 2.
pub fn primes() -> Primes {
    Primes { index: 0, last: 0 }
}

/// See [`primes`].
#[derive(Clone, Debug)]
pub struct Primes {
    index: usize,
    last: u64,
}

impl Iterator for Primes {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let p = match PRIMES.get(self.index) {
            Some(&p) => p,
            None => {
                let mut c = self.last + 2;
                while !is_prime(c) {
                    c += 2;
                }
                c
            }
        };
        self.index += 1;
        self.last = p;
        Some(p)
    }
}

/// Position of `p` in the prime sequence, or `None` if `p` is not prime or
/// exceeds `MAX_PRIME`.
pub fn prime_index(p: u64) -> Option<usize> {
    if !(2..=MAX_PRIME).contains(&p) {
        return None;
    }
    if let Ok(i) = PRIMES.binary_search(&p) {
        return Some(i);
    }
    if p <= PRIMES[PRIMES.len() - 1] || !is_prime(p) {
        return None;
    }
    // Count primes below p with a sieve.
    let n = p as usize;
    let mut composite = vec![false; n];
    let mut count = 0;
    let mut i = 2;
    while i < n {
        if !composite[i] {
            count += 1;
            let mut j = i * i;
            while j < n {
                composite[j] = true;
                j += i;
            }
        }
        i += 1;
    }
    Some(count)
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_primes() {
        assert_eq!(nth_prime(0), 2);
        assert_eq!(nth_prime(2), 5);
        assert_eq!(nth_prime(59), 281);
    }

    #[test]
    fn test_primes_beyond_table() {
        assert_eq!(nth_prime(60), 283);
        assert_eq!(nth_prime(61), 293);
        assert_eq!(nth_prime(99), 541);
    }

    #[test]
    fn test_iterator_matches_nth_prime() {
        for (i, p) in primes().take(80).enumerate() {
            assert_eq!(p, nth_prime(i));
        }
    }

    #[test]
    fn test_prime_index() {
        assert_eq!(prime_index(2), Some(0));
        assert_eq!(prime_index(7), Some(3));
        assert_eq!(prime_index(283), Some(60));
        assert_eq!(prime_index(541), Some(99));
        assert_eq!(prime_index(9), None);
        assert_eq!(prime_index(1), None);
        assert_eq!(prime_index(MAX_PRIME + 1), None);
    }

    #[test]
    fn test_index_roundtrip() {
        for i in 0..120 {
            assert_eq!(prime_index(nth_prime(i)), Some(i));
        }
    }
}
