// Integer basis matrix: span membership and coordinates by fraction-free
// Gaussian elimination.
//
// Given a basis of intervals (each an exponent vector in Z^height), decide
// whether another interval is a product of integer powers of the basis, and
// if so recover those powers. All arithmetic stays in integers: to clear an
// entry `c` against a pivot `L` in the same column, the target row becomes
// `d1 * target + d0 * pivot` where `L * d0 + c * d1 = 0` with `d0/d1` in
// lowest terms. Entries can grow without bound during elimination, so every
// row operation is checked and overflow is returned as an error.
//
// Layout: cells are column-major (`cells[col * height + row]`), so a column
// is one contiguous slice. Rows are never moved; `order` maps logical row to
// storage row, and `lead_cols[row]` records the pivot column found for it.
//
// Two modes:
//
//   - Standard (`BasisMatrix::new`): the basis columns are followed by an
//     identity block. After elimination the identity block holds the row
//     operations that were applied, so any later query vector can be pushed
//     through them without redoing the elimination. Build once per basis,
//     query many times.
//   - Single target (`BasisMatrix::with_target`): one extra column holding a
//     single query vector, solved by back-substitution in `find_coordinates`.
//
// "Not in the span" and "no integer solution" are `Ok(None)`. A basis or
// query vector longer than the matrix height is `Err(VectorTooLong)`;
// `with_target` asserts instead, since its one caller sizes the height.
//
// A matrix is single-owner mutable state; clone it to query from several
// threads.

use crate::error::{HarmonicError, Result};
use crate::rational::{Rational, SignedFraction, gcd};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Standard,
    Target,
}

/// Which coordinate type `BasisMatrix::solve` should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateKind {
    Integer,
    Float,
    Rational,
}

/// Coordinates of a vector against a basis.
#[derive(Clone, Debug, PartialEq)]
pub enum Coordinates {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    Rational(Vec<SignedFraction>),
}

#[derive(Clone, Debug)]
pub struct BasisMatrix {
    basis_size: usize,
    width: usize,
    height: usize,
    cells: Vec<i64>,
    order: Vec<usize>,
    lead_cols: Vec<Option<usize>>,
    layout: Layout,
}

/// Longest exponent vector among `rs`.
fn max_length(rs: &[Rational]) -> usize {
    rs.iter().map(Rational::power_count).max().unwrap_or(0)
}

/// The first of `rs` longer than `height`, as a `VectorTooLong` error.
fn check_height(rs: &[Rational], height: usize) -> Result<()> {
    match rs.iter().map(Rational::power_count).find(|&n| n > height) {
        Some(length) => Err(HarmonicError::VectorTooLong { length, height }),
        None => Ok(()),
    }
}

/// `(d0, d1)` with `lead * d0 + c * d1 == 0`, in lowest terms.
fn cancel_pair(lead: i64, c: i64) -> (i64, i64) {
    let g = gcd(lead, c);
    let d0 = c.abs() / g;
    let mut d1 = lead.abs() / g;
    if lead.signum() == c.signum() {
        d1 = -d1;
    }
    (d0, d1)
}

impl BasisMatrix {
    // Callers check that every basis vector fits in `height`.
    fn empty(basis: &[Rational], height: usize, extra: usize, layout: Layout) -> Self {
        let basis_size = basis.len();
        let width = basis_size + extra;
        let mut cells = vec![0; width * height];
        for (j, b) in basis.iter().enumerate() {
            for (i, &e) in b.powers().iter().enumerate() {
                cells[j * height + i] = e as i64;
            }
        }
        BasisMatrix {
            basis_size,
            width,
            height,
            cells,
            order: (0..height).collect(),
            lead_cols: vec![None; height],
            layout,
        }
    }

    /// Build and reduce a reusable matrix for `basis`. `height` defaults to
    /// the longest basis vector; a basis vector longer than an explicit
    /// `height` is `Err(VectorTooLong)`.
    pub fn new(basis: &[Rational], height: Option<usize>) -> Result<Self> {
        let mut m = BasisMatrix::unreduced(basis, height)?;
        m.make_echelon()?;
        m.reduce_rows()?;
        Ok(m)
    }

    /// Like `new`, but without running elimination.
    pub fn unreduced(basis: &[Rational], height: Option<usize>) -> Result<Self> {
        let height = height.unwrap_or_else(|| max_length(basis));
        check_height(basis, height)?;
        let mut m = BasisMatrix::empty(basis, height, height, Layout::Standard);
        for j in 0..height {
            let col = m.basis_size + j;
            m.cells[col * height + j] = 1;
        }
        Ok(m)
    }

    /// Single-query matrix with `target` as the last column. `height`
    /// defaults to the longest of the basis and the target.
    pub fn with_target(basis: &[Rational], target: &Rational, height: Option<usize>) -> Self {
        let height =
            height.unwrap_or_else(|| max_length(basis).max(target.power_count()));
        assert!(
            check_height(basis, height).is_ok(),
            "basis vector exceeds matrix height {height}"
        );
        assert!(
            target.power_count() <= height,
            "target {target} exceeds matrix height {height}"
        );
        let mut m = BasisMatrix::empty(basis, height, 1, Layout::Target);
        let col = m.basis_size;
        for (i, &e) in target.powers().iter().enumerate() {
            m.cells[col * height + i] = e as i64;
        }
        m
    }

    pub fn basis_size(&self) -> usize {
        self.basis_size
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pivots found so far, i.e. the rank once reduced.
    pub fn rank(&self) -> usize {
        self.lead_cols.iter().flatten().count()
    }

    fn at(&self, col: usize, row: usize) -> i64 {
        self.cells[col * self.height + self.order[row]]
    }

    // Bring a nonzero entry of `col` at or below `row` up to `row`.
    fn find_column_lead(&mut self, col: usize, row: usize) -> bool {
        for i in row..self.height {
            if self.at(col, i) != 0 {
                self.order.swap(i, row);
                return true;
            }
        }
        false
    }

    // Clear `col` in row `i` using the pivot in row `row`.
    fn eliminate(&mut self, col: usize, row: usize, i: usize) -> Result<()> {
        let c = self.at(col, i);
        if c == 0 {
            return Ok(());
        }
        let (d0, d1) = cancel_pair(self.at(col, row), c);
        let target = self.order[i];
        let pivot = self.order[row];
        let h = self.height;
        for j in 0..self.width {
            let value = if j == col {
                0
            } else {
                self.cells[j * h + target]
                    .checked_mul(d1)
                    .zip(self.cells[j * h + pivot].checked_mul(d0))
                    .and_then(|(a, b)| a.checked_add(b))
                    .ok_or_else(|| HarmonicError::overflow("basis matrix row"))?
            };
            self.cells[j * h + target] = value;
        }
        Ok(())
    }

    /// Forward elimination to row echelon form. Idempotent.
    pub fn make_echelon(&mut self) -> Result<()> {
        let mut row = 0;
        let mut col = 0;
        while row < self.height && col < self.basis_size {
            if !self.find_column_lead(col, row) {
                col += 1;
                continue;
            }
            for i in row + 1..self.height {
                self.eliminate(col, row, i)?;
            }
            self.lead_cols[row] = Some(col);
            trace!(row, col, lead = self.at(col, row), "pivot");
            col += 1;
            row += 1;
        }
        Ok(())
    }

    /// Back elimination above every pivot. Idempotent; call after
    /// `make_echelon`.
    pub fn reduce_rows(&mut self) -> Result<()> {
        for row in (0..self.height).rev() {
            let Some(col) = self.lead_cols[row] else {
                continue;
            };
            for i in (0..row).rev() {
                self.eliminate(col, row, i)?;
            }
            trace!(row, col, "reduced");
        }
        Ok(())
    }

    /// Integer coordinates of the target column (single-target mode).
    ///
    /// Back-substitutes from the bottom row up. Where the pivot does not
    /// divide the remaining value, later columns in the same row are tried
    /// instead, which covers dependent bases.
    pub fn find_coordinates(&mut self) -> Result<Option<Vec<i64>>> {
        assert!(
            self.layout == Layout::Target,
            "find_coordinates needs a matrix built with with_target"
        );
        self.make_echelon()?;
        let bs = self.basis_size;
        let h = self.height;
        let mut coordinates = vec![0; bs];
        let mut last_col: Option<usize> = None;
        for row in (0..h).rev() {
            let b = self.at(bs, row);
            let Some(lead_col) = self.lead_cols[row] else {
                if b != 0 {
                    // Zero row with a nonzero right-hand side.
                    return Ok(None);
                }
                continue;
            };
            if b == 0 {
                continue;
            }
            let end = last_col.unwrap_or(bs);
            let found = (lead_col..end).find_map(|col| {
                let lead = self.at(col, row);
                (lead != 0 && b % lead == 0).then(|| (col, b / lead))
            });
            let Some((col, value)) = found else {
                return Ok(None);
            };
            for above in 0..row {
                let c = self.at(col, above);
                let cell = bs * h + self.order[above];
                self.cells[cell] = c
                    .checked_mul(value)
                    .and_then(|cv| self.cells[cell].checked_sub(cv))
                    .ok_or_else(|| HarmonicError::overflow("basis matrix target"))?;
            }
            trace!(row, col, value, "back substitution");
            coordinates[col] = value;
            last_col = Some(col);
        }
        Ok(Some(coordinates))
    }

    // Push `v` through the recorded row operations and hand each pivot row's
    // (value, pivot) to `per_row`. A row without a pivot must come out zero.
    fn project<T, F>(&self, v: &Rational, mut per_row: F) -> Result<Option<Vec<T>>>
    where
        T: Clone + Default,
        F: FnMut(i64, i64) -> Option<T>,
    {
        assert!(
            self.layout == Layout::Standard,
            "coordinate queries need a matrix built with new"
        );
        let length = v.power_count();
        if length > self.height {
            return Err(HarmonicError::VectorTooLong {
                length,
                height: self.height,
            });
        }
        let mut result = vec![T::default(); self.basis_size];
        for row in 0..self.height {
            let mut b: i64 = 0;
            for (i, &e) in v.powers().iter().enumerate() {
                let term = (e as i64)
                    .checked_mul(self.at(self.basis_size + i, row))
                    .ok_or_else(|| HarmonicError::overflow("basis matrix query"))?;
                b = b
                    .checked_add(term)
                    .ok_or_else(|| HarmonicError::overflow("basis matrix query"))?;
            }
            match self.lead_cols[row] {
                None if b != 0 => return Ok(None),
                None => {}
                Some(col) => match per_row(b, self.at(col, row)) {
                    Some(x) => result[col] = x,
                    None => return Ok(None),
                },
            }
        }
        Ok(Some(result))
    }

    /// Integer coordinates of `v`, or `None` if `v` is outside the integer
    /// span.
    pub fn coordinates(&self, v: &Rational) -> Result<Option<Vec<i64>>> {
        self.project(v, |b, lead| (b % lead == 0).then(|| b / lead))
    }

    /// Real coordinates of `v`; `None` only when `v` is outside the span.
    pub fn float_coordinates(&self, v: &Rational) -> Result<Option<Vec<f64>>> {
        self.project(v, |b, lead| Some(b as f64 / lead as f64))
    }

    /// Exact rational coordinates of `v`; `None` only when `v` is outside
    /// the span.
    pub fn rational_coordinates(&self, v: &Rational) -> Result<Option<Vec<SignedFraction>>> {
        self.project(v, |b, lead| Some(SignedFraction::new(b, lead)))
    }

    pub fn solve(&self, v: &Rational, kind: CoordinateKind) -> Result<Option<Coordinates>> {
        Ok(match kind {
            CoordinateKind::Integer => self.coordinates(v)?.map(Coordinates::Integer),
            CoordinateKind::Float => self.float_coordinates(v)?.map(Coordinates::Float),
            CoordinateKind::Rational => self.rational_coordinates(v)?.map(Coordinates::Rational),
        })
    }
}

/// One-shot integer coordinates of `target` against `basis`.
pub fn find_coordinates(basis: &[Rational], target: &Rational) -> Result<Option<Vec<i64>>> {
    BasisMatrix::with_target(basis, target, None).find_coordinates()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(text: &str) -> Rational {
        Rational::parse(text).unwrap()
    }

    fn rs(texts: &[&str]) -> Vec<Rational> {
        texts.iter().map(|t| r(t)).collect()
    }

    #[test]
    fn test_cancel_pair() {
        for (lead, c) in [(2, 4), (-3, 6), (4, -6), (-5, -10), (7, 3)] {
            let (d0, d1) = cancel_pair(lead, c);
            assert_eq!(lead * d0 + c * d1, 0, "{lead} {c}");
            assert_eq!(gcd(d0, d1), 1);
        }
    }

    #[test]
    fn test_comma_difference() {
        let basis = rs(&["81/80", "128/125"]);
        let target = r("2048/2025");
        let m = BasisMatrix::new(&basis, None).unwrap();
        assert_eq!(m.height(), 3);
        assert_eq!(m.width(), 5);
        assert_eq!(m.rank(), 2);
        assert_eq!(m.coordinates(&target).unwrap(), Some(vec![-1, 1]));
        assert_eq!(find_coordinates(&basis, &target).unwrap(), Some(vec![-1, 1]));
    }

    #[test]
    fn test_outside_span() {
        let basis = rs(&["3/2"]);
        assert_eq!(find_coordinates(&basis, &r("5/4")).unwrap(), None);
        let m = BasisMatrix::new(&basis, Some(3)).unwrap();
        assert_eq!(m.coordinates(&r("5/4")).unwrap(), None);
        assert_eq!(m.float_coordinates(&r("5/4")).unwrap(), None);
        let m = BasisMatrix::new(&rs(&["81/80", "128/125"]), None).unwrap();
        assert_eq!(m.coordinates(&r("3/2")).unwrap(), None);
    }

    #[test]
    fn test_unison_is_origin() {
        let m = BasisMatrix::new(&rs(&["2", "3/2", "5/4"]), None).unwrap();
        assert_eq!(m.coordinates(&Rational::one()).unwrap(), Some(vec![0, 0, 0]));
    }

    #[test]
    fn test_fractional_coordinates() {
        let m = BasisMatrix::new(&rs(&["9/4"]), None).unwrap();
        let fifth = r("3/2");
        assert_eq!(m.coordinates(&fifth).unwrap(), None);
        assert_eq!(m.float_coordinates(&fifth).unwrap(), Some(vec![0.5]));
        assert_eq!(
            m.rational_coordinates(&fifth).unwrap(),
            Some(vec![SignedFraction::new(1, 2)])
        );
        assert_eq!(
            m.solve(&fifth, CoordinateKind::Float).unwrap(),
            Some(Coordinates::Float(vec![0.5]))
        );
        assert_eq!(m.solve(&fifth, CoordinateKind::Integer).unwrap(), None);
    }

    #[test]
    fn test_vector_too_long() {
        let m = BasisMatrix::new(&rs(&["9/4"]), None).unwrap();
        assert!(matches!(
            m.coordinates(&r("5/4")),
            Err(HarmonicError::VectorTooLong { length: 3, height: 2 })
        ));
    }

    #[test]
    fn test_basis_taller_than_height() {
        assert!(matches!(
            BasisMatrix::new(&rs(&["5/4"]), Some(2)),
            Err(HarmonicError::VectorTooLong { length: 3, height: 2 })
        ));
        assert!(matches!(
            BasisMatrix::unreduced(&rs(&["2", "7/4"]), Some(3)),
            Err(HarmonicError::VectorTooLong { length: 4, height: 3 })
        ));
        assert!(BasisMatrix::new(&rs(&["5/4"]), Some(4)).is_ok());
    }

    #[test]
    #[should_panic(expected = "exceeds matrix height")]
    fn test_with_target_height_too_small() {
        BasisMatrix::with_target(&rs(&["5/4"]), &r("2"), Some(2));
    }

    #[test]
    fn test_single_target_uses_later_column() {
        // The pivot 4 does not divide 2, so the solver moves on to the 2.
        assert_eq!(
            find_coordinates(&rs(&["4", "2"]), &r("2")).unwrap(),
            Some(vec![0, 1])
        );
        // 9/4 and 3/2 share a pivot row; 15/2 needs the 3/2 column.
        assert_eq!(
            find_coordinates(&rs(&["9/4", "3/2", "5"]), &r("15/2")).unwrap(),
            Some(vec![0, 1, 1])
        );
        assert_eq!(
            find_coordinates(&rs(&["9/4", "5"]), &r("15/2")).unwrap(),
            None
        );
    }

    #[test]
    fn test_dependent_basis_leaves_free_columns_zero() {
        // 2 and 4 are dependent; only one pivot.
        let m = BasisMatrix::new(&rs(&["2", "4", "3"]), None).unwrap();
        assert_eq!(m.rank(), 2);
        assert_eq!(m.coordinates(&r("6")).unwrap(), Some(vec![1, 0, 1]));
        assert_eq!(m.float_coordinates(&r("6")).unwrap(), Some(vec![1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_reduction_is_idempotent() {
        let basis = rs(&["81/80", "128/125", "2"]);
        let mut m = BasisMatrix::new(&basis, None).unwrap();
        m.make_echelon().unwrap();
        m.reduce_rows().unwrap();
        assert_eq!(m.coordinates(&r("2048/2025")).unwrap(), Some(vec![-1, 1, 0]));
        assert_eq!(m.coordinates(&r("5/4")).unwrap(), None);
    }

    #[test]
    fn test_unreduced_matches_after_reduction() {
        let basis = rs(&["2", "3/2", "5/4"]);
        let mut m = BasisMatrix::unreduced(&basis, None).unwrap();
        assert_eq!(m.rank(), 0);
        m.make_echelon().unwrap();
        m.reduce_rows().unwrap();
        assert_eq!(m.coordinates(&r("15/16")).unwrap(), Some(vec![-1, 1, 1]));
    }

    #[test]
    fn test_recovers_powers_of_independent_basis() {
        let basis = rs(&["9/8", "10/9", "16/15"]);
        let m = BasisMatrix::new(&basis, None).unwrap();
        for k in [[1, 2, 3], [-2, 0, 5], [4, -4, -1], [0, 0, 0]] {
            let mut v = Rational::one();
            for (b, &e) in basis.iter().zip(&k) {
                v *= &b.pow(e);
            }
            let want: Vec<i64> = k.iter().map(|&e| e as i64).collect();
            assert_eq!(m.coordinates(&v).unwrap(), Some(want.clone()));
            assert_eq!(find_coordinates(&basis, &v).unwrap(), Some(want));
        }
    }

    #[test]
    fn test_empty_basis() {
        let m = BasisMatrix::new(&[], None).unwrap();
        assert_eq!(m.coordinates(&Rational::one()).unwrap(), Some(vec![]));
        assert!(m.coordinates(&r("2")).is_err());
        assert_eq!(find_coordinates(&[], &r("2")).unwrap(), None);
    }
}
