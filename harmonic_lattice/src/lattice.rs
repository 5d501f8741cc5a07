// Best-first branch-and-bound search over an integer lattice.
//
// `LatticeSearch` enumerates integer coordinate vectors in non-decreasing
// distance order. It knows nothing about rationals: a `LatticeSpace` maps
// coordinates to a point and the point to a distance (`generator.rs`
// supplies the rational one).
//
// The frontier is a `BinaryHeap` used as a min-heap via reversed ordering,
// the same pattern as the A* open set in pathfinding code. Ties on distance
// are broken by insertion sequence, so a node pushed later pops later among
// equals. That makes the whole enumeration deterministic.
//
// Each node carries the dimension it is growing and a direction:
//
//   - A growth marker (dimension > 0, direction `Still`) opens the next
//     dimension without changing the point. It reuses the parent's point
//     and distance rather than recomputing them, and is never reported.
//   - Otherwise a popped node is offered to the accept callback, then spawns
//     a growth marker (while under the dimension cap) plus a +1 step (unless
//     it was moving down) and a -1 step (unless it was moving up) along its
//     own dimension. Steps beyond the distance limit are never inserted,
//     and neither are steps the space can't represent (`point` returns
//     `None`) or whose distance is infinite.
//
// Every coordinate vector is reached along exactly one path, so nothing is
// generated twice.
//
// Pruning assumes distance never decreases while walking outward along a
// branch. That holds for the stock metrics; for an arbitrary metric the
// output is still non-decreasing but may skip points that lie beyond a
// pruned step.
//
// With no limits the search never ends on its own. It is pull-based: call
// `next_with` (or use it as an `Iterator`) and stop whenever you like.
// Dropping the search discards the frontier.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

type Coords = SmallVec<[i32; 8]>;

/// Answer from an accept callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Report the point and count it against `max_count`.
    Accept,
    /// Skip the point but keep exploring beyond it.
    Reject,
    /// Skip the point and everything beyond it on this branch.
    Stop,
}

/// Search bounds. `None` means unbounded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_count: Option<usize>,
    pub max_dimensions: Option<usize>,
    pub max_distance: Option<f64>,
}

/// Maps lattice coordinates to points and points to distances.
pub trait LatticeSpace {
    type Point: Clone;

    /// Number of generators, i.e. the largest usable dimension count.
    fn dimensions(&self) -> usize;

    /// The point at `coordinates`. Missing trailing coordinates are zero.
    /// `None` when the point can't be represented; the search prunes it.
    fn point(&self, coordinates: &[i32]) -> Option<Self::Point>;

    fn distance(&self, point: &Self::Point) -> f64;
}

impl<T: LatticeSpace + ?Sized> LatticeSpace for &T {
    type Point = T::Point;

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn point(&self, coordinates: &[i32]) -> Option<Self::Point> {
        (**self).point(coordinates)
    }

    fn distance(&self, point: &Self::Point) -> f64 {
        (**self).distance(point)
    }
}

/// A point delivered by the search.
#[derive(Clone, Debug, PartialEq)]
pub struct LatticePoint<P> {
    pub coordinates: Vec<i32>,
    pub point: P,
    pub distance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
    Still,
}

struct Node<P> {
    coordinates: Coords,
    point: P,
    distance: f64,
    dimension: usize,
    direction: Direction,
    seq: u64,
}

impl<P> Node<P> {
    fn is_growth_marker(&self) -> bool {
        self.dimension > 0 && self.direction == Direction::Still
    }
}

impl<P> PartialEq for Node<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P> Eq for Node<P> {}

impl<P> PartialOrd for Node<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Node<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest distance, then earliest insert.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Resumable best-first enumeration of a `LatticeSpace`.
pub struct LatticeSearch<S: LatticeSpace> {
    space: S,
    limits: Limits,
    dimensions: usize,
    frontier: BinaryHeap<Node<S::Point>>,
    next_seq: u64,
    accepted: usize,
    visited: usize,
    finished: bool,
}

impl<S: LatticeSpace> LatticeSearch<S> {
    pub fn new(space: S, limits: Limits) -> Self {
        let dimensions = match limits.max_dimensions {
            Some(max) => max.min(space.dimensions()),
            None => space.dimensions(),
        };
        let mut search = LatticeSearch {
            space,
            limits,
            dimensions,
            frontier: BinaryHeap::new(),
            next_seq: 0,
            accepted: 0,
            visited: 0,
            finished: false,
        };
        if search.dimensions > 0 {
            let coordinates: Coords = SmallVec::from_elem(0, 1);
            if let Some((point, distance)) = search.locate(&coordinates) {
                search.push(coordinates, point, distance, 0, Direction::Still);
            }
        }
        search
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Points accepted so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Points offered to an accept callback so far (growth markers excluded).
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// True once the frontier is exhausted or the count limit was hit.
    pub fn is_finished(&self) -> bool {
        self.frontier.is_empty()
    }

    fn within_distance(&self, distance: f64) -> bool {
        self.limits.max_distance.is_none_or(|max| distance <= max)
    }

    /// The point at `coordinates` and its distance, unless it is pruned:
    /// unrepresentable, infinitely far, or past `max_distance`.
    fn locate(&self, coordinates: &[i32]) -> Option<(S::Point, f64)> {
        let point = self.space.point(coordinates)?;
        let distance = self.space.distance(&point);
        (distance.is_finite() && self.within_distance(distance)).then_some((point, distance))
    }

    fn count_reached(&self) -> bool {
        self.limits.max_count.is_some_and(|max| self.accepted >= max)
    }

    fn push(
        &mut self,
        coordinates: Coords,
        point: S::Point,
        distance: f64,
        dimension: usize,
        direction: Direction,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.frontier.push(Node {
            coordinates,
            point,
            distance,
            dimension,
            direction,
            seq,
        });
    }

    fn step(&mut self, node: &Node<S::Point>, delta: i32, direction: Direction) {
        let mut coordinates = node.coordinates.clone();
        let Some(c) = coordinates[node.dimension].checked_add(delta) else {
            return;
        };
        coordinates[node.dimension] = c;
        if let Some((point, distance)) = self.locate(&coordinates) {
            self.push(coordinates, point, distance, node.dimension, direction);
        }
    }

    fn expand(&mut self, node: &Node<S::Point>) {
        if node.dimension + 1 < self.dimensions {
            let mut coordinates = node.coordinates.clone();
            coordinates.push(0);
            self.push(
                coordinates,
                node.point.clone(),
                node.distance,
                node.dimension + 1,
                Direction::Still,
            );
        }
        if node.direction != Direction::Down {
            self.step(node, 1, Direction::Up);
        }
        if node.direction != Direction::Up {
            self.step(node, -1, Direction::Down);
        }
    }

    /// Advance to the next point `accept` takes. Returns `None` when the
    /// frontier is exhausted or `max_count` points have been accepted.
    pub fn next_with<F>(&mut self, mut accept: F) -> Option<LatticePoint<S::Point>>
    where
        F: FnMut(&S::Point, f64) -> Verdict,
    {
        loop {
            if self.count_reached() {
                self.frontier.clear();
            }
            let Some(node) = self.frontier.pop() else {
                if !self.finished {
                    self.finished = true;
                    debug!(
                        accepted = self.accepted,
                        visited = self.visited,
                        "lattice search finished"
                    );
                }
                return None;
            };
            if node.is_growth_marker() {
                self.expand(&node);
                continue;
            }
            self.visited += 1;
            let verdict = accept(&node.point, node.distance);
            if verdict == Verdict::Stop {
                continue;
            }
            self.expand(&node);
            if verdict == Verdict::Accept {
                self.accepted += 1;
                return Some(LatticePoint {
                    coordinates: node.coordinates.into_vec(),
                    point: node.point,
                    distance: node.distance,
                });
            }
        }
    }

    /// Push-style driver: run `accept` until the search ends. Returns the
    /// number of accepted points.
    pub fn visit<F>(&mut self, mut accept: F) -> usize
    where
        F: FnMut(&S::Point, f64) -> Verdict,
    {
        while self.next_with(&mut accept).is_some() {}
        self.accepted
    }
}

/// Accepts every point.
impl<S: LatticeSpace> Iterator for LatticeSearch<S> {
    type Item = LatticePoint<S::Point>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_with(|_, _| Verdict::Accept)
    }
}
