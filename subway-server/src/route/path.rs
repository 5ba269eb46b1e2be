//! Paths between two positions on one line.
//!
//! A path is one to three legs: an optional leg from a branch back to its
//! junction, a leg along the main segment, and an optional leg out along
//! another branch. Each leg is judged by its own segment's ordering, so
//! cyclic and open segments compose without special cases.

use crate::topology::{Line, Sense, Segment, SegmentRole};

/// A station's position on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Position {
    pub segment: usize,
    pub index: usize,
}

/// Travel along one segment between two indices.
struct Leg<'a> {
    segment: &'a Segment,
    from: usize,
    to: usize,
    /// Where the train stands on this segment, if known.
    origin: Option<usize>,
}

impl Leg<'_> {
    /// Preferred line sense of this leg, `None` if it has zero length.
    fn sense(&self) -> Option<Sense> {
        self.segment
            .order()
            .sense_between(self.from, self.to)
            .map(|local| self.segment.to_line_sense(local))
    }

    /// Whether a train moving in line sense `sense` covers this leg.
    fn covered_by(&self, sense: Sense) -> bool {
        self.segment.order().in_order(
            self.origin,
            self.from,
            self.to,
            self.segment.to_local_sense(sense),
        )
    }
}

fn junction_index(segment: &Segment) -> Option<usize> {
    match segment.role() {
        SegmentRole::Main => None,
        SegmentRole::Branch { junction_index, .. } => Some(*junction_index),
    }
}

/// Index of `origin` on segment `segment`. A train on a branch is placed at
/// the branch's junction on the main segment.
fn origin_on(line: &Line, origin: Option<Position>, segment: usize) -> Option<usize> {
    let origin = origin?;
    if origin.segment == segment {
        Some(origin.index)
    } else if segment == 0 {
        junction_index(&line.segments()[origin.segment])
    } else {
        None
    }
}

fn legs(line: &Line, origin: Option<Position>, from: Position, to: Position) -> Vec<Leg<'_>> {
    let segments = line.segments();
    if from.segment == to.segment {
        return vec![Leg {
            segment: &segments[from.segment],
            from: from.index,
            to: to.index,
            origin: origin_on(line, origin, from.segment),
        }];
    }

    let mut legs = Vec::with_capacity(3);
    let source = &segments[from.segment];
    let main_from = match junction_index(source) {
        Some(junction) => {
            legs.push(Leg {
                segment: source,
                from: from.index,
                to: 0,
                origin: origin_on(line, origin, from.segment),
            });
            junction
        }
        None => from.index,
    };

    let target = &segments[to.segment];
    let main_to = junction_index(target).unwrap_or(to.index);
    legs.push(Leg {
        segment: line.main(),
        from: main_from,
        to: main_to,
        origin: origin_on(line, origin, 0),
    });
    if junction_index(target).is_some() {
        legs.push(Leg {
            segment: target,
            from: 0,
            to: to.index,
            origin: origin_on(line, origin, to.segment),
        });
    }
    legs
}

/// Sense of the path from `from` to `to`, defined only when every leg of
/// non-zero length agrees.
pub(super) fn path_sense(line: &Line, from: Position, to: Position) -> Option<Sense> {
    let mut senses = legs(line, None, from, to).into_iter().filter_map(|leg| leg.sense());
    let first = senses.next()?;
    senses.all(|s| s == first).then_some(first)
}

/// Whether a train at `origin` travelling in `sense` passes `from` and then
/// reaches `to`. Loop legs need the origin to be judged and count as covered
/// without one.
pub(super) fn path_reaches(
    line: &Line,
    origin: Option<Position>,
    from: Position,
    to: Position,
    sense: Sense,
) -> bool {
    legs(line, origin, from, to)
        .iter()
        .all(|leg| leg.covered_by(sense))
}

/// Every position `station` occupies on `line`.
pub(super) fn positions(line: &Line, station: &str) -> Vec<Position> {
    line.positions(station)
        .into_iter()
        .map(|(segment, index)| Position { segment, index })
        .collect()
}

/// Candidate position pairs, those sharing a segment first.
pub(super) fn position_pairs(line: &Line, from: &str, to: &str) -> Vec<(Position, Position)> {
    let from_positions = positions(line, from);
    let to_positions = positions(line, to);

    let mut pairs: Vec<(Position, Position)> = from_positions
        .iter()
        .flat_map(|&a| to_positions.iter().map(move |&b| (a, b)))
        .collect();
    // Stable, so membership order is kept within each group.
    pairs.sort_by_key(|(a, b)| a.segment != b.segment);
    pairs
}
