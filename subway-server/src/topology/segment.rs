//! Segments and their ordering strategies.
//!
//! A segment is an indexed run of stations. How two indices compare depends
//! on whether the segment is open (a line or branch with two ends) or cyclic
//! (a loop line), so comparisons go through [`SegmentOrder`].

use super::line::Sense;

/// Index comparison strategy for a segment.
pub trait SegmentOrder {
    /// Preferred travel sense from `from` to `to`, or `None` if they coincide.
    fn sense_between(&self, from: usize, to: usize) -> Option<Sense>;

    /// Whether a train at `origin` travelling in `sense` calls at `from` no
    /// later than at `to`.
    fn in_order(&self, origin: Option<usize>, from: usize, to: usize, sense: Sense) -> bool;
}

/// Ordering of an open segment: plain index comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenOrder;

impl SegmentOrder for OpenOrder {
    fn sense_between(&self, from: usize, to: usize) -> Option<Sense> {
        Sense::between(from, to)
    }

    /// Trains never wrap, so `origin` does not matter.
    fn in_order(&self, _origin: Option<usize>, from: usize, to: usize, sense: Sense) -> bool {
        match sense {
            Sense::Increasing => to >= from,
            Sense::Decreasing => to <= from,
        }
    }
}

/// Ordering of a cyclic segment of `len` stations (index arithmetic mod `len`).
#[derive(Debug, Clone, Copy)]
pub struct CyclicOrder {
    len: usize,
}

impl CyclicOrder {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Number of steps from `from` to `to` travelling in `sense`.
    pub fn arc(&self, from: usize, to: usize, sense: Sense) -> usize {
        if self.len == 0 {
            return 0;
        }
        let (from, to) = (from % self.len, to % self.len);
        match sense {
            Sense::Increasing => (to + self.len - from) % self.len,
            Sense::Decreasing => (from + self.len - to) % self.len,
        }
    }
}

impl SegmentOrder for CyclicOrder {
    /// Sense of the shorter arc; an exact tie resolves to `Increasing`.
    fn sense_between(&self, from: usize, to: usize) -> Option<Sense> {
        let forward = self.arc(from, to, Sense::Increasing);
        if forward == 0 {
            return None;
        }
        let backward = self.arc(from, to, Sense::Decreasing);
        if backward < forward {
            Some(Sense::Decreasing)
        } else {
            Some(Sense::Increasing)
        }
    }

    /// Arcs are measured from `origin`, since every station is eventually
    /// ahead on a loop. Without an origin the order is unknown and the
    /// answer is `true`.
    fn in_order(&self, origin: Option<usize>, from: usize, to: usize, sense: Sense) -> bool {
        match origin {
            Some(origin) => self.arc(origin, from, sense) <= self.arc(origin, to, sense),
            None => true,
        }
    }
}

/// Where a segment sits within its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentRole {
    /// The line's main segment.
    Main,
    /// A branch hanging off the main segment at `junction`.
    Branch {
        /// Junction station, index 0 of the branch.
        junction: String,
        /// Junction's index on the main segment.
        junction_index: usize,
        /// Line sense corresponding to increasing branch index.
        orientation: Sense,
    },
}

#[derive(Debug, Clone, Copy)]
enum Layout {
    Open(OpenOrder),
    Cyclic(CyclicOrder),
}

/// An ordered run of stations on one line.
#[derive(Debug, Clone)]
pub struct Segment {
    name: String,
    stations: Vec<String>,
    role: SegmentRole,
    layout: Layout,
}

impl Segment {
    /// Create an open main segment.
    pub fn main(name: impl Into<String>, stations: Vec<String>) -> Self {
        Self {
            name: name.into(),
            stations,
            role: SegmentRole::Main,
            layout: Layout::Open(OpenOrder),
        }
    }

    /// Create a cyclic main segment.
    pub fn ring(name: impl Into<String>, stations: Vec<String>) -> Self {
        let len = stations.len();
        Self {
            name: name.into(),
            stations,
            role: SegmentRole::Main,
            layout: Layout::Cyclic(CyclicOrder::new(len)),
        }
    }

    /// Create a branch whose first station is the junction at
    /// `junction_index` on the main segment.
    pub fn branch(
        name: impl Into<String>,
        stations: Vec<String>,
        junction_index: usize,
        orientation: Sense,
    ) -> Self {
        let junction = stations.first().cloned().unwrap_or_default();
        Self {
            name: name.into(),
            stations,
            role: SegmentRole::Branch {
                junction,
                junction_index,
                orientation,
            },
            layout: Layout::Open(OpenOrder),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn role(&self) -> &SegmentRole {
        &self.role
    }

    pub fn is_cyclic(&self) -> bool {
        matches!(self.layout, Layout::Cyclic(_))
    }

    /// Index of `station` on this segment.
    pub fn index_of(&self, station: &str) -> Option<usize> {
        self.stations.iter().position(|s| s == station)
    }

    /// Comparison strategy for this segment's indices.
    pub fn order(&self) -> &dyn SegmentOrder {
        match &self.layout {
            Layout::Open(order) => order,
            Layout::Cyclic(order) => order,
        }
    }

    /// Convert a sense in this segment's index order to the line's sense.
    pub fn to_line_sense(&self, local: Sense) -> Sense {
        match &self.role {
            SegmentRole::Main => local,
            SegmentRole::Branch { orientation, .. } => match orientation {
                Sense::Increasing => local,
                Sense::Decreasing => local.reversed(),
            },
        }
    }

    /// Convert a line sense to this segment's index order.
    pub fn to_local_sense(&self, line_sense: Sense) -> Sense {
        // The mapping is an involution.
        self.to_line_sense(line_sense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_order_compares_indices() {
        let order = OpenOrder;
        assert_eq!(order.sense_between(2, 5), Some(Sense::Increasing));
        assert_eq!(order.sense_between(5, 2), Some(Sense::Decreasing));
        assert!(order.in_order(None, 2, 5, Sense::Increasing));
        assert!(order.in_order(Some(9), 5, 5, Sense::Decreasing));
        assert!(!order.in_order(Some(0), 2, 5, Sense::Decreasing));
    }

    #[test]
    fn cyclic_order_prefers_shorter_arc() {
        let order = CyclicOrder::new(10);
        assert_eq!(order.sense_between(1, 3), Some(Sense::Increasing));
        assert_eq!(order.sense_between(1, 9), Some(Sense::Decreasing));
        // Wraps across index 0
        assert_eq!(order.sense_between(9, 1), Some(Sense::Increasing));
        assert_eq!(order.sense_between(4, 4), None);
    }

    #[test]
    fn cyclic_tie_defaults_to_increasing() {
        let order = CyclicOrder::new(10);
        assert_eq!(order.sense_between(0, 5), Some(Sense::Increasing));
        assert_eq!(order.sense_between(5, 0), Some(Sense::Increasing));
    }

    #[test]
    fn cyclic_order_measures_from_origin() {
        let order = CyclicOrder::new(10);
        assert!(order.in_order(Some(7), 8, 1, Sense::Increasing));
        assert!(!order.in_order(Some(7), 1, 8, Sense::Increasing));
        // More than half a loop is still in order
        assert!(order.in_order(Some(2), 1, 3, Sense::Decreasing));
        assert!(!order.in_order(Some(2), 3, 1, Sense::Decreasing));
        // A train standing at `from` calls there first
        assert!(order.in_order(Some(4), 4, 3, Sense::Increasing));
    }

    #[test]
    fn cyclic_order_without_origin_is_unknown() {
        let order = CyclicOrder::new(10);
        assert!(order.in_order(None, 1, 8, Sense::Increasing));
        assert!(order.in_order(None, 8, 1, Sense::Increasing));
    }

    #[test]
    fn arc_lengths() {
        let order = CyclicOrder::new(43);
        assert_eq!(order.arc(22, 21, Sense::Decreasing), 1);
        assert_eq!(order.arc(22, 21, Sense::Increasing), 42);
    }

    #[test]
    fn branch_orientation_maps_senses() {
        let stations = vec!["J".to_string(), "B1".to_string()];
        let forward = Segment::branch("fwd", stations.clone(), 3, Sense::Increasing);
        let backward = Segment::branch("bwd", stations, 3, Sense::Decreasing);

        assert_eq!(forward.to_line_sense(Sense::Increasing), Sense::Increasing);
        assert_eq!(backward.to_line_sense(Sense::Increasing), Sense::Decreasing);
        assert_eq!(backward.to_local_sense(Sense::Decreasing), Sense::Increasing);
        assert_eq!(
            forward.role(),
            &SegmentRole::Branch {
                junction: "J".to_string(),
                junction_index: 3,
                orientation: Sense::Increasing,
            }
        );
    }
}
