//! Line identifiers, travel senses and direction labels.

use std::fmt;

use serde::{Serialize, Serializer};

/// Canonical line identifier, e.g. `"4호선"` or `"수인분당선"`.
///
/// A `LineId` is only ever produced by the topology dataset or by the
/// realtime normalizer passing an unknown provider id through unchanged,
/// so it carries no format validation of its own.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(String);

impl LineId {
    /// Wrap a canonical line name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Shape of a line's track layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyKind {
    /// A single open segment.
    Linear,
    /// An open main segment plus branch segments.
    Branched,
    /// A cyclic main segment, optionally with open branch segments.
    Circular,
}

/// Abstract travel sense along a segment's index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    Increasing,
    Decreasing,
}

impl Sense {
    /// The opposite sense.
    pub fn reversed(self) -> Self {
        match self {
            Sense::Increasing => Sense::Decreasing,
            Sense::Decreasing => Sense::Increasing,
        }
    }

    /// Sense of travel from index `from` to index `to` on an open segment.
    ///
    /// Returns `None` when the indices are equal.
    pub fn between(from: usize, to: usize) -> Option<Self> {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Some(Sense::Increasing),
            std::cmp::Ordering::Less => Some(Sense::Decreasing),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Error returned when parsing an unknown direction keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction: {0}")]
pub struct InvalidDirection(String);

/// User-facing direction label as used by the providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 상행
    Up,
    /// 하행
    Down,
    /// 내선
    Inner,
    /// 외선
    Outer,
}

impl Direction {
    /// Parse a direction keyword (`상행`, `하행`, `내선`, `외선`).
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::topology::Direction;
    ///
    /// assert_eq!(Direction::parse("내선").unwrap(), Direction::Inner);
    /// assert!(Direction::parse("north").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidDirection> {
        match s.trim() {
            "상행" => Ok(Direction::Up),
            "하행" => Ok(Direction::Down),
            "내선" => Ok(Direction::Inner),
            "외선" => Ok(Direction::Outer),
            other => Err(InvalidDirection(other.to_string())),
        }
    }

    /// The Korean label.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "상행",
            Direction::Down => "하행",
            Direction::Inner => "내선",
            Direction::Outer => "외선",
        }
    }

    /// Schedule provider direction code: 1 for 상행/내선, 2 for 하행/외선.
    pub fn provider_code(self) -> u8 {
        match self {
            Direction::Up | Direction::Inner => 1,
            Direction::Down | Direction::Outer => 2,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Per-line mapping between index senses and direction labels.
///
/// Increasing index is the outbound label (하행 or 외선), decreasing index
/// the inbound label (상행 or 내선).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionScheme {
    /// 상행 / 하행
    UpDown,
    /// 내선 / 외선
    InnerOuter,
}

impl DirectionScheme {
    /// Scheme used by lines of the given kind.
    pub fn for_kind(kind: TopologyKind) -> Self {
        match kind {
            TopologyKind::Circular => DirectionScheme::InnerOuter,
            TopologyKind::Linear | TopologyKind::Branched => DirectionScheme::UpDown,
        }
    }

    /// Label for travel in `sense`.
    pub fn label(self, sense: Sense) -> Direction {
        match (self, sense) {
            (DirectionScheme::UpDown, Sense::Increasing) => Direction::Down,
            (DirectionScheme::UpDown, Sense::Decreasing) => Direction::Up,
            (DirectionScheme::InnerOuter, Sense::Increasing) => Direction::Outer,
            (DirectionScheme::InnerOuter, Sense::Decreasing) => Direction::Inner,
        }
    }

    /// Sense denoted by `direction`, or `None` if the label belongs to the
    /// other scheme (e.g. 내선 on a linear line).
    pub fn sense_of(self, direction: Direction) -> Option<Sense> {
        match (self, direction) {
            (DirectionScheme::UpDown, Direction::Down)
            | (DirectionScheme::InnerOuter, Direction::Outer) => Some(Sense::Increasing),
            (DirectionScheme::UpDown, Direction::Up)
            | (DirectionScheme::InnerOuter, Direction::Inner) => Some(Sense::Decreasing),
            _ => None,
        }
    }

    /// Label for a schedule provider direction code (1 or 2).
    pub fn from_provider_code(self, code: u8) -> Direction {
        match (self, code) {
            (DirectionScheme::InnerOuter, 1) => Direction::Inner,
            (DirectionScheme::InnerOuter, _) => Direction::Outer,
            (DirectionScheme::UpDown, 1) => Direction::Up,
            (DirectionScheme::UpDown, _) => Direction::Down,
        }
    }

    /// Both labels, provider code 1 first.
    pub fn labels(self) -> [Direction; 2] {
        [self.from_provider_code(1), self.from_provider_code(2)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_directions() {
        assert_eq!(Direction::parse("상행").unwrap(), Direction::Up);
        assert_eq!(Direction::parse(" 하행 ").unwrap(), Direction::Down);
        assert_eq!(Direction::parse("외선").unwrap(), Direction::Outer);
        assert!(Direction::parse("순환").is_err());
    }

    #[test]
    fn schemes_map_senses_to_labels() {
        let up_down = DirectionScheme::UpDown;
        assert_eq!(up_down.label(Sense::Increasing), Direction::Down);
        assert_eq!(up_down.label(Sense::Decreasing), Direction::Up);

        let ring = DirectionScheme::InnerOuter;
        assert_eq!(ring.label(Sense::Increasing), Direction::Outer);
        assert_eq!(ring.label(Sense::Decreasing), Direction::Inner);
    }

    #[test]
    fn sense_of_inverts_label() {
        for scheme in [DirectionScheme::UpDown, DirectionScheme::InnerOuter] {
            for sense in [Sense::Increasing, Sense::Decreasing] {
                assert_eq!(scheme.sense_of(scheme.label(sense)), Some(sense));
            }
        }
        assert_eq!(DirectionScheme::UpDown.sense_of(Direction::Inner), None);
        assert_eq!(DirectionScheme::InnerOuter.sense_of(Direction::Up), None);
    }

    #[test]
    fn provider_codes_round_trip_per_scheme() {
        assert_eq!(DirectionScheme::InnerOuter.labels(), [Direction::Inner, Direction::Outer]);
        assert_eq!(DirectionScheme::UpDown.labels(), [Direction::Up, Direction::Down]);
        assert_eq!(Direction::Inner.provider_code(), 1);
        assert_eq!(Direction::Down.provider_code(), 2);
    }

    #[test]
    fn sense_between_indices() {
        assert_eq!(Sense::between(3, 7), Some(Sense::Increasing));
        assert_eq!(Sense::between(7, 3), Some(Sense::Decreasing));
        assert_eq!(Sense::between(4, 4), None);
    }
}
