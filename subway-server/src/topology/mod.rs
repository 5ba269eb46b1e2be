//! Station and line topology.
//!
//! The reference graph of the network: stations, lines, their segments and
//! branches. Everything here is immutable once loaded and does no I/O beyond
//! reading the dataset.

mod error;
mod line;
mod network;
mod segment;

pub use error::TopologyError;
pub use line::{Direction, DirectionScheme, InvalidDirection, LineId, Sense, TopologyKind};
pub use network::{DEFAULT_SUGGESTIONS, Line, LineMembership, Network, Station};
pub use segment::{CyclicOrder, OpenOrder, Segment, SegmentOrder, SegmentRole};
