//! Topology dataset errors.

/// Errors raised while loading or validating the reference dataset.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// Dataset file could not be read
    #[error("failed to read network data: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset is not valid JSON for the expected schema
    #[error("failed to parse network data: {0}")]
    Json(#[from] serde_json::Error),

    /// Two lines share an id
    #[error("duplicate line id: {0}")]
    DuplicateLine(String),

    /// A segment has no stations or repeats one
    #[error("line {line}: invalid segment {segment}: {reason}")]
    InvalidSegment {
        line: String,
        segment: String,
        reason: &'static str,
    },

    /// A branch's first station is not on the main segment
    #[error("line {line}: branch {branch} junction {junction} is not on the main segment")]
    JunctionNotOnMain {
        line: String,
        branch: String,
        junction: String,
    },

    /// Declared kind does not match the segment layout
    #[error("line {line}: {reason}")]
    KindMismatch { line: String, reason: &'static str },

    /// An alias points at a station no line serves
    #[error("alias {alias} targets unknown station {target}")]
    DanglingAlias { alias: String, target: String },
}
