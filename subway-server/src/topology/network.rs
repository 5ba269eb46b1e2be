//! The station/line reference graph.
//!
//! Built once at start-up from a JSON dataset (embedded by default) and then
//! shared read-only for the lifetime of the process.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use super::error::TopologyError;
use super::line::{DirectionScheme, LineId, Sense, TopologyKind};
use super::segment::Segment;

/// Reference dataset compiled into the binary.
const EMBEDDED_NETWORK: &str = include_str!("../../data/network.json");

/// Default cap on "did you mean" suggestions.
pub const DEFAULT_SUGGESTIONS: usize = 10;

#[derive(Debug, Deserialize)]
struct NetworkData {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
    lines: Vec<LineData>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindData {
    Linear,
    Branched,
    Circular,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OrientationData {
    #[default]
    Increasing,
    Decreasing,
}

#[derive(Debug, Deserialize)]
struct LineData {
    id: String,
    #[serde(default)]
    aliases: Vec<String>,
    kind: KindData,
    main: Vec<String>,
    #[serde(default)]
    branches: Vec<BranchData>,
    /// Limited-schedule provider station codes.
    #[serde(default)]
    codes: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct BranchData {
    name: String,
    #[serde(default)]
    orientation: OrientationData,
    stations: Vec<String>,
}

/// A station's place on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMembership {
    pub line: LineId,
    /// Segment index within the line (0 is the main segment).
    pub segment: usize,
    /// Position within that segment.
    pub index: usize,
}

/// A station and every line position it occupies.
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    aliases: Vec<String>,
    memberships: Vec<LineMembership>,
}

impl Station {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Memberships in line rank order. A junction station appears once per
    /// segment it sits on.
    pub fn memberships(&self) -> &[LineMembership] {
        &self.memberships
    }
}

/// A line with its segments. Segment 0 is the main segment.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    rank: usize,
    kind: TopologyKind,
    scheme: DirectionScheme,
    segments: Vec<Segment>,
    aliases: Vec<String>,
    codes: HashMap<String, String>,
}

impl Line {
    pub fn id(&self) -> &LineId {
        &self.id
    }

    /// Preference rank: dataset order.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    pub fn scheme(&self) -> DirectionScheme {
        self.scheme
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn main(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Every `(segment, index)` position `station` occupies on this line,
    /// main segment first.
    pub fn positions(&self, station: &str) -> Vec<(usize, usize)> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(seg, segment)| segment.index_of(station).map(|idx| (seg, idx)))
            .collect()
    }

    pub fn contains(&self, station: &str) -> bool {
        self.segments.iter().any(|s| s.index_of(station).is_some())
    }

    /// Limited-schedule provider code for `station` on this line.
    pub fn limited_code(&self, station: &str) -> Option<&str> {
        self.codes.get(station).map(String::as_str)
    }
}

/// Immutable station/line graph.
#[derive(Debug, Clone)]
pub struct Network {
    lines: Vec<Line>,
    line_index: HashMap<LineId, usize>,
    /// Lowercased line ids and aliases.
    line_tokens: HashMap<String, usize>,
    stations: HashMap<String, Station>,
    aliases: HashMap<String, String>,
}

impl Network {
    /// Load the embedded reference dataset.
    pub fn embedded() -> Result<Self, TopologyError> {
        Self::from_json(EMBEDDED_NETWORK)
    }

    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a dataset.
    pub fn from_json(json: &str) -> Result<Self, TopologyError> {
        let data: NetworkData = serde_json::from_str(json)?;
        build_network(data)
    }

    /// All lines in rank order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, id: &LineId) -> Option<&Line> {
        self.line_index.get(id).map(|&idx| &self.lines[idx])
    }

    /// Number of canonical stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Normalize a user-supplied station name to its canonical form.
    ///
    /// Canonical names are returned unchanged. Otherwise the alias table is
    /// consulted, then a trailing "역" is stripped. Unknown names come back
    /// trimmed but otherwise untouched, so the result is always a fixed point.
    pub fn normalize_station_name(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if let Some(name) = self.canonical(trimmed) {
            return name.to_string();
        }
        if let Some(stripped) = trimmed.strip_suffix('역')
            && !stripped.is_empty()
            && let Some(name) = self.canonical(stripped)
        {
            return name.to_string();
        }
        trimmed.to_string()
    }

    fn canonical<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.stations.contains_key(name) {
            return Some(name);
        }
        self.aliases.get(name).map(String::as_str)
    }

    /// Look up a station after normalization.
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.get(&self.normalize_station_name(name))
    }

    /// Lines serving `name`, in rank order. Empty for unknown stations.
    pub fn station_lines(&self, name: &str) -> Vec<LineId> {
        let Some(station) = self.station(name) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        station
            .memberships
            .iter()
            .filter(|m| seen.insert(&m.line))
            .map(|m| m.line.clone())
            .collect()
    }

    /// Resolve a free-text token to a line id.
    ///
    /// Accepts the canonical id, dataset aliases, a bare number (`"4"`), the
    /// zero-padded provider form (`"04호선"`) and `"4호"`. Returns `None` when
    /// the token is not a line.
    pub fn resolve_line(&self, token: &str) -> Option<LineId> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }
        if let Some(&idx) = self.line_tokens.get(&token) {
            return Some(self.lines[idx].id.clone());
        }

        let number = token
            .strip_suffix("호선")
            .or_else(|| token.strip_suffix('호'))
            .unwrap_or(&token)
            .trim_start_matches('0');
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let id = LineId::new(format!("{number}호선"));
        self.line_index.contains_key(&id).then_some(id)
    }

    /// Canonical station names containing `query`, shortest first then
    /// lexicographic, at most `limit` of them.
    pub fn search_station(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let mut matches: Vec<&str> = self
            .stations
            .keys()
            .map(String::as_str)
            .filter(|name| name.contains(query))
            .collect();
        matches.sort_by(|a, b| {
            a.chars()
                .count()
                .cmp(&b.chars().count())
                .then_with(|| a.cmp(b))
        });
        matches.truncate(limit);
        matches.into_iter().map(str::to_string).collect()
    }

    /// Limited-schedule provider code for `station` on `line`.
    pub fn limited_code(&self, station: &str, line: &LineId) -> Option<&str> {
        let station = self.normalize_station_name(station);
        self.line(line)?.limited_code(&station)
    }
}

fn build_network(data: NetworkData) -> Result<Network, TopologyError> {
    let mut lines = Vec::with_capacity(data.lines.len());
    let mut line_index = HashMap::new();
    let mut line_tokens = HashMap::new();

    for (rank, line_data) in data.lines.into_iter().enumerate() {
        let line = build_line(rank, line_data)?;
        if line_index.insert(line.id.clone(), rank).is_some() {
            return Err(TopologyError::DuplicateLine(line.id.to_string()));
        }
        line_tokens.insert(line.id.as_str().to_lowercase(), rank);
        for alias in &line.aliases {
            line_tokens.entry(alias.to_lowercase()).or_insert(rank);
        }
        lines.push(line);
    }

    let mut stations: HashMap<String, Station> = HashMap::new();
    for line in &lines {
        for (seg, segment) in line.segments.iter().enumerate() {
            for (index, name) in segment.stations().iter().enumerate() {
                stations
                    .entry(name.clone())
                    .or_insert_with(|| Station {
                        name: name.clone(),
                        aliases: Vec::new(),
                        memberships: Vec::new(),
                    })
                    .memberships
                    .push(LineMembership {
                        line: line.id.clone(),
                        segment: seg,
                        index,
                    });
            }
        }
    }

    let mut aliases = HashMap::with_capacity(data.aliases.len());
    for (alias, target) in data.aliases {
        let Some(station) = stations.get_mut(&target) else {
            return Err(TopologyError::DanglingAlias { alias, target });
        };
        station.aliases.push(alias.clone());
        aliases.insert(alias, target);
    }

    Ok(Network {
        lines,
        line_index,
        line_tokens,
        stations,
        aliases,
    })
}

fn build_line(rank: usize, data: LineData) -> Result<Line, TopologyError> {
    let kind = match data.kind {
        KindData::Linear => TopologyKind::Linear,
        KindData::Branched => TopologyKind::Branched,
        KindData::Circular => TopologyKind::Circular,
    };

    check_stations(&data.id, "main", &data.main)?;
    match kind {
        TopologyKind::Linear if !data.branches.is_empty() => {
            return Err(TopologyError::KindMismatch {
                line: data.id,
                reason: "linear line declares branches",
            });
        }
        TopologyKind::Branched if data.branches.is_empty() => {
            return Err(TopologyError::KindMismatch {
                line: data.id,
                reason: "branched line has no branches",
            });
        }
        TopologyKind::Circular if data.main.len() < 3 => {
            return Err(TopologyError::KindMismatch {
                line: data.id,
                reason: "circular line needs at least three stations",
            });
        }
        _ => {}
    }

    let main = match kind {
        TopologyKind::Circular => Segment::ring(data.id.clone(), data.main),
        TopologyKind::Linear | TopologyKind::Branched => Segment::main(data.id.clone(), data.main),
    };

    let mut segments = Vec::with_capacity(1 + data.branches.len());
    for branch in data.branches {
        check_stations(&data.id, &branch.name, &branch.stations)?;
        if branch.stations.len() < 2 {
            return Err(TopologyError::InvalidSegment {
                line: data.id,
                segment: branch.name,
                reason: "branch needs a junction and at least one more station",
            });
        }
        let junction = &branch.stations[0];
        let Some(junction_index) = main.index_of(junction) else {
            return Err(TopologyError::JunctionNotOnMain {
                line: data.id,
                branch: branch.name,
                junction: junction.clone(),
            });
        };
        let orientation = match branch.orientation {
            OrientationData::Increasing => Sense::Increasing,
            OrientationData::Decreasing => Sense::Decreasing,
        };
        segments.push(Segment::branch(
            branch.name,
            branch.stations,
            junction_index,
            orientation,
        ));
    }
    segments.insert(0, main);

    Ok(Line {
        id: LineId::new(data.id),
        rank,
        kind,
        scheme: DirectionScheme::for_kind(kind),
        segments,
        aliases: data.aliases,
        codes: data.codes,
    })
}

fn check_stations(line: &str, segment: &str, stations: &[String]) -> Result<(), TopologyError> {
    if stations.is_empty() {
        return Err(TopologyError::InvalidSegment {
            line: line.to_string(),
            segment: segment.to_string(),
            reason: "segment has no stations",
        });
    }
    let mut seen = HashSet::new();
    if !stations.iter().all(|s| seen.insert(s)) {
        return Err(TopologyError::InvalidSegment {
            line: line.to_string(),
            segment: segment.to_string(),
            reason: "station repeated within segment",
        });
    }
    Ok(())
}
