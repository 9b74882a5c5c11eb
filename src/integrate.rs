//! Cross-tool consensus.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::error::{SpliceError, SpliceResult};
use crate::event::{ClassificationRecord, DseClass, EventType, Tool};
use crate::table::Table;

pub const UID_COLUMN: &str = "uniform_ID";
pub const CLASS_COLUMN: &str = "class";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Dse,
    NonDse,
}

impl Call {
    pub fn as_str(&self) -> &'static str {
        match self {
            Call::Dse => "DSE",
            Call::NonDse => "non-DSE",
        }
    }
}

impl From<DseClass> for Call {
    fn from(class: DseClass) -> Self {
        if class.is_dse() { Call::Dse } else { Call::NonDse }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusRow {
    pub uniform_id: String,
    pub calls: Vec<Option<Call>>,
    pub support: usize,
}

impl ConsensusRow {
    /// DSE when `support > n - 1`.
    pub fn class_at(&self, n: usize) -> Call {
        if self.support + 1 > n {
            Call::Dse
        } else {
            Call::NonDse
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsensusTable {
    pub tools: Vec<Tool>,
    pub rows: Vec<ConsensusRow>,
}

impl ConsensusTable {
    pub fn build(inputs: &[(Tool, Vec<ClassificationRecord>)]) -> Self {
        let tools: Vec<Tool> = inputs.iter().map(|(tool, _)| *tool).collect();
        let mut joined: BTreeMap<&str, Vec<Option<Call>>> = BTreeMap::new();
        for (i, (_, records)) in inputs.iter().enumerate() {
            for record in records {
                let calls = joined
                    .entry(record.uniform_id.as_str())
                    .or_insert_with(|| vec![None; tools.len()]);
                let call = Call::from(record.class);
                calls[i] = match calls[i] {
                    Some(Call::Dse) => Some(Call::Dse),
                    _ => Some(call),
                };
            }
        }
        let rows = joined
            .into_iter()
            .map(|(uid, calls)| {
                let support = calls.iter().filter(|c| **c == Some(Call::Dse)).count();
                ConsensusRow {
                    uniform_id: uid.to_string(),
                    calls,
                    support,
                }
            })
            .collect();
        Self { tools, rows }
    }

    pub fn num_tools(&self) -> usize {
        self.tools.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consensus-DSE identifiers at support threshold `n`.
    pub fn dse_at(&self, n: usize) -> BTreeSet<&str> {
        self.rows
            .iter()
            .filter(|row| row.class_at(n) == Call::Dse)
            .map(|row| row.uniform_id.as_str())
            .collect()
    }

    pub fn thresholds(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.num_tools()
    }
}

pub fn integration_file_name(n: usize, total: usize) -> String {
    format!("integration_{}of{}.txt", n, total)
}

/// Reads a `uniform_ID\tclass` table written by `unify`. Rows with an empty
/// identifier or an unknown class are skipped with a warning.
pub fn read_classifications(path: &Path) -> SpliceResult<Vec<ClassificationRecord>> {
    let table = Table::read_tsv(path)?;
    let uid = table.require(UID_COLUMN)?;
    let class = table.require(CLASS_COLUMN)?;
    let mut records = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for r in 0..table.len() {
        let id = table.cell(r, uid).trim();
        match table.cell(r, class).parse::<DseClass>() {
            Ok(c) if !id.is_empty() => records.push(ClassificationRecord {
                uniform_id: id.to_string(),
                class: c,
            }),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "rows without identifier or class skipped");
    }
    Ok(records)
}

pub fn resolve_tools<S: AsRef<str>>(names: &[S]) -> SpliceResult<Vec<Tool>> {
    let mut tools = Vec::new();
    for name in names {
        let tool: Tool = name.as_ref().parse()?;
        if !tools.contains(&tool) {
            tools.push(tool);
        }
    }
    if tools.is_empty() {
        return Err(SpliceError::UnsupportedSoftware(String::new()));
    }
    Ok(tools)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetKind {
    Dse,
    TestAse,
    ControlAse,
}

impl SetKind {
    pub const ALL: [SetKind; 3] = [SetKind::Dse, SetKind::TestAse, SetKind::ControlAse];

    pub fn as_str(&self) -> &'static str {
        match self {
            SetKind::Dse => "DSE",
            SetKind::TestAse => "Test_ASE",
            SetKind::ControlAse => "Control_ASE",
        }
    }
}

/// Number of non-empty per-tool sets of one kind for one event type. An
/// overlap needs at least two of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapCount {
    pub event: EventType,
    pub kind: SetKind,
    pub non_empty: usize,
}

impl OverlapCount {
    pub fn drawable(&self) -> bool {
        self.non_empty >= 2
    }
}

pub fn overlap_count<I>(event: EventType, kind: SetKind, sizes: I) -> OverlapCount
where
    I: IntoIterator<Item = usize>,
{
    OverlapCount {
        event,
        kind,
        non_empty: sizes.into_iter().filter(|&n| n > 0).count(),
    }
}
