use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::annotation::TranscriptLookup;
use crate::ase::{AseSets, GroupLabels};
use crate::event::{ClassificationRecord, DpsiRecord, EventType, Tool};
use crate::integrate::{ConsensusTable, OverlapCount};
use crate::novelty::NoveltyOutcome;
use crate::schema::v1::RunSummaryV1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NovelMode {
    /// Remove events the tool flags as novel before classification.
    Exclude,
    Include,
}

impl NovelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelMode::Exclude => "exclude",
            NovelMode::Include => "include",
        }
    }
}

/// How consensus tables are formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationScope {
    /// One table per event type under `{sample}/integration/{EV}/`.
    PerEvent,
    /// All event types pooled into one table under `{sample}/`.
    Pooled,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub sample_dir: PathBuf,
    pub json_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path, sample: &str) -> Self {
        let sample_dir = out_dir.join(sample);
        Self {
            out_dir: out_dir.to_path_buf(),
            json_path: sample_dir.join("summary.json"),
            sample_dir,
        }
    }

    pub fn unit_dir(&self, tool: Tool, sample: &str) -> PathBuf {
        self.out_dir.join(tool.label()).join(sample)
    }

    pub fn integration_dir(&self, event: Option<EventType>) -> PathBuf {
        match event {
            Some(ev) => self.sample_dir.join("integration").join(ev.name()),
            None => self.sample_dir.clone(),
        }
    }

    pub fn dse_summary_path(&self) -> PathBuf {
        self.sample_dir.join("dse_summary.tsv")
    }

    pub fn overlap_summary_path(&self) -> PathBuf {
        self.sample_dir.join("overlap_summary.tsv")
    }
}

#[derive(Debug, Clone)]
pub struct UnitResult {
    pub tool: Tool,
    pub event: EventType,
    pub rows: usize,
    pub missing_ids: usize,
    pub novelty: NoveltyOutcome,
    pub classifications: Vec<ClassificationRecord>,
    pub dpsi: Vec<DpsiRecord>,
    pub ase: AseSets,
}

#[derive(Debug, Clone)]
pub struct UnitFailure {
    pub tool: Tool,
    pub event: EventType,
    pub error: String,
}

#[derive(Debug)]
pub struct Ctx {
    pub input: PathBuf,
    pub sample: String,
    pub output: OutputPaths,
    pub gtf: Option<PathBuf>,
    pub tools: Vec<Tool>,
    pub events: Vec<EventType>,
    pub novel: NovelMode,
    pub labels: GroupLabels,
    pub scope: IntegrationScope,
    pub threads: usize,
    pub fail_fast: bool,
    pub write_json: bool,
    pub version: String,
    pub lookup: Option<TranscriptLookup>,
    pub plan: Vec<(Tool, EventType)>,
    pub units: Vec<UnitResult>,
    pub failures: Vec<UnitFailure>,
    pub consensus: BTreeMap<Option<EventType>, ConsensusTable>,
    pub overlaps: Vec<OverlapCount>,
    pub warnings: Vec<String>,
    pub report: Option<RunSummaryV1>,
}

impl Ctx {
    pub fn new(
        input: PathBuf,
        out_dir: PathBuf,
        sample: String,
        tools: Vec<Tool>,
        events: Vec<EventType>,
        version: &str,
    ) -> Self {
        let output = OutputPaths::new(&out_dir, &sample);
        Self {
            input,
            sample,
            output,
            gtf: None,
            tools,
            events,
            novel: NovelMode::Exclude,
            labels: GroupLabels::default(),
            scope: IntegrationScope::PerEvent,
            threads: 0,
            fail_fast: false,
            write_json: false,
            version: version.to_string(),
            lookup: None,
            plan: Vec::new(),
            units: Vec::new(),
            failures: Vec::new(),
            consensus: BTreeMap::new(),
            overlaps: Vec::new(),
            warnings: Vec::new(),
            report: None,
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn units_for(&self, event: EventType) -> impl Iterator<Item = &UnitResult> {
        self.units.iter().filter(move |u| u.event == event)
    }
}
