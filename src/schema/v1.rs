use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunMeta {
    pub sample: String,
    pub input: String,
    pub output: String,
    pub gtf: Option<String>,
    pub novel: String,
    pub software: Vec<String>,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitSummary {
    pub software: String,
    pub event: String,
    pub rows: usize,
    pub missing_ids: usize,
    pub novelty: String,
    #[serde(rename = "up-regulate")]
    pub up: usize,
    #[serde(rename = "down-regulate")]
    pub down: usize,
    #[serde(rename = "uniform_IDs")]
    pub uniform_ids: usize,
    pub dpsi_values: usize,
    pub test_ase: usize,
    pub control_ase: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitFailureSummary {
    pub software: String,
    pub event: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntegrationSummary {
    /// `None` for a table pooled over all event types.
    pub event: Option<String>,
    pub software: Vec<String>,
    pub uniform_ids: usize,
    /// Consensus-DSE count at thresholds 1..=N.
    pub dse_by_threshold: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlapSummary {
    pub event: String,
    pub set: String,
    pub non_empty_sets: usize,
    pub drawable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummaryV1 {
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub units: Vec<UnitSummary>,
    pub failures: Vec<UnitFailureSummary>,
    pub integration: Vec<IntegrationSummary>,
    pub overlaps: Vec<OverlapSummary>,
    pub warnings: Vec<String>,
}
