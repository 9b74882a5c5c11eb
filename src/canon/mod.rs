//! Canonical event identifiers.

pub mod majiq;
pub mod psisigma;
pub mod rmats;
pub mod suppa2;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::annotation::TranscriptLookup;
use crate::error::SpliceResult;
use crate::event::{EventType, Tool};
use crate::table::Table;

static GENE_ACCESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ENS[A-Z]*G\d+").expect("gene accession pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => f.write_str("+"),
            Strand::Minus => f.write_str("-"),
        }
    }
}

/// Extracts an Ensembl gene accession from a quoted or decorated field,
/// falling back to the field with quotes and whitespace stripped.
pub fn normalize_gene_id(raw: &str) -> String {
    match GENE_ACCESSION.find(raw) {
        Some(m) => m.as_str().to_string(),
        None => raw.trim().trim_matches('"').to_string(),
    }
}

pub fn strip_chr(raw: &str) -> String {
    let chrom = raw.trim();
    match chrom.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => chrom[3..].to_string(),
        _ => chrom.to_string(),
    }
}

pub fn parse_coord(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

pub fn parse_span(raw: &str) -> Option<(i64, i64)> {
    let (a, b) = raw.trim().split_once('-')?;
    Some((parse_coord(a)?, parse_coord(b)?))
}

pub fn format_uid(gene: &str, event: EventType, chrom: &str, blocks: &[String], strand: Strand) -> String {
    format!(
        "{};{}:{}:{}:{}",
        gene,
        event.code(),
        chrom,
        blocks.join(":"),
        strand
    )
}

pub fn expected_blocks(event: EventType) -> usize {
    match event {
        EventType::Se | EventType::A3ss | EventType::A5ss => 2,
        EventType::Ri => 3,
        EventType::Af | EventType::Al | EventType::Mx => 4,
    }
}

/// Native rows of one (tool, event type) with their uniform_IDs aligned by
/// row. A `None` entry marks an event whose identifier could not be built.
#[derive(Debug, Clone)]
pub struct CanonicalTable {
    pub tool: Tool,
    pub event: EventType,
    pub table: Table,
    pub uniform_ids: Vec<Option<String>>,
}

impl CanonicalTable {
    pub fn new(tool: Tool, event: EventType, table: Table, uniform_ids: Vec<Option<String>>) -> Self {
        debug_assert_eq!(table.len(), uniform_ids.len());
        Self {
            tool,
            event,
            table,
            uniform_ids,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn uid(&self, row: usize) -> Option<&str> {
        self.uniform_ids[row].as_deref()
    }

    pub fn missing_ids(&self) -> usize {
        self.uniform_ids.iter().filter(|u| u.is_none()).count()
    }

    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            tool: self.tool,
            event: self.event,
            table: self.table.select(rows),
            uniform_ids: rows.iter().map(|&i| self.uniform_ids[i].clone()).collect(),
        }
    }

    /// Rows grouped by uniform_ID in first-appearance order; rows without an
    /// identifier are skipped.
    pub fn rows_by_uid(&self, rows: &[usize]) -> Vec<(&str, Vec<usize>)> {
        let mut order: Vec<(&str, Vec<usize>)> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        for &r in rows {
            let Some(uid) = self.uid(r) else { continue };
            match slot.get(uid) {
                Some(&i) => order[i].1.push(r),
                None => {
                    slot.insert(uid, order.len());
                    order.push((uid, vec![r]));
                }
            }
        }
        order
    }

    pub fn all_rows(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct GroupedEvent {
    pub rows: Vec<usize>,
    by_junction: BTreeMap<String, usize>,
    by_spliced_with: BTreeMap<String, usize>,
}

impl GroupedEvent {
    pub fn junction(&self, role: &str) -> Option<usize> {
        self.by_junction.get(role).copied()
    }

    pub fn spliced_with(&self, label: &str) -> Option<usize> {
        self.by_spliced_with.get(label).copied()
    }

    pub fn first_row(&self) -> usize {
        self.rows[0]
    }
}

pub fn group_events(
    table: &Table,
    key_col: usize,
    junction_col: usize,
    spliced_col: usize,
) -> Vec<GroupedEvent> {
    let mut groups: BTreeMap<&str, GroupedEvent> = BTreeMap::new();
    for r in 0..table.len() {
        let group = groups.entry(table.cell(r, key_col)).or_insert_with(|| GroupedEvent {
            rows: Vec::new(),
            by_junction: BTreeMap::new(),
            by_spliced_with: BTreeMap::new(),
        });
        group.rows.push(r);
        group
            .by_junction
            .entry(table.cell(r, junction_col).trim().to_string())
            .or_insert(r);
        group
            .by_spliced_with
            .entry(table.cell(r, spliced_col).trim().to_string())
            .or_insert(r);
    }
    groups.into_values().collect()
}

pub fn canonicalize(
    table: Table,
    tool: Tool,
    event: EventType,
    lookup: Option<&TranscriptLookup>,
) -> SpliceResult<CanonicalTable> {
    tool.ensure_supports(event)?;
    let canon = match tool {
        Tool::Rmats => rmats::canonicalize(table, event)?,
        Tool::Suppa2 => suppa2::canonicalize(table, event)?,
        Tool::Majiq => majiq::canonicalize(table, event)?,
        Tool::PsiSigma => psisigma::canonicalize(table, event, lookup)?,
    };
    debug!(
        tool = %tool,
        event = %event,
        rows = canon.len(),
        missing_ids = canon.missing_ids(),
        "canonicalized"
    );
    Ok(canon)
}
