//! PSI-Sigma: one row per target exon, coordinates as `chrN:start-end`
//! loci. Gene and strand are not reported and come from the transcript
//! lookup keyed on `Reference Transcript`.

use std::collections::BTreeMap;

use crate::annotation::{TranscriptLookup, split_reference_transcript};
use crate::canon::{CanonicalTable, Strand, format_uid, normalize_gene_id, parse_span, strip_chr};
use crate::error::{SpliceError, SpliceResult};
use crate::event::{EventType, Tool};
use crate::table::Table;

pub const EVENT_REGION_COLUMN: &str = "Event Region";
pub const TARGET_EXON_COLUMN: &str = "Target Exon";
pub const EVENT_TYPE_COLUMN: &str = "Event Type";
pub const REFERENCE_TRANSCRIPT_COLUMN: &str = "Reference Transcript";
pub const DELTA_COLUMN: &str = "ΔPSI (%)";
pub const FDR_COLUMN: &str = "FDR (BH)";
pub const CONTROL_VALUES_COLUMN: &str = "N Values";
pub const TEST_VALUES_COLUMN: &str = "T Values";

pub const TRANSCRIPT_COLUMN: &str = "transcript_id";
pub const NOVELTY_COLUMN: &str = "type";
pub const GENE_COLUMN: &str = "gene_id";
pub const STRAND_COLUMN: &str = "strand";
pub const NOVEL_FLAG: &str = "novel";

pub fn native_event_types(event: EventType) -> &'static [&'static str] {
    match event {
        EventType::Se => &["SES"],
        EventType::A3ss => &["A3SS", "TSS|A3SS"],
        EventType::A5ss => &["A5SS", "TSS|A5SS"],
        EventType::Ri => &["RI", "IR (overlapping region)"],
        EventType::Mx => &["MXS"],
        EventType::Af | EventType::Al => &[],
    }
}

pub fn parse_locus(raw: &str) -> Option<(&str, i64, i64)> {
    let (chrom, span) = raw.trim().rsplit_once(':')?;
    let (start, end) = parse_span(span)?;
    Some((chrom, start, end))
}

/// Appends `transcript_id` and `type` (novel or `-`) from the reference
/// transcript. A no-op when the table has no reference transcript column.
pub fn flag_novel(table: &mut Table) {
    let Some(reference) = table.column(REFERENCE_TRANSCRIPT_COLUMN) else {
        return;
    };
    let (kinds, transcripts): (Vec<String>, Vec<String>) = (0..table.len())
        .map(|r| {
            let (novel, accession) = split_reference_transcript(table.cell(r, reference));
            (if novel { NOVEL_FLAG } else { "-" }.to_string(), accession)
        })
        .unzip();
    table.set_column(TRANSCRIPT_COLUMN, transcripts);
    table.set_column(NOVELTY_COLUMN, kinds);
}

/// Adds `gene_id` and `strand` from the lookup. Rows whose transcript is
/// unknown get empty values, and therefore a missing identifier.
pub fn annotate(table: &mut Table, lookup: &TranscriptLookup) -> SpliceResult<()> {
    table.require(REFERENCE_TRANSCRIPT_COLUMN)?;
    flag_novel(table);
    let transcript = table.require(TRANSCRIPT_COLUMN)?;
    let (genes, strands): (Vec<String>, Vec<String>) = (0..table.len())
        .map(|r| match lookup.get(table.cell(r, transcript)) {
            Some(info) => (info.gene_id.clone(), info.strand.clone()),
            None => (String::new(), String::new()),
        })
        .unzip();
    table.set_column(GENE_COLUMN, genes);
    table.set_column(STRAND_COLUMN, strands);
    Ok(())
}

pub fn canonicalize(
    mut table: Table,
    event: EventType,
    lookup: Option<&TranscriptLookup>,
) -> SpliceResult<CanonicalTable> {
    Tool::PsiSigma.ensure_supports(event)?;
    match lookup {
        Some(lookup) => annotate(&mut table, lookup)?,
        None => flag_novel(&mut table),
    }
    let event_type = table.require(EVENT_TYPE_COLUMN)?;
    let labels = native_event_types(event);
    let rows: Vec<usize> = (0..table.len())
        .filter(|&r| labels.contains(&table.cell(r, event_type).trim()))
        .collect();
    let table = table.select(&rows);

    let cols = Columns {
        region: table.require(EVENT_REGION_COLUMN)?,
        exon: table.require(TARGET_EXON_COLUMN)?,
        gene: table.require(GENE_COLUMN).map_err(|_| lookup_required(&table))?,
        strand: table.require(STRAND_COLUMN).map_err(|_| lookup_required(&table))?,
    };

    let ids = match event {
        EventType::Mx => mx_ids(&table, &cols),
        _ => (0..table.len())
            .map(|r| row_uid(&table, &cols, r, event))
            .collect(),
    };
    Ok(CanonicalTable::new(Tool::PsiSigma, event, table, ids))
}

fn lookup_required(table: &Table) -> SpliceError {
    SpliceError::MissingColumn {
        column: format!("{} (transcript annotation)", GENE_COLUMN),
        context: table.source().to_string(),
    }
}

struct Columns {
    region: usize,
    exon: usize,
    gene: usize,
    strand: usize,
}

fn row_uid(table: &Table, cols: &Columns, r: usize, event: EventType) -> Option<String> {
    let (chrom, exon_start, exon_end) = parse_locus(table.cell(r, cols.exon))?;
    let (_, a, b) = parse_locus(table.cell(r, cols.region))?;
    let strand = Strand::parse(table.cell(r, cols.strand))?;
    let gene = gene_of(table, cols, r)?;

    let blocks = match event {
        EventType::Se => vec![
            format!("{}-{}", a - 1, exon_start),
            format!("{}-{}", exon_end, b + 1),
        ],
        EventType::A3ss | EventType::A5ss => {
            let start_moves = matches!(
                (event, strand),
                (EventType::A3ss, Strand::Plus) | (EventType::A5ss, Strand::Minus)
            );
            let alternative = if start_moves {
                format!("{}-{}", a - 1, exon_start)
            } else {
                format!("{}-{}", exon_end, b + 1)
            };
            vec![alternative, format!("{}-{}", a - 1, b + 1)]
        }
        EventType::Ri => vec![
            format!("{}", a),
            format!("{}-{}", exon_start - 1, exon_end + 1),
            format!("{}", b),
        ],
        EventType::Mx | EventType::Af | EventType::Al => return None,
    };
    Some(format_uid(&gene, event, &strip_chr(chrom), &blocks, strand))
}

fn gene_of(table: &Table, cols: &Columns, r: usize) -> Option<String> {
    let gene = normalize_gene_id(table.cell(r, cols.gene));
    (!gene.is_empty()).then_some(gene)
}

/// MX events arrive as one row per candidate exon sharing an event region.
/// Candidates are ordered by (start, end) and the first non-overlapping pair
/// forms the event; both rows of that pair carry its identifier.
fn mx_ids(table: &Table, cols: &Columns) -> Vec<Option<String>> {
    let mut ids = vec![None; table.len()];
    let mut regions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for r in 0..table.len() {
        regions
            .entry(table.cell(r, cols.region).trim())
            .or_default()
            .push(r);
    }

    for (region, rows) in regions {
        if rows.len() < 2 {
            continue;
        }
        let Some((chrom, region_start, region_end)) = parse_locus(region) else {
            continue;
        };
        let first = rows[0];
        let (Some(gene), Some(strand)) = (
            gene_of(table, cols, first),
            Strand::parse(table.cell(first, cols.strand)),
        ) else {
            continue;
        };

        let mut exons: Vec<(i64, i64, usize)> = rows
            .iter()
            .filter_map(|&r| {
                let (_, s, e) = parse_locus(table.cell(r, cols.exon))?;
                Some((s, e, r))
            })
            .collect();
        exons.sort();

        let Some((left, right)) = first_disjoint_pair(&exons) else {
            continue;
        };
        let blocks = vec![
            format!("{}-{}", region_start - 1, left.0),
            format!("{}-{}", left.1, region_end + 1),
            format!("{}-{}", region_start - 1, right.0),
            format!("{}-{}", right.1, region_end + 1),
        ];
        let uid = format_uid(&gene, EventType::Mx, &strip_chr(chrom), &blocks, strand);
        ids[left.2] = Some(uid.clone());
        ids[right.2] = Some(uid);
    }
    ids
}

fn first_disjoint_pair(exons: &[(i64, i64, usize)]) -> Option<((i64, i64, usize), (i64, i64, usize))> {
    for (i, a) in exons.iter().enumerate() {
        for b in &exons[i + 1..] {
            if a.1 < b.0 || b.1 < a.0 {
                return Some((*a, *b));
            }
        }
    }
    None
}

pub fn target_exon(table: &Table, row: usize) -> Option<(i64, i64)> {
    let col = table.column(TARGET_EXON_COLUMN)?;
    let (_, s, e) = parse_locus(table.cell(row, col))?;
    Some((s, e))
}

/// One row per uniform_ID: the row with the lowest target exon. Statistics
/// of an MX pair are read from that row only.
pub fn representative_rows(canon: &CanonicalTable) -> Vec<usize> {
    canon
        .rows_by_uid(&canon.all_rows())
        .into_iter()
        .filter_map(|(_, rows)| {
            rows.into_iter()
                .min_by_key(|&r| target_exon(&canon.table, r).unwrap_or((i64::MAX, i64::MAX)))
        })
        .collect()
}
