//! MAJIQ: one row per junction/exon role, grouped by `event_id`.

use crate::canon::{
    CanonicalTable, GroupedEvent, Strand, format_uid, group_events, normalize_gene_id, parse_span,
    strip_chr,
};
use crate::error::SpliceResult;
use crate::event::{EventType, Tool};
use crate::table::Table;

pub const EVENT_ID_COLUMN: &str = "event_id";
pub const GENE_COLUMN: &str = "gene_id";
pub const CHROM_COLUMN: &str = "seqid";
pub const STRAND_COLUMN: &str = "strand";
pub const JUNCTION_NAME_COLUMN: &str = "junction_name";
pub const JUNCTION_COORD_COLUMN: &str = "junction_coord";
pub const SPLICED_WITH_COLUMN: &str = "spliced_with";
pub const SPLICED_WITH_COORD_COLUMN: &str = "spliced_with_coord";
pub const REFERENCE_EXON_COORD_COLUMN: &str = "reference_exon_coord";
pub const DENOVO_COLUMN: &str = "denovo";
pub const PROBABILITY_PATTERN: &str = "probability_changing";
pub const MEDIAN_DPSI_PATTERN: &str = "median_dpsi";
pub const MEDIAN_PSI_PATTERN: &str = "median_psi";
pub const DPSI_PATTERN: &str = "dpsi";

struct Columns {
    gene: usize,
    chrom: usize,
    strand: usize,
    junction_coord: usize,
    spliced_with_coord: usize,
    reference_exon_coord: Option<usize>,
}

pub fn canonicalize(table: Table, event: EventType) -> SpliceResult<CanonicalTable> {
    let key = table.require(EVENT_ID_COLUMN)?;
    let junction_name = table.require(JUNCTION_NAME_COLUMN)?;
    let spliced_with = table.require(SPLICED_WITH_COLUMN)?;
    let cols = Columns {
        gene: table.require(GENE_COLUMN)?,
        chrom: table.require(CHROM_COLUMN)?,
        strand: table.require(STRAND_COLUMN)?,
        junction_coord: table.require(JUNCTION_COORD_COLUMN)?,
        spliced_with_coord: table.require(SPLICED_WITH_COORD_COLUMN)?,
        reference_exon_coord: match event {
            EventType::Ri => Some(table.require(REFERENCE_EXON_COORD_COLUMN)?),
            _ => None,
        },
    };

    let groups = group_events(&table, key, junction_name, spliced_with);
    let mut order = Vec::with_capacity(table.len());
    let mut ids = Vec::with_capacity(table.len());
    for group in &groups {
        let uid = event_uid(&table, group, event, &cols, spliced_with);
        for &r in &group.rows {
            order.push(r);
            ids.push(uid.clone());
        }
    }

    Ok(CanonicalTable::new(
        Tool::Majiq,
        event,
        table.select(&order),
        ids,
    ))
}

fn event_uid(
    table: &Table,
    group: &GroupedEvent,
    event: EventType,
    cols: &Columns,
    spliced_with_col: usize,
) -> Option<String> {
    let first = group.first_row();
    let gene = normalize_gene_id(table.cell(first, cols.gene));
    let chrom = strip_chr(table.cell(first, cols.chrom));
    let strand = Strand::parse(table.cell(first, cols.strand))?;
    let junction = |role: &str| -> Option<(i64, i64)> {
        parse_span(table.cell(group.junction(role)?, cols.junction_coord))
    };
    let exon_of = |row: usize| parse_span(table.cell(row, cols.spliced_with_coord));

    let blocks = match event {
        EventType::Se => {
            let (up_ee, down_es) = junction("C1_C2")?;
            let (exon_start, exon_end) = exon_of(group.junction("C1_A")?)?;
            vec![
                format!("{}-{}", up_ee, exon_start),
                format!("{}-{}", exon_end, down_es),
            ]
        }
        EventType::A3ss | EventType::A5ss => {
            let (p1, p2) = junction("Proximal")?;
            let (d1, d2) = junction("Distal")?;
            vec![format!("{}-{}", p1, p2), format!("{}-{}", d1, d2)]
        }
        EventType::Af | EventType::Al => {
            let proximal = group.junction("Proximal")?;
            let distal = group.junction("Distal")?;
            let (p_j1, p_j2) = junction("Proximal")?;
            let (d_j1, d_j2) = junction("Distal")?;
            let (p_s, p_e) = exon_of(proximal)?;
            let (d_s, d_e) = exon_of(distal)?;
            let exons_upstream = matches!(
                (event, strand),
                (EventType::Af, Strand::Plus) | (EventType::Al, Strand::Minus)
            );
            if exons_upstream {
                vec![
                    format!("{}", d_s),
                    format!("{}-{}", d_e, p_j2),
                    format!("{}", p_s),
                    format!("{}-{}", p_e, d_j2),
                ]
            } else {
                vec![
                    format!("{}-{}", p_j1, p_s),
                    format!("{}", p_e),
                    format!("{}-{}", d_j1, d_s),
                    format!("{}", d_e),
                ]
            }
        }
        EventType::Ri => {
            let ref_col = cols.reference_exon_coord?;
            // the intron row is named after the exon the event is anchored on
            let (intron_role, anchored_on_c1) = match table.cell(first, spliced_with_col).trim() {
                "C1" => ("C2_C1_intron", true),
                "C2" => ("C1_C2_intron", false),
                _ => return None,
            };
            let row = group.junction(intron_role)?;
            let (intron_start, intron_end) = parse_span(table.cell(row, cols.junction_coord))?;
            let spliced = parse_span(table.cell(row, cols.spliced_with_coord))?;
            let reference = parse_span(table.cell(row, ref_col))?;
            let (c1, c2) = if anchored_on_c1 {
                (spliced, reference)
            } else {
                (reference, spliced)
            };
            let (left, right) = match strand {
                Strand::Plus => (c1.0, c2.1),
                Strand::Minus => (c2.0, c1.1),
            };
            vec![
                format!("{}", left),
                format!("{}-{}", intron_start - 1, intron_end + 1),
                format!("{}", right),
            ]
        }
        EventType::Mx => {
            let (c1, c2) = junction("C1_A1")?;
            let (c3, c4) = junction("C2_A2")?;
            let (e1_s, e1_e) = exon_of(group.spliced_with("A1")?)?;
            let (e2_s, e2_e) = exon_of(group.spliced_with("A2")?)?;
            match strand {
                Strand::Plus => vec![
                    format!("{}-{}", c1, e1_s),
                    format!("{}-{}", e1_e, c4),
                    format!("{}-{}", c1, e2_s),
                    format!("{}-{}", e2_e, c4),
                ],
                Strand::Minus => vec![
                    format!("{}-{}", c3, e2_s),
                    format!("{}-{}", e2_e, c2),
                    format!("{}-{}", c3, e1_s),
                    format!("{}-{}", e1_e, c2),
                ],
            }
        }
    };

    Some(format_uid(&gene, event, &chrom, &blocks, strand))
}

/// Rows carrying the inclusion role for this event type: the row whose
/// statistics describe the event as a whole.
pub fn role_rows(canon: &CanonicalTable) -> SpliceResult<Vec<usize>> {
    let table = &canon.table;
    let rows = 0..table.len();
    let selected: Vec<usize> = match canon.event {
        EventType::Se => {
            let col = table.require(SPLICED_WITH_COLUMN)?;
            rows.filter(|&r| table.cell(r, col).trim() == "A").collect()
        }
        EventType::A3ss | EventType::A5ss => {
            let col = table.require(JUNCTION_NAME_COLUMN)?;
            rows.filter(|&r| table.cell(r, col).trim() == "Proximal")
                .collect()
        }
        EventType::Af | EventType::Al => {
            let col = table.require(JUNCTION_NAME_COLUMN)?;
            rows.filter(|&r| table.cell(r, col).trim() == "Distal").collect()
        }
        EventType::Mx => {
            let col = table.require(JUNCTION_NAME_COLUMN)?;
            let strand = table.require(STRAND_COLUMN)?;
            rows.filter(|&r| {
                let name = table.cell(r, col).trim();
                match Strand::parse(table.cell(r, strand)) {
                    Some(Strand::Plus) => name == "C1_A1" || name == "C2_A2",
                    Some(Strand::Minus) => name == "C1_A2" || name == "C2_A1",
                    None => false,
                }
            })
            .collect()
        }
        EventType::Ri => {
            let col = table.require(JUNCTION_NAME_COLUMN)?;
            rows.filter(|&r| table.cell(r, col).contains("intron"))
                .collect()
        }
    };
    Ok(selected)
}

pub fn is_true(raw: &str) -> bool {
    matches!(raw.trim(), "True" | "true" | "TRUE" | "1")
}
