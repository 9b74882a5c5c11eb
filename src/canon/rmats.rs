//! rMATS: one row per event, 0-based exon starts, 1-based ends.

use crate::canon::{CanonicalTable, Strand, format_uid, normalize_gene_id, parse_coord, strip_chr};
use crate::error::SpliceResult;
use crate::event::{EventType, Tool};
use crate::table::Table;

pub const GENE_COLUMN: &str = "GeneID";
pub const CHROM_COLUMN: &str = "chr";
pub const STRAND_COLUMN: &str = "strand";
pub const FDR_COLUMN: &str = "FDR";
pub const DELTA_COLUMN: &str = "IncLevelDifference";
pub const TEST_INCLUSION_COLUMN: &str = "IncLevel1";
pub const CONTROL_INCLUSION_COLUMN: &str = "IncLevel2";

fn coordinate_columns(event: EventType) -> &'static [&'static str] {
    match event {
        EventType::Se => &["upstreamEE", "exonStart_0base", "exonEnd", "downstreamES"],
        EventType::A3ss | EventType::A5ss => &[
            "longExonStart_0base",
            "longExonEnd",
            "shortES",
            "shortEE",
            "flankingES",
            "flankingEE",
        ],
        EventType::Ri => &["upstreamES", "upstreamEE", "downstreamES", "downstreamEE"],
        EventType::Mx => &[
            "1stExonStart_0base",
            "1stExonEnd",
            "2ndExonStart_0base",
            "2ndExonEnd",
            "upstreamEE",
            "downstreamES",
        ],
        EventType::Af | EventType::Al => &[],
    }
}

/// Structural columns identifying an event in rMATS novel-event files.
pub fn novelty_key_columns(event: EventType) -> &'static [&'static str] {
    match event {
        EventType::Se => &[
            "GeneID",
            "chr",
            "strand",
            "exonStart_0base",
            "exonEnd",
            "upstreamES",
            "upstreamEE",
            "downstreamES",
            "downstreamEE",
        ],
        EventType::A3ss | EventType::A5ss => &[
            "GeneID",
            "chr",
            "strand",
            "longExonStart_0base",
            "longExonEnd",
            "flankingES",
            "flankingEE",
            "shortES",
            "shortEE",
        ],
        EventType::Ri => &[
            "GeneID",
            "chr",
            "strand",
            "riExonStart_0base",
            "riExonEnd",
            "upstreamES",
            "upstreamEE",
            "downstreamES",
            "downstreamEE",
        ],
        EventType::Mx => &[
            "GeneID",
            "chr",
            "strand",
            "1stExonStart_0base",
            "1stExonEnd",
            "2ndExonStart_0base",
            "2ndExonEnd",
            "upstreamES",
            "upstreamEE",
            "downstreamES",
            "downstreamEE",
        ],
        EventType::Af | EventType::Al => &[],
    }
}

pub fn file_event_name(event: EventType) -> &'static str {
    match event {
        EventType::Mx => "MXE",
        other => other.name(),
    }
}

pub fn canonicalize(table: Table, event: EventType) -> SpliceResult<CanonicalTable> {
    Tool::Rmats.ensure_supports(event)?;
    let gene = table.require(GENE_COLUMN)?;
    let chrom = table.require(CHROM_COLUMN)?;
    let strand = table.require(STRAND_COLUMN)?;
    let coord_cols = coordinate_columns(event)
        .iter()
        .map(|name| table.require(name))
        .collect::<SpliceResult<Vec<_>>>()?;

    let ids = (0..table.len())
        .map(|r| {
            let coords = coord_cols
                .iter()
                .map(|&c| parse_coord(table.cell(r, c)))
                .collect::<Option<Vec<i64>>>()?;
            let strand = Strand::parse(table.cell(r, strand))?;
            let blocks = blocks(event, &coords, strand);
            Some(format_uid(
                &normalize_gene_id(table.cell(r, gene)),
                event,
                &strip_chr(table.cell(r, chrom)),
                &blocks,
                strand,
            ))
        })
        .collect();

    Ok(CanonicalTable::new(Tool::Rmats, event, table, ids))
}

fn blocks(event: EventType, c: &[i64], strand: Strand) -> Vec<String> {
    match event {
        EventType::Se => {
            let (up_ee, exon_start0, exon_end, down_es) = (c[0], c[1], c[2], c[3]);
            vec![
                format!("{}-{}", up_ee, exon_start0 + 1),
                format!("{}-{}", exon_end, down_es + 1),
            ]
        }
        EventType::A3ss | EventType::A5ss => {
            let (long_start0, long_end, short_es, short_ee, flank_es, flank_ee) =
                (c[0], c[1], c[2], c[3], c[4], c[5]);
            // the alternative sites sit downstream of the flanking exon for
            // A3 on '+' and A5 on '-', upstream of it otherwise
            let flank_upstream = matches!(
                (event, strand),
                (EventType::A3ss, Strand::Plus) | (EventType::A5ss, Strand::Minus)
            );
            if flank_upstream {
                vec![
                    format!("{}-{}", flank_ee, long_start0 + 1),
                    format!("{}-{}", flank_ee, short_es + 1),
                ]
            } else {
                vec![
                    format!("{}-{}", long_end, flank_es + 1),
                    format!("{}-{}", short_ee, flank_es + 1),
                ]
            }
        }
        EventType::Ri => {
            let (up_es, up_ee, down_es, down_ee) = (c[0], c[1], c[2], c[3]);
            vec![
                format!("{}", up_es + 1),
                format!("{}-{}", up_ee, down_es + 1),
                format!("{}", down_ee),
            ]
        }
        EventType::Mx => {
            let (e1_start0, e1_end, e2_start0, e2_end, up_ee, down_es) =
                (c[0], c[1], c[2], c[3], c[4], c[5]);
            vec![
                format!("{}-{}", up_ee, e1_start0 + 1),
                format!("{}-{}", e1_end, down_es + 1),
                format!("{}-{}", up_ee, e2_start0 + 1),
                format!("{}-{}", e2_end, down_es + 1),
            ]
        }
        EventType::Af | EventType::Al => Vec::new(),
    }
}
