//! SUPPA2 event ids already follow the uniform grammar.

use crate::canon::{
    CanonicalTable, Strand, expected_blocks, format_uid, normalize_gene_id, parse_coord, strip_chr,
};
use crate::error::SpliceResult;
use crate::event::{EventType, Tool};
use crate::table::{INDEX_COLUMN, Table};

pub const DPSI_PATTERN: &str = "dPSI";
pub const PVALUE_PATTERN: &str = "p-val";

/// True when the native id names an event of this type.
pub fn is_event_of(native_id: &str, event: EventType) -> bool {
    native_id.contains(&format!(";{}:", event.code()))
}

/// Canonical form of a native SUPPA2 event id; `None` when malformed.
pub fn canonical_from_native(native_id: &str, event: EventType) -> Option<String> {
    let (gene_raw, rest) = native_id.trim().split_once(';')?;
    let parts: Vec<&str> = rest.split(':').collect();
    let n_blocks = expected_blocks(event);
    if parts.len() != n_blocks + 3 || parts[0] != event.code() {
        return None;
    }
    let chrom = strip_chr(parts[1]);
    let strand = Strand::parse(parts[parts.len() - 1])?;
    let mut blocks = Vec::with_capacity(n_blocks);
    for block in &parts[2..2 + n_blocks] {
        blocks.push(normalize_block(block)?);
    }
    Some(format_uid(
        &normalize_gene_id(gene_raw),
        event,
        &chrom,
        &blocks,
        strand,
    ))
}

fn normalize_block(block: &str) -> Option<String> {
    match block.split_once('-') {
        Some((a, b)) => Some(format!("{}-{}", parse_coord(a)?, parse_coord(b)?)),
        None => Some(parse_coord(block)?.to_string()),
    }
}

pub fn canonicalize(table: Table, event: EventType) -> SpliceResult<CanonicalTable> {
    let id_col = table.require(INDEX_COLUMN)?;
    let rows: Vec<usize> = (0..table.len())
        .filter(|&r| is_event_of(table.cell(r, id_col), event))
        .collect();
    let table = table.select(&rows);
    let ids = (0..table.len())
        .map(|r| canonical_from_native(table.cell(r, id_col), event))
        .collect();
    Ok(CanonicalTable::new(Tool::Suppa2, event, table, ids))
}
