//! Removal of events the upstream tool itself flags as novel.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::canon::{CanonicalTable, majiq, psisigma, rmats};
use crate::event::Tool;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoveltyOutcome {
    Applied { removed: usize },
    NoAuxiliary,
    NoCommonKey,
    NotApplicable,
    Disabled,
}

impl fmt::Display for NoveltyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoveltyOutcome::Applied { removed } => write!(f, "removed {}", removed),
            NoveltyOutcome::NoAuxiliary => f.write_str("no novel-event file"),
            NoveltyOutcome::NoCommonKey => f.write_str("no common key"),
            NoveltyOutcome::NotApplicable => f.write_str("not applicable"),
            NoveltyOutcome::Disabled => f.write_str("kept"),
        }
    }
}

/// Drops novel events from a canonical table. `auxiliary` holds the tool's
/// native novel-event tables (only rMATS ships them); other tools flag
/// novelty inline.
pub fn filter_novel(canon: CanonicalTable, auxiliary: &[Table]) -> (CanonicalTable, NoveltyOutcome) {
    let keep = match canon.tool {
        Tool::Suppa2 => return (canon, NoveltyOutcome::NotApplicable),
        Tool::Rmats => rmats_keep(&canon, auxiliary),
        Tool::Majiq => majiq_keep(&canon),
        Tool::PsiSigma => psisigma_keep(&canon),
    };
    let keep = match keep {
        Ok(rows) => rows,
        Err(outcome) => {
            debug!(tool = %canon.tool, event = %canon.event, outcome = %outcome, "novel filter skipped");
            return (canon, outcome);
        }
    };
    let removed = canon.len() - keep.len();
    debug!(tool = %canon.tool, event = %canon.event, removed, "novel events removed");
    (canon.select(&keep), NoveltyOutcome::Applied { removed })
}

fn rmats_keep(canon: &CanonicalTable, auxiliary: &[Table]) -> Result<Vec<usize>, NoveltyOutcome> {
    if auxiliary.is_empty() {
        return Err(NoveltyOutcome::NoAuxiliary);
    }
    let novel = Table::concat(auxiliary.to_vec());
    let table = &canon.table;
    let common: Vec<(usize, usize)> = rmats::novelty_key_columns(canon.event)
        .iter()
        .filter_map(|name| Some((table.column(name)?, novel.column(name)?)))
        .collect();
    if common.is_empty() {
        return Err(NoveltyOutcome::NoCommonKey);
    }

    let novel_keys: HashSet<Vec<&str>> = (0..novel.len())
        .map(|r| common.iter().map(|&(_, c)| novel.cell(r, c).trim()).collect())
        .collect();
    Ok((0..table.len())
        .filter(|&r| {
            let key: Vec<&str> = common.iter().map(|&(c, _)| table.cell(r, c).trim()).collect();
            !novel_keys.contains(&key)
        })
        .collect())
}

/// Every row of a MAJIQ event is dropped when any of its rows is de novo.
fn majiq_keep(canon: &CanonicalTable) -> Result<Vec<usize>, NoveltyOutcome> {
    let table = &canon.table;
    let (Some(event_id), Some(denovo)) = (
        table.column(majiq::EVENT_ID_COLUMN),
        table.column(majiq::DENOVO_COLUMN),
    ) else {
        return Err(NoveltyOutcome::NoCommonKey);
    };
    let mut flagged: HashMap<&str, bool> = HashMap::new();
    for r in 0..table.len() {
        *flagged.entry(table.cell(r, event_id)).or_default() |= majiq::is_true(table.cell(r, denovo));
    }
    Ok((0..table.len())
        .filter(|&r| !flagged[table.cell(r, event_id)])
        .collect())
}

fn psisigma_keep(canon: &CanonicalTable) -> Result<Vec<usize>, NoveltyOutcome> {
    let table = &canon.table;
    let Some(kind) = table.column(psisigma::NOVELTY_COLUMN) else {
        return Err(NoveltyOutcome::NoCommonKey);
    };
    Ok((0..table.len())
        .filter(|&r| table.cell(r, kind).trim() != psisigma::NOVEL_FLAG)
        .collect())
}
