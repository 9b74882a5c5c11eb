//! Per-tool differential splicing calls.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::canon::{CanonicalTable, majiq, psisigma, rmats, suppa2};
use crate::error::SpliceResult;
use crate::event::{ClassificationRecord, DseClass, EventType, Tool};
use crate::table::parse_number;

pub const RMATS_FDR_MAX: f64 = 0.01;
pub const RMATS_DELTA_MIN: f64 = 0.05;
pub const SUPPA2_PVALUE_MAX: f64 = 0.05;
pub const SUPPA2_DPSI_MIN: f64 = 0.05;
pub const PSISIGMA_FDR_MAX: f64 = 0.05;
pub const PSISIGMA_DELTA_MIN: f64 = 5.0;
pub const MAJIQ_PROBABILITY_MIN: f64 = 0.95;

pub fn classify(canon: &CanonicalTable) -> SpliceResult<Vec<ClassificationRecord>> {
    canon.tool.ensure_supports(canon.event)?;
    let row_classes = match canon.tool {
        Tool::Rmats => rmats_rows(canon)?,
        Tool::Suppa2 => suppa2_rows(canon)?,
        Tool::PsiSigma => psisigma_rows(canon)?,
        Tool::Majiq => return majiq_records(canon),
    };
    let records = collapse(canon, &row_classes);
    debug!(
        tool = %canon.tool,
        event = %canon.event,
        records = records.len(),
        dse = records.iter().filter(|r| r.class.is_dse()).count(),
        "classified"
    );
    Ok(records)
}

fn threshold_class(delta: Option<f64>, significant: bool, cut: f64) -> DseClass {
    match delta {
        Some(d) if significant && d >= cut => DseClass::Up,
        Some(d) if significant && d <= -cut => DseClass::Down,
        _ => DseClass::NonDse,
    }
}

fn rmats_rows(canon: &CanonicalTable) -> SpliceResult<Vec<(usize, DseClass)>> {
    let table = &canon.table;
    let fdr = table.require(rmats::FDR_COLUMN)?;
    let delta = table.require(rmats::DELTA_COLUMN)?;
    Ok((0..table.len())
        .map(|r| {
            let significant = parse_number(table.cell(r, fdr)).is_some_and(|p| p <= RMATS_FDR_MAX);
            let class = threshold_class(parse_number(table.cell(r, delta)), significant, RMATS_DELTA_MIN);
            (r, class)
        })
        .collect())
}

fn suppa2_rows(canon: &CanonicalTable) -> SpliceResult<Vec<(usize, DseClass)>> {
    let table = &canon.table;
    let dpsi = table.require_containing(suppa2::DPSI_PATTERN)?;
    let pval = table.require_containing(suppa2::PVALUE_PATTERN)?;
    Ok((0..table.len())
        .map(|r| {
            let significant = parse_number(table.cell(r, pval)).is_some_and(|p| p < SUPPA2_PVALUE_MAX);
            let class = threshold_class(parse_number(table.cell(r, dpsi)), significant, SUPPA2_DPSI_MIN);
            (r, class)
        })
        .collect())
}

fn psisigma_rows(canon: &CanonicalTable) -> SpliceResult<Vec<(usize, DseClass)>> {
    let table = &canon.table;
    let delta = table.require(psisigma::DELTA_COLUMN)?;
    let fdr = table.require(psisigma::FDR_COLUMN)?;
    let rows = match canon.event {
        EventType::Mx => psisigma::representative_rows(canon),
        _ => canon.all_rows(),
    };
    Ok(rows
        .into_iter()
        .map(|r| {
            let significant = parse_number(table.cell(r, fdr)).is_some_and(|p| p < PSISIGMA_FDR_MAX);
            let class = threshold_class(parse_number(table.cell(r, delta)), significant, PSISIGMA_DELTA_MIN);
            (r, class)
        })
        .collect())
}

/// Only role rows are tested. A row scores its highest probability over all
/// contrasts; the sign comes from the first dPSI column of the best row.
fn majiq_records(canon: &CanonicalTable) -> SpliceResult<Vec<ClassificationRecord>> {
    let table = &canon.table;
    let prob_cols = table.columns_containing(majiq::PROBABILITY_PATTERN);
    let dpsi_cols = table.columns_containing(majiq::MEDIAN_DPSI_PATTERN);
    if prob_cols.is_empty() {
        table.require_containing(majiq::PROBABILITY_PATTERN)?;
    }
    let dpsi = table.require_containing(majiq::MEDIAN_DPSI_PATTERN)?;
    let role: HashSet<usize> = majiq::role_rows(canon)?.into_iter().collect();

    let mut records = Vec::new();
    for (uid, rows) in canon.rows_by_uid(&canon.all_rows()) {
        let mut best: Option<(f64, f64)> = None;
        for &r in rows.iter().filter(|&&r| role.contains(&r)) {
            if dpsi_cols.iter().any(|&c| parse_number(table.cell(r, c)).is_none()) {
                continue;
            }
            let Some(p) = prob_cols
                .iter()
                .map(|&c| parse_number(table.cell(r, c)))
                .collect::<Option<Vec<f64>>>()
                .and_then(|ps| ps.into_iter().reduce(f64::max))
            else {
                continue;
            };
            let Some(d) = parse_number(table.cell(r, dpsi)) else { continue };
            if best.is_none_or(|(bp, _)| p > bp) {
                best = Some((p, d));
            }
        }
        let class = match best {
            Some((p, d)) if p > MAJIQ_PROBABILITY_MIN && d > 0.0 => DseClass::Up,
            Some((p, d)) if p > MAJIQ_PROBABILITY_MIN && d < 0.0 => DseClass::Down,
            _ => DseClass::NonDse,
        };
        records.push(ClassificationRecord {
            uniform_id: uid.to_string(),
            class,
        });
    }
    Ok(records)
}

/// One record per uniform_ID in first-appearance order. When rows of the
/// same identifier disagree, the first differential call wins.
fn collapse(canon: &CanonicalTable, row_classes: &[(usize, DseClass)]) -> Vec<ClassificationRecord> {
    let mut records: Vec<ClassificationRecord> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for &(r, class) in row_classes {
        let Some(uid) = canon.uid(r) else { continue };
        match slot.get(uid) {
            Some(&i) => {
                if !records[i].class.is_dse() && class.is_dse() {
                    records[i].class = class;
                }
            }
            None => {
                slot.insert(uid, records.len());
                records.push(ClassificationRecord {
                    uniform_id: uid.to_string(),
                    class,
                });
            }
        }
    }
    records
}

pub fn dse_counts(records: &[ClassificationRecord]) -> (usize, usize) {
    records.iter().fold((0, 0), |(up, down), r| match r.class {
        DseClass::Up => (up + 1, down),
        DseClass::Down => (up, down + 1),
        DseClass::NonDse => (up, down),
    })
}
