//! Effect sizes on a common [-1, 1] scale.

use std::collections::HashSet;

use crate::canon::{CanonicalTable, majiq, psisigma, rmats, suppa2};
use crate::error::SpliceResult;
use crate::event::{DpsiRecord, EventType, Tool};
use crate::math::stats::mean_present;
use crate::table::parse_number;

/// One record per uniform_ID, in first-appearance order.
pub fn extract_dpsi(canon: &CanonicalTable) -> SpliceResult<Vec<DpsiRecord>> {
    canon.tool.ensure_supports(canon.event)?;
    let table = &canon.table;
    match canon.tool {
        Tool::Rmats => {
            let col = table.require(rmats::DELTA_COLUMN)?;
            Ok(first_row_values(canon, &canon.all_rows(), |r| {
                parse_number(table.cell(r, col))
            }))
        }
        Tool::Suppa2 => {
            let col = table.require_containing(suppa2::DPSI_PATTERN)?;
            Ok(first_row_values(canon, &canon.all_rows(), |r| {
                parse_number(table.cell(r, col))
            }))
        }
        Tool::PsiSigma => {
            let col = table.require(psisigma::DELTA_COLUMN)?;
            let rows = match canon.event {
                EventType::Mx => psisigma::representative_rows(canon),
                _ => canon.all_rows(),
            };
            Ok(first_row_values(canon, &rows, |r| {
                parse_number(table.cell(r, col)).map(|v| v / 100.0)
            }))
        }
        Tool::Majiq => majiq_values(canon),
    }
}

fn first_row_values<F>(canon: &CanonicalTable, rows: &[usize], value: F) -> Vec<DpsiRecord>
where
    F: Fn(usize) -> Option<f64>,
{
    canon
        .rows_by_uid(rows)
        .into_iter()
        .map(|(uid, rows)| DpsiRecord {
            uniform_id: uid.to_string(),
            value: value(rows[0]),
        })
        .collect()
}

/// Mean over the role rows of each dPSI column, then mean across columns.
fn majiq_values(canon: &CanonicalTable) -> SpliceResult<Vec<DpsiRecord>> {
    let table = &canon.table;
    let cols = table.columns_containing(majiq::DPSI_PATTERN);
    if cols.is_empty() {
        table.require_containing(majiq::DPSI_PATTERN)?;
    }
    let role: HashSet<usize> = majiq::role_rows(canon)?.into_iter().collect();

    Ok(canon
        .rows_by_uid(&canon.all_rows())
        .into_iter()
        .map(|(uid, rows)| {
            let rows: Vec<usize> = rows.into_iter().filter(|r| role.contains(r)).collect();
            let value = mean_present(cols.iter().map(|&c| {
                mean_present(rows.iter().map(|&r| parse_number(table.cell(r, c))))
            }));
            DpsiRecord {
                uniform_id: uid.to_string(),
                value,
            }
        })
        .collect())
}
