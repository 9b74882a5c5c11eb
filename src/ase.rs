//! Events with intermediate inclusion in either sample group.

use std::collections::{BTreeSet, HashSet};

use crate::canon::{CanonicalTable, majiq, psisigma, rmats, suppa2};
use crate::error::{SpliceError, SpliceResult};
use crate::event::Tool;
use crate::math::stats::{mean_present, replicate_mean, within};
use crate::table::{INDEX_COLUMN, Table, parse_number};

pub const FRACTION_RANGE: (f64, f64) = (0.05, 0.95);
pub const PERCENT_RANGE: (f64, f64) = (5.0, 95.0);

#[derive(Debug, Clone, Default)]
pub struct GroupLabels {
    pub test: Option<String>,
    pub control: Option<String>,
}

impl GroupLabels {
    pub fn new(test: Option<String>, control: Option<String>) -> Self {
        Self { test, control }
    }

    fn explicit(&self) -> Option<(&str, &str)> {
        Some((self.test.as_deref()?, self.control.as_deref()?))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AseSets {
    pub test: BTreeSet<String>,
    pub control: BTreeSet<String>,
    pub note: Option<String>,
}

/// `inclusion` is the SUPPA2 per-sample PSI table; other tools carry their
/// inclusion levels in the canonical table itself.
pub fn extract_ase(
    canon: &CanonicalTable,
    labels: &GroupLabels,
    inclusion: Option<&Table>,
) -> SpliceResult<AseSets> {
    canon.tool.ensure_supports(canon.event)?;
    match canon.tool {
        Tool::Rmats => {
            let table = &canon.table;
            let test = table.require(rmats::TEST_INCLUSION_COLUMN)?;
            let control = table.require(rmats::CONTROL_INCLUSION_COLUMN)?;
            let rows = canon.all_rows();
            Ok(AseSets {
                test: members(canon, &rows, FRACTION_RANGE, |r| replicate_mean(table.cell(r, test), ',')),
                control: members(canon, &rows, FRACTION_RANGE, |r| {
                    replicate_mean(table.cell(r, control), ',')
                }),
                note: None,
            })
        }
        Tool::PsiSigma => {
            let table = &canon.table;
            let test = table.require(psisigma::TEST_VALUES_COLUMN)?;
            let control = table.require(psisigma::CONTROL_VALUES_COLUMN)?;
            let rows = canon.all_rows();
            Ok(AseSets {
                test: members(canon, &rows, PERCENT_RANGE, |r| replicate_mean(table.cell(r, test), '|')),
                control: members(canon, &rows, PERCENT_RANGE, |r| {
                    replicate_mean(table.cell(r, control), '|')
                }),
                note: None,
            })
        }
        Tool::Majiq => majiq_sets(canon, labels),
        Tool::Suppa2 => match inclusion {
            Some(table) => suppa2_sets(canon, table, labels),
            None => Ok(AseSets {
                note: Some("no SUPPA2 psivec table; ASE sets left empty".to_string()),
                ..AseSets::default()
            }),
        },
    }
}

fn members<F>(canon: &CanonicalTable, rows: &[usize], range: (f64, f64), value: F) -> BTreeSet<String>
where
    F: Fn(usize) -> Option<f64>,
{
    canon
        .rows_by_uid(rows)
        .into_iter()
        .filter(|(_, rows)| {
            rows.iter()
                .any(|&r| value(r).is_some_and(|v| within(v, range.0, range.1)))
        })
        .map(|(uid, _)| uid.to_string())
        .collect()
}

fn majiq_sets(canon: &CanonicalTable, labels: &GroupLabels) -> SpliceResult<AseSets> {
    let table = &canon.table;
    let psi_cols = table.columns_containing(majiq::MEDIAN_PSI_PATTERN);
    let (test, control, note) = match labels.explicit() {
        Some((test, control)) => (
            labelled_column(table, &psi_cols, test)?,
            labelled_column(table, &psi_cols, control)?,
            None,
        ),
        None => {
            if psi_cols.len() < 2 {
                return Err(SpliceError::MissingColumn {
                    column: format!("two *{}* columns", majiq::MEDIAN_PSI_PATTERN),
                    context: table.source().to_string(),
                });
            }
            // second median_psi column is the test group
            (
                psi_cols[1],
                psi_cols[0],
                Some(format!(
                    "MAJIQ groups inferred by column order: test={} control={}",
                    table.columns()[psi_cols[1]],
                    table.columns()[psi_cols[0]]
                )),
            )
        }
    };
    let role = majiq::role_rows(canon)?;
    Ok(AseSets {
        test: members(canon, &role, FRACTION_RANGE, |r| parse_number(table.cell(r, test))),
        control: members(canon, &role, FRACTION_RANGE, |r| parse_number(table.cell(r, control))),
        note,
    })
}

fn labelled_column(table: &Table, candidates: &[usize], label: &str) -> SpliceResult<usize> {
    candidates
        .iter()
        .copied()
        .find(|&c| table.columns()[c].contains(label))
        .ok_or_else(|| SpliceError::MissingColumn {
            column: format!("*{}*{}", label, majiq::MEDIAN_PSI_PATTERN),
            context: table.source().to_string(),
        })
}

pub fn sample_group(column: &str) -> String {
    column.split('_').take(2).collect::<Vec<_>>().join("_")
}

fn suppa2_sets(canon: &CanonicalTable, psivec: &Table, labels: &GroupLabels) -> SpliceResult<AseSets> {
    let id_col = psivec.require(INDEX_COLUMN)?;
    let sample_cols: Vec<usize> = (0..psivec.columns().len()).filter(|&c| c != id_col).collect();

    let (test_cols, control_cols, note) = match labels.explicit() {
        Some((test, control)) => {
            let pick = |label: &str| -> SpliceResult<Vec<usize>> {
                let cols: Vec<usize> = sample_cols
                    .iter()
                    .copied()
                    .filter(|&c| psivec.columns()[c].contains(label))
                    .collect();
                if cols.is_empty() {
                    return Err(SpliceError::MissingColumn {
                        column: format!("*{}*", label),
                        context: psivec.source().to_string(),
                    });
                }
                Ok(cols)
            };
            (pick(test)?, pick(control)?, None)
        }
        None => {
            let mut groups: Vec<String> = Vec::new();
            for &c in &sample_cols {
                let group = sample_group(&psivec.columns()[c]);
                if !groups.contains(&group) {
                    groups.push(group);
                }
            }
            if groups.len() < 2 {
                return Err(SpliceError::MissingColumn {
                    column: "two sample groups".to_string(),
                    context: psivec.source().to_string(),
                });
            }
            let of_group = |g: &str| -> Vec<usize> {
                sample_cols
                    .iter()
                    .copied()
                    .filter(|&c| sample_group(&psivec.columns()[c]) == g)
                    .collect()
            };
            let note = format!(
                "SUPPA2 groups inferred by column order: test={} control={}",
                groups[0], groups[1]
            );
            (of_group(&groups[0]), of_group(&groups[1]), Some(note))
        }
    };

    let mut test = BTreeSet::new();
    let mut control = BTreeSet::new();
    let known: HashSet<&str> = canon.uniform_ids.iter().flatten().map(String::as_str).collect();
    for r in 0..psivec.len() {
        let native = psivec.cell(r, id_col);
        if !suppa2::is_event_of(native, canon.event) {
            continue;
        }
        let Some(uid) = suppa2::canonical_from_native(native, canon.event) else {
            continue;
        };
        if !known.contains(uid.as_str()) {
            continue;
        }
        let group_mean = |cols: &[usize]| mean_present(cols.iter().map(|&c| parse_number(psivec.cell(r, c))));
        if group_mean(&test_cols).is_some_and(|v| within(v, FRACTION_RANGE.0, FRACTION_RANGE.1)) {
            test.insert(uid.clone());
        }
        if group_mean(&control_cols).is_some_and(|v| within(v, FRACTION_RANGE.0, FRACTION_RANGE.1)) {
            control.insert(uid);
        }
    }
    Ok(AseSets { test, control, note })
}
