use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ase::AseSets;
use crate::canon::CanonicalTable;
use crate::classify::dse_counts;
use crate::ctx::UnitResult;
use crate::event::{ClassificationRecord, DpsiRecord, EventType, Tool};
use crate::integrate::{CLASS_COLUMN, ConsensusTable, OverlapCount, UID_COLUMN};

const IO_BUF_CAPACITY: usize = 1 << 16;

pub fn unit_file(dir: &Path, tool: Tool, event: EventType, suffix: &str) -> PathBuf {
    dir.join(format!("{}.{}.{}", tool.label(), event.name(), suffix))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::with_capacity(IO_BUF_CAPACITY, file))
}

pub fn write_classifications(path: &Path, records: &[ClassificationRecord]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}\t{}", UID_COLUMN, CLASS_COLUMN)?;
    for r in records {
        writeln!(w, "{}\t{}", r.uniform_id, r.class)?;
    }
    w.flush()?;
    Ok(())
}

/// Native columns followed by `uniform_ID`; missing identifiers are empty.
pub fn write_canonical(path: &Path, canon: &CanonicalTable) -> Result<()> {
    let mut w = create(path)?;
    let table = &canon.table;
    let mut header = table.columns().to_vec();
    header.push(UID_COLUMN.to_string());
    writeln!(w, "{}", header.join("\t"))?;
    for r in 0..table.len() {
        writeln!(w, "{}\t{}", table.row(r).join("\t"), canon.uid(r).unwrap_or(""))?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_dpsi(path: &Path, records: &[DpsiRecord]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}\tvalue", UID_COLUMN)?;
    for r in records {
        match r.value {
            Some(v) => writeln!(w, "{}\t{:.6}", r.uniform_id, v)?,
            None => writeln!(w, "{}\tNA", r.uniform_id)?,
        }
    }
    w.flush()?;
    Ok(())
}

pub fn write_ase(path: &Path, sets: &AseSets) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "{}\tgroup", UID_COLUMN)?;
    for uid in &sets.test {
        writeln!(w, "{}\ttest", uid)?;
    }
    for uid in &sets.control {
        writeln!(w, "{}\tcontrol", uid)?;
    }
    w.flush()?;
    Ok(())
}

/// Consensus table at support threshold `n`: one column per tool (empty when
/// the tool did not report the event), then `sum` and `class`.
pub fn write_consensus(path: &Path, table: &ConsensusTable, n: usize) -> Result<()> {
    let mut w = create(path)?;
    let tools: Vec<&str> = table.tools.iter().map(|t| t.label()).collect();
    writeln!(w, "{}\t{}\tsum\t{}", UID_COLUMN, tools.join("\t"), CLASS_COLUMN)?;
    for row in &table.rows {
        let calls: Vec<&str> = row
            .calls
            .iter()
            .map(|c| c.map(|c| c.as_str()).unwrap_or("NA"))
            .collect();
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            row.uniform_id,
            calls.join("\t"),
            row.support,
            row.class_at(n)
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_dse_summary(path: &Path, units: &[UnitResult]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "event\tsoftware\tup-regulate\tdown-regulate\tuniform_IDs")?;
    for unit in units {
        let (up, down) = dse_counts(&unit.classifications);
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            unit.event,
            unit.tool,
            up,
            down,
            unit.classifications.len()
        )?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_overlap_summary(path: &Path, overlaps: &[OverlapCount]) -> Result<()> {
    let mut w = create(path)?;
    writeln!(w, "event\tset\tnon_empty_sets\tdrawable")?;
    for o in overlaps {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            o.event,
            o.kind.as_str(),
            o.non_empty,
            o.drawable()
        )?;
    }
    w.flush()?;
    Ok(())
}
