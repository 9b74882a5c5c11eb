use anyhow::{Result, bail};
use tracing::info;

use crate::ase::AseSets;
use crate::ctx::{Ctx, UnitResult};
use crate::input::tool_sample_dir;
use crate::integrate::read_classifications;
use crate::io::tsv_writer::unit_file;
use crate::novelty::NoveltyOutcome;
use crate::pipeline::Stage;

/// Reads the `{Tool}.{EV}.uid.txt` tables a previous `unify` run wrote.
/// Missing tables are skipped with a warning.
pub struct Stage3Collect;

impl Stage3Collect {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Collect {
    fn name(&self) -> &'static str {
        "stage3_collect"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let mut units = Vec::new();
        let mut skipped = Vec::new();
        for &(tool, event) in &ctx.plan {
            let dir = tool_sample_dir(&ctx.input, tool, &ctx.sample);
            let path = unit_file(&dir, tool, event, "uid.txt");
            if !path.is_file() {
                skipped.push(format!("file not found: {}", path.display()));
                continue;
            }
            let classifications = read_classifications(&path)?;
            units.push(UnitResult {
                tool,
                event,
                rows: classifications.len(),
                missing_ids: 0,
                novelty: NoveltyOutcome::NotApplicable,
                classifications,
                dpsi: Vec::new(),
                ase: AseSets::default(),
            });
        }
        for message in skipped {
            ctx.warn(message);
        }
        if units.is_empty() {
            bail!("no classification tables found under {}", ctx.input.display());
        }
        info!(tables = units.len(), "classification_tables_loaded");
        ctx.units = units;
        Ok(())
    }
}
