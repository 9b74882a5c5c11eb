use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::annotation::TranscriptLookup;
use crate::ase::{GroupLabels, extract_ase};
use crate::canon::canonicalize;
use crate::classify::classify;
use crate::ctx::{Ctx, NovelMode, OutputPaths, UnitFailure, UnitResult};
use crate::dpsi::extract_dpsi;
use crate::event::{EventType, Tool};
use crate::input;
use crate::io::tsv_writer;
use crate::novelty::{NoveltyOutcome, filter_novel};
use crate::pipeline::Stage;

pub struct Stage3Units;

impl Stage3Units {
    pub fn new() -> Self {
        Self
    }
}

struct UnitJob<'a> {
    input: &'a Path,
    sample: &'a str,
    output: &'a OutputPaths,
    lookup: Option<&'a TranscriptLookup>,
    novel: NovelMode,
    labels: &'a GroupLabels,
}

impl Stage for Stage3Units {
    fn name(&self) -> &'static str {
        "stage3_units"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let job = UnitJob {
            input: &ctx.input,
            sample: &ctx.sample,
            output: &ctx.output,
            lookup: ctx.lookup.as_ref(),
            novel: ctx.novel,
            labels: &ctx.labels,
        };

        #[cfg(feature = "mt")]
        let outcomes: Vec<((Tool, EventType), Result<UnitResult>)> = {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(ctx.threads)
                .build()
                .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
            pool.install(|| {
                ctx.plan
                    .par_iter()
                    .map(|&(tool, event)| ((tool, event), run_unit(&job, tool, event)))
                    .collect()
            })
        };
        #[cfg(not(feature = "mt"))]
        let outcomes: Vec<((Tool, EventType), Result<UnitResult>)> = ctx
            .plan
            .iter()
            .map(|&(tool, event)| ((tool, event), run_unit(&job, tool, event)))
            .collect();

        let mut units = Vec::new();
        let mut failures = Vec::new();
        let mut notes = Vec::new();
        for ((tool, event), outcome) in outcomes {
            match outcome {
                Ok(unit) => {
                    if unit.novelty == NoveltyOutcome::NoCommonKey {
                        notes.push(format!(
                            "{} {}: no common key columns with novel events; filter skipped",
                            tool, event
                        ));
                    }
                    if let Some(note) = &unit.ase.note {
                        notes.push(format!("{} {}: {}", tool, event, note));
                    }
                    units.push(unit);
                }
                Err(err) => {
                    if ctx.fail_fast {
                        return Err(err.context(format!("unit {} {} failed", tool, event)));
                    }
                    warn!(tool = %tool, event = %event, error = %format!("{:#}", err), "unit_failed");
                    failures.push(UnitFailure {
                        tool,
                        event,
                        error: format!("{:#}", err),
                    });
                }
            }
        }
        for note in notes {
            ctx.warn(note);
        }
        info!(ok = units.len(), failed = failures.len(), "units_finished");
        ctx.units = units;
        ctx.failures = failures;
        if ctx.units.is_empty() {
            bail!("every unit failed; nothing to integrate");
        }
        Ok(())
    }
}

fn run_unit(job: &UnitJob<'_>, tool: Tool, event: EventType) -> Result<UnitResult> {
    let inputs = input::resolve_unit(job.input, job.sample, tool, event)?;
    let table = input::load_primary(&inputs)?;
    let canon = canonicalize(table, tool, event, job.lookup)?;
    let rows = canon.len();
    let missing_ids = canon.missing_ids();

    let (canon, novelty) = match job.novel {
        NovelMode::Exclude => {
            let auxiliary = input::load_novelty(&inputs)?;
            filter_novel(canon, &auxiliary)
        }
        NovelMode::Include => (canon, NoveltyOutcome::Disabled),
    };

    let classifications = classify(&canon)?;
    let dpsi = extract_dpsi(&canon)?;
    let inclusion = input::load_inclusion(&inputs)?;
    let ase = extract_ase(&canon, job.labels, inclusion.as_ref())?;

    let dir = job.output.unit_dir(tool, job.sample);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    tsv_writer::write_classifications(&tsv_writer::unit_file(&dir, tool, event, "uid.txt"), &classifications)?;
    tsv_writer::write_canonical(&tsv_writer::unit_file(&dir, tool, event, "canonical.tsv"), &canon)?;
    tsv_writer::write_dpsi(&tsv_writer::unit_file(&dir, tool, event, "dpsi.tsv"), &dpsi)?;
    tsv_writer::write_ase(&tsv_writer::unit_file(&dir, tool, event, "ase.tsv"), &ase)?;

    info!(
        tool = %tool,
        event = %event,
        rows,
        missing_ids,
        uniform_ids = classifications.len(),
        novelty = %novelty,
        "unit_done"
    );
    Ok(UnitResult {
        tool,
        event,
        rows,
        missing_ids,
        novelty,
        classifications,
        dpsi,
        ase,
    })
}
