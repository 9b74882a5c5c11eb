use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::{Ctx, IntegrationScope};
use crate::event::{ClassificationRecord, EventType, Tool};
use crate::integrate::{ConsensusTable, SetKind, integration_file_name, overlap_count};
use crate::io::tsv_writer;
use crate::pipeline::Stage;

pub struct Stage4Integrate;

impl Stage4Integrate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Integrate {
    fn name(&self) -> &'static str {
        "stage4_integrate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        match ctx.scope {
            IntegrationScope::PerEvent => {
                for event in ctx.events.clone() {
                    let inputs: Vec<(Tool, Vec<ClassificationRecord>)> = ctx
                        .units_for(event)
                        .map(|u| (u.tool, u.classifications.clone()))
                        .collect();
                    if inputs.is_empty() {
                        continue;
                    }
                    let table = ConsensusTable::build(&inputs);
                    write_thresholds(ctx, Some(event), &table)?;
                    record_overlaps(ctx, event);
                    ctx.consensus.insert(Some(event), table);
                }
            }
            IntegrationScope::Pooled => {
                let inputs: Vec<(Tool, Vec<ClassificationRecord>)> = ctx
                    .tools
                    .iter()
                    .filter_map(|&tool| {
                        let records: Vec<ClassificationRecord> = ctx
                            .units
                            .iter()
                            .filter(|u| u.tool == tool)
                            .flat_map(|u| u.classifications.iter().cloned())
                            .collect();
                        (!records.is_empty()).then_some((tool, records))
                    })
                    .collect();
                let table = ConsensusTable::build(&inputs);
                write_thresholds(ctx, None, &table)?;
                ctx.consensus.insert(None, table);
            }
        }
        Ok(())
    }
}

fn write_thresholds(ctx: &Ctx, event: Option<EventType>, table: &ConsensusTable) -> Result<()> {
    let dir = ctx.output.integration_dir(event);
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for n in table.thresholds() {
        let path = dir.join(integration_file_name(n, table.num_tools()));
        tsv_writer::write_consensus(&path, table, n)?;
    }
    info!(
        event = event.map(|e| e.name()).unwrap_or("all"),
        software = table.num_tools(),
        uniform_ids = table.len(),
        "integration_written"
    );
    Ok(())
}

fn record_overlaps(ctx: &mut Ctx, event: EventType) {
    let mut counts = Vec::with_capacity(SetKind::ALL.len());
    for kind in SetKind::ALL {
        let sizes: Vec<usize> = ctx
            .units_for(event)
            .map(|u| match kind {
                SetKind::Dse => u.classifications.iter().filter(|r| r.class.is_dse()).count(),
                SetKind::TestAse => u.ase.test.len(),
                SetKind::ControlAse => u.ase.control.len(),
            })
            .collect();
        counts.push(overlap_count(event, kind, sizes));
    }
    for count in counts {
        if !count.drawable() {
            ctx.warn(format!(
                "{} {}: fewer than 2 non-empty sets ({}); overlap skipped",
                event,
                count.kind.as_str(),
                count.non_empty
            ));
        }
        ctx.overlaps.push(count);
    }
}
