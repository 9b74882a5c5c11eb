use anyhow::Result;

use crate::classify::dse_counts;
use crate::ctx::Ctx;
use crate::schema::v1::{
    IntegrationSummary, OverlapSummary, RunMeta, RunSummaryV1, ToolMeta, UnitFailureSummary,
    UnitSummary,
};

pub fn build_report(ctx: &Ctx) -> Result<RunSummaryV1> {
    let units = ctx
        .units
        .iter()
        .map(|u| {
            let (up, down) = dse_counts(&u.classifications);
            UnitSummary {
                software: u.tool.label().to_string(),
                event: u.event.name().to_string(),
                rows: u.rows,
                missing_ids: u.missing_ids,
                novelty: u.novelty.to_string(),
                up,
                down,
                uniform_ids: u.classifications.len(),
                dpsi_values: u.dpsi.iter().filter(|d| d.value.is_some()).count(),
                test_ase: u.ase.test.len(),
                control_ase: u.ase.control.len(),
            }
        })
        .collect();

    let failures = ctx
        .failures
        .iter()
        .map(|f| UnitFailureSummary {
            software: f.tool.label().to_string(),
            event: f.event.name().to_string(),
            error: f.error.clone(),
        })
        .collect();

    let integration = ctx
        .consensus
        .iter()
        .map(|(event, table)| IntegrationSummary {
            event: event.map(|e| e.name().to_string()),
            software: table.tools.iter().map(|t| t.label().to_string()).collect(),
            uniform_ids: table.len(),
            dse_by_threshold: table.thresholds().map(|n| table.dse_at(n).len()).collect(),
        })
        .collect();

    let overlaps = ctx
        .overlaps
        .iter()
        .map(|o| OverlapSummary {
            event: o.event.name().to_string(),
            set: o.kind.as_str().to_string(),
            non_empty_sets: o.non_empty,
            drawable: o.drawable(),
        })
        .collect();

    Ok(RunSummaryV1 {
        tool: ToolMeta {
            name: "kira-splice".to_string(),
            version: ctx.version.clone(),
        },
        run: RunMeta {
            sample: ctx.sample.clone(),
            input: ctx.input.display().to_string(),
            output: ctx.output.out_dir.display().to_string(),
            gtf: ctx.gtf.as_ref().map(|p| p.display().to_string()),
            novel: ctx.novel.as_str().to_string(),
            software: ctx.tools.iter().map(|t| t.label().to_string()).collect(),
            events: ctx.events.iter().map(|e| e.name().to_string()).collect(),
        },
        units,
        failures,
        integration,
        overlaps,
        warnings: ctx.warnings.clone(),
    })
}
