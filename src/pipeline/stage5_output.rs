use anyhow::Result;
use tracing::info;

use crate::ctx::{Ctx, IntegrationScope};
use crate::io::{self, json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage5Output;

impl Stage5Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Output {
    fn name(&self) -> &'static str {
        "stage5_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.scope == IntegrationScope::PerEvent {
            tsv_writer::write_dse_summary(&ctx.output.dse_summary_path(), &ctx.units)?;
            tsv_writer::write_overlap_summary(&ctx.output.overlap_summary_path(), &ctx.overlaps)?;
        }

        let report = json_writer::build_report(ctx)?;
        if ctx.write_json {
            io::write_json(&ctx.output.json_path, &report)?;
        }
        ctx.report = Some(report);

        info!(sample_dir = %ctx.output.sample_dir.display(), "stage5_output_ready");
        Ok(())
    }
}
