use anyhow::{Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

/// Expands the requested software and event lists into (tool, event) units,
/// skipping pairs a tool does not report.
pub struct Stage1Resolve;

impl Stage1Resolve {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Resolve {
    fn name(&self) -> &'static str {
        "stage1_resolve"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let mut plan = Vec::new();
        let mut skipped = Vec::new();
        for &event in &ctx.events {
            for &tool in &ctx.tools {
                if tool.supports(event) {
                    plan.push((tool, event));
                } else {
                    skipped.push(format!("{} does not report {} events; skipped", tool, event));
                }
            }
        }
        for message in skipped {
            ctx.warn(message);
        }
        if plan.is_empty() {
            bail!("no supported (software, event) pairs requested");
        }
        info!(units = plan.len(), "units_planned");
        ctx.plan = plan;
        Ok(())
    }
}
