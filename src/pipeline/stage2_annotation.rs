use anyhow::Result;

use crate::annotation::TranscriptLookup;
use crate::ctx::Ctx;
use crate::event::Tool;
use crate::pipeline::Stage;

/// Loads the transcript lookup PSI-Sigma needs for gene and strand.
pub struct Stage2Annotation;

impl Stage2Annotation {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Annotation {
    fn name(&self) -> &'static str {
        "stage2_annotation"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.plan.iter().any(|(tool, _)| *tool == Tool::PsiSigma) {
            return Ok(());
        }
        match ctx.gtf.clone() {
            Some(path) => ctx.lookup = Some(TranscriptLookup::from_gtf(&path)?),
            None => ctx.warn(
                "no --gtf given; PSI-Sigma tables must already carry gene_id and strand columns",
            ),
        }
        Ok(())
    }
}
