use std::fmt::Write;

use crate::classify::dse_counts;
use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "kira-splice v{}", ctx.version);
    let _ = writeln!(
        out,
        "Sample: {}, units={}, failed={}, novel={}",
        ctx.sample,
        ctx.units.len(),
        ctx.failures.len(),
        ctx.novel.as_str()
    );
    for unit in &ctx.units {
        let (up, down) = dse_counts(&unit.classifications);
        let _ = writeln!(
            out,
            "{}\t{}\tids={}\tup={}\tdown={}\tmissing_ids={}\tnovel: {}",
            unit.event,
            unit.tool,
            unit.classifications.len(),
            up,
            down,
            unit.missing_ids,
            unit.novelty
        );
    }
    for (event, table) in &ctx.consensus {
        let label = event.map(|e| e.name()).unwrap_or("all");
        let counts: Vec<String> = table
            .thresholds()
            .map(|n| format!("{}/{}={}", n, table.num_tools(), table.dse_at(n).len()))
            .collect();
        let _ = writeln!(out, "Consensus {}: {}", label, counts.join(" "));
    }
    for failure in &ctx.failures {
        let _ = writeln!(out, "FAILED {} {}: {}", failure.event, failure.tool, failure.error);
    }
    out
}
