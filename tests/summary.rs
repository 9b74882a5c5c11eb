use std::path::PathBuf;

use kira_splice::ase::AseSets;
use kira_splice::ctx::{Ctx, UnitFailure, UnitResult};
use kira_splice::event::{ClassificationRecord, DseClass, EventType, Tool};
use kira_splice::integrate::ConsensusTable;
use kira_splice::io::summary::format_summary;
use kira_splice::novelty::NoveltyOutcome;

fn sample_ctx() -> Ctx {
    let mut ctx = Ctx::new(
        PathBuf::from("input"),
        PathBuf::from("out"),
        "S1".to_string(),
        vec![Tool::Rmats, Tool::Majiq],
        vec![EventType::Se],
        "0.0.0-test",
    );
    let classifications = vec![
        ClassificationRecord {
            uniform_id: "a".to_string(),
            class: DseClass::Up,
        },
        ClassificationRecord {
            uniform_id: "b".to_string(),
            class: DseClass::NonDse,
        },
    ];
    ctx.units.push(UnitResult {
        tool: Tool::Rmats,
        event: EventType::Se,
        rows: 3,
        missing_ids: 1,
        novelty: NoveltyOutcome::Applied { removed: 1 },
        classifications: classifications.clone(),
        dpsi: Vec::new(),
        ase: AseSets::default(),
    });
    ctx.failures.push(UnitFailure {
        tool: Tool::Majiq,
        event: EventType::Se,
        error: "input not found: cassette.tsv".to_string(),
    });
    ctx.consensus.insert(
        Some(EventType::Se),
        ConsensusTable::build(&[(Tool::Rmats, classifications)]),
    );
    ctx
}

#[test]
fn summary_format() {
    let s = format_summary(&sample_ctx());
    assert!(s.contains("kira-splice v0.0.0-test"));
    assert!(s.contains("Sample: S1, units=1, failed=1, novel=exclude"));
    assert!(s.contains("SE\trMATS\tids=2\tup=1\tdown=0\tmissing_ids=1\tnovel: removed 1"));
    assert!(s.contains("Consensus SE: 1/1=1"));
    assert!(s.contains("FAILED SE MAJIQ: input not found"));
}
