use kira_splice::annotation::TranscriptLookup;
use kira_splice::canon::canonicalize;
use kira_splice::event::{EventType, Tool};
use kira_splice::novelty::{NoveltyOutcome, filter_novel};
use kira_splice::table::Table;

fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        "mem",
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect(),
    )
}

const RMATS_SE: &[&str] = &[
    "GeneID", "chr", "strand", "exonStart_0base", "exonEnd", "upstreamES", "upstreamEE",
    "downstreamES", "downstreamEE",
];

#[test]
fn rmats_rows_matching_novel_keys_are_removed() {
    let results = table(
        RMATS_SE,
        &[
            &["G1", "chr1", "+", "149", "200", "50", "100", "249", "300"],
            &["G1", "chr1", "+", "159", "200", "50", "100", "249", "300"],
        ],
    );
    let canon = canonicalize(results, Tool::Rmats, EventType::Se, None).unwrap();
    let novel = table(
        &[
            "ID", "GeneID", "chr", "strand", "exonStart_0base", "exonEnd", "upstreamES",
            "upstreamEE", "downstreamES", "downstreamEE",
        ],
        &[&["7", "G1", "chr1", "+", "159", "200", "50", "100", "249", " 300 "]],
    );

    let (kept, outcome) = filter_novel(canon, &[novel]);
    assert_eq!(outcome, NoveltyOutcome::Applied { removed: 1 });
    assert_eq!(kept.len(), 1);
    assert_eq!(kept.uid(0), Some("G1;SE:1:100-150:200-250:+"));
}

#[test]
fn rmats_without_novel_files_is_untouched() {
    let results = table(RMATS_SE, &[&["G1", "chr1", "+", "149", "200", "50", "100", "249", "300"]]);
    let canon = canonicalize(results, Tool::Rmats, EventType::Se, None).unwrap();
    let (kept, outcome) = filter_novel(canon, &[]);
    assert_eq!(outcome, NoveltyOutcome::NoAuxiliary);
    assert_eq!(kept.len(), 1);

    let results = table(RMATS_SE, &[&["G1", "chr1", "+", "149", "200", "50", "100", "249", "300"]]);
    let canon = canonicalize(results, Tool::Rmats, EventType::Se, None).unwrap();
    let unrelated = table(&["foo", "bar"], &[&["1", "2"]]);
    let (kept, outcome) = filter_novel(canon, &[unrelated]);
    assert_eq!(outcome, NoveltyOutcome::NoCommonKey);
    assert_eq!(kept.len(), 1);
}

#[test]
fn majiq_de_novo_junction_drops_whole_event() {
    let t = table(
        &[
            "event_id", "gene_id", "seqid", "strand", "junction_name", "junction_coord",
            "spliced_with", "spliced_with_coord", "denovo",
        ],
        &[
            &["ev1", "G1", "chr1", "+", "C1_A", "100-150", "A", "150-200", "False"],
            &["ev1", "G1", "chr1", "+", "C1_C2", "100-250", "C2", "250-300", "True"],
            &["ev2", "G2", "chr1", "+", "C1_A", "100-150", "A", "150-200", "False"],
            &["ev2", "G2", "chr1", "+", "C1_C2", "100-250", "C2", "250-300", "False"],
        ],
    );
    let canon = canonicalize(t, Tool::Majiq, EventType::Se, None).unwrap();
    let (kept, outcome) = filter_novel(canon, &[]);
    assert_eq!(outcome, NoveltyOutcome::Applied { removed: 2 });
    assert_eq!(kept.len(), 2);
    assert!(kept.uniform_ids.iter().all(|u| u.as_deref() == Some("G2;SE:1:100-150:200-250:+")));
}

#[test]
fn psisigma_novel_exons_are_removed() {
    let mut lookup = TranscriptLookup::default();
    lookup.insert("ENST1", "G1", "+");
    let t = table(
        &["Event Region", "Target Exon", "Event Type", "Reference Transcript"],
        &[
            &["chr1:101-249", "chr1:150-200", "SES", "ENST1.3"],
            &["chr1:101-249", "chr1:160-200", "SES", "Ex.ENST1.3"],
        ],
    );
    let canon = canonicalize(t, Tool::PsiSigma, EventType::Se, Some(&lookup)).unwrap();
    assert_eq!(canon.missing_ids(), 0);
    let (kept, outcome) = filter_novel(canon, &[]);
    assert_eq!(outcome, NoveltyOutcome::Applied { removed: 1 });
    assert_eq!(kept.uid(0), Some("G1;SE:1:100-150:200-250:+"));
}

#[test]
fn suppa2_has_no_novelty_information() {
    let t = table(&["event_id", "c_dPSI", "c_p-val"], &[&["G;SE:chr1:1-2:3-4:+", "0.1", "0.2"]]);
    let canon = canonicalize(t, Tool::Suppa2, EventType::Se, None).unwrap();
    let (_, outcome) = filter_novel(canon, &[]);
    assert_eq!(outcome, NoveltyOutcome::NotApplicable);
}

#[test]
fn psisigma_novel_exons_are_removed_without_annotation() {
    let t = table(
        &["Event Region", "Target Exon", "Event Type", "Reference Transcript", "gene_id", "strand"],
        &[
            &["chr1:101-249", "chr1:150-200", "SES", "ENST1.3", "G1", "+"],
            &["chr1:101-249", "chr1:160-200", "SES", "Ex.ENST1.3", "G1", "+"],
        ],
    );
    let canon = canonicalize(t, Tool::PsiSigma, EventType::Se, None).unwrap();
    let (kept, outcome) = filter_novel(canon, &[]);
    assert_eq!(outcome, NoveltyOutcome::Applied { removed: 1 });
    assert_eq!(kept.len(), 1);
    assert_eq!(kept.uid(0), Some("G1;SE:1:100-150:200-250:+"));
}
