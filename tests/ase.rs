use kira_splice::ase::{GroupLabels, extract_ase, sample_group};
use kira_splice::canon::canonicalize;
use kira_splice::event::{EventType, Tool};
use kira_splice::table::Table;

fn table(columns: &[&str], rows: &[Vec<String>]) -> Table {
    Table::new(
        "mem",
        columns.iter().map(|c| c.to_string()).collect(),
        rows.to_vec(),
    )
}

fn rmats_with_inclusion(levels: &[(&str, &str)]) -> Table {
    let rows: Vec<Vec<String>> = levels
        .iter()
        .enumerate()
        .map(|(i, &(test, control))| {
            let exon_start = (140 + i).to_string();
            ["ENSG1", "chr1", "+", exon_start.as_str(), "200", "100", "249", test, control]
                .iter()
                .map(|v| v.to_string())
                .collect()
        })
        .collect();
    table(
        &[
            "GeneID", "chr", "strand", "exonStart_0base", "exonEnd", "upstreamEE", "downstreamES",
            "IncLevel1", "IncLevel2",
        ],
        &rows,
    )
}

#[test]
fn inclusion_bounds_are_inclusive() {
    let t = rmats_with_inclusion(&[
        ("0.05", "1.0"),
        ("0.95", "1.0"),
        ("0.049", "1.0"),
        ("0.951", "1.0"),
    ]);
    let canon = canonicalize(t, Tool::Rmats, EventType::Se, None).unwrap();
    let sets = extract_ase(&canon, &GroupLabels::default(), None).unwrap();
    let expected: Vec<&str> = vec![
        "ENSG1;SE:1:100-141:200-250:+",
        "ENSG1;SE:1:100-142:200-250:+",
    ];
    assert_eq!(sets.test.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    assert!(sets.control.is_empty());
}

#[test]
fn replicates_are_averaged() {
    let t = rmats_with_inclusion(&[("0.0,0.2,NA", "0.8,0.9")]);
    let canon = canonicalize(t, Tool::Rmats, EventType::Se, None).unwrap();
    let sets = extract_ase(&canon, &GroupLabels::default(), None).unwrap();
    assert_eq!(sets.test.len(), 1);
    assert!(sets.control.contains("ENSG1;SE:1:100-141:200-250:+"));
}

#[test]
fn suppa2_groups_follow_column_order_without_labels() {
    let dpsi = table(
        &["event_id", "c1-c2_dPSI", "c1-c2_p-val"],
        &[
            vec!["G1;SE:chr1:10-20:30-40:+".into(), "0.3".into(), "0.01".into()],
            vec!["G2;SE:chr1:10-20:30-40:+".into(), "0.3".into(), "0.01".into()],
        ],
    );
    let canon = canonicalize(dpsi, Tool::Suppa2, EventType::Se, None).unwrap();
    let psivec = table(
        &["event_id", "S_tumor_r1", "S_tumor_r2", "S_normal_r1", "S_normal_r2"],
        &[
            ["G1;SE:chr1:10-20:30-40:+", "0.5", "0.6", "0.99", "1.0"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            ["G2;SE:chr1:10-20:30-40:+", "0.0", "0.0", "0.4", "nan"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
            ["G3;SE:chr1:10-20:30-40:+", "0.5", "0.5", "0.5", "0.5"]
                .iter()
                .map(|v| v.to_string())
                .collect(),
        ],
    );
    let sets = extract_ase(&canon, &GroupLabels::default(), Some(&psivec)).unwrap();
    assert!(sets.test.contains("G1;SE:1:10-20:30-40:+"));
    assert!(!sets.test.contains("G2;SE:1:10-20:30-40:+"));
    assert!(sets.control.contains("G2;SE:1:10-20:30-40:+"));
    // G3 is absent from the differential table
    assert_eq!(sets.test.len(), 1);
    assert!(sets.note.unwrap().contains("test=S_tumor"));

    let labelled = GroupLabels::new(Some("normal".into()), Some("tumor".into()));
    let sets = extract_ase(&canon, &labelled, Some(&psivec)).unwrap();
    assert!(sets.note.is_none());
    assert!(sets.test.contains("G2;SE:1:10-20:30-40:+"));
    assert!(sets.control.contains("G1;SE:1:10-20:30-40:+"));
}

#[test]
fn suppa2_without_psivec_leaves_sets_empty() {
    let dpsi = table(
        &["event_id", "c1-c2_dPSI", "c1-c2_p-val"],
        &[vec!["G1;SE:chr1:10-20:30-40:+".into(), "0.3".into(), "0.01".into()]],
    );
    let canon = canonicalize(dpsi, Tool::Suppa2, EventType::Se, None).unwrap();
    let sets = extract_ase(&canon, &GroupLabels::default(), None).unwrap();
    assert!(sets.test.is_empty() && sets.control.is_empty());
    assert!(sets.note.is_some());
}

#[test]
fn sample_group_takes_two_fields() {
    assert_eq!(sample_group("S_tumor_r1"), "S_tumor");
    assert_eq!(sample_group("tumor"), "tumor");
}

fn majiq_se_psi() -> Table {
    let rows: Vec<Vec<String>> = [
        ["ev1", "G", "chr1", "+", "C1_A", "100-150", "A", "150-200", "0.99", "0.5"],
        ["ev1", "G", "chr1", "+", "C1_C2", "100-250", "C2", "250-300", "0.5", "0.99"],
    ]
    .iter()
    .map(|r| r.iter().map(|v| v.to_string()).collect())
    .collect();
    table(
        &[
            "event_id", "gene_id", "seqid", "strand", "junction_name", "junction_coord",
            "spliced_with", "spliced_with_coord", "ctl_median_psi", "trt_median_psi",
        ],
        &rows,
    )
}

#[test]
fn majiq_groups_follow_column_order_on_role_rows() {
    let canon = canonicalize(majiq_se_psi(), Tool::Majiq, EventType::Se, None).unwrap();
    let sets = extract_ase(&canon, &GroupLabels::default(), None).unwrap();
    assert!(sets.test.contains("G;SE:1:100-150:200-250:+"));
    assert!(sets.control.is_empty());
    assert!(sets.note.unwrap().contains("test=trt_median_psi"));

    let labelled = GroupLabels::new(Some("ctl".into()), Some("trt".into()));
    let sets = extract_ase(&canon, &labelled, None).unwrap();
    assert!(sets.note.is_none());
    assert!(sets.test.is_empty());
    assert!(sets.control.contains("G;SE:1:100-150:200-250:+"));
}
