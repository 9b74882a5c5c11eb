use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const SHARED_UID: &str = "ENSG00000001;SE:1:100-150:200-250:+";

fn write_inputs(root: &Path) {
    let rmats = root.join("rMATS").join("S1");
    fs::create_dir_all(&rmats).unwrap();
    fs::write(
        rmats.join("SE.MATS.JCEC.txt"),
        "ID\tGeneID\tgeneSymbol\tchr\tstrand\texonStart_0base\texonEnd\tupstreamES\tupstreamEE\tdownstreamES\tdownstreamEE\tPValue\tFDR\tIncLevel1\tIncLevel2\tIncLevelDifference\n\
         1\t\"ENSG00000001\"\t\"A\"\tchr1\t+\t149\t200\t50\t100\t249\t300\t0.0001\t0.001\t0.5,0.6\t0.1,0.2\t0.4\n\
         2\t\"ENSG00000002\"\t\"B\"\tchr2\t-\t499\t600\t300\t400\t699\t800\t0.5\t0.6\t0.99,1.0\t0.98,1.0\t0.01\n",
    )
    .unwrap();

    let suppa2 = root.join("SUPPA2").join("S1");
    fs::create_dir_all(&suppa2).unwrap();
    fs::write(
        suppa2.join("S1.dpsi"),
        "tumor-normal_dPSI\ttumor-normal_p-val\n\
         ENSG00000001;SE:chr1:100-150:200-250:+\t0.35\t0.001\n\
         ENSG00000003;SE:chr3:10-20:30-40:+\t-0.2\t0.01\n",
    )
    .unwrap();
    fs::write(
        suppa2.join("S1_events.psivec"),
        "S1_tumor_r1\tS1_normal_r1\n\
         ENSG00000001;SE:chr1:100-150:200-250:+\t0.5\t0.97\n\
         ENSG00000003;SE:chr3:10-20:30-40:+\t0.2\t0.4\n",
    )
    .unwrap();
}

fn unify(input: &Path, out: &Path, extra: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("kira-splice").unwrap();
    cmd.args(["unify", "--software", "rmats", "suppa2", "--event", "SE"])
        .arg("--input")
        .arg(input)
        .arg("--output")
        .arg(out)
        .args(["--sample-name", "S1", "--json"])
        .args(extra);
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn unify_writes_per_tool_tables() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    unify(input.path(), out.path(), &[]);

    let unit_dir = out.path().join("rMATS").join("S1");
    let uid = fs::read_to_string(unit_dir.join("rMATS.SE.uid.txt")).unwrap();
    assert_eq!(
        uid,
        format!(
            "uniform_ID\tclass\n{}\tup-regulate\nENSG00000002;SE:2:400-500:600-700:-\tnon-DSE\n",
            SHARED_UID
        )
    );

    let dpsi = fs::read_to_string(unit_dir.join("rMATS.SE.dpsi.tsv")).unwrap();
    assert!(dpsi.contains(&format!("{}\t0.400000", SHARED_UID)));

    let ase = fs::read_to_string(unit_dir.join("rMATS.SE.ase.tsv")).unwrap();
    assert!(ase.contains(&format!("{}\ttest", SHARED_UID)));
    assert!(ase.contains(&format!("{}\tcontrol", SHARED_UID)));

    let canonical = fs::read_to_string(unit_dir.join("rMATS.SE.canonical.tsv")).unwrap();
    assert!(canonical.lines().next().unwrap().ends_with("\tuniform_ID"));

    let suppa2_ase = fs::read_to_string(out.path().join("SUPPA2/S1/SUPPA2.SE.ase.tsv")).unwrap();
    assert!(suppa2_ase.contains("ENSG00000003;SE:3:10-20:30-40:+\tcontrol"));
}

#[test]
fn unify_integrates_per_event() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    let stdout = unify(input.path(), out.path(), &[]);
    assert!(stdout.contains("Consensus SE: 1/2=2 2/2=1"));

    let dir = out.path().join("S1").join("integration").join("SE");
    let strict = fs::read_to_string(dir.join("integration_2of2.txt")).unwrap();
    let lines: Vec<&str> = strict.lines().collect();
    assert_eq!(lines[0], "uniform_ID\trMATS\tSUPPA2\tsum\tclass");
    assert!(lines.contains(&format!("{}\tDSE\tDSE\t2\tDSE", SHARED_UID).as_str()));
    assert!(lines.contains(&"ENSG00000003;SE:3:10-20:30-40:+\tNA\tDSE\t1\tnon-DSE"));
    assert!(dir.join("integration_1of2.txt").is_file());

    let summary = fs::read_to_string(out.path().join("S1").join("dse_summary.tsv")).unwrap();
    assert_eq!(
        summary,
        "event\tsoftware\tup-regulate\tdown-regulate\tuniform_IDs\nSE\trMATS\t1\t0\t2\nSE\tSUPPA2\t1\t1\t2\n"
    );
    let overlap = fs::read_to_string(out.path().join("S1").join("overlap_summary.tsv")).unwrap();
    assert!(overlap.contains("SE\tDSE\t2\ttrue"));
}

#[test]
fn unify_summary_json_fields_exist() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());
    unify(input.path(), out.path(), &[]);

    let v: Value =
        serde_json::from_slice(&fs::read(out.path().join("S1").join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(v["tool"]["name"], "kira-splice");
    assert!(v["tool"]["version"].is_string());
    assert_eq!(v["run"]["sample"], "S1");
    assert_eq!(v["run"]["novel"], "exclude");
    assert_eq!(v["units"].as_array().unwrap().len(), 2);
    assert_eq!(v["units"][0]["software"], "rMATS");
    assert_eq!(v["units"][0]["up-regulate"], 1);
    assert_eq!(v["units"][0]["novelty"], "no novel-event file");
    assert_eq!(v["integration"][0]["event"], "SE");
    assert_eq!(v["integration"][0]["dse_by_threshold"], serde_json::json!([2, 1]));
    assert!(v["failures"].as_array().unwrap().is_empty());
}

#[test]
fn failing_unit_does_not_abort_siblings() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_inputs(input.path());

    let mut cmd = Command::cargo_bin("kira-splice").unwrap();
    cmd.args(["unify", "--software", "rmats", "majiq", "--event", "SE"])
        .arg("--input")
        .arg(input.path())
        .arg("--output")
        .arg(out.path())
        .args(["--sample-name", "S1"]);
    let stdout = String::from_utf8(cmd.assert().success().get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("FAILED SE MAJIQ"));
    assert!(out.path().join("rMATS/S1/rMATS.SE.uid.txt").is_file());

    let mut cmd = Command::cargo_bin("kira-splice").unwrap();
    cmd.args(["unify", "--software", "rmats", "majiq", "--event", "SE", "--fail-fast"])
        .arg("--input")
        .arg(input.path())
        .arg("--output")
        .arg(out.path())
        .args(["--sample-name", "S1"]);
    cmd.assert().failure();
}

#[test]
fn integrate_pools_previous_unify_run() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let pooled = TempDir::new().unwrap();
    write_inputs(input.path());
    unify(input.path(), out.path(), &[]);

    let mut cmd = Command::cargo_bin("kira-splice").unwrap();
    cmd.args(["integrate", "--software", "rmats", "suppa2", "--event", "SE", "A3SS"])
        .arg("--input")
        .arg(out.path())
        .arg("--output")
        .arg(pooled.path())
        .args(["--sample-name", "S1"]);
    let stdout = String::from_utf8(cmd.assert().success().get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("warnings:"));
    assert!(stdout.contains("rMATS.A3SS.uid.txt"));

    let sample_dir = pooled.path().join("S1");
    let loose = fs::read_to_string(sample_dir.join("integration_1of2.txt")).unwrap();
    assert_eq!(loose.lines().count(), 4);
    let strict = fs::read_to_string(sample_dir.join("integration_2of2.txt")).unwrap();
    assert!(strict.contains(&format!("{}\tDSE\tDSE\t2\tDSE", SHARED_UID)));
}

#[test]
fn unify_outputs_are_deterministic() {
    let input = TempDir::new().unwrap();
    write_inputs(input.path());
    let out1 = TempDir::new().unwrap();
    let out2 = TempDir::new().unwrap();
    unify(input.path(), out1.path(), &["--threads", "1"]);
    unify(input.path(), out2.path(), &["--threads", "4"]);

    for name in [
        "rMATS/S1/rMATS.SE.uid.txt",
        "SUPPA2/S1/SUPPA2.SE.uid.txt",
        "S1/integration/SE/integration_1of2.txt",
        "S1/dse_summary.tsv",
    ] {
        let a = fs::read(out1.path().join(name)).unwrap();
        let b = fs::read(out2.path().join(name)).unwrap();
        assert_eq!(a, b, "mismatch in {}", name);
    }
}
