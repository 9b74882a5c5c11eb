use assert_cmd::Command;

fn stdout_of(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("kira-splice").unwrap();
    cmd.arg("validate").args(args);
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn validate_command_lists_pairs() {
    let out = stdout_of(&["--software", "rmats", "majiq", "--event", "SE", "AF"]);
    assert!(out.starts_with("kira-splice validate ok"));
    assert!(out.contains("rMATS\tSE\tsupported"));
    assert!(out.contains("rMATS\tAF\tunsupported"));
    assert!(out.contains("MAJIQ\tAF\tsupported"));
    assert!(out.contains("warnings:"));
}

#[test]
fn validate_defaults_to_every_event() {
    let out = stdout_of(&["--software", "suppa2"]);
    for ev in ["SE", "A3SS", "A5SS", "AF", "AL", "RI", "MX"] {
        assert!(out.contains(&format!("SUPPA2\t{}\tsupported", ev)));
    }
    assert!(!out.contains("warnings:"));
}

#[test]
fn validate_rejects_unknown_names() {
    let mut cmd = Command::cargo_bin("kira-splice").unwrap();
    cmd.args(["validate", "--software", "whippet"]);
    cmd.assert().failure();

    let mut cmd = Command::cargo_bin("kira-splice").unwrap();
    cmd.args(["validate", "--software", "rmats", "--event", "XX"]);
    cmd.assert().failure();
}
