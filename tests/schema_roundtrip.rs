use kira_splice::schema::v1::{
    IntegrationSummary, RunMeta, RunSummaryV1, ToolMeta, UnitSummary,
};

#[test]
fn schema_roundtrip_v1() {
    let report = RunSummaryV1 {
        tool: ToolMeta {
            name: "kira-splice".to_string(),
            version: "0.0.0-test".to_string(),
        },
        run: RunMeta {
            sample: "S1".to_string(),
            input: "in".to_string(),
            output: "out".to_string(),
            gtf: None,
            novel: "exclude".to_string(),
            software: vec!["rMATS".to_string()],
            events: vec!["SE".to_string()],
        },
        units: vec![UnitSummary {
            software: "rMATS".to_string(),
            event: "SE".to_string(),
            rows: 3,
            missing_ids: 1,
            novelty: "removed 0".to_string(),
            up: 1,
            down: 0,
            uniform_ids: 2,
            dpsi_values: 2,
            test_ase: 1,
            control_ase: 0,
        }],
        failures: Vec::new(),
        integration: vec![IntegrationSummary {
            event: None,
            software: vec!["rMATS".to_string()],
            uniform_ids: 2,
            dse_by_threshold: vec![1],
        }],
        overlaps: Vec::new(),
        warnings: vec!["w".to_string()],
    };
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"up-regulate\":1"));
    assert!(json.contains("\"uniform_IDs\":2"));
    let decoded: RunSummaryV1 = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, report);
}
