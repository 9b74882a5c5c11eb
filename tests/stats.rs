use kira_splice::math::stats::{mean, mean_present, parse_replicates, replicate_mean, within};

#[test]
fn mean_basic() {
    assert_eq!(mean(&[]), None);
    let m = mean(&[1.0, 2.0, 6.0]).unwrap();
    assert!((m - 3.0).abs() < 1e-12);
}

#[test]
fn mean_present_skips_missing() {
    let m = mean_present([Some(1.0), None, Some(3.0)]).unwrap();
    assert!((m - 2.0).abs() < 1e-12);
    assert_eq!(mean_present([None, None]), None);
}

#[test]
fn replicate_vectors() {
    assert_eq!(parse_replicates("0.1,NA,0.3", ','), vec![0.1, 0.3]);
    assert_eq!(parse_replicates("10.5|na|12", '|'), vec![10.5, 12.0]);
    assert_eq!(replicate_mean("NA,NA", ','), None);
    let m = replicate_mean("40|60", '|').unwrap();
    assert!((m - 50.0).abs() < 1e-12);
}

#[test]
fn within_is_inclusive() {
    assert!(within(0.05, 0.05, 0.95));
    assert!(within(0.95, 0.05, 0.95));
    assert!(!within(0.049, 0.05, 0.95));
    assert!(!within(0.951, 0.05, 0.95));
}
