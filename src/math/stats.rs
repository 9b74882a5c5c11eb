//! Small numeric helpers over tool-native value strings.

use crate::table::parse_number;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().collect();
    mean(&present)
}

/// Parses a per-replicate vector such as `0.1,0.2,NA` or `10.5|na|12`,
/// dropping sentinel and unparsable entries.
pub fn parse_replicates(raw: &str, sep: char) -> Vec<f64> {
    raw.split(sep).filter_map(parse_number).collect()
}

pub fn replicate_mean(raw: &str, sep: char) -> Option<f64> {
    mean(&parse_replicates(raw, sep))
}

pub fn within(value: f64, lo: f64, hi: f64) -> bool {
    value >= lo && value <= hi
}
