//! Percentiles with linear interpolation between closest ranks

/// Computes each percentile in `percents` (0..=100) of `values`
///
/// Sorts `values` in place. Returns an empty vector for empty input.
pub fn percentiles(values: &mut [f64], percents: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    values.sort_unstable_by(|a, b| a.total_cmp(b));
    percents.iter().map(|&p| sorted_percentile(values, p)).collect()
}

fn sorted_percentile(sorted: &[f64], percent: f64) -> f64 {
    let last = sorted.len() - 1;
    let position = (percent.clamp(0.0, 100.0) / 100.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
