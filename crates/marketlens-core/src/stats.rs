//! Shared summary-statistic helpers for the analytics modules.

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by n). Zero for fewer than 2 values.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mu = mean(values);
    let variance = values.iter().map(|value| (value - mu).powi(2)).sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Population covariance of two equal-length slices. Zero when lengths differ
/// or fewer than 2 values.
pub fn covariance(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);
    xs.iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum::<f64>()
        / xs.len() as f64
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}
