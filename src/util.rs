pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Timer display with a single decimal, e.g. `12.3s`.
pub fn format_secs(secs: f64) -> String {
    format!("{:.1}s", secs)
}
