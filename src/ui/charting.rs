use crate::position::RoundResult;

/// Points for the per-round accuracy chart: (round number, accuracy %).
pub fn accuracy_points(rounds: &[RoundResult]) -> Vec<(f64, f64)> {
    rounds
        .iter()
        .map(|r| (f64::from(r.round_number), f64::from(r.accuracy)))
        .collect()
}

/// Compute X (rounds) bounds for the results chart. Y is always 0..=100.
pub fn compute_chart_params(points: &[(f64, f64)], planned_rounds: u32) -> (f64, f64) {
    let mut last_round = match points.last() {
        Some(&(x, _)) => x,
        None => f64::from(planned_rounds),
    };
    if last_round < 2.0 {
        last_round = 2.0;
    }
    (last_round, 100.0)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
