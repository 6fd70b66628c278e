//! Chart data derived from the match state.
//!
//! Nothing here comes from the classifier. The projection is a fixed
//! heuristic: batting slows slightly in the powerplay and accelerates at the
//! death.

use serde::Serialize;

/// Last over of the powerplay phase.
const POWERPLAY_END: i64 = 6;
/// Last over of the middle phase.
const MIDDLE_END: i64 = 14;
/// Over marks advance two overs at a time.
const STEP_OVERS: i64 = 2;
/// Marks are produced while strictly below this value.
const AXIS_END: i64 = 22;
/// Y axis headroom above the highest projected total.
const Y_HEADROOM: f64 = 40.0;
const Y_TICK: f64 = 20.0;

/// Run-rate multiplier applied for the two overs ending at `over`.
pub fn phase_multiplier(over: i64) -> f64 {
    if over <= POWERPLAY_END {
        0.9
    } else if over <= MIDDLE_END {
        1.0
    } else {
        1.25
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub over: i64,
    pub runs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSeries {
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionSeries {
    pub fn max_runs(&self) -> Option<f64> {
        self.points.iter().map(|p| p.runs).reduce(f64::max)
    }
}

/// Extrapolate the running total from the current over (rounded down) in
/// two-over steps. An odd starting over keeps its parity, so the last mark
/// may be 21.
pub fn project_runs(score: f64, current_run_rate: f64, overs_completed: f64) -> ProjectionSeries {
    let start = overs_completed.floor() as i64;
    let mut total = score;
    let mut points = Vec::new();

    let mut over = start;
    while over < AXIS_END {
        total += phase_multiplier(over) * current_run_rate * 2.0;
        points.push(ProjectionPoint { over, runs: total });
        over += STEP_OVERS;
    }

    ProjectionSeries { points }
}

/// Plot description for the projection line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionChart {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_ticks: Vec<i64>,
    pub y_ticks: Vec<f64>,
    pub series: ProjectionSeries,
}

impl ProjectionChart {
    pub fn new(series: ProjectionSeries) -> Self {
        let x_ticks = (0..AXIS_END).step_by(STEP_OVERS as usize).collect();
        // No headroom ticks without data: an empty series has no maximum.
        let y_ticks = match series.max_runs() {
            Some(max) => {
                let end = max + Y_HEADROOM;
                let mut ticks = Vec::new();
                let mut tick = 0.0;
                while tick < end {
                    ticks.push(tick);
                    tick += Y_TICK;
                }
                ticks
            }
            None => Vec::new(),
        };

        ProjectionChart {
            title: "Expected Runs vs Overs",
            x_label: "Overs",
            y_label: "Runs",
            x_ticks,
            y_ticks,
            series,
        }
    }
}

// ── Run-rate comparison ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateBar {
    pub label: &'static str,
    pub runs: f64,
}

/// Two-bar "current vs required" chart, rates rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRateComparison {
    pub title: &'static str,
    pub bars: [RateBar; 2],
}

impl RunRateComparison {
    pub fn new(current_run_rate: f64, required_run_rate: f64) -> Self {
        RunRateComparison {
            title: "Run Rate Comparison",
            bars: [
                RateBar {
                    label: "Current Run Rate",
                    runs: round_to_hundredths(current_run_rate),
                },
                RateBar {
                    label: "Required Run Rate",
                    runs: round_to_hundredths(required_run_rate),
                },
            ],
        }
    }
}

/// Two decimal places, rounded once from the exact binary value.
pub fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_from_over_six() {
        let series = project_runs(50.0, 8.0, 6.0);
        let overs: Vec<i64> = series.points.iter().map(|p| p.over).collect();
        assert_eq!(overs, vec![6, 8, 10, 12, 14, 16, 18, 20]);

        let expected = [64.4, 80.4, 96.4, 112.4, 128.4, 148.4, 168.4, 188.4];
        for (point, want) in series.points.iter().zip(expected) {
            assert_relative_eq!(point.runs, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn fractional_overs_start_at_the_floor() {
        let series = project_runs(50.0, 8.0, 6.5);
        assert_eq!(series.points[0].over, 6);
        assert_eq!(series.points.len(), 8);
    }

    #[test]
    fn odd_start_keeps_parity_and_reaches_21() {
        let series = project_runs(40.0, 8.0, 5.0);
        let overs: Vec<i64> = series.points.iter().map(|p| p.over).collect();
        assert_eq!(overs, vec![5, 7, 9, 11, 13, 15, 17, 19, 21]);
    }

    #[test]
    fn hundredths_round_the_stored_value_once() {
        // 3 runs off 80 balls and 19 off 80 land just above the tie.
        assert_eq!(round_to_hundredths(3.0 * 6.0 / 80.0), 0.23);
        assert_eq!(round_to_hundredths(19.0 * 6.0 / 80.0), 1.43);
        assert_eq!(round_to_hundredths(9.0), 9.0);
        assert_eq!(round_to_hundredths(-1.005), -1.0);

        let cmp = RunRateComparison::new(0.0, 3.0 * 6.0 / 80.0);
        assert_eq!(cmp.bars[1].runs, 0.23);
    }

    #[test]
    fn phase_boundaries() {
        assert_eq!(phase_multiplier(0), 0.9);
        assert_eq!(phase_multiplier(6), 0.9);
        assert_eq!(phase_multiplier(7), 1.0);
        assert_eq!(phase_multiplier(14), 1.0);
        assert_eq!(phase_multiplier(15), 1.25);
        assert_eq!(phase_multiplier(20), 1.25);
    }

    #[test]
    fn final_over_gives_single_point() {
        let series = project_runs(170.0, 8.5, 20.0);
        assert_eq!(series.points.len(), 1);
        assert_relative_eq!(series.points[0].runs, 170.0 + 1.25 * 8.5 * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_rate_projection_is_flat() {
        let series = project_runs(0.0, 0.0, 0.0);
        assert_eq!(series.points.len(), 11);
        assert!(series.points.iter().all(|p| p.runs == 0.0));
    }

    #[test]
    fn chart_axes() {
        let chart = ProjectionChart::new(project_runs(50.0, 8.0, 6.0));
        assert_eq!(chart.x_ticks, vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
        // max 188.4 → ticks below 228.4
        assert_eq!(chart.y_ticks.len(), 12);
        assert_eq!(chart.y_ticks.last(), Some(&220.0));
        assert_eq!(chart.title, "Expected Runs vs Overs");
    }

    #[test]
    fn empty_series_has_no_y_ticks() {
        let chart = ProjectionChart::new(project_runs(100.0, 5.0, 22.0));
        assert!(chart.series.points.is_empty());
        assert!(chart.y_ticks.is_empty());
    }

    #[test]
    fn run_rate_bars_are_rounded() {
        let cmp = RunRateComparison::new(7.33333333, 9.876);
        assert_eq!(cmp.bars[0].label, "Current Run Rate");
        assert_relative_eq!(cmp.bars[0].runs, 7.33, epsilon = 1e-12);
        assert_relative_eq!(cmp.bars[1].runs, 9.88, epsilon = 1e-12);
    }
}
