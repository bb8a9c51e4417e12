//! Simulated biomarker curves over the 48-hour protocol.
//!
//! These are illustrative shapes for charting, not a physiological model.
//! Insulin after the fourth hour carries a small random jitter; the generator
//! is seeded so a given seed always produces the same chart.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;

use super::normalize_hours;

/// Charted span, in whole hours.
pub const CHART_HOURS: u32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiomarkerPoint {
    pub hour: u32,
    /// mg/dL
    pub glucose: f64,
    /// µU/mL
    pub insulin: f64,
    /// mmol/L
    pub ketones: f64,
    /// 0..100 relative activity
    pub autophagy: f64,
    /// relative to fed baseline
    pub hgh: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// One point per hour for `0..=CHART_HOURS`.
pub fn simulate_biomarkers(seed: u64) -> Vec<BiomarkerPoint> {
    let mut rng = Pcg64::seed_from_u64(seed);

    (0..=CHART_HOURS)
        .map(|hour| {
            let i = hour as f64;

            let (glucose, insulin) = if hour <= 4 {
                (120.0 - i * 5.0, 80.0 - i * 15.0)
            } else {
                (70.0 + (i / 10.0).sin() * 5.0, 5.0 + rng.gen_range(0.0..2.0))
            };

            let ketones = if hour > 12 {
                (0.1 + (i - 12.0) * 0.2).min(6.0)
            } else {
                0.1
            };

            let autophagy = if hour > 15 { (i - 15.0) * 3.0 } else { 0.0 };

            let hgh = if hour > 9 {
                let rising = 10.0 + (i - 9.0) * 6.0;
                if hour > 30 {
                    rising * 0.95
                } else {
                    rising
                }
            } else {
                10.0
            };

            BiomarkerPoint {
                hour,
                glucose: glucose.max(60.0),
                insulin: insulin.max(2.0),
                ketones: round_to(ketones, 2),
                autophagy: autophagy.clamp(0.0, 100.0),
                hgh: round_to(hgh, 0).min(300.0),
            }
        })
        .collect()
}

/// The point for the whole hour containing `elapsed_hours`, clamped to the
/// end of the chart.
pub fn sample_at(points: &[BiomarkerPoint], elapsed_hours: f64) -> Option<&BiomarkerPoint> {
    let hour = normalize_hours(elapsed_hours).floor().min(CHART_HOURS as f64) as u32;
    points
        .iter()
        .find(|p| p.hour == hour)
        .or_else(|| points.last())
}
