//! Synthetic daily history for the growth chart.
//!
//! History is walked backward from the current value so the last point always
//! matches the figure shown on the stat tiles, however many draws happen.

use chrono::{Duration, NaiveDate};
use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;
use tracing::debug;

use crate::format::day_month;

/// Length of the master series (~2 years).
pub const WINDOW_DAYS: usize = 730;
/// 1.5% daily fluctuation.
pub const DAILY_VOLATILITY: f64 = 0.015;
/// Subtracted from each uniform draw; below 0.5 so earlier days trend lower.
pub const NOISE_BIAS: f64 = 0.48;

/// Uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    /// Day and month only, e.g. `12 Apr`.
    pub fn label(&self) -> String {
        day_month(self.date)
    }
}

/// Rounds .5 toward positive infinity. Compares the fractional part instead
/// of adding 0.5 first, which would itself round near 0.5 and above 2^52.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Builds `WINDOW_DAYS` points ending at `today`, oldest first, whose last
/// value is `anchor` rounded.
pub fn generate_master_series(
    anchor: f64,
    today: NaiveDate,
    rng: &mut dyn RandomSource,
) -> Vec<SeriesPoint> {
    let mut points = Vec::with_capacity(WINDOW_DAYS);
    let mut value = anchor;

    for offset in 0..WINDOW_DAYS {
        points.push(SeriesPoint {
            date: today - Duration::days(offset as i64),
            value: round_half_up(value),
        });

        let noise = rng.next_unit() - NOISE_BIAS;
        value -= value * DAILY_VOLATILITY * noise;
    }

    // Walked newest-first
    points.reverse();
    points
}

/// Holds the master series for one anchor value and regenerates it only
/// when the anchor changes.
#[derive(Debug, Default)]
pub struct SeriesCache {
    anchor_bits: Option<u64>,
    master: Vec<SeriesPoint>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_generate(
        &mut self,
        anchor: f64,
        today: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> &[SeriesPoint] {
        let bits = anchor.to_bits();
        if self.anchor_bits != Some(bits) {
            debug!(anchor, %today, "generating master series");
            self.master = generate_master_series(anchor, today, rng);
            self.anchor_bits = Some(bits);
        }
        &self.master
    }

    /// The cached series, empty if nothing has been generated yet.
    pub fn master(&self) -> &[SeriesPoint] {
        &self.master
    }

    pub fn len(&self) -> usize {
        self.master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.master.is_empty()
    }

    pub fn invalidate(&mut self) {
        self.anchor_bits = None;
        self.master.clear();
    }
}
