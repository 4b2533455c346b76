use serde::{Deserialize, Serialize};

use crate::series::{round_half_up, SeriesPoint};

/// Share of the visible value range added above and below the curve.
pub const DOMAIN_PADDING: f64 = 0.10;

/// Lookback window selectable on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl TimeRange {
    pub const ORDER: [TimeRange; 5] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::All,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1Y",
            TimeRange::All => "ALL",
        }
    }

    /// Configured day count; `None` means the whole series.
    pub fn days(self) -> Option<usize> {
        match self {
            TimeRange::OneMonth => Some(30),
            TimeRange::ThreeMonths => Some(90),
            TimeRange::SixMonths => Some(180),
            TimeRange::OneYear => Some(365),
            TimeRange::All => None,
        }
    }

    /// Number of points visible for a master series of `len` points.
    pub fn visible_len(self, len: usize) -> usize {
        self.days().map_or(len, |days| days.min(len))
    }

    /// Trailing points of `master` for this range. Never copies or recomputes.
    pub fn slice(self, master: &[SeriesPoint]) -> &[SeriesPoint] {
        let keep = self.visible_len(master.len());
        &master[master.len() - keep..]
    }
}

/// Vertical bounds for the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayDomain {
    /// Nothing to measure; let the renderer pick.
    Auto,
    Fixed { min: f64, max: f64 },
}

impl DisplayDomain {
    pub fn of(visible: &[SeriesPoint]) -> Self {
        let mut values = visible.iter().map(|p| p.value);
        let Some(first) = values.next() else {
            return DisplayDomain::Auto;
        };
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let padding = (max - min) * DOMAIN_PADDING;

        DisplayDomain::Fixed {
            min: round_half_up(min - padding),
            max: round_half_up(max + padding),
        }
    }

    pub fn bounds(self) -> Option<[f64; 2]> {
        match self {
            DisplayDomain::Auto => None,
            DisplayDomain::Fixed { min, max } => Some([min, max]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| SeriesPoint {
                date: start + Duration::days(i as i64),
                value,
            })
            .collect()
    }

    #[test]
    fn day_counts() {
        let days: Vec<_> = TimeRange::ORDER.iter().map(|r| r.days()).collect();
        assert_eq!(days, vec![Some(30), Some(90), Some(180), Some(365), None]);
        assert_eq!(TimeRange::default(), TimeRange::OneYear);
    }

    #[test]
    fn slice_takes_trailing_points() {
        let master = series(&(0..400).map(f64::from).collect::<Vec<_>>());
        let month = TimeRange::OneMonth.slice(&master);
        assert_eq!(month.len(), 30);
        assert_eq!(month.first().unwrap().value, 370.0);
        assert_eq!(month.last(), master.last());
        assert_eq!(TimeRange::All.slice(&master).len(), 400);
    }

    #[test]
    fn slice_longer_than_master_returns_everything() {
        let master = series(&[1.0, 2.0, 3.0]);
        assert_eq!(TimeRange::OneYear.slice(&master), &master[..]);
        assert!(TimeRange::OneMonth.slice(&[]).is_empty());
    }

    #[test]
    fn domain_pads_ten_percent() {
        let visible = series(&[150.0, 100.0, 200.0]);
        assert_eq!(
            DisplayDomain::of(&visible),
            DisplayDomain::Fixed { min: 90.0, max: 210.0 }
        );
    }

    #[test]
    fn domain_rounds_each_bound() {
        let visible = series(&[1_003.0, 1_008.0]);
        // padding 0.5 -> 1002.5 and 1008.5, both rounded up
        assert_eq!(DisplayDomain::of(&visible).bounds(), Some([1_003.0, 1_009.0]));
    }

    #[test]
    fn flat_slice_has_zero_width_domain() {
        let visible = series(&[42.0, 42.0]);
        assert_eq!(DisplayDomain::of(&visible).bounds(), Some([42.0, 42.0]));
    }

    #[test]
    fn empty_slice_is_auto() {
        assert_eq!(DisplayDomain::of(&[]), DisplayDomain::Auto);
        assert_eq!(DisplayDomain::Auto.bounds(), None);
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(serde_json::to_string(&TimeRange::All).unwrap(), "\"ALL\"");
        let parsed: TimeRange = serde_json::from_str("\"3M\"").unwrap();
        assert_eq!(parsed, TimeRange::ThreeMonths);
    }
}
