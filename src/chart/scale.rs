//! Linear data-to-pixel scales.

use crate::chart::domain::Domains;
use crate::config::ChartConfig;

/// Maps a numeric domain linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a domain value to the range.
    ///
    /// A zero-width domain maps everything to the middle of the range.
    #[must_use]
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Domain bounds.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Roughly `count` evenly spaced round values within the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = self.domain;
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        if lo == hi {
            return vec![lo];
        }

        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return vec![lo, hi];
        }
        let first = (lo / step).ceil();
        let last = (hi / step).floor();
        if !(first.is_finite() && last.is_finite()) || last - first > max_ticks(count) {
            return vec![lo, hi];
        }
        (first as i64..=last as i64).map(|i| i as f64 * step).collect()
    }
}

/// Upper bound on generated ticks; rounding in subnormal ranges may overshoot `count`.
fn max_ticks(count: usize) -> f64 {
    (count as f64 + 1.0) * 10.0
}

/// Step of 1, 2 or 5 times a power of ten giving about `count` ticks.
fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Year and value scales for one chart, in plot-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    /// Year → x.
    pub x: LinearScale,
    /// Value → y (inverted: larger values are higher up).
    pub y: LinearScale,
}

impl Scales {
    /// Build scales for the given domains and layout.
    #[must_use]
    pub fn new(domains: &Domains, config: &ChartConfig) -> Self {
        let (y0, y1) = domains
            .years
            .map_or((0.0, 0.0), |d| (f64::from(d.min), f64::from(d.max)));
        Self {
            x: LinearScale::new((y0, y1), (0.0, config.plot_width())),
            y: LinearScale::new(
                (domains.values.min, domains.values.max),
                (config.plot_height(), 0.0),
            ),
        }
    }

    /// Pixel position of a data point.
    #[must_use]
    pub fn position(&self, year: i32, value: f64) -> (f64, f64) {
        (self.x.map(f64::from(year)), self.y.map(value))
    }

    /// Integer year ticks, never closer than one year apart.
    #[must_use]
    pub fn year_ticks(&self, count: usize) -> Vec<i32> {
        let (lo, hi) = self.x.domain();
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        let (lo, hi) = (lo.min(hi).ceil() as i32, lo.max(hi).floor() as i32);
        if lo >= hi {
            return vec![lo];
        }

        let step = tick_step(f64::from(lo), f64::from(hi), count).max(1.0).round();
        if !step.is_finite() || step > f64::from(i32::MAX) {
            return vec![lo, hi];
        }
        let step = step as i64;
        let (lo, hi) = (i64::from(lo), i64::from(hi));
        let first = lo + (step - lo.rem_euclid(step)) % step;
        (first..=hi)
            .step_by(step as usize)
            .filter_map(|year| i32::try_from(year).ok())
            .collect()
    }
}
