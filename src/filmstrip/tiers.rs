use crate::foundation::error::{ReelError, ReelResult};

/// Sampling granularity of a filmstrip, from coarsest (0) to finest (3).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Tier(u8);

const INTERVALS: [f64; 4] = [5.0, 1.0, 0.5, 0.25];

impl Tier {
    pub const COARSEST: Self = Self(0);
    pub const FINEST: Self = Self(3);

    pub fn new(index: u8) -> ReelResult<Self> {
        if usize::from(index) >= INTERVALS.len() {
            return Err(ReelError::validation(format!("filmstrip tier {index} out of range 0..=3")));
        }
        Ok(Self(index))
    }

    /// Tier for a timeline zoom level: `< 0.5` is 0, `< 2` is 1, `< 5` is 2, anything else 3.
    pub fn for_zoom(zoom: f64) -> Self {
        if zoom < 0.5 {
            Self(0)
        } else if zoom < 2.0 {
            Self(1)
        } else if zoom < 5.0 {
            Self(2)
        } else {
            Self(3)
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Seconds between samples.
    pub fn interval(self) -> f64 {
        INTERVALS[usize::from(self.0)]
    }
}

/// Sample times of `tier` inside `[start, end]`, aligned to multiples of the tier interval.
pub fn timestamps_for_range(start: f64, end: f64, tier: Tier) -> Vec<f64> {
    if !start.is_finite() || !end.is_finite() || end < start {
        return Vec::new();
    }
    let interval = tier.interval();
    let mut k = (start / interval).floor();
    let mut out = Vec::new();
    loop {
        // k * interval, not a running sum.
        let ts = k * interval;
        if ts > end {
            break;
        }
        if ts >= start {
            out.push(ts);
        }
        k += 1.0;
    }
    out
}

/// Cache key component for a timestamp: whole milliseconds.
pub fn timestamp_key(ts: f64) -> u64 {
    (ts.max(0.0) * 1000.0).round() as u64
}

#[cfg(test)]
#[path = "../../tests/unit/filmstrip/tiers.rs"]
mod tests;
