//! Humanlike pauses between page interactions.
//!
//! A pause is described by a `[min, max]` interval in seconds. The
//! [`PacingMode`] decides where inside the interval it lands and the scale
//! stretches or shrinks every pause uniformly.

use std::time::Duration;

use rand::Rng;
use tablebook_core::PacingMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    mode: PacingMode,
    scale: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            mode: PacingMode::Midpoint,
            scale: 1.0,
        }
    }
}

impl Pacing {
    /// A non-finite or non-positive `scale` falls back to `1.0`.
    #[must_use]
    pub fn new(mode: PacingMode, scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self { mode, scale }
    }

    #[must_use]
    pub fn mode(&self) -> PacingMode {
        self.mode
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Length of the pause for `[min_secs, max_secs]`.
    #[must_use]
    pub fn delay(&self, min_secs: f64, max_secs: f64) -> Duration {
        let (lo, hi) = if min_secs <= max_secs {
            (min_secs, max_secs)
        } else {
            (max_secs, min_secs)
        };
        let secs = match self.mode {
            PacingMode::Midpoint => lo + (hi - lo) * 0.5,
            PacingMode::Jitter if hi > lo => rand::rng().random_range(lo..=hi),
            PacingMode::Jitter => lo,
        };
        Duration::try_from_secs_f64(secs * self.scale).unwrap_or(Duration::ZERO)
    }

    pub async fn pause(&self, min_secs: f64, max_secs: f64) {
        let delay = self.delay(min_secs, max_secs);
        tracing::trace!(delay_ms = delay.as_millis(), "pacing pause");
        tokio::time::sleep(delay).await;
    }
}
