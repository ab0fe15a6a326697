//! Flash request validation and step planning.
//!
//! A flash spreads `flashes` on/off cycles evenly across `duration` seconds.
//! Each cycle is two steps: drive high and hold, drive low and hold. The hold
//! time is `duration / (flashes * 2)`.
//!
//! Requests arrive as raw signed integers from the query string.
//! [`FlashRequest::validate`] turns them into a [`FlashPlan`], rejecting
//! non-positive values and anything over the configured limits, so the plan
//! can never divide by zero or sleep for a negative time.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use pi_lamp::{FlashConfig, FlashRequest, PinLevel};
//!
//! let plan = FlashRequest::new(4, 2).validate(&FlashConfig::default()).unwrap();
//! assert_eq!(plan.half_period(), Duration::from_secs(1));
//!
//! let levels: Vec<PinLevel> = plan.steps().map(|s| s.level).collect();
//! assert_eq!(
//!     levels,
//!     [PinLevel::High, PinLevel::Low, PinLevel::High, PinLevel::Low]
//! );
//! ```

use core::time::Duration;

use crate::config::FlashConfig;
use crate::error::LampError;
use crate::traits::PinLevel;

/// Flash parameters as supplied by the caller.
///
/// Missing fields fall back to the [`FlashConfig`] defaults during
/// validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlashRequest {
    /// Total duration in seconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<i64>,
    /// Number of on/off cycles.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flashes: Option<i64>,
}

impl FlashRequest {
    /// Request with both parameters set.
    pub fn new(duration: i64, flashes: i64) -> Self {
        Self {
            duration: Some(duration),
            flashes: Some(flashes),
        }
    }

    /// Build a request from raw query pairs.
    ///
    /// A repeated parameter takes its last value and unknown parameters are
    /// ignored.
    ///
    /// # Errors
    ///
    /// [`LampError::InvalidQuery`] when `duration` or `flashes` is not an
    /// integer.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, LampError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "duration" => &mut request.duration,
                "flashes" => &mut request.flashes,
                _ => continue,
            };
            let value = value.as_ref();
            let parsed = value.trim().parse::<i64>().map_err(|_| {
                LampError::InvalidQuery(format!(
                    "`{}` must be an integer, got {:?}",
                    key.as_ref(),
                    value
                ))
            })?;
            *slot = Some(parsed);
        }
        Ok(request)
    }

    /// Check the request against `config` and build a plan.
    ///
    /// # Errors
    ///
    /// - [`LampError::NonPositive`] for zero or negative values
    /// - [`LampError::AboveLimit`] for values over the configured maximum
    pub fn validate(&self, config: &FlashConfig) -> Result<FlashPlan, LampError> {
        let duration = self
            .duration
            .unwrap_or_else(|| i64::from(config.default_duration_secs));
        let flashes = self
            .flashes
            .unwrap_or_else(|| i64::from(config.default_flashes));

        let duration_secs = check_range("duration", duration, config.max_duration_secs)?;
        let flashes = check_range("flashes", flashes, config.max_flashes)?;

        Ok(FlashPlan {
            duration_secs,
            flashes,
        })
    }
}

fn check_range(field: &'static str, value: i64, max: u32) -> Result<u32, LampError> {
    if value <= 0 {
        return Err(LampError::NonPositive { field, value });
    }
    match u32::try_from(value) {
        Ok(v) if v <= max => Ok(v),
        _ => Err(LampError::AboveLimit { field, value, max }),
    }
}

/// A validated flash sequence.
///
/// Both fields are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashPlan {
    duration_secs: u32,
    flashes: u32,
}

impl FlashPlan {
    /// Total duration in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Number of on/off cycles.
    pub fn flashes(&self) -> u32 {
        self.flashes
    }

    /// Time spent in each half cycle.
    pub fn half_period(&self) -> Duration {
        Duration::from_nanos(self.half_period_nanos())
    }

    /// Time the whole sequence takes.
    ///
    /// May fall short of the requested duration by under a nanosecond per
    /// phase when it does not divide evenly.
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.half_period_nanos() * self.phases())
    }

    /// Number of pin writes in the sequence, two per flash.
    pub fn phases(&self) -> u64 {
        u64::from(self.flashes) * 2
    }

    // duration_secs <= u32::MAX keeps this below u64::MAX
    fn half_period_nanos(&self) -> u64 {
        u64::from(self.duration_secs) * 1_000_000_000 / self.phases()
    }

    /// The high/low steps making up the sequence.
    pub fn steps(&self) -> FlashSteps {
        FlashSteps {
            remaining: self.phases(),
            next: PinLevel::High,
            hold: self.half_period(),
        }
    }
}

/// One pin write followed by a hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashStep {
    /// Level to drive.
    pub level: PinLevel,
    /// How long to hold it.
    pub hold: Duration,
}

/// Iterator over the steps of a [`FlashPlan`].
#[derive(Clone, Debug)]
pub struct FlashSteps {
    remaining: u64,
    next: PinLevel,
    hold: Duration,
}

impl Iterator for FlashSteps {
    type Item = FlashStep;

    fn next(&mut self) -> Option<FlashStep> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let level = self.next;
        self.next = level.toggled();
        Some(FlashStep {
            level,
            hold: self.hold,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // exact unless the count overflows a 32-bit usize
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FlashConfig {
        FlashConfig::default()
    }

    #[test]
    fn defaults_are_five_and_five() {
        let plan = FlashRequest::default().validate(&config()).unwrap();
        assert_eq!(plan.duration_secs(), 5);
        assert_eq!(plan.flashes(), 5);
        assert_eq!(plan.half_period(), Duration::from_millis(500));
    }

    #[test]
    fn partial_request_uses_defaults() {
        let req = FlashRequest {
            duration: Some(10),
            flashes: None,
        };
        let plan = req.validate(&config()).unwrap();
        assert_eq!(plan.duration_secs(), 10);
        assert_eq!(plan.flashes(), 5);
        assert_eq!(plan.half_period(), Duration::from_secs(1));
    }

    #[test]
    fn fractional_half_period() {
        // 5s over 3 flashes: 6 half cycles of 833.33ms
        let plan = FlashRequest::new(5, 3).validate(&config()).unwrap();
        let half = plan.half_period();
        assert!(half > Duration::from_millis(833));
        assert!(half < Duration::from_millis(834));
        assert!(plan.total() <= Duration::from_secs(5));
    }

    #[test]
    fn from_pairs_last_value_wins() {
        let req = FlashRequest::from_pairs([
            ("flashes", "1"),
            ("duration", "8"),
            ("flashes", "2"),
        ])
        .unwrap();
        assert_eq!(req, FlashRequest::new(8, 2));
    }

    #[test]
    fn from_pairs_ignores_unknown_keys() {
        let req = FlashRequest::from_pairs([("colour", "red"), ("flashes", "3")]).unwrap();
        assert_eq!(req.duration, None);
        assert_eq!(req.flashes, Some(3));
    }

    #[test]
    fn from_pairs_rejects_non_integers() {
        let err = FlashRequest::from_pairs([("duration", "abc")]).unwrap_err();
        assert!(matches!(err, LampError::InvalidQuery(ref msg) if msg.contains("duration")));
        assert!(err.is_client_error());
    }

    #[test]
    fn zero_flashes_rejected() {
        let err = FlashRequest::new(5, 0).validate(&config()).unwrap_err();
        assert_eq!(
            err,
            LampError::NonPositive {
                field: "flashes",
                value: 0
            }
        );
    }

    #[test]
    fn negative_duration_rejected() {
        let err = FlashRequest::new(-1, 5).validate(&config()).unwrap_err();
        assert_eq!(
            err,
            LampError::NonPositive {
                field: "duration",
                value: -1
            }
        );
    }

    #[test]
    fn zero_duration_rejected() {
        assert!(FlashRequest::new(0, 5).validate(&config()).is_err());
    }

    #[test]
    fn limits_enforced() {
        let config = FlashConfig::default()
            .with_max_duration_secs(60)
            .with_max_flashes(10);

        assert!(FlashRequest::new(60, 10).validate(&config).is_ok());

        let err = FlashRequest::new(61, 10).validate(&config).unwrap_err();
        assert!(matches!(
            err,
            LampError::AboveLimit {
                field: "duration",
                max: 60,
                ..
            }
        ));

        let err = FlashRequest::new(60, 11).validate(&config).unwrap_err();
        assert!(matches!(
            err,
            LampError::AboveLimit {
                field: "flashes",
                ..
            }
        ));
    }

    #[test]
    fn huge_values_rejected_not_truncated() {
        let err = FlashRequest::new(i64::MAX, 1).validate(&config()).unwrap_err();
        assert!(matches!(err, LampError::AboveLimit { .. }));
    }

    #[test]
    fn steps_alternate_and_end_low() {
        let plan = FlashRequest::new(4, 2).validate(&config()).unwrap();
        let steps: Vec<FlashStep> = plan.steps().collect();

        assert_eq!(steps.len(), 4);
        assert_eq!(plan.steps().size_hint(), (4, Some(4)));
        assert_eq!(plan.phases(), 4);
        for (i, step) in steps.iter().enumerate() {
            let expected = if i % 2 == 0 {
                PinLevel::High
            } else {
                PinLevel::Low
            };
            assert_eq!(step.level, expected);
            assert_eq!(step.hold, Duration::from_secs(1));
        }
        assert_eq!(steps.last().unwrap().level, PinLevel::Low);
    }

    #[test]
    fn single_flash() {
        let plan = FlashRequest::new(1, 1).validate(&config()).unwrap();
        let steps: Vec<FlashStep> = plan.steps().collect();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].hold, Duration::from_millis(500));
        assert_eq!(plan.total(), Duration::from_secs(1));
    }
}
