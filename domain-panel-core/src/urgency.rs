//! 到期紧急程度推导
//!
//! 输入只有 `expires_in_days`，与 `end_date` 无关。

use serde::Serialize;

/// 进度条最小宽度（比例），保证临期域名仍可见
pub const MIN_PROGRESS: f64 = 0.05;

const CRITICAL_DAYS: i64 = 10;
const WARNING_DAYS: i64 = 100;
const INDICATOR_WARNING_DAYS: i64 = 30;

/// Urgency tier of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    /// 10 days or fewer (including already expired).
    Critical,
    /// 11 to 100 days.
    Warning,
    /// More than 100 days.
    Healthy,
    /// No expiry information.
    Unknown,
}

/// Progress bar colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColorBand {
    Alarm,
    /// Amber ramp, lighter as expiry gets further away.
    Ramp {
        hue: u16,
        saturation: u8,
        lightness: f64,
    },
    Healthy,
    Neutral,
}

impl ColorBand {
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Alarm => "#ef4444".to_string(),
            Self::Ramp {
                hue,
                saturation,
                lightness,
            } => format!("hsl({hue}, {saturation}%, {lightness:.1}%)"),
            Self::Healthy => "#22c55e".to_string(),
            Self::Neutral => "#d1d5db".to_string(),
        }
    }
}

/// Derived urgency of one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Urgency {
    pub tier: UrgencyTier,
    /// Fill ratio in `[0.05, 1.0]`; `None` means no bar is drawn.
    pub progress: Option<f64>,
    pub color: ColorBand,
}

/// Derive tier, progress and colour from the days left until expiry.
///
/// | days            | tier     | progress              | colour |
/// |-----------------|----------|-----------------------|--------|
/// | `None`          | Unknown  | none                  | neutral |
/// | `<= 10`         | Critical | `max(0.05, d / 10)`   | alarm |
/// | `11 ..= 100`    | Warning  | `max(0.05, d / 100)`  | amber ramp |
/// | `> 100`         | Healthy  | `1.0`                 | healthy |
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn derive_urgency(expires_in_days: Option<i64>) -> Urgency {
    let Some(days) = expires_in_days else {
        return Urgency {
            tier: UrgencyTier::Unknown,
            progress: None,
            color: ColorBand::Neutral,
        };
    };

    if days <= CRITICAL_DAYS {
        Urgency {
            tier: UrgencyTier::Critical,
            progress: Some(ratio(days, CRITICAL_DAYS)),
            color: ColorBand::Alarm,
        }
    } else if days <= WARNING_DAYS {
        let span = (WARNING_DAYS - CRITICAL_DAYS) as f64;
        let lightness = 50.0 + (days - CRITICAL_DAYS) as f64 / span * 20.0;
        Urgency {
            tier: UrgencyTier::Warning,
            progress: Some(ratio(days, WARNING_DAYS)),
            color: ColorBand::Ramp {
                hue: 45,
                saturation: 90,
                lightness,
            },
        }
    } else {
        Urgency {
            tier: UrgencyTier::Healthy,
            progress: Some(1.0),
            color: ColorBand::Healthy,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(days: i64, full: i64) -> f64 {
    (days as f64 / full as f64).clamp(MIN_PROGRESS, 1.0)
}

/// Status dot of the inline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusIndicator {
    Red,
    Yellow,
    Green,
}

impl StatusIndicator {
    #[must_use]
    pub fn to_css(self) -> &'static str {
        match self {
            Self::Red => "#ef4444",
            Self::Yellow => "#eab308",
            Self::Green => "#22c55e",
        }
    }
}

/// Inline dot colour: red up to 10 days, yellow up to 30, green otherwise
/// (unknown expiry included).
#[must_use]
pub fn status_indicator(expires_in_days: Option<i64>) -> StatusIndicator {
    match expires_in_days {
        Some(d) if d <= CRITICAL_DAYS => StatusIndicator::Red,
        Some(d) if d <= INDICATOR_WARNING_DAYS => StatusIndicator::Yellow,
        _ => StatusIndicator::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightness(days: i64) -> f64 {
        match derive_urgency(Some(days)).color {
            ColorBand::Ramp { lightness, .. } => lightness,
            other => panic!("expected ramp for {days}, got {other:?}"),
        }
    }

    #[test]
    fn critical_tier() {
        for days in [-30, -1, 0, 1, 5, 10] {
            let urgency = derive_urgency(Some(days));
            assert_eq!(urgency.tier, UrgencyTier::Critical, "days = {days}");
            assert_eq!(urgency.color, ColorBand::Alarm);
            let progress = urgency.progress.unwrap();
            assert!(progress >= MIN_PROGRESS, "days = {days}");
        }

        assert_eq!(derive_urgency(Some(-5)).progress, Some(MIN_PROGRESS));
        assert_eq!(derive_urgency(Some(5)).progress, Some(0.5));
        assert_eq!(derive_urgency(Some(10)).progress, Some(1.0));
    }

    #[test]
    fn warning_tier() {
        let urgency = derive_urgency(Some(11));
        assert_eq!(urgency.tier, UrgencyTier::Warning);
        assert_eq!(urgency.progress, Some(0.11));

        let urgency = derive_urgency(Some(100));
        assert_eq!(urgency.tier, UrgencyTier::Warning);
        assert_eq!(urgency.progress, Some(1.0));
        assert!((lightness(100) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn warning_lightness_is_monotonic() {
        let mut previous = lightness(11);
        assert!(previous > 50.0);
        for days in 12..=100 {
            let current = lightness(days);
            assert!(current >= previous, "lightness dropped at {days}");
            previous = current;
        }
    }

    #[test]
    fn healthy_tier() {
        let urgency = derive_urgency(Some(101));
        assert_eq!(urgency.tier, UrgencyTier::Healthy);
        assert_eq!(urgency.progress, Some(1.0));
        assert_eq!(urgency.color, ColorBand::Healthy);
    }

    #[test]
    fn unknown_has_no_bar() {
        let urgency = derive_urgency(None);
        assert_eq!(urgency.tier, UrgencyTier::Unknown);
        assert_eq!(urgency.progress, None);
        assert_eq!(urgency.color, ColorBand::Neutral);
    }

    #[test]
    fn css() {
        assert_eq!(ColorBand::Alarm.to_css(), "#ef4444");
        assert_eq!(derive_urgency(Some(55)).color.to_css(), "hsl(45, 90%, 60.0%)");
        assert_eq!(ColorBand::Neutral.to_css(), "#d1d5db");
    }

    #[test]
    fn indicator_thresholds() {
        assert_eq!(status_indicator(Some(-2)), StatusIndicator::Red);
        assert_eq!(status_indicator(Some(10)), StatusIndicator::Red);
        assert_eq!(status_indicator(Some(11)), StatusIndicator::Yellow);
        assert_eq!(status_indicator(Some(30)), StatusIndicator::Yellow);
        assert_eq!(status_indicator(Some(31)), StatusIndicator::Green);
        assert_eq!(status_indicator(None), StatusIndicator::Green);
    }
}
