//! Easing curves applied to the fractional keyframe position.
//!
//! Every curve maps `0 -> 0` and `1 -> 1`. The elastic and bounce curves
//! leave `[0, 1]` in between; callers must not clamp their output.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{KineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseInQuart,
    EaseInElastic,
    EaseInOutCubic,
    EaseInOutQuint,
    EaseOutElastic,
    EaseOutBounce,
}

const ELASTIC_C4: f64 = (2.0 * PI) / 3.0;
const BOUNCE_N1: f64 = 7.5625;
const BOUNCE_D1: f64 = 2.75;

impl Easing {
    pub const ALL: [Self; 7] = [
        Self::Linear,
        Self::EaseInQuart,
        Self::EaseInElastic,
        Self::EaseInOutCubic,
        Self::EaseInOutQuint,
        Self::EaseOutElastic,
        Self::EaseOutBounce,
    ];

    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::EaseInQuart => x * x * x * x,
            Self::EaseInElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else {
                    -(2f64.powf(10.0 * x - 10.0)) * ((x * 10.0 - 10.75) * ELASTIC_C4).sin()
                }
            }
            Self::EaseInOutCubic => {
                if x < 0.5 {
                    4.0 * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInOutQuint => {
                if x < 0.5 {
                    16.0 * x * x * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(5) / 2.0
                }
            }
            Self::EaseOutElastic => {
                if x == 0.0 {
                    0.0
                } else if x == 1.0 {
                    1.0
                } else {
                    2f64.powf(-10.0 * x) * ((x * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Self::EaseOutBounce => ease_out_bounce(x),
        }
    }

    /// The curve as a closure, for APIs taking any `Fn(f64) -> f64`.
    pub fn as_fn(self) -> impl Fn(f64) -> f64 {
        move |x| self.apply(x)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInQuart => "easeInQuart",
            Self::EaseInElastic => "easeInElastic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInOutQuint => "easeInOutQuint",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseOutBounce => "easeOutBounce",
        }
    }
}

fn ease_out_bounce(x: f64) -> f64 {
    if x < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * x * x
    } else if x < 2.0 / BOUNCE_D1 {
        let x = x - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * x * x + 0.75
    } else if x < 2.5 / BOUNCE_D1 {
        let x = x - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * x * x + 0.9375
    } else {
        let x = x - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * x * x + 0.984_375
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both the camelCase identifiers and the dashed names used by the
/// editor's dropdown (`ease-in-quartic`, `ease-out-bounce`, ...).
impl FromStr for Easing {
    type Err = KineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "easeInQuart" | "ease-in-quartic" => Ok(Self::EaseInQuart),
            "easeInElastic" | "ease-in-elastic" => Ok(Self::EaseInElastic),
            "easeInOutCubic" | "ease-in-out-cubic" => Ok(Self::EaseInOutCubic),
            "easeInOutQuint" | "ease-in-out-quintic" => Ok(Self::EaseInOutQuint),
            "easeOutElastic" | "ease-out-elastic" => Ok(Self::EaseOutElastic),
            "easeOutBounce" | "ease-out-bounce" => Ok(Self::EaseOutBounce),
            other => Err(KineError::UnknownEasing(other.to_string())),
        }
    }
}
