//! Standard accuracy tiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Named size/accuracy trade-off
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// ~5% false positives, smallest artifact
    Micro,
    /// ~1% false positives
    Compact,
    /// ~0.1% false positives
    #[default]
    Balanced,
    /// ~0.01% false positives, largest artifact
    Precise,
}

impl Tier {
    /// Every standard tier, smallest first
    pub const ALL: [Tier; 4] = [Tier::Micro, Tier::Compact, Tier::Balanced, Tier::Precise];

    /// Lowercase identifier, also used as the artifact file stem
    pub fn name(self) -> &'static str {
        match self {
            Tier::Micro => "micro",
            Tier::Compact => "compact",
            Tier::Balanced => "balanced",
            Tier::Precise => "precise",
        }
    }

    /// Target false positive rate
    pub fn false_positive_rate(self) -> f64 {
        match self {
            Tier::Micro => 0.05,
            Tier::Compact => 0.01,
            Tier::Balanced => 0.001,
            Tier::Precise => 0.0001,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownTier(s.to_string()))
    }
}
