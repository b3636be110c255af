//! Signal categories
//!
//! The six fixed buckets of platform information. Declaration order is the
//! order categories appear in every Aggregate Signal Set and therefore in the
//! canonical text that gets hashed.

use std::fmt;
use std::str::FromStr;

use dfp_error::FingerprintError;
use serde::{Deserialize, Serialize};

/// One bucket of collected platform information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    /// User agent, locale and platform string
    Basic,
    /// Color depth, resolution and orientation
    Screen,
    /// Timezone, cores, memory, touch and battery
    Hardware,
    /// Connection quality and IP geolocation
    Network,
    /// Cookies, fonts, rendering digests and audio support
    Features,
    /// Device class, hardware capability flags and storage
    Device,
}

impl SignalCategory {
    /// Every category in declaration order
    pub const ALL: [SignalCategory; 6] = [
        Self::Basic,
        Self::Screen,
        Self::Hardware,
        Self::Network,
        Self::Features,
        Self::Device,
    ];

    /// Lowercase name used as the key in serialized signal sets
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Screen => "screen",
            Self::Hardware => "hardware",
            Self::Network => "network",
            Self::Features => "features",
            Self::Device => "device",
        }
    }

    /// Position in declaration order
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalCategory {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FingerprintError::UnknownCategory(wanted.to_string()))
    }
}
