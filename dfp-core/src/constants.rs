//! Constants and configuration values for devicefp
//!
//! Centralizes the magic numbers, probe inputs, paths and defaults used by
//! the collectors and the orchestrator.

use std::time::Duration;

/// Orchestrator defaults
pub mod defaults {
    /// Default per-collector deadline in milliseconds
    pub const TIMEOUT_MS: u64 = 5000;

    /// Caching is on unless disabled
    pub const CACHE: bool = true;

    /// Debug logging is off unless enabled
    pub const DEBUG: bool = false;
}

/// Digest formatting
pub mod digest {
    /// Number of SHA-256 bytes kept in the fingerprint
    pub const TRUNCATED_BYTES: usize = 16;

    /// Length of the hex fingerprint (two characters per byte)
    pub const HEX_LENGTH: usize = TRUNCATED_BYTES * 2;

    /// Sentinel recorded for a category whose collector failed
    pub const ERROR_SENTINEL: &str = "error";
}

/// Logging
pub mod logging {
    /// tracing target used by the diagnostic logger
    pub const TARGET: &str = "devicefp";

    /// Prefix for every diagnostic message
    pub const PREFIX: &str = "[DeviceFingerprint]";
}

/// Fallback values for signals the platform does not expose
pub mod fallback {
    pub const ORIENTATION: &str = "unknown";
    pub const EFFECTIVE_TYPE: &str = "unknown";
    pub const TIMEZONE: &str = "UTC";
    pub const LANGUAGE: &str = "en-US";
}

/// Rendering probe scene
pub mod render {
    /// Off-screen surface width in pixels
    pub const CANVAS_WIDTH: u32 = 200;

    /// Off-screen surface height in pixels
    pub const CANVAS_HEIGHT: u32 = 30;

    pub const TEXT: &str = "DeviceFingerprint";
    pub const FONT: &str = "14px Arial";
    pub const TEXT_BASELINE: &str = "top";

    pub const RECT_FILL: &str = "#f60";
    pub const RECT: (f64, f64, f64, f64) = (125.0, 1.0, 62.0, 20.0);

    pub const PRIMARY_TEXT_FILL: &str = "#069";
    pub const PRIMARY_TEXT_POS: (f64, f64) = (2.0, 15.0);

    pub const SHADOW_TEXT_FILL: &str = "rgba(102, 204, 0, 0.7)";
    pub const SHADOW_TEXT_POS: (f64, f64) = (4.0, 17.0);

    /// Separator between GPU vendor and renderer in the WebGL probe
    pub const WEBGL_SEPARATOR: char = '~';
}

/// Font availability probe
pub mod fonts {
    /// Generic families each candidate font is checked against
    pub const BASE_FONTS: &[&str] = &["monospace", "sans-serif", "serif"];

    /// Candidate fonts, in probe order
    pub const CANDIDATES: &[&str] = &[
        "Arial", "Arial Black", "Arial Narrow", "Arial Rounded MT Bold", "Bookman Old Style",
        "Bradley Hand ITC", "Century", "Century Gothic", "Comic Sans MS", "Courier",
        "Courier New", "Georgia", "Gentium", "Impact", "King", "Lucida Console",
        "Lalit", "Modena", "Monotype Corsiva", "Papyrus", "Tahoma", "TeX",
        "Times", "Times New Roman", "Trebuchet MS", "Verdana", "Verona",
    ];

    /// Point size used in font queries
    pub const QUERY_SIZE: &str = "12px";

    /// Directories scanned by the native font source
    pub const NATIVE_DIRS: &[&str] = &[
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/usr/X11R6/lib/X11/fonts",
    ];
}

/// Network probes
pub mod network {
    use super::*;

    /// IP geolocation endpoint
    pub const IP_LOOKUP_URL: &str = "https://ipapi.co/json/";

    /// HTTP client timeout for the IP lookup
    pub const IP_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2500);
}

/// Host paths read by the native platform
pub mod paths {
    pub const CPUINFO: &str = "/proc/cpuinfo";
    pub const MEMINFO: &str = "/proc/meminfo";
    pub const TIMEZONE_FILE: &str = "/etc/timezone";
    pub const LOCALTIME_LINK: &str = "/etc/localtime";
    pub const ZONEINFO_PREFIX: &str = "zoneinfo/";
    pub const POWER_SUPPLY: &str = "/sys/class/power_supply";
    pub const NET_CLASS: &str = "/sys/class/net";
    pub const INPUT_DEVICES: &str = "/proc/bus/input/devices";
    pub const BLUETOOTH_CLASS: &str = "/sys/class/bluetooth";
    pub const USB_DEVICES: &str = "/sys/bus/usb/devices";
    pub const NFC_CLASS: &str = "/sys/class/nfc";
    pub const DRM_CLASS: &str = "/sys/class/drm";
    pub const SOUND_CARDS: &str = "/proc/asound/cards";
}

/// Unit conversions
pub mod units {
    /// Kilobytes per gigabyte for /proc/meminfo conversion
    pub const KB_PER_GB: f64 = 1024.0 * 1024.0;
}
