//! Host operating system signal sources
//!
//! Reads signals from procfs/sysfs, the environment and `statvfs`. Every
//! absolute path is resolved under a configurable root so the whole source
//! can be pointed at a fake tree in tests. Probes with no host counterpart
//! (2D canvas, WebGL, cookies, vibration) report [`Probe::Unsupported`].
//!
//! The async probes that walk directories or call `statvfs` (font index,
//! battery, storage) run on tokio's blocking pool so a slow filesystem never
//! stalls a runtime worker and the per-collector deadline can still fire.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use super::render::{NullSurface, RenderSurface};
use super::{
    BasicSource, ConnectionEstimate, DeviceSource, FeaturesSource, HardwareCapability,
    HardwareSource, NetworkSource, Probe, ScreenSource, StorageEstimate,
};
use crate::constants::{fallback, fonts, paths, units};
use crate::data::{BatteryInfo, IpInfo};

/// Font file extensions indexed by the font probe
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "pfb", "pfa", "woff", "woff2"];

/// Style suffixes allowed after a family name in a font file stem
const FONT_STYLE_SUFFIXES: &[&str] = &[
    "", "regular", "bold", "italic", "bolditalic", "oblique", "boldoblique",
    "bd", "bi", "i", "z", "b", "mt", "ms", "light", "medium",
];

/// Directory depth scanned below each font directory
const MAX_FONT_DEPTH: usize = 4;

/// Chromium caps reported downlink at 10 Mbit/s
const MAX_DOWNLINK_MBPS: f64 = 10.0;

/// Downlink granularity in Mbit/s
const DOWNLINK_STEP_MBPS: f64 = 0.025;

pub struct NativePlatform {
    root: PathBuf,
    env: Option<HashMap<String, String>>,
    ip_lookup: bool,
    font_index: OnceCell<Vec<String>>,
}

impl Default for NativePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl NativePlatform {
    /// Sources reading the live host
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
            env: None,
            ip_lookup: true,
            font_index: OnceCell::new(),
        }
    }

    /// Resolve every host path under `root` instead of `/`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::new()
        }
    }

    /// Read environment variables from a fixed map instead of the process
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Skip the remote IP lookup entirely
    pub fn without_ip_lookup(mut self) -> Self {
        self.ip_lookup = false;
        self
    }

    fn is_host_root(&self) -> bool {
        self.root == Path::new("/")
    }

    fn host_path(&self, absolute: &str) -> PathBuf {
        self.root.join(absolute.trim_start_matches('/'))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        let value = match &self.env {
            Some(vars) => vars.get(key).cloned(),
            None => std::env::var(key).ok(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    fn has_entries(&self, absolute: &str) -> Option<bool> {
        let dir = fs::read_dir(self.host_path(absolute)).ok()?;
        Some(dir.flatten().next().is_some())
    }

    /// Installed font file stems, indexed once per platform
    async fn font_index(&self) -> &[String] {
        self.font_index
            .get_or_init(|| {
                let dirs: Vec<PathBuf> = fonts::NATIVE_DIRS.iter().map(|d| self.host_path(d)).collect();
                async move {
                    let stems = run_blocking("font_index", move || Probe::Supported(index_fonts(&dirs)))
                        .await
                        .supported()
                        .unwrap_or_default();
                    debug!(count = stems.len(), "Indexed installed font files");
                    stems
                }
            })
            .await
    }

    fn find_display(&self) -> Option<(u32, u32)> {
        let entries = fs::read_dir(self.host_path(paths::DRM_CLASS)).ok()?;
        let mut connectors: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().contains('-'))
                    .unwrap_or(false)
            })
            .collect();
        connectors.sort();

        connectors.iter().find_map(|connector| {
            let status = read_trimmed(&connector.join("status"))?;
            if status != "connected" {
                return None;
            }
            let modes = fs::read_to_string(connector.join("modes")).ok()?;
            modes.lines().next().and_then(parse_mode)
        })
    }
}

// ============================================================================
// Basic
// ============================================================================

impl BasicSource for NativePlatform {
    fn user_agent(&self) -> String {
        native_user_agent()
    }

    fn language(&self) -> String {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| self.env_var(key))
            .find_map(|locale| locale_to_language(&locale))
            .unwrap_or_else(|| fallback::LANGUAGE.to_string())
    }

    fn platform(&self) -> String {
        platform_string(std::env::consts::OS, std::env::consts::ARCH)
    }
}

// ============================================================================
// Screen
// ============================================================================

impl ScreenSource for NativePlatform {
    fn color_depth(&self) -> u32 {
        // DRM does not expose the framebuffer depth; connected displays run 24-bit
        if self.find_display().is_some() {
            24
        } else {
            0
        }
    }

    fn dimensions(&self) -> (u32, u32) {
        self.find_display().unwrap_or((0, 0))
    }

    fn orientation(&self) -> Probe<String> {
        match self.find_display() {
            Some((w, h)) if w >= h => Probe::Supported("landscape-primary".to_string()),
            Some(_) => Probe::Supported("portrait-primary".to_string()),
            None => Probe::Unsupported,
        }
    }
}

// ============================================================================
// Hardware
// ============================================================================

#[async_trait]
impl HardwareSource for NativePlatform {
    fn timezone(&self) -> String {
        if let Some(tz) = self.env_var("TZ") {
            return tz.trim_start_matches(':').to_string();
        }
        if let Some(tz) = read_trimmed(&self.host_path(paths::TIMEZONE_FILE)) {
            return tz;
        }
        fs::read_link(self.host_path(paths::LOCALTIME_LINK))
            .ok()
            .and_then(|target| zone_from_link(&target.to_string_lossy()))
            .unwrap_or_else(|| fallback::TIMEZONE.to_string())
    }

    fn hardware_concurrency(&self) -> Probe<u32> {
        if let Ok(cpuinfo) = fs::read_to_string(self.host_path(paths::CPUINFO)) {
            let count = cpuinfo
                .lines()
                .filter(|line| line.trim_start().starts_with("processor"))
                .count();
            if count > 0 {
                return Probe::Supported(count as u32);
            }
        }
        if self.is_host_root() {
            return match std::thread::available_parallelism() {
                Ok(n) => Probe::Supported(n.get() as u32),
                Err(e) => Probe::Failed(e.to_string()),
            };
        }
        Probe::Unsupported
    }

    fn device_memory(&self) -> Probe<f64> {
        let meminfo = match fs::read_to_string(self.host_path(paths::MEMINFO)) {
            Ok(m) => m,
            Err(_) => return Probe::Unsupported,
        };
        meminfo
            .lines()
            .find(|line| line.starts_with("MemTotal:"))
            .and_then(parse_meminfo_kb)
            .map(|kb| Probe::Supported(approximate_device_memory(kb as f64 / units::KB_PER_GB)))
            .unwrap_or_else(|| Probe::Failed("MemTotal missing from meminfo".to_string()))
    }

    fn touch_support(&self) -> bool {
        fs::read_to_string(self.host_path(paths::INPUT_DEVICES))
            .map(|devices| {
                devices
                    .lines()
                    .filter(|line| line.starts_with("N: Name="))
                    .any(|line| line.to_lowercase().contains("touchscreen"))
            })
            .unwrap_or(false)
    }

    async fn battery(&self) -> Probe<BatteryInfo> {
        let power_supply = self.host_path(paths::POWER_SUPPLY);
        run_blocking("battery", move || read_battery(&power_supply)).await
    }
}

fn read_battery(power_supply: &Path) -> Probe<BatteryInfo> {
    let entries = match fs::read_dir(power_supply) {
        Ok(e) => e,
        Err(_) => return Probe::Unsupported,
    };

    let mut battery = None;
    let mut mains_online = false;
    for entry in entries.flatten() {
        let supply = entry.path();
        match read_trimmed(&supply.join("type")).as_deref() {
            Some("Battery") if battery.is_none() => battery = Some(supply),
            Some("Mains") => {
                mains_online |= read_trimmed(&supply.join("online")).as_deref() == Some("1");
            }
            _ => {}
        }
    }

    let supply = match battery {
        Some(s) => s,
        None => return Probe::Unsupported,
    };
    trace!(path = ?supply, "Reading battery state");

    let capacity = match read_trimmed(&supply.join("capacity")).and_then(|c| c.parse::<f64>().ok()) {
        Some(c) => c,
        None => return Probe::Failed(format!("unreadable capacity in {}", supply.display())),
    };
    let status = read_trimmed(&supply.join("status")).unwrap_or_default();
    let charging = mains_online || matches!(status.as_str(), "Charging" | "Full");

    Probe::Supported(BatteryInfo {
        charging,
        level: (capacity / 100.0).clamp(0.0, 1.0),
    })
}

// ============================================================================
// Network
// ============================================================================

#[async_trait]
impl NetworkSource for NativePlatform {
    fn connection(&self) -> Probe<ConnectionEstimate> {
        let entries = match fs::read_dir(self.host_path(paths::NET_CLASS)) {
            Ok(e) => e,
            Err(_) => return Probe::Unsupported,
        };
        let mut interfaces: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.file_name().map(|n| n != "lo").unwrap_or(false))
            .collect();
        interfaces.sort();

        let active = interfaces
            .into_iter()
            .find(|iface| read_trimmed(&iface.join("operstate")).as_deref() == Some("up"));
        let iface = match active {
            Some(i) => i,
            None => return Probe::Unsupported,
        };

        // sysfs reports Mbit/s; wireless links report nothing or -1
        let downlink = read_trimmed(&iface.join("speed"))
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|mbps| *mbps > 0.0)
            .map(round_downlink);

        Probe::Supported(ConnectionEstimate {
            effective_type: downlink.map(|d| effective_type_for(d).to_string()),
            downlink,
            rtt: None,
        })
    }

    async fn ip_info(&self) -> Probe<IpInfo> {
        if !self.ip_lookup {
            return Probe::Unsupported;
        }
        lookup_ip_info().await
    }
}

#[cfg(feature = "ip-lookup")]
async fn lookup_ip_info() -> Probe<IpInfo> {
    use crate::constants::network::{IP_LOOKUP_TIMEOUT, IP_LOOKUP_URL};
    use dfp_error::FingerprintError;

    #[derive(serde::Deserialize)]
    struct IpApiResponse {
        #[serde(default)]
        ip: String,
        #[serde(default)]
        country_name: String,
        #[serde(default)]
        region: String,
        #[serde(default)]
        city: String,
        #[serde(default)]
        error: bool,
        #[serde(default)]
        reason: Option<String>,
    }

    let http_failure = |e: reqwest::Error| Probe::Failed(FingerprintError::Http(e.to_string()).to_string());

    let client = match reqwest::Client::builder().timeout(IP_LOOKUP_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => return http_failure(e),
    };
    let response = match client.get(IP_LOOKUP_URL).send().await {
        Ok(r) => r,
        Err(e) => return http_failure(e),
    };
    let body: IpApiResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => return Probe::Failed(format!("invalid lookup response: {}", e)),
    };
    if body.error {
        return Probe::Failed(body.reason.unwrap_or_else(|| "lookup rejected".to_string()));
    }

    Probe::Supported(IpInfo {
        ip: body.ip,
        country: body.country_name,
        region: body.region,
        city: body.city,
    })
}

#[cfg(not(feature = "ip-lookup"))]
async fn lookup_ip_info() -> Probe<IpInfo> {
    Probe::Unsupported
}

// ============================================================================
// Features
// ============================================================================

#[async_trait]
impl FeaturesSource for NativePlatform {
    fn cookies_enabled(&self) -> bool {
        false
    }

    async fn check_font(&self, query: &str) -> Probe<bool> {
        let index = self.font_index().await;
        if index.is_empty() {
            return Probe::Unsupported;
        }
        match parse_font_query(query) {
            Some(family) => Probe::Supported(font_installed(index, &family)),
            None => Probe::Failed(format!("malformed font query: {}", query)),
        }
    }

    fn create_surface(&self, width: u32, height: u32) -> Box<dyn RenderSurface> {
        Box::new(NullSurface::new(width, height))
    }

    fn audio_context(&self) -> bool {
        fs::read_to_string(self.host_path(paths::SOUND_CARDS))
            .map(|cards| !cards.trim().is_empty() && !cards.contains("no soundcards"))
            .unwrap_or(false)
    }
}

// ============================================================================
// Device
// ============================================================================

#[async_trait]
impl DeviceSource for NativePlatform {
    fn user_agent(&self) -> String {
        native_user_agent()
    }

    fn capability(&self, capability: HardwareCapability) -> Probe<()> {
        let dir = match capability {
            HardwareCapability::Bluetooth => paths::BLUETOOTH_CLASS,
            HardwareCapability::Usb => paths::USB_DEVICES,
            HardwareCapability::Nfc => paths::NFC_CLASS,
            HardwareCapability::Vibration => return Probe::Unsupported,
        };
        match self.has_entries(dir) {
            Some(true) => Probe::Supported(()),
            _ => Probe::Unsupported,
        }
    }

    async fn storage_estimate(&self) -> Probe<StorageEstimate> {
        let target = if self.is_host_root() {
            dirs::data_local_dir().unwrap_or_else(|| self.root.clone())
        } else {
            self.root.clone()
        };
        run_blocking("storage_estimate", move || filesystem_usage(&target)).await
    }
}

#[cfg(unix)]
fn filesystem_usage(path: &Path) -> Probe<StorageEstimate> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = match CString::new(path.as_os_str().as_bytes()) {
        Ok(p) => p,
        Err(e) => return Probe::Failed(e.to_string()),
    };
    // SAFETY: statvfs is plain old data; zeroed is a valid initial value.
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: c_path is a valid NUL-terminated string and stat is a valid out pointer.
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if rc != 0 {
        return Probe::Failed(std::io::Error::last_os_error().to_string());
    }

    let block = stat.f_frsize as f64;
    let total = stat.f_blocks as f64 * block;
    let free = stat.f_bfree as f64 * block;
    Probe::Supported(StorageEstimate {
        quota: Some(total),
        usage: Some((total - free).max(0.0)),
    })
}

#[cfg(not(unix))]
fn filesystem_usage(_path: &Path) -> Probe<StorageEstimate> {
    Probe::Unsupported
}

// ============================================================================
// Helpers
// ============================================================================

/// Run a filesystem probe on the blocking pool
async fn run_blocking<T, F>(probe: &'static str, f: F) -> Probe<T>
where
    F: FnOnce() -> Probe<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|e| Probe::Failed(format!("{} probe task failed: {}", probe, e)))
}

fn index_fonts(dirs: &[PathBuf]) -> Vec<String> {
    let mut stems = Vec::new();
    for dir in dirs {
        collect_font_stems(dir, 0, &mut stems);
    }
    stems.sort();
    stems.dedup();
    stems
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn native_user_agent() -> String {
    format!(
        "Mozilla/5.0 ({}) devicefp/{}",
        user_agent_platform(std::env::consts::OS, std::env::consts::ARCH),
        env!("CARGO_PKG_VERSION")
    )
}

fn user_agent_platform(os: &str, arch: &str) -> String {
    match os {
        "linux" => format!("X11; Linux {}", arch),
        "macos" => "Macintosh; Intel Mac OS X".to_string(),
        "windows" => "Windows NT 10.0; Win64; x64".to_string(),
        "android" => format!("Linux; Android; {}", arch),
        other => format!("{}; {}", other, arch),
    }
}

/// navigator.platform style string
fn platform_string(os: &str, arch: &str) -> String {
    match os {
        "linux" => format!("Linux {}", arch),
        "macos" => "MacIntel".to_string(),
        "windows" => "Win32".to_string(),
        "freebsd" => format!("FreeBSD {}", arch),
        other => format!("{} {}", other, arch),
    }
}

/// "en_US.UTF-8" -> "en-US"; C/POSIX locales have no language
fn locale_to_language(locale: &str) -> Option<String> {
    let base = locale.split(['.', '@']).next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

/// Zone name from a localtime link target like /usr/share/zoneinfo/Europe/Berlin
fn zone_from_link(target: &str) -> Option<String> {
    let (_, zone) = target.split_once(paths::ZONEINFO_PREFIX)?;
    let zone = zone.trim_matches('/');
    if zone.is_empty() {
        None
    } else {
        Some(zone.to_string())
    }
}

/// Parse a meminfo line like "MemTotal:       16384000 kB"
fn parse_meminfo_kb(line: &str) -> Option<u64> {
    line.split_whitespace().nth(1)?.parse().ok()
}

/// Device Memory API rounding: power of two at or below, clamped to 0.25..=8
fn approximate_device_memory(gb: f64) -> f64 {
    if !gb.is_finite() || gb <= 0.0 {
        return 0.0;
    }
    let rounded = 2f64.powi(gb.log2().floor() as i32);
    rounded.clamp(0.25, 8.0)
}

/// Parse a DRM mode line such as "1920x1080" or "1920x1080i"
fn parse_mode(line: &str) -> Option<(u32, u32)> {
    let (w, h) = line.trim().split_once('x')?;
    let h: String = h.chars().take_while(|c| c.is_ascii_digit()).collect();
    Some((w.parse().ok()?, h.parse().ok()?))
}

fn round_downlink(mbps: f64) -> f64 {
    let steps = (mbps.min(MAX_DOWNLINK_MBPS) / DOWNLINK_STEP_MBPS).round();
    (steps * DOWNLINK_STEP_MBPS).min(MAX_DOWNLINK_MBPS)
}

/// Effective connection type from downlink alone
fn effective_type_for(downlink_mbps: f64) -> &'static str {
    if downlink_mbps < 0.05 {
        "slow-2g"
    } else if downlink_mbps < 0.07 {
        "2g"
    } else if downlink_mbps < 0.7 {
        "3g"
    } else {
        "4g"
    }
}

/// Extract the primary family from `12px "Arial", monospace`
fn parse_font_query(query: &str) -> Option<String> {
    let start = query.find('"')?;
    let rest = &query[start + 1..];
    let end = rest.find('"')?;
    let family = rest[..end].trim();
    if family.is_empty() {
        None
    } else {
        Some(family.to_string())
    }
}

fn normalize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn font_installed(index: &[String], family: &str) -> bool {
    let wanted = normalize_font_name(family);
    index.iter().any(|stem| {
        stem.strip_prefix(wanted.as_str())
            .map(|suffix| FONT_STYLE_SUFFIXES.contains(&suffix))
            .unwrap_or(false)
    })
}

fn collect_font_stems(dir: &Path, depth: usize, out: &mut Vec<String>) {
    if depth > MAX_FONT_DEPTH {
        return;
    }
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_stems(&path, depth + 1, out);
            continue;
        }
        let is_font = path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                FONT_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false);
        if let (true, Some(stem)) = (is_font, path.file_stem()) {
            out.push(normalize_font_name(&stem.to_string_lossy()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn platform(root: &TempDir) -> NativePlatform {
        NativePlatform::with_root(root.path())
            .with_env(HashMap::new())
            .without_ip_lookup()
    }

    #[test]
    fn test_locale_to_language() {
        assert_eq!(locale_to_language("en_US.UTF-8").as_deref(), Some("en-US"));
        assert_eq!(locale_to_language("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(locale_to_language("C.UTF-8"), None);
        assert_eq!(locale_to_language("POSIX"), None);
    }

    #[test]
    fn test_language_from_env_map() {
        let dir = TempDir::new().unwrap();
        let mut env = HashMap::new();
        env.insert("LANG".to_string(), "fr_CA.UTF-8".to_string());
        env.insert("LC_ALL".to_string(), "C".to_string());
        let platform = NativePlatform::with_root(dir.path()).with_env(env);
        assert_eq!(BasicSource::language(&platform), "fr-CA");

        let empty = NativePlatform::with_root(dir.path()).with_env(HashMap::new());
        assert_eq!(BasicSource::language(&empty), "en-US");
    }

    #[test]
    fn test_platform_strings() {
        assert_eq!(platform_string("linux", "x86_64"), "Linux x86_64");
        assert_eq!(platform_string("macos", "aarch64"), "MacIntel");
        assert!(native_user_agent().starts_with("Mozilla/5.0 ("));
    }

    #[test]
    fn test_approximate_device_memory() {
        assert_eq!(approximate_device_memory(15.6), 8.0);
        assert_eq!(approximate_device_memory(3.8), 2.0);
        assert_eq!(approximate_device_memory(0.1), 0.25);
        assert_eq!(approximate_device_memory(0.0), 0.0);
    }

    #[test]
    fn test_memory_and_cores_from_proc() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "proc/meminfo", "MemTotal:        4194304 kB\nMemFree: 1 kB\n");
        write(dir.path(), "proc/cpuinfo", "processor\t: 0\nmodel name\t: x\n\nprocessor\t: 1\n");
        let p = platform(&dir);
        assert_eq!(p.device_memory(), Probe::Supported(4.0));
        assert_eq!(p.hardware_concurrency(), Probe::Supported(2));
    }

    #[test]
    fn test_missing_proc_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let p = platform(&dir);
        assert_eq!(p.device_memory(), Probe::Unsupported);
        assert_eq!(p.hardware_concurrency(), Probe::Unsupported);
        assert!(!p.touch_support());
    }

    #[test]
    fn test_timezone_sources() {
        let dir = TempDir::new().unwrap();
        let p = platform(&dir);
        assert_eq!(p.timezone(), "UTC");

        write(dir.path(), "etc/timezone", "Asia/Tokyo\n");
        assert_eq!(p.timezone(), "Asia/Tokyo");

        let mut env = HashMap::new();
        env.insert("TZ".to_string(), ":America/Chicago".to_string());
        let p = NativePlatform::with_root(dir.path()).with_env(env);
        assert_eq!(p.timezone(), "America/Chicago");
    }

    #[test]
    fn test_zone_from_link() {
        assert_eq!(
            zone_from_link("/usr/share/zoneinfo/Europe/Berlin").as_deref(),
            Some("Europe/Berlin")
        );
        assert_eq!(zone_from_link("/etc/UTC"), None);
    }

    #[tokio::test]
    async fn test_battery_from_power_supply() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sys/class/power_supply/BAT0/type", "Battery\n");
        write(dir.path(), "sys/class/power_supply/BAT0/capacity", "73\n");
        write(dir.path(), "sys/class/power_supply/BAT0/status", "Discharging\n");
        write(dir.path(), "sys/class/power_supply/AC/type", "Mains\n");
        write(dir.path(), "sys/class/power_supply/AC/online", "0\n");

        let battery = platform(&dir).battery().await.supported().unwrap();
        assert!(!battery.charging);
        assert!((battery.level - 0.73).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_battery_unreadable_capacity_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sys/class/power_supply/BAT1/type", "Battery\n");
        write(dir.path(), "sys/class/power_supply/BAT1/status", "Charging\n");
        assert!(matches!(platform(&dir).battery().await, Probe::Failed(_)));
    }

    #[tokio::test]
    async fn test_no_battery_is_unsupported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sys/class/power_supply/AC/type", "Mains\n");
        assert_eq!(platform(&dir).battery().await, Probe::Unsupported);
    }

    #[test]
    fn test_connection_from_sysfs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sys/class/net/lo/operstate", "unknown\n");
        write(dir.path(), "sys/class/net/eth0/operstate", "up\n");
        write(dir.path(), "sys/class/net/eth0/speed", "1000\n");

        let est = platform(&dir).connection().supported().unwrap();
        assert_eq!(est.downlink, Some(10.0));
        assert_eq!(est.effective_type.as_deref(), Some("4g"));
        assert_eq!(est.rtt, None);
    }

    #[test]
    fn test_wireless_without_speed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sys/class/net/wlan0/operstate", "up\n");
        write(dir.path(), "sys/class/net/wlan0/speed", "-1\n");
        let est = platform(&dir).connection().supported().unwrap();
        assert_eq!(est, ConnectionEstimate::default());
    }

    #[test]
    fn test_effective_type_thresholds() {
        assert_eq!(effective_type_for(0.01), "slow-2g");
        assert_eq!(effective_type_for(0.06), "2g");
        assert_eq!(effective_type_for(0.5), "3g");
        assert_eq!(effective_type_for(1.5), "4g");
        assert!((round_downlink(1.46) - 1.45).abs() < 1e-9);
        assert_eq!(round_downlink(1000.0), 10.0);
    }

    #[test]
    fn test_display_from_drm() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sys/class/drm/card0-HDMI-A-1/status", "disconnected\n");
        write(dir.path(), "sys/class/drm/card0-eDP-1/status", "connected\n");
        write(dir.path(), "sys/class/drm/card0-eDP-1/modes", "1080x1920\n1024x768\n");
        let p = platform(&dir);
        assert_eq!(p.dimensions(), (1080, 1920));
        assert_eq!(p.color_depth(), 24);
        assert_eq!(p.orientation(), Probe::Supported("portrait-primary".to_string()));
    }

    #[test]
    fn test_headless_screen() {
        let dir = TempDir::new().unwrap();
        let p = platform(&dir);
        assert_eq!(p.dimensions(), (0, 0));
        assert_eq!(p.orientation(), Probe::Unsupported);
    }

    #[test]
    fn test_parse_font_query() {
        assert_eq!(
            parse_font_query(r#"12px "Times New Roman", serif"#).as_deref(),
            Some("Times New Roman")
        );
        assert_eq!(parse_font_query("12px serif"), None);
    }

    #[tokio::test]
    async fn test_font_checks_against_index() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "usr/share/fonts/truetype/msttcorefonts/Arial_Bold.ttf", "");
        write(dir.path(), "usr/share/fonts/truetype/msttcorefonts/Times_New_Roman.ttf", "");
        write(dir.path(), "usr/share/fonts/truetype/msttcorefonts/README", "");
        let p = platform(&dir);

        assert_eq!(p.check_font(r#"12px "Arial", monospace"#).await, Probe::Supported(true));
        assert_eq!(
            p.check_font(r#"12px "Times New Roman", serif"#).await,
            Probe::Supported(true)
        );
        // "Times" must not match "timesnewroman"
        assert_eq!(p.check_font(r#"12px "Times", serif"#).await, Probe::Supported(false));
        assert!(matches!(p.check_font("12px serif").await, Probe::Failed(_)));
    }

    #[tokio::test]
    async fn test_no_font_dirs_is_unsupported() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            platform(&dir).check_font(r#"12px "Arial", serif"#).await,
            Probe::Unsupported
        );
    }

    #[test]
    fn test_capabilities_from_sysfs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "sys/class/bluetooth/hci0/type", "");
        fs::create_dir_all(dir.path().join("sys/bus/usb/devices")).unwrap();
        let p = platform(&dir);

        assert!(p.capability(HardwareCapability::Bluetooth).is_supported());
        assert!(!p.capability(HardwareCapability::Usb).is_supported());
        assert!(!p.capability(HardwareCapability::Nfc).is_supported());
        assert_eq!(p.capability(HardwareCapability::Vibration), Probe::Unsupported);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_storage_estimate_of_root() {
        let dir = TempDir::new().unwrap();
        let est = platform(&dir).storage_estimate().await.supported().unwrap();
        let quota = est.quota.unwrap();
        assert!(quota > 0.0);
        assert!(est.usage.unwrap() <= quota);
    }

    #[tokio::test]
    async fn test_ip_lookup_disabled() {
        let dir = TempDir::new().unwrap();
        assert_eq!(platform(&dir).ip_info().await, Probe::Unsupported);
    }

    #[test]
    fn test_audio_cards() {
        let dir = TempDir::new().unwrap();
        let p = platform(&dir);
        assert!(!p.audio_context());
        write(dir.path(), "proc/asound/cards", "--- no soundcards ---\n");
        assert!(!p.audio_context());
        write(dir.path(), "proc/asound/cards", " 0 [PCH ]: HDA-Intel - HDA Intel PCH\n");
        assert!(p.audio_context());
    }
}
