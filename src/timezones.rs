use std::env;
use std::fs;
use std::path::Path;

use chrono_tz::TZ_VARIANTS;

use crate::time_source::parse_timezone;

/// Offered first in the timezone picker, ahead of the full catalog.
pub const POPULAR_TIMEZONES: [&str; 8] = [
    "UTC",
    "Europe/London",
    "Europe/Paris",
    "America/New_York",
    "America/Los_Angeles",
    "Asia/Tokyo",
    "Asia/Kolkata",
    "Australia/Sydney",
];

const FALLBACK_TIMEZONES: [&str; 6] = [
    "UTC",
    "Europe/London",
    "America/New_York",
    "Asia/Tokyo",
    "Asia/Kolkata",
    "Australia/Sydney",
];

/// Every identifier the time source accepts, sorted lexicographically.
pub fn timezone_catalog() -> Vec<&'static str> {
    catalog_from(TZ_VARIANTS.iter().map(|tz| tz.name()))
}

// The short fallback list stands in when the source table yields nothing.
fn catalog_from(names: impl IntoIterator<Item = &'static str>) -> Vec<&'static str> {
    let mut zones: Vec<&'static str> = names.into_iter().collect();
    if zones.is_empty() {
        zones = FALLBACK_TIMEZONES.to_vec();
    }
    zones.sort_unstable();
    zones.dedup();
    zones
}

/// Best-effort IANA name of the host timezone, `UTC` when nothing usable is
/// found.
pub fn local_timezone_id() -> String {
    detect_local_timezone(
        env::var("TZ").ok().as_deref(),
        Path::new("/etc/timezone"),
        Path::new("/etc/localtime"),
    )
    .unwrap_or_else(|| "UTC".to_string())
}

fn detect_local_timezone(
    tz_env: Option<&str>,
    timezone_file: &Path,
    localtime_link: &Path,
) -> Option<String> {
    if let Some(candidate) = tz_env.map(|value| value.trim().trim_start_matches(':'))
        && is_known(candidate)
    {
        return Some(candidate.to_string());
    }

    if let Ok(content) = fs::read_to_string(timezone_file) {
        let candidate = content.trim();
        if is_known(candidate) {
            return Some(candidate.to_string());
        }
    }

    let target = fs::read_link(localtime_link).ok()?;
    let target = target.to_string_lossy();
    let (_, candidate) = target.split_once("zoneinfo/")?;
    let candidate = candidate
        .strip_prefix("posix/")
        .or_else(|| candidate.strip_prefix("right/"))
        .unwrap_or(candidate);
    is_known(candidate).then(|| candidate.to_string())
}

fn is_known(candidate: &str) -> bool {
    !candidate.is_empty() && parse_timezone(candidate).is_ok()
}
