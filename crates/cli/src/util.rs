//! Shared utilities for CLI commands

use anyhow::{bail, Result};
use rcs_core::store::is_temp_name;
use rcs_journal::{VersionInfo, VersionedFile};
use std::path::{Path, PathBuf};

/// Map a user-supplied file name to its record path inside `data_dir`
///
/// Names are single path components; separators, `.`/`..` and temp names are rejected.
pub fn resolve_file(data_dir: &Path, name: &str) -> Result<VersionedFile> {
    if name.is_empty() {
        bail!("File name must not be empty");
    }
    if name.contains('/') || name.contains('\\') {
        bail!("Invalid file name '{}': must not contain path separators", name);
    }
    if name == "." || name == ".." || is_temp_name(name) {
        bail!("Invalid file name '{}'", name);
    }
    Ok(VersionedFile::open(data_dir.join(name)))
}

/// Resolve a version reference against a file's versions
/// Supports:
/// - Full identifier
/// - Unique prefix of at least 4 characters
///
/// Anything else is passed through unchanged, so the engine reports it as unknown.
pub fn resolve_version(reference: &str, versions: &[VersionInfo]) -> Result<String> {
    if versions.iter().any(|v| v.version == *reference) {
        return Ok(reference.to_string());
    }

    if reference.len() >= 4 {
        let matching: Vec<_> = versions
            .iter()
            .filter(|v| v.version.as_str().starts_with(reference))
            .collect();

        if matching.len() == 1 {
            return Ok(matching[0].version.to_string());
        } else if matching.len() > 1 {
            bail!(
                "Ambiguous version prefix '{}': matches {} versions",
                reference,
                matching.len()
            );
        }
    }

    Ok(reference.to_string())
}

/// First 12 hex characters of a version identifier plus its count
pub fn short_id(version: &str) -> String {
    match version.split_once(':') {
        Some((hash, count)) => {
            let prefix: String = hash.chars().take(12).collect();
            format!("{}:{}", prefix, count)
        }
        None => version.chars().take(12).collect(),
    }
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts_ms: u64) -> String {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    let datetime = UNIX_EPOCH + Duration::from_millis(ts_ms);

    match SystemTime::now().duration_since(datetime) {
        Ok(elapsed) => {
            let seconds = elapsed.as_secs();
            if seconds < 60 {
                format!("{} seconds ago", seconds)
            } else if seconds < 3600 {
                format!("{} minutes ago", seconds / 60)
            } else if seconds < 86400 {
                format!("{} hours ago", seconds / 3600)
            } else if seconds < 604800 {
                format!("{} days ago", seconds / 86400)
            } else {
                format!("{} weeks ago", seconds / 604800)
            }
        }
        Err(_) => "in the future".to_string(),
    }
}

/// Format timestamp as absolute UTC time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts_ms: u64) -> String {
    let secs = ts_ms / 1000;
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    // Civil-from-days, http://howardhinnant.github.io/date_algorithms.html
    let epoch_days = days + 719468;
    let era = epoch_days / 146097;
    let doe = epoch_days - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if m <= 2 { y + 1 } else { y };

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, m, d, hours, minutes, seconds
    )
}

/// Data directory from the `--data` flag, falling back to config
pub fn data_dir(flag: Option<PathBuf>, config: &crate::system_config::SystemConfig) -> PathBuf {
    flag.unwrap_or_else(|| config.store.data_dir.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcs_journal::VersionId;

    fn info(version: &str) -> VersionInfo {
        VersionInfo {
            version: VersionId::from(version),
            time: 0.0,
            comment: String::new(),
            parent: VersionId::root(),
        }
    }

    #[test]
    fn test_resolve_file_rejects_bad_names() {
        let dir = Path::new("/data");
        assert!(resolve_file(dir, "").is_err());
        assert!(resolve_file(dir, "../etc/passwd").is_err());
        assert!(resolve_file(dir, "a/b").is_err());
        assert!(resolve_file(dir, "..").is_err());
        assert!(resolve_file(dir, ".x.1.rcs-tmp").is_err());
        assert_eq!(
            resolve_file(dir, "main.py").unwrap().path(),
            Path::new("/data/main.py")
        );
    }

    #[test]
    fn test_resolve_version_prefix() -> Result<()> {
        let versions = vec![info("abcdef01:1"), info("abcd9999:0")];
        assert_eq!(resolve_version("abcdef01:1", &versions)?, "abcdef01:1");
        assert_eq!(resolve_version("abcde", &versions)?, "abcdef01:1");
        assert!(resolve_version("abcd", &versions).is_err());
        // Too short or unmatched: passed through untouched
        assert_eq!(resolve_version("abc", &versions)?, "abc");
        assert_eq!(resolve_version("ffff", &versions)?, "ffff");
        Ok(())
    }

    #[test]
    fn test_short_id() {
        let id = format!("{}:7", "0123456789abcdef".repeat(4));
        assert_eq!(short_id(&id), "0123456789ab:7");
        assert_eq!(short_id("tiny"), "tiny");
    }

    #[test]
    fn test_format_absolute_time() {
        assert_eq!(format_absolute_time(0), "1970-01-01 00:00:00");
        assert_eq!(format_absolute_time(1_704_292_200_000), "2024-01-03 14:30:00");
    }
}
