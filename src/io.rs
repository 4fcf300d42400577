//! File-system plumbing shared by the GUI shell, the store, and the CLI:
//! platform data directory, the `data:image/png;base64` payload codec used
//! by artwork records, PNG export, and timestamp formatting.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use rfd::FileDialog;

/// Prefix every artwork record payload carries.
const DATA_URL_PREFIX: &str = "data:image/png;base64,";

// ============================================================================
// PLATFORM PATHS
// ============================================================================

/// Platform data directory (without the app sub-folder).
pub fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support");
        }
    }
    // Linux / fallback
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort: current working directory
    PathBuf::from(".")
}

// ============================================================================
// DATA-URL CODEC
// ============================================================================

/// Wrap encoded PNG bytes as a self-contained data URL string.
pub fn encode_data_url(png_bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(png_bytes);
    format!("{}{}", DATA_URL_PREFIX, payload)
}

/// Unwrap a data URL back into PNG bytes. Accepts only the exact prefix this
/// application writes; anything else in the store file is corrupt.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, String> {
    let payload = url
        .strip_prefix(DATA_URL_PREFIX)
        .ok_or_else(|| "not a data:image/png;base64 URL".to_string())?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("invalid base64 payload: {}", e))
}

// ============================================================================
// PNG EXPORT
// ============================================================================

/// Write already-encoded PNG bytes to `path`.
pub fn write_png(bytes: &[u8], path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()
}

/// Show the native save dialog for a PNG export. Returns `None` when the
/// user cancels.
pub fn pick_export_path(suggested_name: &str) -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PNG Image", &["png"])
        .set_file_name(&format!("{}.png", suggested_name))
        .save_file()
}

/// Strip characters that are unsafe in filenames, keeping the name readable.
/// Used when deriving an export filename from an artwork name.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        "pixel-art".to_string()
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// Current time as a human-readable UTC string (`YYYY-MM-DD HH:MM:SS`),
/// used for the `savedAt` field of artwork records. Derived from the unix
/// clock directly — no chrono dependency.
pub fn saved_at_now() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => format_unix_seconds(d.as_secs()),
        Err(_) => "(unknown time)".to_string(),
    }
}

/// Civil-from-days conversion (Howard Hinnant's algorithm), valid for any
/// date the unix clock can reach.
fn format_unix_seconds(secs: u64) -> String {
    let days = (secs / 86400) as i64;
    let (h, m, s) = (
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
    );

    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year + 1 } else { year };

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, month, day, h, m, s
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trip() {
        let bytes = vec![0x89u8, b'P', b'N', b'G', 0, 1, 2, 3, 255];
        let url = encode_data_url(&bytes);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_foreign_urls() {
        assert!(decode_data_url("data:image/jpeg;base64,abcd").is_err());
        assert!(decode_data_url("plain text").is_err());
        assert!(decode_data_url("data:image/png;base64,!!not-base64!!").is_err());
    }

    #[test]
    fn sanitize_filename_strips_separators() {
        assert_eq!(sanitize_filename("my/art:v2?"), "my_art_v2_");
        assert_eq!(sanitize_filename("  spaced  "), "spaced");
        assert_eq!(sanitize_filename(""), "pixel-art");
        assert_eq!(sanitize_filename("///"), "___");
    }

    #[test]
    fn unix_seconds_format_known_dates() {
        assert_eq!(format_unix_seconds(0), "1970-01-01 00:00:00");
        // 2000-03-01 00:00:00 UTC (leap-century boundary)
        assert_eq!(format_unix_seconds(951_868_800), "2000-03-01 00:00:00");
        // 2024-02-29 12:34:56 UTC (leap day)
        assert_eq!(format_unix_seconds(1_709_210_096), "2024-02-29 12:34:56");
    }
}
