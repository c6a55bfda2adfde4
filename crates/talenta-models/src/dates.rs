//! Date display helpers for the dashboard (Indonesian locale).
//!
//! Inputs are the raw ISO strings as stored remotely; invalid or missing
//! values render the same placeholder text the dashboard has always shown
//! instead of erroring.

use chrono::{DateTime, Datelike, Timelike, Utc};

const MONTHS_LONG: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
    "Oktober", "November", "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

fn parse(date_string: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_string)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `7 Agustus 2025`, or a placeholder for missing/invalid input.
pub fn format_date(date_string: &str) -> String {
    if date_string.is_empty() {
        return "Tidak ada tanggal".to_string();
    }
    match parse(date_string) {
        Some(dt) => format!(
            "{} {} {}",
            dt.day(),
            MONTHS_LONG[dt.month0() as usize],
            dt.year()
        ),
        None => "Format tanggal tidak valid".to_string(),
    }
}

/// `7 Agu 2025`, or `N/A` / `Invalid`.
pub fn format_date_short(date_string: &str) -> String {
    if date_string.is_empty() {
        return "N/A".to_string();
    }
    match parse(date_string) {
        Some(dt) => format!(
            "{} {} {}",
            dt.day(),
            MONTHS_SHORT[dt.month0() as usize],
            dt.year()
        ),
        None => "Invalid".to_string(),
    }
}

/// `7 Agustus 2025 10.30`, or a placeholder.
pub fn format_date_time(date_string: &str) -> String {
    if date_string.is_empty() {
        return "Tidak ada tanggal".to_string();
    }
    match parse(date_string) {
        Some(dt) => format!(
            "{} {} {} {:02}.{:02}",
            dt.day(),
            MONTHS_LONG[dt.month0() as usize],
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        None => "Format tanggal tidak valid".to_string(),
    }
}

/// Whether the date is strictly before `now`. Missing/invalid input counts
/// as not past.
pub fn is_past_date(date_string: &str, now: DateTime<Utc>) -> bool {
    parse(date_string).map(|dt| dt < now).unwrap_or(false)
}

/// Relative time for list views: `Baru saja`, `N menit lalu`, `N jam lalu`,
/// `N hari lalu`, falling back to the short date beyond a week.
pub fn relative_time(date_string: &str, now: DateTime<Utc>) -> String {
    let Some(dt) = parse(date_string) else {
        return "Tidak diketahui".to_string();
    };

    let secs = (now - dt).num_seconds();
    if secs < 60 {
        "Baru saja".to_string()
    } else if secs < 3600 {
        format!("{} menit lalu", secs / 60)
    } else if secs < 86_400 {
        format!("{} jam lalu", secs / 3600)
    } else if secs < 604_800 {
        format!("{} hari lalu", secs / 86_400)
    } else {
        format_date_short(date_string)
    }
}
