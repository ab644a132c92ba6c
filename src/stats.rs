use std::time::Duration;

/// Format a combination count with comma separators
pub fn format_number(n: u128) -> String {
    n.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(std::str::from_utf8)
        .collect::<Result<Vec<&str>, _>>()
        .unwrap()
        .join(",")
}

/// Format a hash rate in human-readable form
pub fn format_speed(speed: u64) -> String {
    if speed >= 1_000_000_000 {
        format!("{:.2}G", speed as f64 / 1_000_000_000.0)
    } else if speed >= 1_000_000 {
        format!("{:.2}M", speed as f64 / 1_000_000.0)
    } else if speed >= 1_000 {
        format!("{:.2}K", speed as f64 / 1_000.0)
    } else {
        format!("{}", speed)
    }
}

/// Format duration as "5.3 hours", "2.5 minutes", "45 seconds", etc.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();

    if secs >= 86400 * 365 {
        format!("{:.1} years", secs as f64 / (86400.0 * 365.0))
    } else if secs >= 86400 {
        format!("{:.1} days", secs as f64 / 86400.0)
    } else if secs >= 3600 {
        format!("{:.1} hours", secs as f64 / 3600.0)
    } else if secs >= 60 {
        format!("{:.1} minutes", secs as f64 / 60.0)
    } else {
        format!("{:.1} seconds", d.as_secs_f64())
    }
}

/// Format elapsed time compactly for the in-place status line
pub fn format_running_time(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Estimate the time to exhaust `combinations` candidates at the given rate
pub fn estimate_time(combinations: u128, hashes_per_sec: u64) -> Duration {
    if hashes_per_sec == 0 {
        return Duration::from_secs(u64::MAX);
    }
    let secs = combinations / hashes_per_sec as u128;
    Duration::from_secs(secs.min(u64::MAX as u128) as u64)
}
