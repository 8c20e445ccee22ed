const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Render `ms` as `MM:SS.CC`, or `HH:MM:SS.CC` from one hour on.
///
/// Every unit is truncated, never rounded.
pub fn format_time(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let centis = (ms % MS_PER_SECOND) / 10;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{centis:02}")
    } else {
        format!("{minutes:02}:{seconds:02}.{centis:02}")
    }
}

/// Signed difference between two lap times, e.g. `+00:01.20`
pub fn format_delta(current_ms: u64, reference_ms: u64) -> String {
    if current_ms >= reference_ms {
        format!("+{}", format_time(current_ms - reference_ms))
    } else {
        format!("-{}", format_time(reference_ms - current_ms))
    }
}
