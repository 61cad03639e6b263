//! Cron-to-interval heuristic.
//!
//! Schedules are approximated to a repeat interval rather than interpreted
//! with full cron semantics. The mapping is deliberately coarse:
//! `*/N * * * *` repeats every N minutes, a fixed minute with a wildcard
//! hour repeats hourly, and everything else (including malformed input)
//! repeats daily.

/// 24 hours, the fallback interval
pub const DAILY_INTERVAL_MS: u64 = 86_400_000;

/// 1 hour
pub const HOURLY_INTERVAL_MS: u64 = 3_600_000;

/// Converts an optional 5-field cron schedule into a repeat interval.
pub fn parse_cron_to_ms(schedule: Option<&str>) -> u64 {
    let Some(schedule) = schedule else {
        return DAILY_INTERVAL_MS;
    };

    let fields: Vec<&str> = schedule.split_whitespace().collect();
    if fields.len() != 5 {
        return DAILY_INTERVAL_MS;
    }

    let minute = fields[0];
    let hour = fields[1];

    if let Some(step) = minute.strip_prefix("*/")
        && let Ok(n) = step.parse::<u64>()
        && n >= 1
    {
        return n * 60_000;
    }

    if minute != "*" && hour == "*" {
        return HOURLY_INTERVAL_MS;
    }

    DAILY_INTERVAL_MS
}
