use time::{OffsetDateTime, macros::format_description};

/// Operator-side payloads.
pub mod control;
/// Scoreboard presentation.
pub mod display;
/// Health check payloads.
pub mod health;
/// Server-sent event payloads.
pub mod sse;
/// Startup view routing.
pub mod view;

/// Render a unix-millisecond timestamp as `HH:MM:SS` (UTC).
pub fn format_clock(at_ms: i64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(at_ms) * 1_000_000)
        .ok()
        .and_then(|at| {
            at.format(format_description!("[hour]:[minute]:[second]"))
                .ok()
        })
        .unwrap_or_else(|| "--:--:--".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_utc_wall_time() {
        assert_eq!(format_clock(0), "00:00:00");
        // 2024-01-01T13:05:09.750Z
        assert_eq!(format_clock(1_704_114_309_750), "13:05:09");
    }

    #[test]
    fn out_of_range_timestamp_is_masked() {
        assert_eq!(format_clock(i64::MAX), "--:--:--");
    }
}
