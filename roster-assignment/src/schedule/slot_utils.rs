use chrono::{NaiveTime, Timelike};

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Parses a time string (HH:MM, or HH:MM:00) to a time of day.
/// Slots are labelled to the minute, so non-zero seconds are rejected.
pub fn parse_time_of_day(time_str: &str) -> Option<NaiveTime> {
    let clean_time = time_str.trim();
    NaiveTime::parse_from_str(clean_time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(clean_time, "%H:%M:%S"))
        .ok()
        .filter(|time| time.second() == 0)
}

/// Seconds since midnight
pub fn seconds_of_day(time: NaiveTime) -> u64 {
    time.num_seconds_from_midnight() as u64
}

/// Minutes since midnight, seconds are dropped
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// Formats minutes since midnight to time string (HH:MM), wrapping past 24:00
pub fn minutes_to_time_string(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours % 24, mins)
}

/// Label for a slot starting at `start` minutes, e.g. "09:20-10:00"
pub fn slot_label(start: u32, duration_minutes: u32) -> String {
    let end = (start as u64 + duration_minutes as u64) % MINUTES_PER_DAY as u64;
    format!(
        "{}-{}",
        minutes_to_time_string(start),
        minutes_to_time_string(end as u32)
    )
}

/// Length of the window from `start` to `end`. An `end` at or before
/// `start` means the window runs past midnight.
pub fn span_minutes(start: NaiveTime, end: NaiveTime) -> u32 {
    let start_minutes = minutes_of_day(start);
    let end_minutes = minutes_of_day(end);
    if end_minutes > start_minutes {
        end_minutes - start_minutes
    } else {
        end_minutes + MINUTES_PER_DAY - start_minutes
    }
}

/// Splits a shift window into whole slots of `slot_minutes`
/// Slot 1 = start_time, every following slot starts where the previous ended.
/// A trailing partial slot that would overrun `end` is not produced.
pub fn calculate_shift_slots(start: NaiveTime, end: NaiveTime, slot_minutes: u32) -> Vec<(u32, String)> {
    if slot_minutes == 0 {
        return Vec::new();
    }

    let start_minutes = minutes_of_day(start);
    let count = span_minutes(start, end) / slot_minutes;

    (0..count)
        .map(|i| {
            let slot_start = start_minutes + i * slot_minutes;
            (i + 1, slot_label(slot_start, slot_minutes))
        })
        .collect()
}
