// libs/booking-cell/src/services/slots.rs
//
// Slot enumeration is pure: slots are derived from the availability
// template and the chosen date on every call, never persisted. `now` is an
// explicit parameter everywhere so expiry behavior is deterministic under
// test and a single snapshot covers a whole scan.
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use therapist_cell::models::AvailabilityTemplate;

/// How far ahead patients can browse for bookable dates.
pub const BOOKING_HORIZON_DAYS: i64 = 30;

/// 0 = Sunday .. 6 = Saturday, matching the schedule rows in the store.
pub fn day_of_week(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// Enumerate slot start times: emit `start_time`, advance by the session
/// duration, repeat while still strictly before `end_time`. The last slot
/// may therefore *end* past `end_time` when the duration does not evenly
/// divide the window; sessions are allowed to run over, and callers depend
/// on that, so it is not clamped here.
pub fn generate_slots(
    start_time: NaiveTime,
    end_time: NaiveTime,
    duration_minutes: i32,
) -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    if duration_minutes <= 0 {
        return slots;
    }

    let step = Duration::minutes(duration_minutes as i64);
    let mut current = start_time;

    while current < end_time {
        slots.push(current);
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            // Stepping past midnight ends the day's window.
            break;
        }
        current = next;
    }

    slots
}

/// Slot start times for one calendar date, or empty if the weekday is
/// disabled or carries no time window.
pub fn slots_for_date(template: &AvailabilityTemplate, date: NaiveDate) -> Vec<NaiveTime> {
    match template.day(day_of_week(date)) {
        Some(day) if day.available => match (day.start_time, day.end_time) {
            (Some(start), Some(end)) => {
                generate_slots(start, end, template.session_duration_minutes)
            }
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Dates within the horizon that still have at least one slot strictly in
/// the future. Today only qualifies while part of its window is still
/// ahead of `now`.
pub fn available_dates(
    template: &AvailabilityTemplate,
    horizon_days: i64,
    now: DateTime<Utc>,
) -> Vec<NaiveDate> {
    let today = now.date_naive();
    let mut dates = Vec::new();

    for offset in 0..horizon_days {
        let date = today + Duration::days(offset);

        let has_future_slot = slots_for_date(template, date)
            .into_iter()
            .any(|slot| date.and_time(slot).and_utc() > now);

        if has_future_slot {
            dates.push(date);
        }
    }

    dates
}
