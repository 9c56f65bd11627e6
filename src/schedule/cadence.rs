use chrono::{Datelike, Duration, NaiveDate};

use crate::types::PaymentFrequency;

/// due date for the given payment number, counted from 1
///
/// payment #1 is always exactly the first payment date, never
/// cadence-adjusted
pub fn due_date(
    frequency: PaymentFrequency,
    first_payment_date: NaiveDate,
    payment_number: u32,
) -> NaiveDate {
    if payment_number <= 1 {
        return first_payment_date;
    }
    match frequency {
        PaymentFrequency::Weekly => {
            first_payment_date + Duration::days(7 * (payment_number as i64 - 1))
        }
        PaymentFrequency::Monthly => monthly_due_date(first_payment_date, payment_number),
        PaymentFrequency::BiMonthly => bimonthly_due_date(first_payment_date, payment_number),
    }
}

/// month advanced by (n - 1), day clamped to the target month
///
/// clamping always starts from the original anchor day, not a
/// previously clamped one, so Jan 31 runs Feb 29, Mar 31 rather than
/// drifting to the 28th/29th forever
fn monthly_due_date(anchor: NaiveDate, payment_number: u32) -> NaiveDate {
    let offset = payment_number as i32 - 1;
    let total_months = anchor.year() * 12 + anchor.month0() as i32 + offset;
    let year = total_months.div_euclid(12);
    let month = total_months.rem_euclid(12) as u32 + 1;
    clamped_date(year, month, anchor.day())
}

/// fixed pattern days selected once from the anchor day-of-month
fn bimonthly_pattern(anchor_day: u32) -> (u32, u32) {
    match anchor_day {
        1..=7 => (5, 20),
        8..=17 => (15, 30),
        _ => (10, 25),
    }
}

/// walks the alternating pattern-day sequence: payment n is the
/// (n - 1)th pattern date strictly after the anchor, wrapping to the
/// next month past the second pattern day
fn bimonthly_due_date(anchor: NaiveDate, payment_number: u32) -> NaiveDate {
    let (first_day, second_day) = bimonthly_pattern(anchor.day());
    let mut year = anchor.year();
    let mut month = anchor.month();
    let mut slots_seen = 0;
    loop {
        for day in [first_day, second_day] {
            let slot = clamped_date(year, month, day);
            if slot > anchor {
                slots_seen += 1;
                if slots_seen == payment_number - 1 {
                    return slot;
                }
            }
        }
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
}

/// build a date with the day clamped to the month length; the clamp
/// makes construction infallible for in-range years
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
