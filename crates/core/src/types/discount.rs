//! Fixed time-of-day discount windows.
//!
//! Discounted inventory is only listed during two evening windows. When the
//! inventory is empty the home page shows these windows instead of a grid.

use core::fmt;

use chrono::{NaiveTime, Timelike};

/// A daily discount window, both bounds inclusive at minute granularity.
///
/// Windows whose end is earlier than their start wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountWindow {
    /// Short label as printed on the shelf tag (e.g. `8折`).
    pub label: &'static str,
    /// First minute of the window, minutes after midnight.
    pub start_minute: u16,
    /// Last minute of the window, minutes after midnight.
    pub end_minute: u16,
}

/// The two windows, in the order they occur each evening.
pub static DISCOUNT_WINDOWS: [DiscountWindow; 2] = [
    DiscountWindow {
        label: "8折",
        start_minute: 19 * 60,
        end_minute: 19 * 60 + 59,
    },
    DiscountWindow {
        label: "65折",
        start_minute: 20 * 60,
        end_minute: 3 * 60,
    },
];

impl DiscountWindow {
    /// Whether the window runs past midnight.
    #[must_use]
    pub const fn wraps_midnight(&self) -> bool {
        self.end_minute < self.start_minute
    }

    /// Whether `time` falls inside the window.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        #[allow(clippy::cast_possible_truncation)] // at most 1439
        let minute = (time.hour() * 60 + time.minute()) as u16;

        if self.wraps_midnight() {
            minute >= self.start_minute || minute <= self.end_minute
        } else {
            (self.start_minute..=self.end_minute).contains(&minute)
        }
    }

    /// The window containing `time`, if any.
    #[must_use]
    pub fn active_at(time: NaiveTime) -> Option<&'static Self> {
        DISCOUNT_WINDOWS.iter().find(|window| window.contains(time))
    }

    /// Time range as shown to users, e.g. `20:00 ∼ 03:00`.
    #[must_use]
    pub fn time_range(&self) -> String {
        format!(
            "{} ∼ {}",
            format_minute(self.start_minute),
            format_minute(self.end_minute)
        )
    }
}

impl fmt::Display for DiscountWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.time_range())
    }
}

fn format_minute(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_time_ranges() {
        assert_eq!(DISCOUNT_WINDOWS[0].time_range(), "19:00 ∼ 19:59");
        assert_eq!(DISCOUNT_WINDOWS[1].time_range(), "20:00 ∼ 03:00");
        assert_eq!(DISCOUNT_WINDOWS[1].to_string(), "65折 20:00 ∼ 03:00");
    }

    #[test]
    fn test_first_window_bounds() {
        let window = DISCOUNT_WINDOWS[0];
        assert!(!window.contains(at(18, 59)));
        assert!(window.contains(at(19, 0)));
        assert!(window.contains(at(19, 59)));
        assert!(!window.contains(at(20, 0)));
    }

    #[test]
    fn test_second_window_wraps_midnight() {
        let window = DISCOUNT_WINDOWS[1];
        assert!(window.wraps_midnight());
        assert!(window.contains(at(20, 0)));
        assert!(window.contains(at(23, 59)));
        assert!(window.contains(at(0, 30)));
        assert!(window.contains(at(3, 0)));
        assert!(!window.contains(at(3, 1)));
        assert!(!window.contains(at(12, 0)));
    }

    #[test]
    fn test_active_at() {
        assert_eq!(DiscountWindow::active_at(at(19, 30)).unwrap().label, "8折");
        assert_eq!(DiscountWindow::active_at(at(1, 0)).unwrap().label, "65折");
        assert!(DiscountWindow::active_at(at(15, 0)).is_none());
    }
}
