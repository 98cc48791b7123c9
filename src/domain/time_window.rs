// Time window resolution and axis label granularity
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

pub const MAX_CUSTOM_SPAN_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("both a start and an end time are required")]
    IncompleteRange,
    #[error("start time must be earlier than end time")]
    InvertedRange,
    #[error("time range cannot exceed 30 days")]
    RangeTooLarge,
    #[error("hours must be a positive number")]
    InvalidHours,
    #[error("look-back of {0} hours is out of range")]
    HoursOutOfRange(u32),
}

impl WindowError {
    pub fn kind(&self) -> &'static str {
        match self {
            WindowError::IncompleteRange => "incomplete_range",
            WindowError::InvertedRange => "inverted_range",
            WindowError::RangeTooLarge => "range_too_large",
            WindowError::InvalidHours => "invalid_hours",
            WindowError::HoursOutOfRange(_) => "hours_out_of_range",
        }
    }
}

/// A user's window choice before it is pinned to concrete instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    Preset { hours: u32 },
    Custom {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

/// Window mode kept in the selection state. Custom pairs are stored only after
/// they passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowMode {
    Preset { hours: u32 },
    Custom { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl From<WindowMode> for WindowRequest {
    fn from(mode: WindowMode) -> Self {
        match mode {
            WindowMode::Preset { hours } => WindowRequest::Preset { hours },
            WindowMode::Custom { start, end } => WindowRequest::Custom {
                start: Some(start),
                end: Some(end),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Set for preset windows, so the backend can be asked by look-back.
    pub lookback_hours: Option<u32>,
}

impl TimeWindow {
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    pub fn granularity(&self) -> Granularity {
        Granularity::for_span(self.span())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    HourMinute,
    MonthDayHour,
}

impl Granularity {
    pub fn for_span(span: Duration) -> Self {
        if span <= Duration::hours(24) {
            Granularity::HourMinute
        } else {
            Granularity::MonthDayHour
        }
    }

    pub fn label_format(&self) -> &'static str {
        match self {
            Granularity::HourMinute => "%H:%M",
            Granularity::MonthDayHour => "%m/%d %H:00",
        }
    }
}

pub fn resolve(request: WindowRequest, now: DateTime<Utc>) -> Result<TimeWindow, WindowError> {
    match request {
        WindowRequest::Preset { hours } => {
            if hours == 0 {
                return Err(WindowError::InvalidHours);
            }
            let start = Duration::try_hours(i64::from(hours))
                .and_then(|lookback| now.checked_sub_signed(lookback))
                .ok_or(WindowError::HoursOutOfRange(hours))?;
            Ok(TimeWindow {
                start,
                end: now,
                lookback_hours: Some(hours),
            })
        }
        WindowRequest::Custom { start, end } => {
            let (Some(start), Some(end)) = (start, end) else {
                return Err(WindowError::IncompleteRange);
            };
            if start >= end {
                return Err(WindowError::InvertedRange);
            }
            if end - start > Duration::days(MAX_CUSTOM_SPAN_DAYS) {
                return Err(WindowError::RangeTooLarge);
            }
            Ok(TimeWindow {
                start,
                end,
                lookback_hours: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
    }

    fn custom(start: DateTime<Utc>, end: DateTime<Utc>) -> WindowRequest {
        WindowRequest::Custom {
            start: Some(start),
            end: Some(end),
        }
    }

    #[test]
    fn test_preset_window() {
        let now = at(2, 12);
        let window = resolve(WindowRequest::Preset { hours: 6 }, now).unwrap();

        assert_eq!(window.end, now);
        assert_eq!(window.start, at(2, 6));
        assert_eq!(window.lookback_hours, Some(6));
        assert_eq!(
            resolve(WindowRequest::Preset { hours: 0 }, now),
            Err(WindowError::InvalidHours)
        );
    }

    #[test]
    fn test_preset_beyond_date_range_rejected() {
        let now = at(2, 12);
        assert_eq!(
            resolve(WindowRequest::Preset { hours: u32::MAX }, now),
            Err(WindowError::HoursOutOfRange(u32::MAX))
        );
        assert_eq!(WindowError::HoursOutOfRange(u32::MAX).kind(), "hours_out_of_range");
    }

    #[test]
    fn test_custom_window_validation_order() {
        let now = at(20, 0);
        let missing_end = WindowRequest::Custom {
            start: Some(at(2, 0)),
            end: None,
        };
        assert_eq!(resolve(missing_end, now), Err(WindowError::IncompleteRange));

        let missing_both = WindowRequest::Custom { start: None, end: None };
        assert_eq!(resolve(missing_both, now), Err(WindowError::IncompleteRange));

        assert_eq!(resolve(custom(at(2, 0), at(1, 0)), now), Err(WindowError::InvertedRange));
        assert_eq!(resolve(custom(at(1, 0), at(1, 0)), now), Err(WindowError::InvertedRange));
    }

    #[test]
    fn test_custom_window_span_limit() {
        let now = at(1, 0);
        let start = at(1, 0);

        let exactly_thirty = resolve(custom(start, start + Duration::days(30)), now).unwrap();
        assert_eq!(exactly_thirty.start, start);
        assert_eq!(exactly_thirty.end, start + Duration::days(30));
        assert_eq!(exactly_thirty.lookback_hours, None);

        assert_eq!(
            resolve(custom(start, start + Duration::days(31)), now),
            Err(WindowError::RangeTooLarge)
        );
        assert_eq!(
            resolve(custom(start, start + Duration::days(30) + Duration::seconds(1)), now),
            Err(WindowError::RangeTooLarge)
        );
    }

    #[test]
    fn test_granularity_follows_span() {
        let now = at(10, 0);
        let day = resolve(WindowRequest::Preset { hours: 24 }, now).unwrap();
        assert_eq!(day.granularity(), Granularity::HourMinute);

        let week = resolve(WindowRequest::Preset { hours: 168 }, now).unwrap();
        assert_eq!(week.granularity(), Granularity::MonthDayHour);

        let custom_short = resolve(custom(at(1, 0), at(1, 3)), now).unwrap();
        assert_eq!(custom_short.granularity(), Granularity::HourMinute);

        let custom_long = resolve(custom(at(1, 0), at(2, 1)), now).unwrap();
        assert_eq!(custom_long.granularity(), Granularity::MonthDayHour);
    }

    #[test]
    fn test_mode_round_trips_into_request() {
        let mode = WindowMode::Custom {
            start: at(1, 0),
            end: at(2, 0),
        };
        let window = resolve(mode.into(), at(5, 0)).unwrap();
        assert_eq!((window.start, window.end), (at(1, 0), at(2, 0)));
    }
}
