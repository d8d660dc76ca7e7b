//! Domain utilities

pub mod time_format;

pub use time_format::{
    day_month_label, format_query_timestamp, hour_label, parse_calendar_date, parse_clock_time,
    parse_timestamp, slot_label,
};
