use chrono::NaiveDateTime;

/// Format the clock header as (time, date), e.g. ("09:05", "Sunday, Oct 18").
pub fn format_clock(now: NaiveDateTime) -> (String, String) {
    let time = now.format("%H:%M").to_string();
    let date = now.format("%A, %b %-d").to_string();
    (time, date)
}
