//! Plain-text home screen.

use capy_home::home::{EMPTY_HOME_MESSAGE, HomeEntry};
use chrono::NaiveDateTime;

pub mod clock;

/// Render the clock header followed by the app list.
pub fn render(entries: &[HomeEntry], now: NaiveDateTime) -> String {
    let (time, date) = clock::format_clock(now);
    let mut out = format!("{time}\n{date}\n\n");

    if entries.is_empty() {
        out.push_str(EMPTY_HOME_MESSAGE);
        out.push('\n');
        return out;
    }

    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!("{:>2}  {}\n", i + 1, entry.render()));
    }

    out
}
