//! Plain-text settings screen: the selection header, the chosen apps with
//! their move buttons, then every installed app.

use capy_home::AppRecord;
use capy_home::home::{reorder_controls, selection_header};

pub fn render(selected: &[AppRecord], catalog: &[AppRecord]) -> String {
    let mut out = format!("{}\n\n", selection_header(selected.len()));

    for (i, app) in selected.iter().enumerate() {
        let controls = reorder_controls(i, selected.len());
        let up = if controls.can_move_up { "↑" } else { " " };
        let down = if controls.can_move_down { "↓" } else { " " };
        out.push_str(&format!("{:>2}  {}{}  {}\n", i + 1, up, down, app.display_name()));
    }
    if !selected.is_empty() {
        out.push('\n');
    }

    for app in catalog {
        let mark = if app.is_selected { "x" } else { " " };
        out.push_str(&format!(
            "[{}] {} ({})\n",
            mark,
            app.display_name(),
            app.package_id
        ));
    }

    out
}
