//! Command line: render the home screen, launch an app, or edit the selection.

use crate::panels;
use crate::services::apps::{self, SharedEngine};
use capy_home::home::{CAP_REACHED_MESSAGE, rename_prefill};
use capy_home::{Change, IgnoreReason};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

#[derive(Parser)]
#[command(
    name = "capy-launcher",
    about = "Minimal home screen for Linux desktops",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// 1-based home position of the app to launch
    pub position: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the selection and every installed app
    Settings,
    /// Add an app to the home screen, or remove it
    Toggle { package_id: String },
    /// Move a selected app one place
    Move {
        /// 1-based position in the selection
        position: usize,
        direction: Direction,
    },
    /// Set a custom name, or print the current one when NAME is omitted.
    /// An empty name restores the app's own label.
    Rename {
        package_id: String,
        name: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Direction {
    Up,
    Down,
}

/// Run a settings command against a loaded engine and return what to print.
pub fn run(engine: &SharedEngine, command: Commands) -> String {
    let mut engine = apps::lock(engine);

    let change = match command {
        Commands::Settings => Change::Applied,
        Commands::Toggle { package_id } => engine.toggle_selection(&package_id),
        Commands::Move {
            position,
            direction,
        } => match (position.checked_sub(1), direction) {
            (Some(index), Direction::Up) => engine.move_up(index),
            (Some(index), Direction::Down) => engine.move_down(index),
            (None, _) => Change::Ignored(IgnoreReason::IndexOutOfRange),
        },
        Commands::Rename {
            package_id,
            name: None,
        } => {
            return match engine.find(&package_id) {
                Some(app) => format!("{}\n", rename_prefill(app)),
                None => {
                    info!("No installed app {}", package_id);
                    String::new()
                }
            };
        }
        Commands::Rename {
            package_id,
            name: Some(name),
        } => engine.rename(&package_id, &name),
    };

    let mut out = String::new();
    match change {
        Change::Applied => {}
        Change::Ignored(IgnoreReason::SelectionFull) => {
            out.push_str(CAP_REACHED_MESSAGE);
            out.push_str("\n\n");
        }
        Change::Ignored(reason) => info!("Nothing changed: {:?}", reason),
    }
    out.push_str(&panels::settings::render(
        engine.selected_view(),
        engine.catalog_view(),
    ));
    out
}
