//! capy-launcher - Minimal home screen for Linux desktops
//!
//! Renders the chosen apps once as text. An optional 1-based position
//! argument launches that app instead, like tapping it on the home screen.
//! Subcommands edit the selection from a text settings screen.

mod commands;
mod event_bus;
mod panels;
mod services;

use capy_home::home::home_entries;
use clap::Parser;
use commands::Cli;
use event_bus::HomeEvent;
use log::{debug, info};
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting capy-launcher...");

    let cli = Cli::parse();

    let mut bus = event_bus::subscribe();
    let services = services::start_all();

    // Catalog scan and prefs read are blocking I/O.
    let home = services.home.clone();
    tokio::task::spawn_blocking(move || services::apps::load(&home)).await?;
    // Let the forwarders publish what happened during startup.
    tokio::task::yield_now().await;

    let mut active = services.notifications.tracker.snapshot();
    for event in event_bus::drain_latest(&mut bus) {
        match event {
            HomeEvent::Selection(event) => debug!("Selection event: {:?}", event),
            HomeEvent::Notifications(set) => active = set,
        }
    }

    match (cli.command, cli.position) {
        (Some(command), _) => print!("{}", commands::run(&services.home, command)),
        (None, Some(0)) => info!("App positions start at 1"),
        (None, Some(position)) => services::apps::launch_selected(&services.home, position - 1),
        (None, None) => {
            let selected = services::apps::lock(&services.home).selected_view().to_vec();
            let entries = home_entries(&selected, &active);
            print!(
                "{}",
                panels::home::render(&entries, chrono::Local::now().naive_local())
            );
        }
    }

    services.notifications.stop();
    Ok(())
}
