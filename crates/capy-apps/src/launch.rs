//! Launching desktop applications.

use crate::catalog::DesktopCatalog;
use crate::error::CatalogError;
use log::{debug, info, warn};
use std::process::{Command, Stdio};

/// Expand an Exec line into argv, dropping XDG field codes.
/// No files or URLs are passed, so %f/%F/%u/%U and friends expand to nothing.
pub fn exec_to_argv(exec: &str) -> Vec<String> {
    let mut argv = Vec::new();

    for token in split_exec(exec) {
        if token.len() == 2 && token.starts_with('%') && token != "%%" {
            continue;
        }

        let mut arg = String::with_capacity(token.len());
        let mut chars = token.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '%' {
                match chars.next() {
                    Some('%') => arg.push('%'),
                    Some(_) | None => {}
                }
            } else {
                arg.push(c);
            }
        }

        if !arg.is_empty() {
            argv.push(arg);
        }
    }

    argv
}

/// Split on whitespace, honouring double quotes and backslash escapes inside them.
fn split_exec(exec: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Try to launch the app with the given id.
/// Returns Ok(false) when the catalog has no launchable entry for it.
pub fn try_launch(catalog: &DesktopCatalog, id: &str) -> Result<bool, CatalogError> {
    let Some(app) = catalog.get_app(id) else {
        return Ok(false);
    };

    let argv = exec_to_argv(&app.exec);
    let Some((program, args)) = argv.split_first() else {
        return Ok(false);
    };

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    info!("Launched {} ({})", app.name, id);
    Ok(true)
}

/// Launch an app, silently dropping the request if it cannot be launched.
pub fn launch(catalog: &DesktopCatalog, id: &str) {
    match try_launch(catalog, id) {
        Ok(true) => {}
        Ok(false) => debug!("No launchable entry for {}, ignoring", id),
        Err(e) => warn!("Failed to launch {}: {}", id, e),
    }
}
