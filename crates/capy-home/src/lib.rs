//! capy-home - Home-screen selection engine
//!
//! Joins the installed app catalog with the saved, user-ordered list:
//! - up to `MAX_SELECTED` apps, in the order the user chose
//! - optional custom names
//! - every change written back to the preferences store

mod engine;
pub mod home;
mod record;

pub use engine::{MAX_SELECTED, SelectionEngine};
pub use record::{AppRecord, Change, IgnoreReason, SelectionEvent};
