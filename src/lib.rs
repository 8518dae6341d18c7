//! Common functionality for the building management system.
//!
//! A building is made up of floors, floors of rooms and rooms of sensors. The model types enforce
//! the structural rules of this hierarchy, the [`input`] and [`output`] modules convert it to and
//! from the save file format, and the [`timer`] module drives maintenance schedules and sensor
//! readings forward in time.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod building;
pub mod cli;
pub mod error;
pub mod floor;
pub mod hazard;
pub mod id;
pub mod input;
pub mod log;
pub mod maintenance;
pub mod output;
pub mod room;
pub mod sensor;
pub mod settings;
pub mod timer;
pub mod units;
mod utils;

#[cfg(test)]
mod fixture;

/// Get config dir for program.
///
/// The settings file lives here.
pub fn get_bms_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No appropriate config dir on this platform, so fall back on the working directory
        return PathBuf::default();
    };

    config_dir.push("bms");
    config_dir
}
