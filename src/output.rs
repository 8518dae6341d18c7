//! The module responsible for writing buildings to save files.
//!
//! Buildings are written in the same format read by the [`input`](crate::input) module, so that
//! writing then reading back a set of buildings gives the same buildings.
use crate::building::Building;
use crate::floor::Floor;
use crate::room::Room;
use crate::sensor::Sensor;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode a sensor as a single line, without a trailing newline or weighting
pub fn encode_sensor(sensor: &Sensor) -> String {
    let timed = sensor.timed();
    let mut line = format!("{}:{}", sensor.kind(), timed.readings().iter().join(","));
    match sensor {
        Sensor::CarbonDioxide(sensor) => line.push_str(&format!(
            ":{}:{}:{}",
            timed.update_frequency(),
            sensor.ideal_value(),
            sensor.variation_limit()
        )),
        Sensor::Noise(_) => line.push_str(&format!(":{}", timed.update_frequency())),
        Sensor::Occupancy(sensor) => line.push_str(&format!(
            ":{}:{}",
            timed.update_frequency(),
            sensor.capacity()
        )),
        Sensor::Temperature(_) => {}
    }

    line
}

/// Encode a room and its sensors, one line each.
///
/// If the room has a weighting-based evaluator, each sensor line ends with its weighting.
pub fn encode_room(room: &Room) -> String {
    let mut out = format!(
        "{}:{}:{}:{}",
        room.number(),
        room.room_type(),
        room.area(),
        room.sensors().len()
    );
    let evaluator = room.hazard_evaluator();
    if let Some(evaluator) = evaluator {
        out.push_str(&format!(":{}", evaluator.kind()));
    }
    out.push('\n');

    for (kind, sensor) in room.sensors() {
        out.push_str(&encode_sensor(sensor));
        if let Some(weighting) = evaluator.and_then(|evaluator| evaluator.weighting(*kind)) {
            out.push_str(&format!("@{weighting}"));
        }
        out.push('\n');
    }

    out
}

/// Encode a floor and its rooms
pub fn encode_floor(floor: &Floor) -> String {
    let mut out = format!(
        "{}:{}:{}:{}",
        floor.number(),
        floor.width(),
        floor.length(),
        floor.rooms().len()
    );
    if let Some(schedule) = floor.maintenance_schedule() {
        out.push_str(&format!(":{}", schedule.room_order().iter().join(",")));
    }
    out.push('\n');

    for room in floor.rooms().values() {
        out.push_str(&encode_room(room));
    }

    out
}

/// Encode a building and its floors
pub fn encode_building(building: &Building) -> String {
    let mut out = format!("{}\n{}\n", building.name(), building.floors().len());
    for floor in building.floors().values() {
        out.push_str(&encode_floor(floor));
    }

    out
}

/// Write buildings in the save file format to the given stream
pub fn write_buildings<W: Write>(mut writer: W, buildings: &[Building]) -> std::io::Result<()> {
    for building in buildings {
        writer.write_all(encode_building(building).as_bytes())?;
    }
    writer.flush()
}

/// Save buildings to a file.
///
/// # Arguments
///
/// * `file_path` - Where to write the save file
/// * `buildings` - The buildings to save
/// * `overwrite` - Whether to replace an existing file at `file_path`
pub fn save_buildings(file_path: &Path, buildings: &[Building], overwrite: bool) -> Result<()> {
    if file_path.exists() {
        ensure!(
            overwrite,
            "{} already exists. Use --overwrite to replace it.",
            file_path.display()
        );
        warn!("Overwriting {}", file_path.display());
    }

    let file = File::create(file_path)
        .with_context(|| format!("Could not create {}", file_path.display()))?;
    write_buildings(BufWriter::new(file), buildings)
        .with_context(|| format!("Could not write to {}", file_path.display()))?;
    info!(
        "Saved {} building(s) to {}",
        buildings.len(),
        file_path.display()
    );

    Ok(())
}
