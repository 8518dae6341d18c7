//! Common routines for reading input data: save files of buildings and TOML settings files.
//!
//! A save file holds any number of buildings, one after another. Each building is laid out as
//! follows, with fields separated by `:` and lists by `,`:
//!
//! ```text
//! buildingName
//! numFloors
//! floorNumber:width:length:numRooms[:maintenanceRoomNumbers]
//! roomNumber:ROOM_TYPE:area:numSensors[:RuleBased|WeightingBased]
//! SensorType:reading,reading,...[:extraFields][@weighting]
//! ```
//!
//! Each floor line is followed by its rooms and each room line by its sensors.
use crate::building::Building;
use crate::error::{FileFormatError, LoadError};
use crate::timer::TimedItemManager;
use anyhow::{Context, Result, anyhow, ensure};
use log::info;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Lines};
use std::num::ParseIntError;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

mod building;
use building::read_building;
mod floor;
mod room;
mod sensor;

/// Separates the fields of a line
const FIELD_SEPARATOR: char = ':';

/// Separates the items of a list within a field
const LIST_SEPARATOR: char = ',';

/// Separates a sensor line from its weighting
const WEIGHTING_SEPARATOR: char = '@';

/// Read a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Load all the buildings in a save file.
///
/// Maintenance schedules in the file are registered with `timer`. If loading fails, nothing is
/// registered.
///
/// # Arguments
///
/// * `file_path` - Path to the save file
/// * `timer` - The timer which will drive the buildings' maintenance schedules
pub fn load_buildings(
    file_path: &Path,
    timer: &mut TimedItemManager,
) -> Result<Vec<Building>, LoadError> {
    let file = File::open(file_path)?;
    let buildings = read_buildings(BufReader::new(file), timer)?;
    info!(
        "Loaded {} building(s) from {}",
        buildings.len(),
        file_path.display()
    );

    Ok(buildings)
}

/// Read all the buildings from a stream in the save file format.
///
/// Either every building is read or, on the first problem, none are. Failing to read from the
/// stream gives [`LoadError::Io`] and any problem with its contents gives [`LoadError::Format`].
///
/// # Arguments
///
/// * `reader` - The stream to read from
/// * `timer` - The timer which will drive the buildings' maintenance schedules
pub fn read_buildings<R: BufRead>(
    reader: R,
    timer: &mut TimedItemManager,
) -> Result<Vec<Building>, LoadError> {
    // Register schedules with a copy of the timer so that nothing is left registered on failure
    let mut staged_timer = timer.clone();
    let mut lines = SaveFileLines::new(reader);
    let mut buildings = Vec::new();
    while let Some(name) = lines.next_line()? {
        lines.check(check_not_empty(&name, "building name"))?;
        let building = lines.check(Building::new(name))?;
        buildings.push(read_building(&mut lines, building, &mut staged_timer)?);
    }

    *timer = staged_timer;
    Ok(buildings)
}

/// The lines of a save file, numbered for error messages
struct SaveFileLines<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> SaveFileLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// The number of the line most recently read, starting from 1
    fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line, or `None` at the end of the stream.
    ///
    /// A line which is not valid UTF-8 is a problem with the file's contents, not with reading it.
    fn next_line(&mut self) -> Result<Option<String>, LoadError> {
        let Some(line) = self.lines.next() else {
            return Ok(None);
        };

        self.line_number += 1;
        match line {
            Ok(line) => Ok(Some(line)),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => Err(FileFormatError::new(
                self.line_number,
                &anyhow!("Line is not valid UTF-8"),
            )
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Read the next line, which must be present and not empty
    fn expect_line(&mut self, what: &str) -> Result<String, LoadError> {
        let Some(line) = self.next_line()? else {
            return Err(FileFormatError::new(
                self.line_number + 1,
                &anyhow!("Expected {what} but reached end of file"),
            )
            .into());
        };

        self.check(check_not_empty(&line, what))?;
        Ok(line)
    }

    /// Attribute the result of parsing or validation to the current line
    fn check<T, E>(&self, result: Result<T, E>) -> Result<T, LoadError>
    where
        E: Into<anyhow::Error>,
    {
        check_at(self.line_number, result)
    }
}

/// Attribute the result of parsing or validation to the given line
fn check_at<T, E>(line_number: usize, result: Result<T, E>) -> Result<T, LoadError>
where
    E: Into<anyhow::Error>,
{
    result.map_err(|err| FileFormatError::new(line_number, &err.into()).into())
}

fn check_not_empty(line: &str, what: &str) -> Result<()> {
    ensure!(!line.is_empty(), "Expected {what} but found an empty line");
    Ok(())
}

/// Split a line into fields, checking how many there are
fn split_fields<'a>(
    line: &'a str,
    count: RangeInclusive<usize>,
    what: &str,
) -> Result<Vec<&'a str>> {
    let fields: Vec<_> = line.split(FIELD_SEPARATOR).collect();
    ensure!(
        count.contains(&fields.len()),
        "{what} line must have {} fields, but has {}",
        if count.start() == count.end() {
            count.start().to_string()
        } else {
            format!("{} to {}", count.start(), count.end())
        },
        fields.len()
    );

    Ok(fields)
}

/// Parse a whole number, which may be negative
fn parse_int<T>(value: &str, what: &str) -> Result<T>
where
    T: FromStr<Err = ParseIntError>,
{
    value
        .parse()
        .with_context(|| format!("Invalid {what}: {value:?}"))
}

/// Check that a number already known not to be negative fits in a `u32`
fn check_u32_range(value: i64, what: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .with_context(|| format!("Expected {what} no greater than {} (got {value})", u32::MAX))
}

/// Parse a whole number which cannot be negative
fn parse_non_negative(value: &str, what: &str) -> Result<u32> {
    let value: i64 = parse_int(value, what)?;
    ensure!(value >= 0, "Expected non-negative {what} (got {value})");
    check_u32_range(value, what)
}

/// Parse a whole number which must be greater than zero
fn parse_positive(value: &str, what: &str) -> Result<u32> {
    let value: i64 = parse_int(value, what)?;
    ensure!(value > 0, "Expected positive {what} (got {value})");
    check_u32_range(value, what)
}

/// Parse a finite decimal number
fn parse_decimal(value: &str, what: &str) -> Result<f64> {
    let parsed: f64 = value
        .parse()
        .with_context(|| format!("Invalid {what}: {value:?}"))?;
    ensure!(parsed.is_finite(), "Invalid {what}: {value:?}");
    Ok(parsed)
}

/// Parse a non-empty list of non-negative whole numbers
fn parse_list(value: &str, what: &str) -> Result<Vec<u32>> {
    value
        .split(LIST_SEPARATOR)
        .map(|item| parse_non_negative(item, what))
        .collect()
}
