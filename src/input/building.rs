//! Code for reading a building and its floors from a save file.
use super::floor::read_floor;
use super::{SaveFileLines, check_at, parse_non_negative};
use crate::building::Building;
use crate::error::LoadError;
use crate::timer::TimedItemManager;
use log::debug;
use std::io::BufRead;

/// Read the floors of a building whose name has already been read
pub(super) fn read_building<R: BufRead>(
    lines: &mut SaveFileLines<R>,
    mut building: Building,
    timer: &mut TimedItemManager,
) -> Result<Building, LoadError> {
    let line = lines.expect_line("floor count")?;
    let floor_count = lines.check(parse_non_negative(&line, "floor count"))?;

    for _ in 0..floor_count {
        let (floor, line_number) = read_floor(lines, timer)?;
        check_at(line_number, building.add_floor(floor))?;
    }

    debug!(
        "Read building {} with {floor_count} floor(s)",
        building.name()
    );
    Ok(building)
}
