//! Code for reading a room and its sensors from a save file.
use super::sensor::parse_sensor_line;
use super::{SaveFileLines, parse_decimal, parse_non_negative, split_fields};
use crate::error::LoadError;
use crate::hazard::{HazardEvaluatorKind, RuleBasedHazardEvaluator, WeightingBasedHazardEvaluator};
use crate::id::RoomNumber;
use crate::room::{Room, RoomType};
use crate::units::SquareMetres;
use anyhow::{Context, Result};
use std::io::BufRead;

/// The contents of the line which introduces a room
#[derive(Debug)]
struct RoomHeader {
    room: Room,
    sensor_count: u32,
    evaluator: Option<HazardEvaluatorKind>,
}

fn parse_room_header(line: &str) -> Result<RoomHeader> {
    let fields = split_fields(line, 4..=5, "Room")?;
    let number = parse_non_negative(fields[0], "room number")?;
    let room_type: RoomType = fields[1]
        .parse()
        .ok()
        .with_context(|| format!("Invalid room type: {:?}", fields[1]))?;
    let area = parse_decimal(fields[2], "room area")?;
    let sensor_count = parse_non_negative(fields[3], "sensor count")?;
    let evaluator = fields
        .get(4)
        .map(|kind| {
            kind.parse()
                .ok()
                .with_context(|| format!("Invalid hazard evaluator type: {kind:?}"))
        })
        .transpose()?;

    Ok(RoomHeader {
        room: Room::new(RoomNumber(number), room_type, SquareMetres(area))?,
        sensor_count,
        evaluator,
    })
}

/// Read a room, along with its sensors and hazard evaluator.
///
/// Returns the room and the number of the line which introduced it.
pub(super) fn read_room<R: BufRead>(
    lines: &mut SaveFileLines<R>,
) -> Result<(Room, usize), LoadError> {
    let line = lines.expect_line("room")?;
    let line_number = lines.line_number();
    let RoomHeader {
        mut room,
        sensor_count,
        evaluator,
    } = lines.check(parse_room_header(&line))?;

    let weighted = evaluator == Some(HazardEvaluatorKind::WeightingBased);
    let mut weightings = Vec::new();
    for _ in 0..sensor_count {
        let line = lines.expect_line("sensor")?;
        let (sensor, weighting) = lines.check(parse_sensor_line(&line, weighted))?;
        if let Some(weighting) = weighting {
            weightings.push((sensor.kind(), weighting));
        }
        lines.check(room.add_sensor(sensor))?;
    }

    match evaluator {
        None => {}
        Some(HazardEvaluatorKind::RuleBased) => {
            let evaluator = RuleBasedHazardEvaluator::new(room.sensors().keys().copied());
            lines.check(room.set_hazard_evaluator(evaluator.into()))?;
        }
        Some(HazardEvaluatorKind::WeightingBased) => {
            let evaluator = lines.check(WeightingBasedHazardEvaluator::new(weightings))?;
            lines.check(room.set_hazard_evaluator(evaluator.into()))?;
        }
    }

    Ok((room, line_number))
}
