//! Code for reading a floor and its rooms from a save file.
use super::room::read_room;
use super::{
    SaveFileLines, check_at, parse_decimal, parse_list, parse_non_negative, parse_positive,
    split_fields,
};
use crate::error::LoadError;
use crate::floor::Floor;
use crate::id::{FloorNumber, RoomNumber};
use crate::timer::TimedItemManager;
use crate::units::Metres;
use anyhow::Result;
use std::io::BufRead;

/// The contents of the line which introduces a floor
#[derive(Debug)]
struct FloorHeader {
    floor: Floor,
    room_count: u32,
    maintenance_order: Option<Vec<RoomNumber>>,
}

fn parse_floor_header(line: &str) -> Result<FloorHeader> {
    let fields = split_fields(line, 4..=5, "Floor")?;
    let number = parse_positive(fields[0], "floor number")?;
    let width = parse_decimal(fields[1], "floor width")?;
    let length = parse_decimal(fields[2], "floor length")?;
    let room_count = parse_non_negative(fields[3], "room count")?;
    let maintenance_order = fields
        .get(4)
        .map(|order| parse_list(order, "maintenance room number"))
        .transpose()?
        .map(|order| order.into_iter().map(RoomNumber).collect());

    Ok(FloorHeader {
        floor: Floor::new(FloorNumber(number), Metres(width), Metres(length))?,
        room_count,
        maintenance_order,
    })
}

/// Read a floor, along with its rooms.
///
/// Returns the floor and the number of the line which introduced it.
pub(super) fn read_floor<R: BufRead>(
    lines: &mut SaveFileLines<R>,
    timer: &mut TimedItemManager,
) -> Result<(Floor, usize), LoadError> {
    let line = lines.expect_line("floor")?;
    let line_number = lines.line_number();
    let header = lines.check(parse_floor_header(&line))?;

    let mut floor = header.floor;
    for _ in 0..header.room_count {
        let (room, room_line_number) = read_room(lines)?;
        check_at(room_line_number, floor.add_room(room))?;
    }

    if let Some(order) = header.maintenance_order {
        check_at(
            line_number,
            floor.create_maintenance_schedule(order, timer),
        )?;
    }

    Ok((floor, line_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    fn read(input: &str, timer: &mut TimedItemManager) -> Result<Floor, LoadError> {
        let mut lines = SaveFileLines::new(input.as_bytes());
        read_floor(&mut lines, timer).map(|(floor, _)| floor)
    }

    #[test]
    fn test_parse_floor_header() {
        let header = parse_floor_header("3:12.50:8.00:2:101,102").unwrap();
        assert_eq!(header.floor.number(), FloorNumber(3));
        assert_approx_eq!(f64, header.floor.width().value(), 12.5);
        assert_approx_eq!(f64, header.floor.length().value(), 8.0);
        assert_eq!(header.room_count, 2);
        assert_eq!(
            header.maintenance_order,
            Some(vec![RoomNumber(101), RoomNumber(102)])
        );

        let header = parse_floor_header("1:10:10:0").unwrap();
        assert!(header.maintenance_order.is_none());
    }

    #[rstest]
    #[case("1:10.00:10.00", "Floor line must have 4 to 5 fields, but has 3")]
    #[case("1:10.00:10.00:0:101:102", "Floor line must have 4 to 5 fields, but has 6")]
    #[case("0:10.00:10.00:0", "Expected positive floor number (got 0)")]
    #[case("1:4.99:10.00:0", "Floor width must be at least 5 (got 4.99)")]
    #[case("1:10.00:wide:0", "Invalid floor length: \"wide\": invalid float literal")]
    #[case("1:10.00:10.00:-2", "Expected non-negative room count (got -2)")]
    #[case("1:10.00:10.00:0:", "Invalid maintenance room number: \"\": cannot parse integer from empty string")]
    fn test_parse_floor_header_invalid(#[case] line: &str, #[case] msg: &str) {
        assert_error!(parse_floor_header(line), msg);
    }

    #[test]
    fn test_read_floor_with_schedule() {
        let mut timer = TimedItemManager::default();
        let floor = read(
            "1:10.00:10.00:2:102,101\n101:STUDY:5.00:0\n102:OFFICE:15.79:0\n",
            &mut timer,
        )
        .unwrap();
        assert_eq!(floor.rooms().len(), 2);

        let schedule = floor.maintenance_schedule().unwrap();
        assert_eq!(schedule.room_order(), [RoomNumber(102), RoomNumber(101)]);
        assert!(timer.is_registered(schedule.id()));
        assert!(floor.room(RoomNumber(102)).unwrap().maintenance_ongoing());
    }

    #[test]
    fn test_read_floor_too_few_rooms() {
        let mut timer = TimedItemManager::default();
        assert_error!(
            read(
                "1:10.00:10.00:3\n101:STUDY:5.00:0\n102:OFFICE:15.79:0\n",
                &mut timer
            ),
            "Invalid save file (line 4): Expected room but reached end of file"
        );

        // The next floor is read as a room
        assert_error!(
            read(
                "1:10.00:10.00:3\n101:STUDY:5.00:0\n102:OFFICE:15.79:0\n2:10.00:10.00:0\n",
                &mut timer
            ),
            "Invalid save file (line 4): Invalid room type: \"10.00\""
        );
    }

    #[test]
    fn test_read_floor_room_errors() {
        let mut timer = TimedItemManager::default();
        assert_error!(
            read(
                "1:10.00:10.00:2\n101:STUDY:5.00:0\n101:OFFICE:15.79:0\n",
                &mut timer
            ),
            "Invalid save file (line 3): Room 101 already exists on this floor"
        );
        assert_error!(
            read(
                "1:5.00:5.00:2\n101:STUDY:20.00:0\n102:OFFICE:6.00:0\n",
                &mut timer
            ),
            "Invalid save file (line 3): Insufficient space to add room 102: floor area 25.00 \
            m^2, occupied area 20.00 m^2, room area 6.00 m^2"
        );
    }

    #[rstest]
    #[case("1:10.00:10.00:1:103\n101:STUDY:5.00:0\n", "Room 103 is not on this floor")]
    #[case("1:10.00:10.00:1:101,101\n101:STUDY:5.00:0\n", "Room 101 appears twice in a row")]
    #[case("1:10.00:10.00:2:101,102,101\n101:STUDY:5.00:0\n102:STUDY:5.00:0\n", "Room 101 appears twice in a row")]
    fn test_read_floor_invalid_schedule(#[case] input: &str, #[case] reason: &str) {
        let mut timer = TimedItemManager::default();
        assert_error!(
            read(input, &mut timer),
            format!("Invalid save file (line 1): Invalid maintenance schedule: {reason}")
        );
        assert!(timer.is_empty());
    }
}
