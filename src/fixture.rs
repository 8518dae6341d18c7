//! Fixtures for tests

use crate::building::Building;
use crate::floor::{Floor, RoomMap};
use crate::id::{FloorNumber, RoomNumber};
use crate::room::{Room, RoomType};
use crate::sensor::{NoiseSensor, Sensor, TemperatureSensor};
use crate::units::{Metres, SquareMetres};
use rstest::fixture;

/// Assert that an error with the given message (including any context chain) occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(format!("{:#}", $result.unwrap_err()), $msg);
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn study_room() -> Room {
    Room::new(RoomNumber(101), RoomType::Study, SquareMetres(5.0)).unwrap()
}

#[fixture]
pub fn rooms(study_room: Room) -> RoomMap {
    let office = Room::new(RoomNumber(102), RoomType::Office, SquareMetres(15.786)).unwrap();
    let laboratory =
        Room::new(RoomNumber(103), RoomType::Laboratory, SquareMetres(20.25)).unwrap();

    [study_room, office, laboratory]
        .into_iter()
        .map(|room| (room.number(), room))
        .collect()
}

#[fixture]
pub fn floor(rooms: RoomMap) -> Floor {
    let mut floor = Floor::new(FloorNumber(1), Metres(10.0), Metres(10.0)).unwrap();
    for room in rooms.into_values() {
        floor.add_room(room).unwrap();
    }
    floor
}

#[fixture]
pub fn building(floor: Floor) -> Building {
    let mut building = Building::new("General Purpose South").unwrap();
    building.add_floor(floor).unwrap();
    building
        .add_floor(Floor::new(FloorNumber(2), Metres(9.0), Metres(10.0)).unwrap())
        .unwrap();
    building
}

#[fixture]
pub fn temperature_sensor() -> Sensor {
    TemperatureSensor::new(vec![25, 30, 32]).unwrap().into()
}

#[fixture]
pub fn noise_sensor() -> Sensor {
    NoiseSensor::new(vec![60, 72, 55], 2).unwrap().into()
}
