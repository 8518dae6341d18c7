//! Floors are the levels of a building. Each holds a set of rooms and may have a maintenance
//! schedule.
use crate::error::BuildingError;
use crate::id::{FloorNumber, RoomNumber};
use crate::maintenance::{MaintenanceSchedule, check_room_order};
use crate::room::{Room, RoomType};
use crate::timer::TimedItemManager;
use crate::units::{Metres, SquareMetres};
use indexmap::IndexMap;
use log::debug;

/// The smallest width a floor may have
pub const MIN_WIDTH: Metres = Metres(5.0);

/// The smallest length a floor may have
pub const MIN_LENGTH: Metres = Metres(5.0);

/// The rooms on a floor, keyed by number, in the order they were added
pub type RoomMap = IndexMap<RoomNumber, Room>;

/// Round a floor dimension to two decimal places and check it is no smaller than its minimum
fn check_dimension(
    what: &'static str,
    value: Metres,
    minimum: Metres,
) -> Result<Metres, BuildingError> {
    let value = value.round_to_two_places();
    if !value.is_finite() || value < minimum {
        return Err(BuildingError::TooSmall {
            what,
            minimum: minimum.value(),
            value: value.value(),
        });
    }

    Ok(value)
}

/// A floor of a building
#[derive(Debug, Clone)]
pub struct Floor {
    number: FloorNumber,
    width: Metres,
    length: Metres,
    rooms: RoomMap,
    maintenance_schedule: Option<MaintenanceSchedule>,
}

impl Floor {
    /// Create a new floor with no rooms.
    ///
    /// # Arguments
    ///
    /// * `number` - Number of the floor, starting from 1 for the ground floor
    /// * `width` - Width of the floor, which must be at least [`MIN_WIDTH`]
    /// * `length` - Length of the floor, which must be at least [`MIN_LENGTH`]
    ///
    /// Both dimensions are rounded to two decimal places.
    pub fn new(
        number: FloorNumber,
        width: Metres,
        length: Metres,
    ) -> Result<Self, BuildingError> {
        if number.value() == 0 {
            return Err(BuildingError::InvalidFloorNumber);
        }
        let width = check_dimension("Floor width", width, MIN_WIDTH)?;
        let length = check_dimension("Floor length", length, MIN_LENGTH)?;

        Ok(Self {
            number,
            width,
            length,
            rooms: RoomMap::new(),
            maintenance_schedule: None,
        })
    }

    /// The number of this floor
    pub fn number(&self) -> FloorNumber {
        self.number
    }

    /// The width of this floor
    pub fn width(&self) -> Metres {
        self.width
    }

    /// The length of this floor
    pub fn length(&self) -> Metres {
        self.length
    }

    /// The total area of this floor
    pub fn area(&self) -> SquareMetres {
        self.width * self.length
    }

    /// The area of this floor taken up by rooms
    pub fn occupied_area(&self) -> SquareMetres {
        self.rooms.values().map(Room::area).sum()
    }

    /// The rooms on this floor, in the order they were added
    pub fn rooms(&self) -> &RoomMap {
        &self.rooms
    }

    /// The room with the given number, if it is on this floor
    pub fn room(&self, number: RoomNumber) -> Option<&Room> {
        self.rooms.get(&number)
    }

    /// Mutable access to the room with the given number, if it is on this floor
    pub fn room_mut(&mut self, number: RoomNumber) -> Option<&mut Room> {
        self.rooms.get_mut(&number)
    }

    /// Add a room to this floor.
    ///
    /// The room's number must not already be in use on this floor and there must be enough
    /// unoccupied area left for it.
    pub fn add_room(&mut self, room: Room) -> Result<(), BuildingError> {
        if self.rooms.contains_key(&room.number()) {
            return Err(BuildingError::DuplicateRoom(room.number()));
        }

        let occupied_area = self.occupied_area();
        if occupied_area + room.area() > self.area() {
            return Err(BuildingError::InsufficientSpace {
                room: room.number(),
                floor_area: self.area(),
                occupied_area,
                room_area: room.area(),
            });
        }

        self.rooms.insert(room.number(), room);
        Ok(())
    }

    /// Change the width and length of this floor.
    ///
    /// The new dimensions are rounded to two decimal places. They must meet the minimums and leave
    /// enough area for the existing rooms.
    /// Whether the floor still fits with the floors above and below it is up to the building.
    pub(crate) fn change_dimensions(
        &mut self,
        width: Metres,
        length: Metres,
    ) -> Result<(), BuildingError> {
        let width = check_dimension("Floor width", width, MIN_WIDTH)?;
        let length = check_dimension("Floor length", length, MIN_LENGTH)?;

        let new_area = width * length;
        let occupied_area = self.occupied_area();
        if new_area < occupied_area {
            return Err(BuildingError::FloorTooSmall {
                floor: self.number,
                reason: format!(
                    "new area of {new_area} m^2 cannot hold rooms totalling {occupied_area} m^2"
                ),
            });
        }

        self.width = width;
        self.length = length;
        Ok(())
    }

    /// Start a fire drill in every room on this floor, or only in rooms of the given type
    pub fn fire_drill(&mut self, room_type: Option<RoomType>) {
        for room in self.rooms.values_mut() {
            if room_type.is_none_or(|room_type| room.room_type() == room_type) {
                room.set_fire_drill(true);
            }
        }
    }

    /// End any fire drill on this floor
    pub fn cancel_fire_drill(&mut self) {
        for room in self.rooms.values_mut() {
            room.set_fire_drill(false);
        }
    }

    /// The maintenance schedule for this floor, if it has one
    pub fn maintenance_schedule(&self) -> Option<&MaintenanceSchedule> {
        self.maintenance_schedule.as_ref()
    }

    /// Give this floor a new maintenance schedule, replacing any existing one.
    ///
    /// The first room in the order is put under maintenance straight away. If there was already a
    /// schedule, the room it was maintaining is released and the old schedule stops receiving time
    /// ticks.
    ///
    /// # Arguments
    ///
    /// * `room_order` - The order in which to maintain rooms, which repeats once finished
    /// * `timer` - The timer which will drive the schedule
    pub fn create_maintenance_schedule(
        &mut self,
        room_order: Vec<RoomNumber>,
        timer: &mut TimedItemManager,
    ) -> Result<(), BuildingError> {
        check_room_order(&room_order, &self.rooms)?;

        if let Some(old_schedule) = self.maintenance_schedule.take() {
            old_schedule.stop(&mut self.rooms);
            timer.unregister(old_schedule.id());
        }

        debug!(
            "Starting maintenance schedule for floor {} with {} rooms",
            self.number,
            room_order.len()
        );
        let id = timer.register();
        self.maintenance_schedule = Some(MaintenanceSchedule::start(
            room_order,
            &mut self.rooms,
            id,
        ));
        Ok(())
    }

    /// Abandon maintenance of the current room and move on to the next.
    ///
    /// Does nothing if the floor has no maintenance schedule.
    pub fn skip_current_maintenance(&mut self) {
        if let Some(schedule) = &mut self.maintenance_schedule {
            schedule.skip_current_maintenance(&mut self.rooms);
        }
    }

    /// Advance the readings of every sensor on this floor by one minute
    pub(crate) fn elapse_sensors(&mut self) {
        for room in self.rooms.values_mut() {
            room.elapse_sensors();
        }
    }

    /// Carry out one minute of maintenance according to the schedule, if there is one
    pub(crate) fn elapse_maintenance(&mut self) {
        if let Some(schedule) = &mut self.maintenance_schedule {
            schedule.elapse_one_minute(&mut self.rooms);
        }
    }
}

impl PartialEq for Floor {
    /// Floors are equal if they have the same number, dimensions, rooms and schedule order.
    ///
    /// The order in which rooms were added does not matter.
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && self.width == other.width
            && self.length == other.length
            && self.rooms == other.rooms
            && self.maintenance_schedule == other.maintenance_schedule
    }
}
