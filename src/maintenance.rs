//! Maintenance schedules cycle through the rooms of a floor, closing each one for maintenance in
//! turn.
//!
//! A schedule only stores room numbers. The rooms themselves belong to the floor, which passes them
//! in whenever the schedule needs to change their state.
use crate::error::BuildingError;
use crate::floor::RoomMap;
use crate::id::RoomNumber;
use crate::room::{MIN_AREA, Room, RoomState, RoomType};
use crate::timer::TimedItemID;
use crate::utils::round_to_u32;
use itertools::Itertools;
use log::debug;

/// Minutes needed to maintain a room of the minimum area
const BASE_MAINTENANCE_TIME: f64 = 5.0;

/// Extra minutes needed per square metre above the minimum area
const MAINTENANCE_TIME_PER_SQUARE_METRE: f64 = 0.2;

/// How long maintenance of each type of room takes relative to a study room
fn type_multiplier(room_type: RoomType) -> f64 {
    match room_type {
        RoomType::Study => 1.0,
        RoomType::Office => 1.5,
        RoomType::Laboratory => 2.0,
    }
}

/// Calculate the number of minutes needed to maintain a room.
///
/// This depends on the room's area and type.
pub fn maintenance_time(room: &Room) -> u32 {
    let extra_area = (room.area() - MIN_AREA).value();
    let base = BASE_MAINTENANCE_TIME + MAINTENANCE_TIME_PER_SQUARE_METRE * extra_area;
    round_to_u32(base * type_multiplier(room.room_type()))
}

/// Check that a room order is valid for a floor.
///
/// The order must not be empty and every room must be on the floor. The order repeats, so no room
/// may follow itself, including from the end of the order back to the start.
pub(crate) fn check_room_order(
    room_order: &[RoomNumber],
    rooms: &RoomMap,
) -> Result<(), BuildingError> {
    if room_order.is_empty() {
        return Err(BuildingError::InvalidSchedule(
            "Room order cannot be empty".into(),
        ));
    }

    if let Some(number) = room_order.iter().find(|number| !rooms.contains_key(*number)) {
        return Err(BuildingError::InvalidSchedule(format!(
            "Room {number} is not on this floor"
        )));
    }

    let repeated = (room_order.len() > 1)
        .then(|| {
            room_order
                .iter()
                .circular_tuple_windows()
                .find(|(a, b)| a == b)
        })
        .flatten();
    if let Some((number, _)) = repeated {
        return Err(BuildingError::InvalidSchedule(format!(
            "Room {number} appears twice in a row"
        )));
    }

    Ok(())
}

/// A repeating order in which the rooms of a floor are maintained
#[derive(Debug, Clone)]
pub struct MaintenanceSchedule {
    id: TimedItemID,
    room_order: Vec<RoomNumber>,
    current_index: usize,
    time_elapsed: u64,
    completed_time: u64,
    time_elapsed_current_room: u32,
}

impl MaintenanceSchedule {
    /// Start a new schedule, putting the first room under maintenance.
    ///
    /// The room order must already have been checked with [`check_room_order`].
    pub(crate) fn start(
        room_order: Vec<RoomNumber>,
        rooms: &mut RoomMap,
        id: TimedItemID,
    ) -> Self {
        let schedule = Self {
            id,
            room_order,
            current_index: 0,
            time_elapsed: 0,
            completed_time: 0,
            time_elapsed_current_room: 0,
        };
        schedule.set_current_maintenance(rooms, true);
        schedule
    }

    /// The ID under which this schedule receives time ticks
    pub fn id(&self) -> TimedItemID {
        self.id
    }

    /// The order in which rooms are maintained
    pub fn room_order(&self) -> &[RoomNumber] {
        &self.room_order
    }

    /// The room currently under maintenance
    pub fn current_room(&self) -> RoomNumber {
        self.room_order[self.current_index]
    }

    /// Total minutes of maintenance carried out under this schedule
    pub fn time_elapsed(&self) -> u64 {
        self.time_elapsed
    }

    /// Minutes spent maintaining the current room so far
    pub fn time_elapsed_current_room(&self) -> u32 {
        self.time_elapsed_current_room
    }

    fn set_current_maintenance(&self, rooms: &mut RoomMap, maintenance: bool) {
        if let Some(room) = rooms.get_mut(&self.current_room()) {
            room.set_maintenance(maintenance);
        }
    }

    /// Move maintenance on to the next room in the order
    fn advance(&mut self, rooms: &mut RoomMap) {
        let finished = self.current_room();
        self.set_current_maintenance(rooms, false);
        self.current_index = (self.current_index + 1) % self.room_order.len();
        self.set_current_maintenance(rooms, true);
        self.time_elapsed_current_room = 0;
        debug!(
            "Maintenance moved from room {finished} to room {}",
            self.current_room()
        );
    }

    /// Carry out one minute of maintenance.
    ///
    /// Nothing happens while the current room is being evacuated. Once the current room has had
    /// all the maintenance it needs, the schedule moves on to the next room.
    pub(crate) fn elapse_one_minute(&mut self, rooms: &mut RoomMap) {
        let Some(room) = rooms.get(&self.current_room()) else {
            return;
        };
        if room.evaluate_room_state() == RoomState::Evacuate {
            return;
        }

        let current_room_time = u64::from(maintenance_time(room));
        self.time_elapsed += 1;
        self.time_elapsed_current_room += 1;

        if self.time_elapsed - self.completed_time >= current_room_time {
            self.completed_time += current_room_time;
            self.advance(rooms);
        }
    }

    /// Stop maintaining the current room and move on to the next one, even during an evacuation
    pub(crate) fn skip_current_maintenance(&mut self, rooms: &mut RoomMap) {
        self.completed_time += u64::from(self.time_elapsed_current_room);
        self.advance(rooms);
    }

    /// Take the current room out of maintenance, when this schedule is being replaced
    pub(crate) fn stop(&self, rooms: &mut RoomMap) {
        self.set_current_maintenance(rooms, false);
    }
}

impl PartialEq for MaintenanceSchedule {
    /// Schedules are equal if they maintain rooms in the same order, however far through they are
    fn eq(&self, other: &Self) -> bool {
        self.room_order == other.room_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, rooms};
    use crate::sensor::TemperatureSensor;
    use crate::units::SquareMetres;
    use rstest::rstest;

    const ROOM1: RoomNumber = RoomNumber(101);
    const ROOM2: RoomNumber = RoomNumber(102);
    const ROOM3: RoomNumber = RoomNumber(103);

    fn start_schedule(rooms: &mut RoomMap) -> MaintenanceSchedule {
        let order = vec![ROOM1, ROOM2, ROOM3];
        check_room_order(&order, rooms).unwrap();
        MaintenanceSchedule::start(order, rooms, TimedItemID::default())
    }

    fn elapse(schedule: &mut MaintenanceSchedule, rooms: &mut RoomMap, minutes: u32) {
        for _ in 0..minutes {
            schedule.elapse_one_minute(rooms);
        }
    }

    #[rstest]
    #[case(RoomType::Study, 5.0, 5)]
    #[case(RoomType::Office, 15.786, 11)]
    #[case(RoomType::Laboratory, 20.25, 16)]
    #[case(RoomType::Office, 28.6, 15)]
    fn test_maintenance_time(#[case] room_type: RoomType, #[case] area: f64, #[case] expected: u32) {
        let room = Room::new(RoomNumber(1), room_type, SquareMetres(area)).unwrap();
        assert_eq!(maintenance_time(&room), expected);
    }

    #[rstest]
    fn test_check_room_order_valid(rooms: RoomMap) {
        assert!(check_room_order(&[ROOM1], &rooms).is_ok());
        assert!(check_room_order(&[ROOM1, ROOM2, ROOM1, ROOM3], &rooms).is_ok());
    }

    #[rstest]
    #[case(&[], "Invalid maintenance schedule: Room order cannot be empty")]
    #[case(&[ROOM1, RoomNumber(104)], "Invalid maintenance schedule: Room 104 is not on this floor")]
    #[case(&[ROOM1, ROOM2, ROOM2], "Invalid maintenance schedule: Room 102 appears twice in a row")]
    #[case(&[ROOM1, ROOM2, ROOM1], "Invalid maintenance schedule: Room 101 appears twice in a row")]
    #[case(&[ROOM1, ROOM1], "Invalid maintenance schedule: Room 101 appears twice in a row")]
    fn test_check_room_order_invalid(
        rooms: RoomMap,
        #[case] order: &[RoomNumber],
        #[case] msg: &str,
    ) {
        assert_error!(check_room_order(order, &rooms), msg);
    }

    #[rstest]
    fn test_start(mut rooms: RoomMap) {
        let schedule = start_schedule(&mut rooms);
        assert_eq!(schedule.current_room(), ROOM1);
        assert_eq!(schedule.time_elapsed_current_room(), 0);
        assert!(rooms[&ROOM1].maintenance_ongoing());
        assert!(!rooms[&ROOM2].maintenance_ongoing());
        assert_eq!(rooms[&ROOM1].evaluate_room_state(), RoomState::Maintenance);
    }

    #[rstest]
    #[case(2, ROOM1, 2)]
    #[case(5, ROOM2, 0)]
    #[case(15, ROOM2, 10)]
    #[case(16, ROOM3, 0)]
    #[case(31, ROOM3, 15)]
    #[case(32, ROOM1, 0)]
    #[case(64, ROOM1, 0)]
    fn test_elapse(
        mut rooms: RoomMap,
        #[case] minutes: u32,
        #[case] current_room: RoomNumber,
        #[case] elapsed: u32,
    ) {
        let mut schedule = start_schedule(&mut rooms);
        elapse(&mut schedule, &mut rooms, minutes);
        assert_eq!(schedule.current_room(), current_room);
        assert_eq!(schedule.time_elapsed_current_room(), elapsed);
        assert_eq!(schedule.time_elapsed(), u64::from(minutes));
        for (number, room) in &rooms {
            assert_eq!(room.maintenance_ongoing(), *number == current_room);
        }
    }

    #[rstest]
    fn test_elapse_past_u32_minutes(mut rooms: RoomMap) {
        let mut schedule = start_schedule(&mut rooms);
        let minutes = u64::from(u32::MAX);
        schedule.time_elapsed = minutes;
        schedule.completed_time = minutes;

        elapse(&mut schedule, &mut rooms, 5);
        assert_eq!(schedule.current_room(), ROOM2);
        assert_eq!(schedule.time_elapsed(), minutes + 5);
    }

    #[rstest]
    fn test_elapse_during_evacuation(mut rooms: RoomMap) {
        rooms[&ROOM1]
            .add_sensor(TemperatureSensor::new(vec![85]).unwrap().into())
            .unwrap();
        let mut schedule = start_schedule(&mut rooms);
        elapse(&mut schedule, &mut rooms, 12);
        assert_eq!(schedule.current_room(), ROOM1);
        assert_eq!(schedule.time_elapsed_current_room(), 0);
        assert_eq!(schedule.time_elapsed(), 0);
    }

    #[rstest]
    fn test_elapse_during_fire_drill(mut rooms: RoomMap) {
        let mut schedule = start_schedule(&mut rooms);
        elapse(&mut schedule, &mut rooms, 3);
        rooms[&ROOM1].set_fire_drill(true);
        elapse(&mut schedule, &mut rooms, 10);
        assert_eq!(schedule.current_room(), ROOM1);
        assert_eq!(schedule.time_elapsed_current_room(), 3);

        rooms[&ROOM1].set_fire_drill(false);
        elapse(&mut schedule, &mut rooms, 2);
        assert_eq!(schedule.current_room(), ROOM2);
    }

    #[rstest]
    #[case(1, ROOM2)]
    #[case(2, ROOM3)]
    #[case(3, ROOM1)]
    fn test_skip(mut rooms: RoomMap, #[case] skips: usize, #[case] current_room: RoomNumber) {
        let mut schedule = start_schedule(&mut rooms);
        for _ in 0..skips {
            schedule.skip_current_maintenance(&mut rooms);
        }
        assert_eq!(schedule.current_room(), current_room);
        assert!(rooms[&current_room].maintenance_ongoing());
        assert_eq!(
            rooms.values().filter(|room| room.maintenance_ongoing()).count(),
            1
        );
    }

    #[rstest]
    fn test_skip_after_elapse(mut rooms: RoomMap) {
        let mut schedule = start_schedule(&mut rooms);
        elapse(&mut schedule, &mut rooms, 18);
        schedule.skip_current_maintenance(&mut rooms);
        assert_eq!(schedule.current_room(), ROOM1);
        assert_eq!(schedule.time_elapsed_current_room(), 0);
    }

    #[rstest]
    fn test_elapse_after_skip(mut rooms: RoomMap) {
        let mut schedule = start_schedule(&mut rooms);
        elapse(&mut schedule, &mut rooms, 9);
        schedule.skip_current_maintenance(&mut rooms);
        elapse(&mut schedule, &mut rooms, 3);
        assert_eq!(schedule.current_room(), ROOM3);
        assert_eq!(schedule.time_elapsed_current_room(), 3);
    }

    #[rstest]
    fn test_skip_during_evacuation(mut rooms: RoomMap) {
        rooms[&ROOM1].set_fire_drill(true);
        let mut schedule = start_schedule(&mut rooms);
        schedule.skip_current_maintenance(&mut rooms);
        assert_eq!(schedule.current_room(), ROOM2);
        assert!(!rooms[&ROOM1].maintenance_ongoing());
    }

    #[rstest]
    fn test_single_room_schedule(mut rooms: RoomMap) {
        let mut schedule =
            MaintenanceSchedule::start(vec![ROOM2], &mut rooms, TimedItemID::default());
        elapse(&mut schedule, &mut rooms, 11);
        assert_eq!(schedule.current_room(), ROOM2);
        assert_eq!(schedule.time_elapsed_current_room(), 0);
        assert!(rooms[&ROOM2].maintenance_ongoing());
    }

    #[rstest]
    fn test_stop(mut rooms: RoomMap) {
        let schedule = start_schedule(&mut rooms);
        schedule.stop(&mut rooms);
        assert!(rooms.values().all(|room| !room.maintenance_ongoing()));
    }
}
