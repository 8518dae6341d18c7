//! Rooms are the parts of a floor which hold sensors and undergo maintenance and fire drills.
use crate::error::BuildingError;
use crate::hazard::{HazardEvaluator, HazardEvaluatorKind};
use crate::id::RoomNumber;
use crate::sensor::{MAX_HAZARD_LEVEL, Sensor, SensorKind};
use crate::units::SquareMetres;
use std::collections::BTreeMap;
use strum::{Display, EnumString};

/// The smallest area a room may have
pub const MIN_AREA: SquareMetres = SquareMetres(5.0);

/// A room's sensors, keyed and ordered by kind
pub type SensorMap = BTreeMap<SensorKind, Sensor>;

/// What a room is used for
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    /// A room for studying in
    Study,
    /// An office
    Office,
    /// A laboratory
    Laboratory,
}

/// Whether a room is available for use
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomState {
    /// The room can be used as normal
    Open,
    /// Everyone must leave the room, because of a fire or a fire drill
    Evacuate,
    /// The room is closed for maintenance
    Maintenance,
}

/// A room on a floor of a building
#[derive(Debug, Clone)]
pub struct Room {
    number: RoomNumber,
    room_type: RoomType,
    area: SquareMetres,
    sensors: SensorMap,
    hazard_evaluator: Option<HazardEvaluator>,
    fire_drill: bool,
    maintenance: bool,
}

impl Room {
    /// Create a new room with no sensors.
    ///
    /// # Arguments
    ///
    /// * `number` - Number of the room, which must be unique within its floor
    /// * `room_type` - What the room is used for
    /// * `area` - Floor space taken up by the room, which must be at least [`MIN_AREA`] once
    ///   rounded to two decimal places
    pub fn new(
        number: RoomNumber,
        room_type: RoomType,
        area: SquareMetres,
    ) -> Result<Self, BuildingError> {
        let area = area.round_to_two_places();
        if !area.is_finite() || area < MIN_AREA {
            return Err(BuildingError::TooSmall {
                what: "Room area",
                minimum: MIN_AREA.value(),
                value: area.value(),
            });
        }

        Ok(Self {
            number,
            room_type,
            area,
            sensors: SensorMap::new(),
            hazard_evaluator: None,
            fire_drill: false,
            maintenance: false,
        })
    }

    /// The number of this room
    pub fn number(&self) -> RoomNumber {
        self.number
    }

    /// What this room is used for
    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    /// The floor space taken up by this room
    pub fn area(&self) -> SquareMetres {
        self.area
    }

    /// The sensors in this room, ordered by kind
    pub fn sensors(&self) -> &SensorMap {
        &self.sensors
    }

    /// The sensor of the given kind, if the room has one
    pub fn sensor(&self, kind: SensorKind) -> Option<&Sensor> {
        self.sensors.get(&kind)
    }

    /// Add a sensor to this room.
    ///
    /// A room can only have one sensor of each kind. Adding a sensor removes the room's hazard
    /// evaluator, if it has one, because it no longer covers all of the room's sensors.
    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<(), BuildingError> {
        let kind = sensor.kind();
        if self.sensors.contains_key(&kind) {
            return Err(BuildingError::DuplicateSensor(kind));
        }

        self.sensors.insert(kind, sensor);
        self.hazard_evaluator = None;
        Ok(())
    }

    /// The evaluator used to calculate this room's hazard level, if one has been set
    pub fn hazard_evaluator(&self) -> Option<&HazardEvaluator> {
        self.hazard_evaluator.as_ref()
    }

    /// Set the evaluator used to calculate this room's hazard level.
    ///
    /// The evaluator may only refer to sensors which are in the room. A weighting-based evaluator
    /// must also give a weighting for every sensor in the room.
    pub fn set_hazard_evaluator(&mut self, evaluator: HazardEvaluator) -> Result<(), BuildingError> {
        for kind in evaluator.iter_sensor_kinds() {
            if !self.sensors.contains_key(&kind) {
                return Err(BuildingError::InvalidEvaluator(format!(
                    "Room {} has no {kind}",
                    self.number
                )));
            }
        }

        let unweighted = match evaluator.kind() {
            HazardEvaluatorKind::RuleBased => None,
            HazardEvaluatorKind::WeightingBased => self
                .sensors
                .keys()
                .find(|kind| evaluator.weighting(**kind).is_none()),
        };
        if let Some(kind) = unweighted {
            return Err(BuildingError::InvalidEvaluator(format!(
                "No weighting given for {kind} in room {}",
                self.number
            )));
        }

        self.hazard_evaluator = Some(evaluator);
        Ok(())
    }

    /// The room's current hazard level, or `None` if it has no hazard evaluator
    pub fn evaluate_hazard_level(&self) -> Option<u32> {
        self.hazard_evaluator
            .as_ref()
            .map(|evaluator| evaluator.evaluate(&self.sensors))
    }

    /// Whether a fire drill is under way in this room
    pub fn fire_drill_ongoing(&self) -> bool {
        self.fire_drill
    }

    /// Start or stop a fire drill in this room
    pub fn set_fire_drill(&mut self, fire_drill: bool) {
        self.fire_drill = fire_drill;
    }

    /// Whether this room is undergoing maintenance
    pub fn maintenance_ongoing(&self) -> bool {
        self.maintenance
    }

    /// Start or stop maintenance of this room
    pub fn set_maintenance(&mut self, maintenance: bool) {
        self.maintenance = maintenance;
    }

    /// Work out the state of the room.
    ///
    /// A fire detected by the temperature sensor takes priority over a fire drill, which takes
    /// priority over maintenance.
    pub fn evaluate_room_state(&self) -> RoomState {
        let fire = self
            .sensor(SensorKind::Temperature)
            .is_some_and(|sensor| sensor.hazard_level() == MAX_HAZARD_LEVEL);

        if fire || self.fire_drill {
            RoomState::Evacuate
        } else if self.maintenance {
            RoomState::Maintenance
        } else {
            RoomState::Open
        }
    }

    /// Advance all of this room's sensors by one minute
    pub fn elapse_sensors(&mut self) {
        for sensor in self.sensors.values_mut() {
            sensor.elapse_one_minute();
        }
    }
}

impl PartialEq for Room {
    /// Rooms are equal if they are made up the same way, whatever is happening in them.
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
            && self.room_type == other.room_type
            && self.area == other.area
            && self.sensors == other.sensors
            && self.hazard_evaluator == other.hazard_evaluator
    }
}
