//! Error types for the building model and for loading save files.
use crate::id::{FloorNumber, RoomNumber};
use crate::sensor::SensorKind;
use crate::units::SquareMetres;
use std::fmt;

/// A violation of one of the rules of the building hierarchy.
///
/// Returned by the model's constructors and mutators when called directly. While loading a save
/// file, all of these collapse into a [`FileFormatError`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildingError {
    /// A building name is empty or runs over more than one line
    #[error("Building names must be a single non-empty line (got {0:?})")]
    InvalidBuildingName(String),
    /// A floor with the same number is already in the building
    #[error("Floor {0} already exists in this building")]
    DuplicateFloor(FloorNumber),
    /// There is no floor directly below to support the new floor
    #[error("There is no floor below floor {0} to support it")]
    NoFloorBelow(FloorNumber),
    /// A floor cannot hold what must fit in or on it
    #[error("Floor {floor} is too small: {reason}")]
    FloorTooSmall {
        /// The floor in question
        floor: FloorNumber,
        /// Why the floor is too small
        reason: String,
    },
    /// The building has no floor with the given number
    #[error("Floor {0} is not in this building")]
    NoSuchFloor(FloorNumber),
    /// A floor number of zero was given
    #[error("Floor numbers must be positive")]
    InvalidFloorNumber,
    /// A room with the same number is already on the floor
    #[error("Room {0} already exists on this floor")]
    DuplicateRoom(RoomNumber),
    /// The floor does not have enough unoccupied area left for the room
    #[error(
        "Insufficient space to add room {room}: floor area {floor_area} m^2, \
        occupied area {occupied_area} m^2, room area {room_area} m^2"
    )]
    InsufficientSpace {
        /// The room which could not be added
        room: RoomNumber,
        /// Total area of the floor
        floor_area: SquareMetres,
        /// Area already taken up by rooms
        occupied_area: SquareMetres,
        /// Area of the new room
        room_area: SquareMetres,
    },
    /// A dimension or area is below its minimum
    #[error("{what} must be at least {minimum} (got {value})")]
    TooSmall {
        /// The quantity which is too small
        what: &'static str,
        /// The minimum allowed value
        minimum: f64,
        /// The value given
        value: f64,
    },
    /// A sensor of the same kind is already in the room
    #[error("Duplicate sensor of type: {0}")]
    DuplicateSensor(SensorKind),
    /// Sensor parameters are out of range
    #[error("Invalid {kind}: {reason}")]
    InvalidSensor {
        /// The kind of sensor being constructed
        kind: SensorKind,
        /// What was wrong
        reason: String,
    },
    /// A hazard evaluator could not be created or does not match its room
    #[error("Invalid hazard evaluator: {0}")]
    InvalidEvaluator(String),
    /// A maintenance schedule's room order is not valid for its floor
    #[error("Invalid maintenance schedule: {0}")]
    InvalidSchedule(String),
    /// A fire drill was requested for a building without any floors
    #[error("Cannot hold a fire drill in a building with no floors")]
    NoFloors,
}

/// Indicates that a save file is not valid.
///
/// Every grammar violation and every broken rule of the building hierarchy is reported with this
/// one error. The message is for humans only; no detail is exposed for callers to act on.
#[derive(Debug)]
pub struct FileFormatError {
    line_number: usize,
    message: String,
}

impl FileFormatError {
    /// Create a new error for the given (1-based) line number
    pub(crate) fn new(line_number: usize, err: &anyhow::Error) -> Self {
        Self {
            line_number,
            message: format!("{err:#}"),
        }
    }
}

impl fmt::Display for FileFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid save file (line {}): {}",
            self.line_number, self.message
        )
    }
}

impl std::error::Error for FileFormatError {}

/// An error which occurred while loading buildings from a save file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The underlying stream could not be read
    #[error("Could not read save file")]
    Io(#[from] std::io::Error),
    /// The contents of the stream are not a valid save file
    #[error(transparent)]
    Format(#[from] FileFormatError),
}
