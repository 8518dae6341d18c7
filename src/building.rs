//! A building is a named stack of floors.
use crate::error::BuildingError;
use crate::floor::Floor;
use crate::id::FloorNumber;
use crate::room::RoomType;
use crate::units::Metres;
use indexmap::IndexMap;

/// The floors of a building, keyed by number, in the order they were added
pub type FloorMap = IndexMap<FloorNumber, Floor>;

/// A building made up of floors
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    name: String,
    floors: FloorMap,
}

impl Building {
    /// Create a new building with no floors.
    ///
    /// The name must not be empty and must not contain line breaks.
    pub fn new(name: impl Into<String>) -> Result<Self, BuildingError> {
        let name = name.into();
        if name.is_empty() || name.contains(['\n', '\r']) {
            return Err(BuildingError::InvalidBuildingName(name));
        }

        Ok(Self {
            name,
            floors: FloorMap::new(),
        })
    }

    /// The name of this building
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The floors of this building, in the order they were added
    pub fn floors(&self) -> &FloorMap {
        &self.floors
    }

    pub(crate) fn floors_mut(&mut self) -> &mut FloorMap {
        &mut self.floors
    }

    /// The floor with the given number, if the building has one
    pub fn floor(&self, number: FloorNumber) -> Option<&Floor> {
        self.floors.get(&number)
    }

    /// Mutable access to the floor with the given number, if the building has one
    pub fn floor_mut(&mut self, number: FloorNumber) -> Option<&mut Floor> {
        self.floors.get_mut(&number)
    }

    /// Add a floor to the top of this building.
    ///
    /// Every floor other than the ground floor (floor 1) must rest on the floor numbered one below
    /// it, which must already be in the building and must be at least as large in area.
    pub fn add_floor(&mut self, floor: Floor) -> Result<(), BuildingError> {
        let number = floor.number();
        if self.floors.contains_key(&number) {
            return Err(BuildingError::DuplicateFloor(number));
        }

        if let Some(below) = number.below() {
            let Some(floor_below) = self.floors.get(&below) else {
                return Err(BuildingError::NoFloorBelow(number));
            };
            if floor_below.area() < floor.area() {
                return Err(BuildingError::FloorTooSmall {
                    floor: below,
                    reason: format!(
                        "area of {} m^2 cannot support floor {number} with area {} m^2",
                        floor_below.area(),
                        floor.area()
                    ),
                });
            }
        }

        self.floors.insert(number, floor);
        Ok(())
    }

    /// Change the width and length of one of this building's floors.
    ///
    /// The dimensions are rounded to two decimal places. As well as holding its own rooms, the
    /// resized floor must still be supported by the floor below it and must still be able to
    /// support the floor above it.
    pub fn change_floor_dimensions(
        &mut self,
        number: FloorNumber,
        width: Metres,
        length: Metres,
    ) -> Result<(), BuildingError> {
        let width = width.round_to_two_places();
        let length = length.round_to_two_places();
        let new_area = width * length;
        if let Some(floor_below) = number
            .below()
            .and_then(|below| self.floors.get(&below))
            .filter(|floor_below| floor_below.area() < new_area)
        {
            return Err(BuildingError::FloorTooSmall {
                floor: floor_below.number(),
                reason: format!(
                    "area of {} m^2 cannot support floor {number} with area {new_area} m^2",
                    floor_below.area()
                ),
            });
        }
        if let Some(floor_above) = number
            .value()
            .checked_add(1)
            .and_then(|above| self.floors.get(&FloorNumber(above)))
            .filter(|floor_above| new_area < floor_above.area())
        {
            return Err(BuildingError::FloorTooSmall {
                floor: number,
                reason: format!(
                    "new area of {new_area} m^2 cannot support floor {} with area {} m^2",
                    floor_above.number(),
                    floor_above.area()
                ),
            });
        }

        let floor = self
            .floors
            .get_mut(&number)
            .ok_or(BuildingError::NoSuchFloor(number))?;
        floor.change_dimensions(width, length)
    }

    /// Start a fire drill on every floor, in every room or only in rooms of the given type
    pub fn fire_drill(&mut self, room_type: Option<RoomType>) -> Result<(), BuildingError> {
        if self.floors.is_empty() {
            return Err(BuildingError::NoFloors);
        }

        for floor in self.floors.values_mut() {
            floor.fire_drill(room_type);
        }
        Ok(())
    }

    /// End any fire drill in this building
    pub fn cancel_fire_drill(&mut self) {
        for floor in self.floors.values_mut() {
            floor.cancel_fire_drill();
        }
    }
}
