//! Code for moving buildings forward in time.
//!
//! Maintenance schedules register with a [`TimedItemManager`] when they are created and are only
//! driven forward by the manager they registered with. The manager is an ordinary value owned by
//! whoever owns the buildings, so separate sets of buildings can keep separate clocks.
use crate::building::Building;
use crate::floor::Floor;
use crate::maintenance::MaintenanceSchedule;
use indexmap::IndexSet;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Identifies an item registered to receive time ticks
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TimedItemID(u64);

impl fmt::Display for TimedItemID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Keeps track of which timed items should receive ticks, and in which order
#[derive(Debug, Clone, Default)]
pub struct TimedItemManager {
    registered: IndexSet<TimedItemID>,
    next_id: u64,
    minutes_elapsed: u64,
}

impl TimedItemManager {
    /// Register a new timed item, returning its ID.
    ///
    /// Items receive ticks in the order in which they were registered.
    pub fn register(&mut self) -> TimedItemID {
        let id = TimedItemID(self.next_id);
        self.next_id += 1;
        self.registered.insert(id);
        id
    }

    /// Stop a timed item from receiving ticks.
    ///
    /// Returns `false` if the item was not registered.
    pub fn unregister(&mut self, id: TimedItemID) -> bool {
        self.registered.shift_remove(&id)
    }

    /// Whether the given item is registered
    pub fn is_registered(&self, id: TimedItemID) -> bool {
        self.registered.contains(&id)
    }

    /// The number of registered items
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// Whether there are no registered items
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// The number of minutes this manager has advanced time by
    pub fn minutes_elapsed(&self) -> u64 {
        self.minutes_elapsed
    }

    /// Advance the given buildings by one minute.
    ///
    /// Every sensor moves on first. Each maintenance schedule registered with this manager is then
    /// ticked in registration order. Schedules which are not registered here are left alone.
    pub fn elapse_one_minute(&mut self, buildings: &mut [Building]) {
        self.minutes_elapsed += 1;
        debug!("Elapsing minute {}", self.minutes_elapsed);

        let mut scheduled: HashMap<_, &mut Floor> = HashMap::new();
        for floor in buildings
            .iter_mut()
            .flat_map(|building| building.floors_mut().values_mut())
        {
            floor.elapse_sensors();
            if let Some(id) = floor.maintenance_schedule().map(MaintenanceSchedule::id) {
                scheduled.insert(id, floor);
            }
        }

        for id in &self.registered {
            if let Some(floor) = scheduled.get_mut(id) {
                floor.elapse_maintenance();
            }
        }
    }
}
