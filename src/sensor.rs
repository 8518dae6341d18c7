//! Sensors take periodic readings in a room and report a hazard level based on the current one.
//!
//! There is a fixed set of sensor kinds, each with its own parameters. Every sensor cycles through
//! a fixed list of readings, moving on to the next reading once its update frequency has elapsed.
use crate::error::BuildingError;
use crate::utils::round_to_u32;
use std::ops::RangeInclusive;
use strum::{Display, EnumIter, EnumString};

/// The range of allowed update frequencies, in minutes
pub const UPDATE_FREQUENCY_RANGE: RangeInclusive<u32> = 1..=5;

/// The highest possible hazard level
pub const MAX_HAZARD_LEVEL: u32 = 100;

/// The kinds of sensor which can be installed in a room.
///
/// Variants are declared in alphabetical order of their names, so the derived ordering is also the
/// order in which a room lists its sensors.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, EnumString, EnumIter,
)]
pub enum SensorKind {
    /// Measures carbon dioxide concentration in ppm
    #[strum(serialize = "CarbonDioxideSensor")]
    CarbonDioxide,
    /// Measures noise level in dB
    #[strum(serialize = "NoiseSensor")]
    Noise,
    /// Counts the number of people in a room
    #[strum(serialize = "OccupancySensor")]
    Occupancy,
    /// Measures ambient temperature in degrees Celsius
    #[strum(serialize = "TemperatureSensor")]
    Temperature,
}

/// The part common to all sensors: a list of readings which is cycled through over time
#[derive(Debug, Clone)]
pub struct TimedSensor {
    readings: Vec<u32>,
    update_frequency: u32,
    current_index: usize,
    time_elapsed: u32,
}

impl TimedSensor {
    /// Create a new timed sensor.
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of sensor being created (for error messages)
    /// * `readings` - A non-empty list of readings
    /// * `update_frequency` - How many minutes each reading lasts for
    fn new(
        kind: SensorKind,
        readings: Vec<u32>,
        update_frequency: u32,
    ) -> Result<Self, BuildingError> {
        let invalid = |reason: String| BuildingError::InvalidSensor { kind, reason };
        if readings.is_empty() {
            return Err(invalid("Sensor readings cannot be empty".into()));
        }
        if !UPDATE_FREQUENCY_RANGE.contains(&update_frequency) {
            return Err(invalid(format!(
                "Update frequency must be between {} and {} (got {update_frequency})",
                UPDATE_FREQUENCY_RANGE.start(),
                UPDATE_FREQUENCY_RANGE.end()
            )));
        }

        Ok(Self {
            readings,
            update_frequency,
            current_index: 0,
            time_elapsed: 0,
        })
    }

    /// All of this sensor's readings, in order
    pub fn readings(&self) -> &[u32] {
        &self.readings
    }

    /// How many minutes each reading lasts for
    pub fn update_frequency(&self) -> u32 {
        self.update_frequency
    }

    /// The reading currently being reported
    pub fn current_reading(&self) -> u32 {
        self.readings[self.current_index]
    }

    /// Advance time by one minute, moving to the next reading if it is due
    fn elapse_one_minute(&mut self) {
        self.time_elapsed = self.time_elapsed.wrapping_add(1);
        if self.time_elapsed % self.update_frequency == 0 {
            self.current_index = (self.current_index + 1) % self.readings.len();
        }
    }
}

impl PartialEq for TimedSensor {
    /// Sensors are equal if they have the same readings and frequency, wherever they are in time
    fn eq(&self, other: &Self) -> bool {
        self.readings == other.readings && self.update_frequency == other.update_frequency
    }
}

/// A sensor measuring the concentration of carbon dioxide
#[derive(Debug, Clone, PartialEq)]
pub struct CarbonDioxideSensor {
    timed: TimedSensor,
    ideal_value: u32,
    variation_limit: u32,
}

impl CarbonDioxideSensor {
    /// Create a new carbon dioxide sensor.
    ///
    /// The variation limit may not exceed the ideal value.
    pub fn new(
        readings: Vec<u32>,
        update_frequency: u32,
        ideal_value: u32,
        variation_limit: u32,
    ) -> Result<Self, BuildingError> {
        let timed = TimedSensor::new(SensorKind::CarbonDioxide, readings, update_frequency)?;
        if variation_limit > ideal_value {
            return Err(BuildingError::InvalidSensor {
                kind: SensorKind::CarbonDioxide,
                reason: format!(
                    "Variation limit ({variation_limit}) cannot exceed ideal value ({ideal_value})"
                ),
            });
        }

        Ok(Self {
            timed,
            ideal_value,
            variation_limit,
        })
    }

    /// The ideal CO2 concentration, in ppm
    pub fn ideal_value(&self) -> u32 {
        self.ideal_value
    }

    /// The acceptable deviation from the ideal value, in ppm
    pub fn variation_limit(&self) -> u32 {
        self.variation_limit
    }

    fn hazard_level(&self) -> u32 {
        match self.timed.current_reading() {
            0..1000 => 0,
            1000..2000 => 25,
            2000..5000 => 50,
            _ => MAX_HAZARD_LEVEL,
        }
    }
}

/// A sensor measuring noise levels
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseSensor {
    timed: TimedSensor,
}

impl NoiseSensor {
    /// Create a new noise sensor
    pub fn new(readings: Vec<u32>, update_frequency: u32) -> Result<Self, BuildingError> {
        Ok(Self {
            timed: TimedSensor::new(SensorKind::Noise, readings, update_frequency)?,
        })
    }

    /// Loudness of the current reading relative to 70 dB (10 dB louder sounds twice as loud)
    pub fn relative_loudness(&self) -> f64 {
        let reading = f64::from(self.timed.current_reading());
        2f64.powf((reading - 70.0) / 10.0)
    }

    fn hazard_level(&self) -> u32 {
        round_to_u32(self.relative_loudness() * 100.0).min(MAX_HAZARD_LEVEL)
    }
}

/// A sensor counting the people in a room
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancySensor {
    timed: TimedSensor,
    capacity: u32,
}

impl OccupancySensor {
    /// Create a new occupancy sensor.
    ///
    /// The capacity is the maximum number of people allowed in the room and must be positive.
    pub fn new(
        readings: Vec<u32>,
        update_frequency: u32,
        capacity: u32,
    ) -> Result<Self, BuildingError> {
        let timed = TimedSensor::new(SensorKind::Occupancy, readings, update_frequency)?;
        if capacity == 0 {
            return Err(BuildingError::InvalidSensor {
                kind: SensorKind::Occupancy,
                reason: "Capacity must be positive".into(),
            });
        }

        Ok(Self { timed, capacity })
    }

    /// Maximum number of people allowed in the room
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn hazard_level(&self) -> u32 {
        let fraction = f64::from(self.timed.current_reading()) / f64::from(self.capacity);
        round_to_u32(fraction * 100.0).min(MAX_HAZARD_LEVEL)
    }
}

/// A sensor measuring ambient temperature
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSensor {
    timed: TimedSensor,
}

impl TemperatureSensor {
    /// Temperatures at or above this level indicate a fire
    pub const FIRE_TEMPERATURE: u32 = 68;

    /// Create a new temperature sensor.
    ///
    /// Temperature sensors always update every minute.
    pub fn new(readings: Vec<u32>) -> Result<Self, BuildingError> {
        Ok(Self {
            timed: TimedSensor::new(SensorKind::Temperature, readings, 1)?,
        })
    }

    fn hazard_level(&self) -> u32 {
        if self.timed.current_reading() >= Self::FIRE_TEMPERATURE {
            MAX_HAZARD_LEVEL
        } else {
            0
        }
    }
}

/// A sensor of any kind
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Sensor {
    /// A carbon dioxide sensor
    CarbonDioxide(CarbonDioxideSensor),
    /// A noise sensor
    Noise(NoiseSensor),
    /// An occupancy sensor
    Occupancy(OccupancySensor),
    /// A temperature sensor
    Temperature(TemperatureSensor),
}

impl Sensor {
    /// The kind of this sensor
    pub fn kind(&self) -> SensorKind {
        match self {
            Self::CarbonDioxide(_) => SensorKind::CarbonDioxide,
            Self::Noise(_) => SensorKind::Noise,
            Self::Occupancy(_) => SensorKind::Occupancy,
            Self::Temperature(_) => SensorKind::Temperature,
        }
    }

    /// The readings and update frequency shared by all sensors
    pub fn timed(&self) -> &TimedSensor {
        match self {
            Self::CarbonDioxide(sensor) => &sensor.timed,
            Self::Noise(sensor) => &sensor.timed,
            Self::Occupancy(sensor) => &sensor.timed,
            Self::Temperature(sensor) => &sensor.timed,
        }
    }

    fn timed_mut(&mut self) -> &mut TimedSensor {
        match self {
            Self::CarbonDioxide(sensor) => &mut sensor.timed,
            Self::Noise(sensor) => &mut sensor.timed,
            Self::Occupancy(sensor) => &mut sensor.timed,
            Self::Temperature(sensor) => &mut sensor.timed,
        }
    }

    /// The hazard level detected by this sensor from its current reading, from 0 to 100
    pub fn hazard_level(&self) -> u32 {
        match self {
            Self::CarbonDioxide(sensor) => sensor.hazard_level(),
            Self::Noise(sensor) => sensor.hazard_level(),
            Self::Occupancy(sensor) => sensor.hazard_level(),
            Self::Temperature(sensor) => sensor.hazard_level(),
        }
    }

    /// Advance this sensor's readings by one minute
    pub fn elapse_one_minute(&mut self) {
        self.timed_mut().elapse_one_minute();
    }
}
