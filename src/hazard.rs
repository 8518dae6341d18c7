//! Hazard evaluators combine the hazard levels of a room's sensors into a single hazard level.
//!
//! Evaluators do not own sensors. They refer to the room's sensors by [`SensorKind`] and are given
//! the room's sensors when evaluating.
use crate::error::BuildingError;
use crate::room::SensorMap;
use crate::sensor::{MAX_HAZARD_LEVEL, SensorKind};
use crate::utils::round_to_u32;
use indexmap::IndexMap;
use itertools::Itertools;
use strum::{Display, EnumString};

/// The sum which the weightings of a [`WeightingBasedHazardEvaluator`] must add up to
pub const TOTAL_WEIGHTING: u32 = 100;

/// The kinds of hazard evaluator, as named in save files
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, EnumString)]
pub enum HazardEvaluatorKind {
    /// See [`RuleBasedHazardEvaluator`]
    RuleBased,
    /// See [`WeightingBasedHazardEvaluator`]
    WeightingBased,
}

/// Evaluates hazard level by applying a fixed set of rules to the sensors' hazard levels
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBasedHazardEvaluator {
    sensors: Vec<SensorKind>,
}

impl RuleBasedHazardEvaluator {
    /// Create a new rule-based evaluator over the given sensors
    pub fn new<I>(sensors: I) -> Self
    where
        I: IntoIterator<Item = SensorKind>,
    {
        Self {
            sensors: sensors.into_iter().collect(),
        }
    }

    /// The sensors used in the calculation
    pub fn sensors(&self) -> &[SensorKind] {
        &self.sensors
    }

    fn evaluate(&self, sensors: &SensorMap) -> u32 {
        let levels = self
            .sensors
            .iter()
            .filter_map(|kind| sensors.get(kind).map(|sensor| (*kind, sensor.hazard_level())))
            .collect_vec();
        combine_by_rules(&levels)
    }
}

/// Apply the rule-based calculation to the hazard levels of a room's sensors.
///
/// With no sensors the hazard level is 0 and with one sensor it is that sensor's level. With more,
/// any non-occupancy sensor at the maximum level gives the maximum level. Otherwise the levels of
/// the non-occupancy sensors are averaged and the average is scaled by the occupancy sensor's level
/// as a fraction of 100, if there is one.
fn combine_by_rules(levels: &[(SensorKind, u32)]) -> u32 {
    match levels {
        [] => 0,
        [(_, level)] => *level,
        _ => {
            let mut occupancy_level = None;
            let mut total = 0;
            let mut count = 0;
            for &(kind, level) in levels {
                if kind == SensorKind::Occupancy {
                    occupancy_level = Some(level);
                    continue;
                }
                if level == MAX_HAZARD_LEVEL {
                    return MAX_HAZARD_LEVEL;
                }
                total += level;
                count += 1;
            }

            let mut average = f64::from(total) / f64::from(count);
            if let Some(occupancy_level) = occupancy_level {
                average *= f64::from(occupancy_level) / 100.0;
            }
            round_to_u32(average)
        }
    }
}

/// Evaluates hazard level as a weighted average of the sensors' hazard levels
#[derive(Debug, Clone, PartialEq)]
pub struct WeightingBasedHazardEvaluator {
    weightings: IndexMap<SensorKind, u32>,
}

impl WeightingBasedHazardEvaluator {
    /// Create a new weighting-based evaluator.
    ///
    /// Every weighting must be between 0 and 100 inclusive and together they must sum to exactly
    /// 100.
    pub fn new<I>(weightings: I) -> Result<Self, BuildingError>
    where
        I: IntoIterator<Item = (SensorKind, i32)>,
    {
        let weightings = weightings
            .into_iter()
            .map(|(kind, weighting)| {
                u32::try_from(weighting)
                    .ok()
                    .filter(|weighting| *weighting <= TOTAL_WEIGHTING)
                    .map(|weighting| (kind, weighting))
                    .ok_or_else(|| {
                        BuildingError::InvalidEvaluator(format!(
                            "Weighting for {kind} must be between 0 and {TOTAL_WEIGHTING} \
                            (got {weighting})"
                        ))
                    })
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;

        let sum: u32 = weightings.values().sum();
        if sum != TOTAL_WEIGHTING {
            return Err(BuildingError::InvalidEvaluator(format!(
                "Weightings must sum to {TOTAL_WEIGHTING} (got {sum})"
            )));
        }

        Ok(Self { weightings })
    }

    /// The weighting given to each sensor
    pub fn weightings(&self) -> &IndexMap<SensorKind, u32> {
        &self.weightings
    }

    fn evaluate(&self, sensors: &SensorMap) -> u32 {
        weighted_average(self.weightings.iter().filter_map(|(kind, weighting)| {
            sensors
                .get(kind)
                .map(|sensor| (sensor.hazard_level(), *weighting))
        }))
    }
}

/// Weighted average of hazard levels, with integer accumulation and a single final division
fn weighted_average<I>(levels: I) -> u32
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let weighted_sum: u32 = levels
        .into_iter()
        .map(|(level, weighting)| level * weighting)
        .sum();
    round_to_u32(f64::from(weighted_sum) / f64::from(TOTAL_WEIGHTING))
}

/// A hazard evaluator of either kind
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum HazardEvaluator {
    /// A rule-based evaluator
    RuleBased(RuleBasedHazardEvaluator),
    /// A weighting-based evaluator
    WeightingBased(WeightingBasedHazardEvaluator),
}

impl HazardEvaluator {
    /// The kind of this evaluator
    pub fn kind(&self) -> HazardEvaluatorKind {
        match self {
            Self::RuleBased(_) => HazardEvaluatorKind::RuleBased,
            Self::WeightingBased(_) => HazardEvaluatorKind::WeightingBased,
        }
    }

    /// Iterate over the kinds of sensor this evaluator uses
    pub fn iter_sensor_kinds(&self) -> Box<dyn Iterator<Item = SensorKind> + '_> {
        match self {
            Self::RuleBased(evaluator) => Box::new(evaluator.sensors.iter().copied()),
            Self::WeightingBased(evaluator) => Box::new(evaluator.weightings.keys().copied()),
        }
    }

    /// The weighting for the given kind of sensor, if this is a weighting-based evaluator
    pub fn weighting(&self, kind: SensorKind) -> Option<u32> {
        match self {
            Self::RuleBased(_) => None,
            Self::WeightingBased(evaluator) => evaluator.weightings.get(&kind).copied(),
        }
    }

    /// Calculate the hazard level from the given sensors, from 0 to 100
    pub fn evaluate(&self, sensors: &SensorMap) -> u32 {
        match self {
            Self::RuleBased(evaluator) => evaluator.evaluate(sensors),
            Self::WeightingBased(evaluator) => evaluator.evaluate(sensors),
        }
    }
}
