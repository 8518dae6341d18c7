//! Code for reading a single sensor line.
use super::{
    FIELD_SEPARATOR, WEIGHTING_SEPARATOR, parse_int, parse_list, parse_non_negative, split_fields,
};
use crate::sensor::{
    CarbonDioxideSensor, NoiseSensor, OccupancySensor, Sensor, SensorKind, TemperatureSensor,
};
use anyhow::{Context, Result};

/// The number of fields on a line for each kind of sensor, including the kind itself
fn field_count(kind: SensorKind) -> usize {
    match kind {
        SensorKind::CarbonDioxide => 5,
        SensorKind::Noise => 3,
        SensorKind::Occupancy => 4,
        SensorKind::Temperature => 2,
    }
}

/// Parse a sensor line, along with its weighting if the room uses a weighting-based evaluator.
///
/// A weighting is given after the last `@` on the line and is returned unchecked.
pub(super) fn parse_sensor_line(line: &str, weighted: bool) -> Result<(Sensor, Option<i32>)> {
    let (line, weighting) = if weighted {
        let (line, weighting) = line
            .rsplit_once(WEIGHTING_SEPARATOR)
            .context("Missing weighting for sensor")?;
        (line, Some(parse_int::<i32>(weighting, "sensor weighting")?))
    } else {
        (line, None)
    };

    Ok((parse_sensor(line)?, weighting))
}

fn parse_sensor(line: &str) -> Result<Sensor> {
    let name = line.split(FIELD_SEPARATOR).next().unwrap_or_default();
    let kind: SensorKind = name
        .parse()
        .ok()
        .with_context(|| format!("Invalid sensor type: {name:?}"))?;
    let fields = split_fields(line, field_count(kind)..=field_count(kind), "Sensor")?;
    let readings = parse_list(fields[1], "sensor reading")?;

    let sensor = match kind {
        SensorKind::CarbonDioxide => CarbonDioxideSensor::new(
            readings,
            parse_non_negative(fields[2], "update frequency")?,
            parse_non_negative(fields[3], "ideal value")?,
            parse_non_negative(fields[4], "variation limit")?,
        )?
        .into(),
        SensorKind::Noise => {
            NoiseSensor::new(readings, parse_non_negative(fields[2], "update frequency")?)?.into()
        }
        SensorKind::Occupancy => OccupancySensor::new(
            readings,
            parse_non_negative(fields[2], "update frequency")?,
            parse_non_negative(fields[3], "capacity")?,
        )?
        .into(),
        SensorKind::Temperature => TemperatureSensor::new(readings)?.into(),
    };

    Ok(sensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    #[rstest]
    #[case("CarbonDioxideSensor:690,740:3:700:150", SensorKind::CarbonDioxide, &[690, 740], 3)]
    #[case("NoiseSensor:55,62,70:2", SensorKind::Noise, &[55, 62, 70], 2)]
    #[case("OccupancySensor:4,5,6:1:10", SensorKind::Occupancy, &[4, 5, 6], 1)]
    #[case("TemperatureSensor:25", SensorKind::Temperature, &[25], 1)]
    fn test_parse_sensor(
        #[case] line: &str,
        #[case] kind: SensorKind,
        #[case] readings: &[u32],
        #[case] update_frequency: u32,
    ) {
        let (sensor, weighting) = parse_sensor_line(line, false).unwrap();
        assert_eq!(sensor.kind(), kind);
        assert_eq!(sensor.timed().readings(), readings);
        assert_eq!(sensor.timed().update_frequency(), update_frequency);
        assert_eq!(weighting, None);
    }

    #[test]
    fn test_parse_sensor_parameters() {
        let (sensor, _) = parse_sensor_line("CarbonDioxideSensor:690:3:700:150", false).unwrap();
        let Sensor::CarbonDioxide(sensor) = sensor else {
            panic!("Wrong kind of sensor");
        };
        assert_eq!(sensor.ideal_value(), 700);
        assert_eq!(sensor.variation_limit(), 150);

        let (sensor, _) = parse_sensor_line("OccupancySensor:4:1:12", false).unwrap();
        let Sensor::Occupancy(sensor) = sensor else {
            panic!("Wrong kind of sensor");
        };
        assert_eq!(sensor.capacity(), 12);
    }

    #[rstest]
    #[case("TemperatureSensor:25,30@40", 40)]
    #[case("NoiseSensor:60:1@0", 0)]
    #[case("NoiseSensor:60:1@-5", -5)]
    #[case("NoiseSensor:60:1@150", 150)]
    fn test_parse_sensor_weighted(#[case] line: &str, #[case] expected: i32) {
        let (_, weighting) = parse_sensor_line(line, true).unwrap();
        assert_eq!(weighting, Some(expected));
    }

    #[rstest]
    #[case("HumiditySensor:40", false, "Invalid sensor type: \"HumiditySensor\"")]
    #[case("", false, "Invalid sensor type: \"\"")]
    #[case("NoiseSensor:60", false, "Sensor line must have 3 fields, but has 2")]
    #[case("TemperatureSensor:25:1", false, "Sensor line must have 2 fields, but has 3")]
    #[case(
        "CarbonDioxideSensor:690:3:700",
        false,
        "Sensor line must have 5 fields, but has 4"
    )]
    #[case(
        "TemperatureSensor:25@40",
        false,
        "Invalid sensor reading: \"25@40\": invalid digit found in string"
    )]
    #[case("TemperatureSensor:25", true, "Missing weighting for sensor")]
    #[case(
        "TemperatureSensor:25@",
        true,
        "Invalid sensor weighting: \"\": cannot parse integer from empty string"
    )]
    #[case(
        "TemperatureSensor:",
        false,
        "Invalid sensor reading: \"\": cannot parse integer from empty string"
    )]
    #[case("NoiseSensor:60,-1:2", false, "Expected non-negative sensor reading (got -1)")]
    #[case(
        "NoiseSensor:60:6",
        false,
        "Invalid NoiseSensor: Update frequency must be between 1 and 5 (got 6)"
    )]
    #[case(
        "OccupancySensor:4:1:0",
        false,
        "Invalid OccupancySensor: Capacity must be positive"
    )]
    #[case(
        "CarbonDioxideSensor:690:3:600:700",
        false,
        "Invalid CarbonDioxideSensor: Variation limit (700) cannot exceed ideal value (600)"
    )]
    fn test_parse_sensor_invalid(#[case] line: &str, #[case] weighted: bool, #[case] msg: &str) {
        assert_error!(parse_sensor_line(line, weighted), msg);
    }
}
