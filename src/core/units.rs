use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const SECONDS_PER_HOUR: u32 = 3_600;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_YEAR: u32 = 365;
pub const DEGREES_PER_HOUR_OF_ROTATION: f64 = 15.;

/// Irradiance at which one peak sun hour is accumulated per hour, in W/m2.
pub const REFERENCE_IRRADIANCE: f64 = 1_000.;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub(crate) fn round_to_2dp(value: f64) -> f64 {
    (value * 100.).round() / 100.
}

/// A module surface azimuth expressed as a compass bearing, clockwise from
/// north, 0 to 360 degrees; 180 faces the equator in the northern hemisphere.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, PartialOrd, Serialize, Validate)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Azimuth360(
    #[validate(minimum = 0.)]
    #[validate(maximum = 360.)]
    f64,
);

impl Azimuth360 {
    pub fn new(angle: f64) -> Result<Self, Azimuth360Error> {
        if !(0. ..=360.).contains(&angle) {
            return Err(Azimuth360Error::InvalidAngle);
        }

        Ok(Self(angle))
    }

    pub fn angle(&self) -> f64 {
        self.0
    }

    /// The same bearing in the convention the irradiance formulas use:
    /// 0 = equator-facing, east positive, west negative, -180 to 180.
    pub(crate) fn transform_to_180(&self) -> f64 {
        180. - self.0
    }
}

impl Display for Azimuth360 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Azimuth360 {
    type Err = Azimuth360Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let angle = s
            .parse::<f64>()
            .map_err(|_| Azimuth360Error::InvalidAngle)?;
        Self::new(angle)
    }
}

#[derive(Clone, Copy, Debug, Error)]
pub enum Azimuth360Error {
    #[error("Azimuth must be between 0 and 360 degrees inclusive")]
    InvalidAngle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_round_to_two_decimal_places() {
        assert_eq!(round_to_2dp(5.6789), 5.68);
        assert_eq!(round_to_2dp(5.674), 5.67);
        assert_eq!(round_to_2dp(-0.005), -0.01);
    }

    #[rstest]
    fn test_azimuth360_angle() {
        assert_eq!(Azimuth360::new(180.).unwrap().angle(), 180.);
    }

    #[rstest]
    fn test_azimuth360_invalid_angle() {
        assert!(Azimuth360::new(-10.).is_err());
        assert!(Azimuth360::new(380.).is_err());
    }

    #[rstest]
    #[case(0., 180.)]
    #[case(90., 90.)]
    #[case(180., 0.)]
    #[case(270., -90.)]
    #[case(360., -180.)]
    fn test_azimuth360_transform_to_180(#[case] value: f64, #[case] expected_result: f64) {
        assert_eq!(
            Azimuth360::new(value).unwrap().transform_to_180(),
            expected_result
        );
    }

    #[rstest]
    fn test_azimuth360_from_str() {
        assert_eq!(Azimuth360::from_str("135").unwrap().angle(), 135.);
        assert!(Azimuth360::from_str("due south").is_err());
    }
}
