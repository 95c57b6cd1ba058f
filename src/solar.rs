//! Solar geometry and irradiance on an inclined surface, following the
//! calculation method of BS EN ISO 52010-1:2017 (anisotropic sky, Perez
//! brightness coefficients). Angles are carried in degrees throughout and
//! shadowed as radians inside the trigonometric steps.

use crate::core::units::{DEGREES_PER_HOUR_OF_ROTATION, MINUTES_PER_HOUR, SECONDS_PER_HOUR};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};

/// Solar position and the per-timestamp sky parameters derived from it.
/// Declination and hour angle are retained because the angle-of-incidence
/// formula consumes them directly rather than the altitude/azimuth pair.
#[derive(Clone, Copy, Debug)]
pub struct SolarPosition {
    /// solar declination, in degrees
    pub declination: f64,
    /// solar hour angle, in degrees, 0 at solar noon, positive before it
    pub hour_angle: f64,
    /// angle between the solar beam and the horizontal, in degrees, floored at 0
    pub altitude: f64,
    /// 90 minus the altitude, in degrees
    pub zenith: f64,
    /// angle from south, eastwards positive, in degrees
    pub azimuth: f64,
    /// relative path length of the beam through the atmosphere
    pub air_mass: f64,
    /// extra-terrestrial radiation for the day of year, in W/m2
    pub extra_terrestrial_radiation: f64,
}

/// Calculate the solar position for a single time-zone-aware timestamp.
///
/// The ISO 52010 formulation indexes the sun path by hour-of-year sections;
/// here the stamped time is treated as an instantaneous sample and its decimal
/// hour enters the solar time directly, so sub-hourly records need no binning.
///
/// Arguments:
/// * `timestamp` - sample time carrying the site's fixed UTC offset
/// * `latitude` - latitude of the site, in degrees, north positive
/// * `longitude` - longitude of the site, easterly +ve westerly -ve, in degrees
pub fn solar_position(
    timestamp: &DateTime<FixedOffset>,
    latitude: f64,
    longitude: f64,
) -> SolarPosition {
    let day_of_year = timestamp.ordinal();
    let orbit_deviation = earth_orbit_deviation(day_of_year);
    let declination = solar_declination(orbit_deviation);
    let timezone = timestamp.offset().local_minus_utc() as f64 / SECONDS_PER_HOUR as f64;
    let time_shift = time_shift(timezone, longitude);
    let decimal_hour = timestamp.hour() as f64
        + timestamp.minute() as f64 / MINUTES_PER_HOUR as f64
        + timestamp.second() as f64 / SECONDS_PER_HOUR as f64;
    let solar_time = solar_time(decimal_hour, equation_of_time(day_of_year), time_shift);
    let hour_angle = solar_hour_angle(solar_time);
    let altitude = solar_altitude(latitude, declination, hour_angle);
    let zenith = 90.0 - altitude;
    let azimuth = solar_azimuth_angle(latitude, declination, hour_angle, altitude);

    SolarPosition {
        declination,
        hour_angle,
        altitude,
        zenith,
        azimuth,
        air_mass: air_mass(altitude),
        extra_terrestrial_radiation: extra_terrestrial_radiation(orbit_deviation),
    }
}

/// Direct, diffuse and hemispherical-total irradiance received by a tilted,
/// rotated plane, in W/m2. The direct component includes the circumsolar
/// share; the diffuse component carries sky diffuse, horizon brightening and
/// ground reflection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InclinedIrradiance {
    pub direct: f64,
    pub diffuse: f64,
    pub global: f64,
}

/// Decompose one timestamp's measured horizontal irradiance onto an inclined
/// surface.
///
/// Arguments:
/// * `position` - solar position for the timestamp, from [`solar_position`]
/// * `latitude` - latitude of the site, in degrees
/// * `ghi` - measured global horizontal irradiance, in W/m2
/// * `dni` - measured direct normal (beam) irradiance, in W/m2
/// * `dhi` - measured diffuse horizontal irradiance, in W/m2
/// * `tilt` - tilt of the surface from horizontal, upwards facing, in degrees;
///            deliberately not clamped, out-of-range values pass through the
///            trigonometry
/// * `orientation` - surface azimuth, 0 = equator-facing, east positive, -180
///                   to 180, in degrees
/// * `ground_reflectivity` - albedo of the ground in front of the surface, 0 to 1
///
/// The ground reflection term uses the measured `ghi` directly; the station
/// supplies it, so there is no need to reconstruct global horizontal from the
/// beam and altitude as ISO 52010 otherwise prescribes.
pub fn inclined_surface_irradiance(
    position: &SolarPosition,
    latitude: f64,
    ghi: f64,
    dni: f64,
    dhi: f64,
    tilt: f64,
    orientation: f64,
    ground_reflectivity: f64,
) -> InclinedIrradiance {
    let clearness = dimensionless_clearness_parameter(dhi, dni, position.altitude);
    let sky_brightness =
        dimensionless_sky_brightness_parameter(position.air_mass, dhi, position.extra_terrestrial_radiation);
    let f1 = f1_circumsolar_brightness_coefficient(clearness, sky_brightness, position.zenith);
    let f2 = f2_horizontal_brightness_coefficient(clearness, sky_brightness, position.zenith);

    let angle_of_incidence = solar_angle_of_incidence(position, latitude, tilt, orientation);

    // beam on the plane cannot be negative; the sun is simply behind it
    let beam = (dni * angle_of_incidence.to_radians().cos()).max(0.0);

    // dimensionless parameters a & b describing the incidence-weighted solid
    // angle sustained by the circumsolar region as seen respectively by the
    // tilted surface and the horizontal
    let a = angle_of_incidence.to_radians().cos().max(0.0);
    let b = position
        .zenith
        .to_radians()
        .cos()
        .max(85.0f64.to_radians().cos());

    let circumsolar = dhi * f1 * (a / b);
    let sky_diffuse = dhi * (1.0 - f1) * ((1.0 + tilt.to_radians().cos()) / 2.0);
    let horizon_brightening = dhi * f2 * tilt.to_radians().sin();
    let ground_reflection = ghi * ground_reflectivity * ((1.0 - tilt.to_radians().cos()) / 2.0);

    let direct = beam + circumsolar;
    let diffuse = sky_diffuse + horizon_brightening + ground_reflection;

    InclinedIrradiance {
        direct,
        diffuse,
        global: direct + diffuse,
    }
}

/// Calculates the solar angle of incidence, which is the angle of incidence of
/// the solar beam on the inclined surface, determined as a function of the
/// solar hour angle and solar declination.
pub fn solar_angle_of_incidence(
    position: &SolarPosition,
    latitude: f64,
    tilt: f64,
    orientation: f64,
) -> f64 {
    let tilt = tilt.to_radians();
    let orientation = orientation.to_radians();
    let latitude = latitude.to_radians();
    let solar_declination = position.declination.to_radians();
    let solar_hour_angle = position.hour_angle.to_radians();

    (solar_declination.sin() * latitude.sin() * tilt.cos()
        - solar_declination.sin() * latitude.cos() * tilt.sin() * orientation.cos()
        + solar_declination.cos() * latitude.cos() * tilt.cos() * solar_hour_angle.cos()
        + solar_declination.cos()
            * latitude.sin()
            * tilt.sin()
            * orientation.cos()
            * solar_hour_angle.cos()
        + solar_declination.cos() * tilt.sin() * orientation.sin() * solar_hour_angle.sin())
    .acos()
    .to_degrees()
}

fn earth_orbit_deviation(day_of_year: u32) -> f64 {
    // day_of_year is 1-indexed, 1 to 365 or 366
    (360.0 / 365.0) * day_of_year as f64
}

fn solar_declination(earth_orbit_deviation: f64) -> f64 {
    // earth_orbit_deviation passed as degrees; shadow internally as radians
    let earth_orbit_deviation = earth_orbit_deviation.to_radians();

    0.33281
        - 22.984 * earth_orbit_deviation.cos()
        - 0.3499 * (2.0 * earth_orbit_deviation).cos()
        - 0.1398 * (3.0 * earth_orbit_deviation).cos()
        + 3.7872 * earth_orbit_deviation.sin()
        + 0.03205 * (2.0 * earth_orbit_deviation).sin()
        + 0.07187 * (3.0 * earth_orbit_deviation).sin()
}

/// Calculate the equation of time, in minutes, for a 1-indexed day of the year.
fn equation_of_time(day_of_year: u32) -> f64 {
    let nday = day_of_year as i32;

    match nday {
        nday if nday < 21 => 2.6 + 0.44 * nday as f64,
        nday if nday < 136 => 5.2 + 9.0 * ((nday - 43) as f64 * 0.0357).cos(),
        nday if nday < 241 => 1.4 - 5.0 * ((nday - 135) as f64 * 0.0449).cos(),
        nday if nday < 336 => -6.3 - 10.0 * ((nday - 306) as f64 * 0.036).cos(),
        _ => 0.45 * (nday - 359) as f64,
    }
}

/// Calculate the time shift, in hours, resulting from the fact that the
/// longitude and the path of the sun are not equal.
///
/// Daylight saving is disregarded: the weather index carries a fixed offset.
fn time_shift(timezone: f64, longitude: f64) -> f64 {
    timezone - longitude / DEGREES_PER_HOUR_OF_ROTATION
}

/// Calculate the solar time as a function of the equation of time, the time
/// shift and the decimal hour of the sample.
fn solar_time(decimal_hour: f64, equation_of_time: f64, time_shift: f64) -> f64 {
    decimal_hour - (equation_of_time / MINUTES_PER_HOUR as f64) - time_shift
}

/// Calculate the solar hour angle for the sampled instant, in degrees,
/// limited to the range -180 to +180.
fn solar_hour_angle(solar_time: f64) -> f64 {
    let mut solar_angle = DEGREES_PER_HOUR_OF_ROTATION * (12.0 - solar_time);

    if solar_angle > 180.0 {
        solar_angle -= 360.0;
    } else if solar_angle < -180.0 {
        solar_angle += 360.0;
    }

    solar_angle
}

/// The angle between the solar beam and the horizontal surface. Negative
/// values (sun below the horizon) are floored at zero, which in turn zeroes
/// the beam and circumsolar terms at night.
fn solar_altitude(latitude: f64, solar_declination: f64, solar_hour_angle: f64) -> f64 {
    let latitude = latitude.to_radians();
    let solar_declination = solar_declination.to_radians();
    let solar_hour_angle = solar_hour_angle.to_radians();

    let asol = (solar_declination.sin() * latitude.sin()
        + solar_declination.cos() * latitude.cos() * solar_hour_angle.cos())
    .asin()
    .to_degrees();

    if asol < 0.0001 {
        return 0.;
    }

    asol
}

/// Calculates the solar azimuth angle, angle from south, eastwards positive,
/// westwards negative, in degrees (BS EN ISO 52010-1:2017 formula 16).
fn solar_azimuth_angle(
    latitude: f64,
    solar_declination: f64,
    solar_hour_angle: f64,
    solar_altitude: f64,
) -> f64 {
    // solar_hour_angle is subtracted from 180 before conversion per the standard
    let latitude = latitude.to_radians();
    let solar_declination = solar_declination.to_radians();
    let solar_hour_angle = (180.0 - solar_hour_angle).to_radians();
    let solar_altitude = solar_altitude.to_radians();

    let sin_aux1 = solar_declination.cos() * solar_hour_angle.sin() / solar_altitude.cos();
    let cos_aux1 = (latitude.cos() * solar_declination.sin()
        + latitude.sin() * solar_declination.cos() * solar_hour_angle.cos())
        / solar_altitude.cos();
    let aux2 = sin_aux1.clamp(-1.0, 1.0).asin().to_degrees();

    if sin_aux1 >= 0.0 && cos_aux1 > 0.0 {
        if aux2 > 180.0 {
            aux2 - 180.0
        } else {
            180.0 - aux2
        }
    } else if cos_aux1 < 0.0 {
        aux2
    } else {
        -(180.0 + aux2)
    }
}

/// Calculates the air mass, the distance the solar beam travels through the
/// earth's atmosphere, as a function of the solar altitude angle.
fn air_mass(solar_altitude: f64) -> f64 {
    if solar_altitude >= 10.0 {
        1.0 / solar_altitude.to_radians().sin()
    } else {
        1.0 / (solar_altitude.to_radians().sin() + 0.15 * (solar_altitude + 3.885).powf(-1.253))
    }
}

fn extra_terrestrial_radiation(earth_orbit_deviation: f64) -> f64 {
    // 1367 is the solar constant; ISO 52010 mislabels it in this formula
    1367.0 * (1.0 + 0.033 * earth_orbit_deviation.to_radians().cos())
}

enum BrightnessCoefficientName {
    F11,
    F12,
    F13,
    F21,
    F22,
    F23,
}

struct BrightnessCoefficientsRow {
    f11: f64,
    f12: f64,
    f13: f64,
    f21: f64,
    f22: f64,
    f23: f64,
}

// version of Table 8 in ISO 52010
static BRIGHTNESS_COEFFICIENTS: [BrightnessCoefficientsRow; 8] = [
    BrightnessCoefficientsRow {
        f11: -0.008,
        f12: 0.588,
        f13: -0.062,
        f21: -0.06,
        f22: 0.072,
        f23: -0.022,
    },
    BrightnessCoefficientsRow {
        f11: 0.13,
        f12: 0.683,
        f13: -0.151,
        f21: -0.019,
        f22: 0.066,
        f23: -0.029,
    },
    BrightnessCoefficientsRow {
        f11: 0.33,
        f12: 0.487,
        f13: -0.221,
        f21: 0.055,
        f22: -0.064,
        f23: -0.026,
    },
    BrightnessCoefficientsRow {
        f11: 0.568,
        f12: 0.187,
        f13: -0.295,
        f21: 0.109,
        f22: -0.152,
        f23: -0.014,
    },
    BrightnessCoefficientsRow {
        f11: 0.873,
        f12: -0.392,
        f13: -0.362,
        f21: 0.226,
        f22: -0.462,
        f23: 0.001,
    },
    BrightnessCoefficientsRow {
        f11: 1.132,
        f12: -1.237,
        f13: -0.412,
        f21: 0.288,
        f22: -0.823,
        f23: 0.056,
    },
    BrightnessCoefficientsRow {
        f11: 1.06,
        f12: -1.6,
        f13: -0.359,
        f21: 0.264,
        f22: -1.127,
        f23: 0.131,
    },
    BrightnessCoefficientsRow {
        f11: 0.678,
        f12: -0.327,
        f13: -0.25,
        f21: 0.156,
        f22: -1.377,
        f23: 0.251,
    },
];

/// Returns a brightness coefficient as a look up from Table 8 in ISO 52010.
///
/// Arguments:
/// * `e` - dimensionless clearness parameter
/// * `fij` - the coefficient to be returned, e.g. F12 or F23
fn brightness_coefficient(e: f64, fij: BrightnessCoefficientName) -> f64 {
    let row = &BRIGHTNESS_COEFFICIENTS[if e < 1.065 {
        0usize
    } else if e < 1.23 {
        1usize
    } else if e < 1.5 {
        2usize
    } else if e < 1.95 {
        3usize
    } else if e < 2.8 {
        4usize
    } else if e < 4.5 {
        5usize
    } else if e < 6.2 {
        6usize
    } else {
        7usize
    }];
    match fij {
        BrightnessCoefficientName::F11 => row.f11,
        BrightnessCoefficientName::F12 => row.f12,
        BrightnessCoefficientName::F13 => row.f13,
        BrightnessCoefficientName::F21 => row.f21,
        BrightnessCoefficientName::F22 => row.f22,
        BrightnessCoefficientName::F23 => row.f23,
    }
}

/// Returns the circumsolar brightness coefficient, F1, floored at zero.
fn f1_circumsolar_brightness_coefficient(e: f64, delta: f64, solar_zenith_angle: f64) -> f64 {
    let f1 = brightness_coefficient(e, BrightnessCoefficientName::F11)
        + brightness_coefficient(e, BrightnessCoefficientName::F12) * delta
        + brightness_coefficient(e, BrightnessCoefficientName::F13)
            * solar_zenith_angle.to_radians();
    if f1 < 0.0 {
        0.0
    } else {
        f1
    }
}

/// Returns the horizontal brightness coefficient, F2.
fn f2_horizontal_brightness_coefficient(e: f64, delta: f64, solar_zenith_angle: f64) -> f64 {
    brightness_coefficient(e, BrightnessCoefficientName::F21)
        + brightness_coefficient(e, BrightnessCoefficientName::F22) * delta
        + brightness_coefficient(e, BrightnessCoefficientName::F23)
            * solar_zenith_angle.to_radians()
}

const CLEARNESS_FORMULA_K: f64 = 1.014;

/// Returns the dimensionless clearness parameter, E, for anisotropic sky
/// conditions (Perez model). An overcast-free sky with zero diffuse measures
/// as fully clear.
fn dimensionless_clearness_parameter(
    diffuse_horizontal_radiation: f64,
    direct_beam_radiation: f64,
    solar_altitude: f64,
) -> f64 {
    if diffuse_horizontal_radiation == 0.0 {
        999.0
    } else {
        (((diffuse_horizontal_radiation + direct_beam_radiation) / diffuse_horizontal_radiation)
            + CLEARNESS_FORMULA_K * solar_altitude.to_radians().powi(3))
            / (1.0 + CLEARNESS_FORMULA_K * solar_altitude.to_radians().powi(3))
    }
}

/// Calculates the dimensionless sky brightness parameter, delta.
///
/// Arguments:
/// * `air_mass` - air mass for the timestamp
/// * `diffuse_horizontal_radiation` - diffuse horizontal radiation, in W/m2
/// * `extra_terrestrial_radiation` - extra-terrestrial radiation for the day of year, in W/m2
fn dimensionless_sky_brightness_parameter(
    air_mass: f64,
    diffuse_horizontal_radiation: f64,
    extra_terrestrial_radiation: f64,
) -> f64 {
    air_mass * diffuse_horizontal_radiation / extra_terrestrial_radiation
}
