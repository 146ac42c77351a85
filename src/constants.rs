/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Earth angular velocity (rad/s)
pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;

/// Mean Earth radius used for ground observers (m)
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;

/// WGS-72 equatorial radius, the one SGP4 works with (km)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.135;

pub const MINUTES_PER_DAY: f64 = 1440.0;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

pub const RADIANS_PER_REVOLUTION: f64 = std::f64::consts::TAU;

/// Julian date of J2000.0 (2000-01-01 12:00 TT)
pub const JD_J2000: f64 = 2_451_545.0;

pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

pub const METERS_PER_KILOMETER: f64 = 1000.0;
