//! Inertial, Earth-fixed and local East-North-Up frames.
//!
//! Every transform here is a pure rotation: magnitudes are preserved and the
//! inverse is the transpose.

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_MEAN_RADIUS_M, EARTH_ROTATION_RAD_S};
use crate::propagate::{Frame, StateVector};
use crate::time::JulianDate;
use crate::vector::InvalidGeometryError;

/// Ground observer on a spherical Earth, altitude zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Coordinates", into = "Coordinates")]
pub struct ObserverLocation {
    latitude_deg: f64,
    longitude_deg: f64,
}

/// Serialised form of [`ObserverLocation`], degrees.
#[derive(Serialize, Deserialize)]
struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<Coordinates> for ObserverLocation {
    type Error = InvalidGeometryError;

    fn try_from(c: Coordinates) -> Result<Self, Self::Error> {
        Self::new(c.latitude, c.longitude)
    }
}

impl From<ObserverLocation> for Coordinates {
    fn from(o: ObserverLocation) -> Self {
        Coordinates {
            latitude: o.latitude_deg,
            longitude: o.longitude_deg,
        }
    }
}

impl ObserverLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, InvalidGeometryError> {
        if !latitude_deg.is_finite()
            || !longitude_deg.is_finite()
            || !(-90.0..=90.0).contains(&latitude_deg)
        {
            return Err(InvalidGeometryError::Observer {
                latitude: latitude_deg,
                longitude: longitude_deg,
            });
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }

    /// Parses `"lat, lon"` in degrees.
    pub fn from_coordinates(coordinates: &str) -> Option<Self> {
        let (lat, lon) = coordinates.split_once(',')?;
        Self::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?).ok()
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }
}

/// Greenwich sidereal angle (rad) at `epoch`, IAU-82 model.
pub fn sidereal_angle(epoch: &JulianDate) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(epoch.julian_years_since_j2000())
}

/// Rotation taking a vector to East-North-Up components: about the polar
/// axis by the longitude, then tilted by the latitude.
fn enu_rotation(observer: &ObserverLocation) -> Rotation3<f64> {
    let (sin_lat, cos_lat) = observer.lat_rad().sin_cos();
    let (sin_lon, cos_lon) = observer.lon_rad().sin_cos();

    Rotation3::from_matrix_unchecked(Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    ))
}

fn polar_rotation(sidereal_angle: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -sidereal_angle)
}

/// Expresses `vector` in the observer's East-North-Up axes. Rotation only:
/// no translation to the observer's position.
pub fn inertial_to_local_horizon(
    vector: &Vector3<f64>,
    observer: &ObserverLocation,
) -> Vector3<f64> {
    enu_rotation(observer) * vector
}

pub fn local_horizon_to_inertial(
    vector: &Vector3<f64>,
    observer: &ObserverLocation,
) -> Vector3<f64> {
    enu_rotation(observer).inverse() * vector
}

/// Rotates an inertial state into the Earth-fixed frame. Pure rotation, the
/// velocity gets no ω × r term.
pub fn inertial_rotating_frame(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    sidereal_angle: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let rotation = polar_rotation(sidereal_angle);
    (rotation * position, rotation * velocity)
}

pub fn rotating_to_inertial(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    sidereal_angle: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let rotation = polar_rotation(sidereal_angle).inverse();
    (rotation * position, rotation * velocity)
}

/// Observer position in the Earth-fixed frame (m).
pub fn ground_observer_position(observer: &ObserverLocation) -> Vector3<f64> {
    let (sin_lat, cos_lat) = observer.lat_rad().sin_cos();
    let (sin_lon, cos_lon) = observer.lon_rad().sin_cos();
    Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat) * EARTH_MEAN_RADIUS_M
}

/// Observer velocity due to Earth rotation (m/s), ω × r in the Earth-fixed
/// frame: eastward, ω R cos(latitude) in magnitude.
pub fn ground_observer_velocity(observer: &ObserverLocation) -> Vector3<f64> {
    let pos = ground_observer_position(observer);
    Vector3::new(
        -EARTH_ROTATION_RAD_S * pos[1],
        EARTH_ROTATION_RAD_S * pos[0],
        0.0,
    )
}

/// The observer as an Earth-fixed state at `epoch`.
pub fn ground_observer_state(observer: &ObserverLocation, epoch: JulianDate) -> StateVector {
    StateVector::new(
        ground_observer_position(observer),
        ground_observer_velocity(observer),
        Frame::EarthFixed,
        epoch,
    )
}

/// Azimuth (deg from north, clockwise) and elevation (deg) of an ENU vector.
pub fn look_angles(enu: &Vector3<f64>) -> (f64, f64) {
    let range = enu.norm();
    let azimuth = enu[0].atan2(enu[1]).to_degrees().rem_euclid(360.0);
    let elevation = if range > 0.0 {
        (enu[2] / range).asin().to_degrees()
    } else {
        0.0
    };
    (azimuth, elevation)
}

impl StateVector {
    /// Inertial to Earth-fixed at the state's own epoch.
    pub fn to_earth_fixed(&self) -> Result<StateVector, InvalidGeometryError> {
        self.expect_frame(Frame::Inertial)?;
        let (position, velocity) =
            inertial_rotating_frame(self.position(), self.velocity(), sidereal_angle(self.epoch()));
        Ok(self.in_frame(position, velocity, Frame::EarthFixed))
    }

    /// Earth-fixed to inertial at the state's own epoch.
    pub fn to_inertial(&self) -> Result<StateVector, InvalidGeometryError> {
        self.expect_frame(Frame::EarthFixed)?;
        let (position, velocity) =
            rotating_to_inertial(self.position(), self.velocity(), sidereal_angle(self.epoch()));
        Ok(self.in_frame(position, velocity, Frame::Inertial))
    }

    /// Re-expresses both vectors in the observer's East-North-Up axes.
    pub fn to_local_horizon(
        &self,
        observer: &ObserverLocation,
    ) -> Result<StateVector, InvalidGeometryError> {
        if self.frame() == Frame::LocalHorizon {
            return Err(InvalidGeometryError::FrameMismatch {
                expected: Frame::Inertial,
                found: Frame::LocalHorizon,
            });
        }
        Ok(self.in_frame(
            inertial_to_local_horizon(self.position(), observer),
            inertial_to_local_horizon(self.velocity(), observer),
            Frame::LocalHorizon,
        ))
    }

    fn expect_frame(&self, expected: Frame) -> Result<(), InvalidGeometryError> {
        if self.frame() == expected {
            Ok(())
        } else {
            Err(InvalidGeometryError::FrameMismatch {
                expected,
                found: self.frame(),
            })
        }
    }
}
