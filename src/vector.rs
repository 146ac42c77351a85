//! Radial / tangential split of a velocity against a reference position.

use nalgebra::Vector3;
use serde::Serialize;
use thiserror::Error;

use crate::propagate::Frame;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidGeometryError {
    #[error("reference vector has zero (or non-finite) length")]
    ZeroReference,
    #[error("observer latitude {latitude}° / longitude {longitude}° is invalid")]
    Observer { latitude: f64, longitude: f64 },
    #[error("state is expressed in the {found} frame, expected {expected}")]
    FrameMismatch { expected: Frame, found: Frame },
    #[error("states are valid at different epochs")]
    EpochMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decomposition {
    pub velocity: Vector3<f64>,
    /// Component parallel to the reference position
    pub radial: Vector3<f64>,
    /// Component orthogonal to the reference position
    pub tangential: Vector3<f64>,
    /// Signed projection on the reference direction, positive away from it
    pub radial_speed: f64,
}

/// Splits `velocity` into its components parallel and orthogonal to
/// `reference_position`.
pub fn decompose(
    velocity: &Vector3<f64>,
    reference_position: &Vector3<f64>,
) -> Result<Decomposition, InvalidGeometryError> {
    let norm = reference_position.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(InvalidGeometryError::ZeroReference);
    }

    let radial_unit = reference_position / norm;
    let radial_speed = velocity.dot(&radial_unit);
    let radial = radial_unit * radial_speed;

    Ok(Decomposition {
        velocity: *velocity,
        radial,
        tangential: velocity - radial,
        radial_speed,
    })
}
