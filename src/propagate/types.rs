use nalgebra::Vector3;
use serde::Serialize;

use crate::time::JulianDate;
use crate::vector::InvalidGeometryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    /// True equator, mean equinox (the SGP4 output frame)
    #[strum(serialize = "inertial")]
    Inertial,
    #[strum(serialize = "earth-fixed")]
    EarthFixed,
    /// East-North-Up at an observer
    #[strum(serialize = "local horizon")]
    LocalHorizon,
}

/// Position (m) and velocity (m/s) in a given frame, valid at `epoch`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    frame: Frame,
    epoch: JulianDate,
}

impl StateVector {
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        frame: Frame,
        epoch: JulianDate,
    ) -> Self {
        Self {
            position,
            velocity,
            frame,
            epoch,
        }
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn velocity(&self) -> &Vector3<f64> {
        &self.velocity
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn epoch(&self) -> &JulianDate {
        &self.epoch
    }

    /// Distance from the frame origin (m)
    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// State of `self` seen from `origin`: difference of positions and of
    /// velocities. Both must share frame and epoch.
    pub fn relative_to(&self, origin: &StateVector) -> Result<StateVector, InvalidGeometryError> {
        if self.frame != origin.frame {
            return Err(InvalidGeometryError::FrameMismatch {
                expected: self.frame,
                found: origin.frame,
            });
        }
        if self.epoch != origin.epoch {
            return Err(InvalidGeometryError::EpochMismatch);
        }
        Ok(StateVector {
            position: self.position - origin.position,
            velocity: self.velocity - origin.velocity,
            frame: self.frame,
            epoch: self.epoch,
        })
    }

    pub(crate) fn in_frame(
        &self,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        frame: Frame,
    ) -> StateVector {
        StateVector {
            position,
            velocity,
            frame,
            epoch: self.epoch,
        }
    }
}
